//! Core scout implementation split into focused submodules.
//!
//! The `MediaScout` struct and its methods are organized by domain:
//! - [`candidates`] - Candidate URL intake pipeline
//! - [`routing`] - Response interception and forward/fallback follow-up
//! - [`sessions`] - Session lifecycle and query interface

mod candidates;
mod routing;
mod sessions;


use crate::companion::{CompanionClient, NativeDownloader, NoOpNativeDownloader};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::liveness::CompanionLiveness;
use crate::probe::HeaderProbeCache;
use crate::registry::SessionRegistry;
use crate::types::Event;
use std::sync::Arc;

/// Main scout instance (cloneable - all fields are Arc-wrapped)
///
/// Owns the process-wide singletons: the header probe cache, the companion
/// liveness cache, and the session registry. Candidate intake and the
/// interception follow-up run as spawned tasks; consumers observe results
/// through the event broadcast channel.
#[derive(Clone)]
pub struct MediaScout {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Process-wide single-flight probe cache
    pub(crate) probe_cache: Arc<HeaderProbeCache>,
    /// Process-wide companion liveness cache
    pub(crate) liveness: Arc<CompanionLiveness>,
    /// Companion forward client
    pub(crate) companion: Arc<CompanionClient>,
    /// Per-session registry of accepted items
    pub(crate) registry: Arc<SessionRegistry>,
    /// Host-provided native download primitive (fallback path)
    pub(crate) native: Arc<dyn NativeDownloader>,
}

impl MediaScout {
    /// Create a new MediaScout with a no-op native downloader
    ///
    /// Embedders that can hand downloads back to the host should use
    /// [`MediaScout::with_native_downloader`] instead.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_native_downloader(config, Arc::new(NoOpNativeDownloader))
    }

    /// Create a new MediaScout with an explicit native download primitive
    pub fn with_native_downloader(
        config: Config,
        native: Arc<dyn NativeDownloader>,
    ) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder().build().map_err(|e| Error::Config {
            message: format!("failed to build HTTP client: {e}"),
            key: None,
        })?;

        // Broadcast channel with room for bursty pages; slow subscribers
        // receive RecvError::Lagged rather than blocking the pipeline
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        let probe_cache = Arc::new(HeaderProbeCache::new(client.clone(), config.probe.timeout));
        let liveness = Arc::new(CompanionLiveness::new(
            client.clone(),
            config.companion.endpoint(),
            config.companion.liveness_interval,
            config.companion.liveness_timeout,
        ));
        let companion = Arc::new(CompanionClient::new(
            client,
            config.companion.forward_timeout,
        ));

        tracing::info!(
            endpoint = %config.companion.endpoint(),
            native_downloader = native.name(),
            "media scout initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            event_tx,
            probe_cache,
            liveness,
            companion,
            registry: Arc::new(SessionRegistry::new()),
            native,
        })
    }

    /// Subscribe to scout events
    ///
    /// Multiple subscribers are supported; each receives all events
    /// independently. Notifications are best-effort — if nobody subscribes,
    /// events are dropped silently.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Change the companion application port
    ///
    /// Invalidates the liveness cache immediately: the next check performs a
    /// fresh probe even when unforced.
    pub fn set_companion_port(&self, port: u16) -> Result<()> {
        if port == 0 {
            return Err(Error::config(
                "companion.port",
                "companion port must be between 1 and 65535",
            ));
        }
        let endpoint = format!("http://{}:{}/", self.config.companion.host, port);
        self.liveness.set_endpoint(endpoint);
        Ok(())
    }

    /// Whether the companion application is currently reachable
    pub async fn companion_alive(&self, force: bool) -> bool {
        self.liveness.check_alive(force).await
    }

    /// Drop all memoized probe results
    ///
    /// Session registries are unaffected; this only forgets what is known
    /// about URL natures.
    pub fn clear_probe_cache(&self) {
        self.probe_cache.clear();
    }

    /// Emit an event to all subscribers
    ///
    /// send() returns Err when there are no receivers, which is fine — the
    /// event is simply dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
