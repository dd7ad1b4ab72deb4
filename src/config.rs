//! Configuration types for media-scout

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Companion application configuration (endpoint, liveness, forwarding)
///
/// Groups settings for the external, locally-running program to which
/// intercepted downloads may be routed. Used as a nested sub-config within
/// [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompanionConfig {
    /// Host the companion application listens on (default: "127.0.0.1")
    #[serde(default = "default_companion_host")]
    pub host: String,

    /// Port the companion application listens on (default: 18880)
    #[serde(default = "default_companion_port")]
    pub port: u16,

    /// How long a liveness result is served from cache (default: 5s)
    #[serde(default = "default_liveness_interval")]
    pub liveness_interval: Duration,

    /// Timeout for the liveness probe itself (default: 1s)
    #[serde(default = "default_liveness_timeout")]
    pub liveness_timeout: Duration,

    /// Timeout for forwarding a download to the companion (default: 5s)
    #[serde(default = "default_forward_timeout")]
    pub forward_timeout: Duration,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            host: default_companion_host(),
            port: default_companion_port(),
            liveness_interval: default_liveness_interval(),
            liveness_timeout: default_liveness_timeout(),
            forward_timeout: default_forward_timeout(),
        }
    }
}

impl CompanionConfig {
    /// Base URL of the companion endpoint (e.g., `http://127.0.0.1:18880/`)
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

/// Header probe and classification configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Timeout for a single header probe (default: 2s)
    ///
    /// On timeout the URL is cached as unverifiable and not retried.
    #[serde(default = "default_probe_timeout")]
    pub timeout: Duration,

    /// Size below which raw media responses are treated as fragments
    /// (default: 2 MiB)
    ///
    /// Empirically tuned; manifests are exempt regardless of reported size.
    #[serde(default = "default_fragment_threshold")]
    pub fragment_threshold_bytes: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: default_probe_timeout(),
            fragment_threshold_bytes: default_fragment_threshold(),
        }
    }
}

/// URL canonicalization configuration
///
/// Used as a nested sub-config within [`Config`]. The byte-range parameters
/// (`bytestart`, `byteend`) are always stripped and are not configurable;
/// the tracking-parameter list is replaceable tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CanonicalizeConfig {
    /// Query parameters removed as tracking noise before deduplication
    #[serde(default = "default_tracking_params")]
    pub tracking_params: Vec<String>,
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self {
            tracking_params: default_tracking_params(),
        }
    }
}

/// Main configuration for [`MediaScout`](crate::MediaScout)
///
/// Fields are organized into logical sub-configs:
/// - [`companion`](CompanionConfig) — companion endpoint and timeouts
/// - [`probe`](ProbeConfig) — header probe timeout and fragment threshold
/// - [`canonicalize`](CanonicalizeConfig) — tracking-parameter stripping
///
/// All sub-config fields are flattened for a flat JSON/TOML surface.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Companion application settings
    #[serde(flatten)]
    pub companion: CompanionConfig,

    /// Header probe settings
    #[serde(flatten)]
    pub probe: ProbeConfig,

    /// URL canonicalization settings
    #[serde(flatten)]
    pub canonicalize: CanonicalizeConfig,
}

impl Config {
    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.companion.port == 0 {
            return Err(Error::config(
                "companion.port",
                "companion port must be between 1 and 65535",
            ));
        }
        if self.probe.timeout.is_zero() {
            return Err(Error::config(
                "probe.timeout",
                "probe timeout must be non-zero",
            ));
        }
        if self.companion.liveness_timeout.is_zero() {
            return Err(Error::config(
                "companion.liveness_timeout",
                "liveness timeout must be non-zero",
            ));
        }
        Ok(())
    }
}

fn default_companion_host() -> String {
    "127.0.0.1".to_string()
}

fn default_companion_port() -> u16 {
    18880
}

fn default_liveness_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_liveness_timeout() -> Duration {
    Duration::from_secs(1)
}

fn default_forward_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_fragment_threshold() -> u64 {
    2 * 1024 * 1024
}

fn default_tracking_params() -> Vec<String> {
    [
        "utm_source",
        "utm_medium",
        "utm_campaign",
        "utm_term",
        "utm_content",
        "fbclid",
        "gclid",
        "igshid",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
