//! TTL-cached liveness checking of the companion application
//!
//! The router consults this before forwarding an intercepted download. A
//! result is served from cache while it is younger than the configured
//! interval (5 s by default); otherwise a bounded `HEAD /` probe refreshes
//! the cache, recording failures as `is_alive = false`. Changing the
//! endpoint (port change in the settings UI) invalidates the cache so the
//! next check probes fresh even when unforced.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cached reachability state of the companion endpoint
#[derive(Debug)]
struct LivenessState {
    endpoint: String,
    is_alive: bool,
    last_checked: Option<Instant>,
}

/// Process-wide liveness cache for the companion application
pub struct CompanionLiveness {
    client: reqwest::Client,
    interval: Duration,
    timeout: Duration,
    state: Mutex<LivenessState>,
}

impl CompanionLiveness {
    /// Create a liveness cache probing `endpoint` (e.g., `http://127.0.0.1:18880/`)
    pub fn new(
        client: reqwest::Client,
        endpoint: String,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            interval,
            timeout,
            state: Mutex::new(LivenessState {
                endpoint,
                is_alive: false,
                last_checked: None,
            }),
        }
    }

    /// Whether the companion application is reachable
    ///
    /// Serves the cached value when it is younger than the interval and
    /// `force` is false; otherwise performs a bounded probe and updates the
    /// cache regardless of outcome.
    pub async fn check_alive(&self, force: bool) -> bool {
        let endpoint = {
            let state = self.lock();
            if !force
                && let Some(checked_at) = state.last_checked
                && checked_at.elapsed() < self.interval
            {
                return state.is_alive;
            }
            state.endpoint.clone()
        };

        let alive = self.probe(&endpoint).await;

        let mut state = self.lock();
        // A concurrent endpoint change invalidates this probe's result
        if state.endpoint == endpoint {
            state.is_alive = alive;
            state.last_checked = Some(Instant::now());
        }
        alive
    }

    /// Point the cache at a new endpoint, invalidating it immediately
    ///
    /// The next `check_alive` performs a fresh probe even when unforced.
    pub fn set_endpoint(&self, endpoint: String) {
        let mut state = self.lock();
        if state.endpoint != endpoint {
            tracing::debug!(endpoint = %endpoint, "companion endpoint changed, liveness cache invalidated");
            state.endpoint = endpoint;
            state.is_alive = false;
            state.last_checked = None;
        }
    }

    /// Current endpoint being probed
    pub fn endpoint(&self) -> String {
        self.lock().endpoint.clone()
    }

    async fn probe(&self, endpoint: &str) -> bool {
        let request = self.client.head(endpoint).send();
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                let alive = response.status().is_success();
                tracing::debug!(endpoint = %endpoint, alive, "companion liveness probe completed");
                alive
            }
            Ok(Err(e)) => {
                tracing::debug!(endpoint = %endpoint, error = %e, "companion unreachable");
                false
            }
            Err(_) => {
                tracing::debug!(endpoint = %endpoint, timeout = ?self.timeout, "companion liveness probe timed out");
                false
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LivenessState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn liveness(endpoint: String) -> CompanionLiveness {
        CompanionLiveness::new(
            reqwest::Client::new(),
            endpoint,
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn result_is_cached_within_the_interval() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let liveness = liveness(format!("{}/", server.uri()));
        assert!(liveness.check_alive(false).await);
        assert!(
            liveness.check_alive(false).await,
            "second call within 5s must come from cache"
        );
        // expect(1) verified on server drop
    }

    #[tokio::test]
    async fn force_check_bypasses_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let liveness = liveness(format!("{}/", server.uri()));
        assert!(liveness.check_alive(false).await);
        assert!(liveness.check_alive(true).await);
    }

    #[tokio::test]
    async fn failures_are_recorded_as_not_alive() {
        // Nothing listens on port 1
        let liveness = liveness("http://127.0.0.1:1/".to_string());
        assert!(!liveness.check_alive(false).await);
        assert!(
            !liveness.check_alive(false).await,
            "the negative result is cached like any other"
        );
    }

    #[tokio::test]
    async fn non_success_status_counts_as_not_alive() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let liveness = liveness(format!("{}/", server.uri()));
        assert!(!liveness.check_alive(false).await);
    }

    #[tokio::test]
    async fn endpoint_change_invalidates_the_cache() {
        let old = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&old)
            .await;

        let new = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&new)
            .await;

        let liveness = liveness(format!("{}/", old.uri()));
        assert!(liveness.check_alive(false).await);

        liveness.set_endpoint(format!("{}/", new.uri()));
        assert!(
            liveness.check_alive(false).await,
            "after an endpoint change even an unforced check probes fresh"
        );
    }

    #[tokio::test]
    async fn setting_the_same_endpoint_keeps_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = format!("{}/", server.uri());
        let liveness = liveness(endpoint.clone());
        assert!(liveness.check_alive(false).await);

        liveness.set_endpoint(endpoint);
        assert!(
            liveness.check_alive(false).await,
            "re-setting an identical endpoint must not force a re-probe"
        );
    }

    #[tokio::test]
    async fn probe_timeout_counts_as_not_alive() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let liveness = CompanionLiveness::new(
            reqwest::Client::new(),
            format!("{}/", server.uri()),
            Duration::from_secs(5),
            Duration::from_millis(50),
        );
        assert!(!liveness.check_alive(false).await);
    }
}
