//! Single-flight memoized header probing
//!
//! Given a canonical URL, returns its [`ProbeResult`] while performing at
//! most one in-flight network probe per URL regardless of how many callers
//! ask concurrently. The cache stores the in-flight future itself (a
//! [`Shared`] boxed future), so late arrivals join the pending probe and the
//! completed result is memoized for the lifetime of the process.
//!
//! All probe failures — timeout, connection refused, non-success status —
//! are absorbed into `ProbeResult::invalid()`; a probe never returns an
//! error and a cached negative is not retried automatically.

use crate::types::ProbeResult;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

type SharedProbe = Shared<BoxFuture<'static, ProbeResult>>;

/// Process-wide single-flight cache of header probe results
///
/// Cheap to share behind an `Arc`; the inner map is guarded by a std mutex
/// that is only held to clone or insert a future, never across an await.
pub struct HeaderProbeCache {
    client: reqwest::Client,
    timeout: Duration,
    inflight: Mutex<HashMap<String, SharedProbe>>,
}

impl HeaderProbeCache {
    /// Create a cache probing with `client`, each probe bounded by `timeout`
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Probe a canonical URL, joining any probe already in flight
    ///
    /// The first caller for a URL starts the `HEAD` request; every caller
    /// that arrives while it is outstanding awaits the same shared future
    /// and receives the same result.
    pub async fn probe(&self, canonical_url: &str) -> ProbeResult {
        let shared = {
            let mut inflight = self.lock();
            match inflight.get(canonical_url) {
                Some(existing) => existing.clone(),
                None => {
                    let fut = fetch_headers(
                        self.client.clone(),
                        canonical_url.to_string(),
                        self.timeout,
                    )
                    .boxed()
                    .shared();
                    inflight.insert(canonical_url.to_string(), fut.clone());
                    fut
                }
            }
        };

        shared.await
    }

    /// Drop all cached results and in-flight handles
    ///
    /// Probes already awaited by callers still complete for those callers;
    /// subsequent requests for the same URL probe the network again.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of URLs with a cached or in-flight probe
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SharedProbe>> {
        match self.inflight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Perform one bounded HEAD probe, absorbing every failure into a negative
async fn fetch_headers(client: reqwest::Client, url: String, timeout: Duration) -> ProbeResult {
    let request = client.head(&url).send();

    match tokio::time::timeout(timeout, request).await {
        Ok(Ok(response)) => {
            if !response.status().is_success() {
                tracing::debug!(url = %url, status = %response.status(), "probe got non-success status");
                return ProbeResult::invalid();
            }

            let headers = response.headers();
            let content_type = headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let content_disposition = headers
                .get(CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let content_length = headers
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());

            tracing::debug!(
                url = %url,
                content_type = ?content_type,
                content_length = ?content_length,
                "probe completed"
            );

            ProbeResult {
                valid: true,
                content_type,
                content_disposition,
                content_length,
            }
        }
        Ok(Err(e)) => {
            tracing::warn!(url = %url, error = %e, "probe network failure");
            ProbeResult::invalid()
        }
        Err(_) => {
            tracing::warn!(url = %url, timeout = ?timeout, "probe timed out");
            ProbeResult::invalid()
        }
    }
}
