//! Companion forwarding and the native-download host seam
//!
//! Forwarding is a `POST /` to the companion endpoint with a JSON body of
//! `{url, filename}`; a non-success status or network failure is a
//! [`Error::ForwardFailure`] that triggers the native-download fallback.
//!
//! The native download primitive belongs to the host (the browser), so it is
//! a trait seam: implementations are pluggable the same way parity handlers
//! are in comparable download stacks.

use crate::error::{Error, Result};
use crate::types::{ConflictPolicy, ForwardPayload};
use async_trait::async_trait;
use std::time::Duration;

/// HTTP client for the companion application's forward endpoint
pub struct CompanionClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl CompanionClient {
    /// Create a forward client with the configured request timeout
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Forward a download to the companion application
    ///
    /// Sends `POST {endpoint}` with the JSON payload. Any non-success status
    /// or network-level failure maps to [`Error::ForwardFailure`].
    pub async fn forward(
        &self,
        endpoint: &str,
        url: &str,
        filename: Option<&str>,
    ) -> Result<()> {
        let payload = ForwardPayload {
            url: url.to_string(),
            filename: filename.map(str::to_string),
        };

        let request = self.client.post(endpoint).json(&payload).send();
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                if response.status().is_success() {
                    tracing::debug!(url = %url, "download forwarded to companion");
                    Ok(())
                } else {
                    Err(Error::ForwardFailure {
                        url: url.to_string(),
                        reason: format!("companion returned status {}", response.status()),
                    })
                }
            }
            Ok(Err(e)) => Err(Error::ForwardFailure {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(Error::ForwardFailure {
                url: url.to_string(),
                reason: format!("forward timed out after {:?}", self.timeout),
            }),
        }
    }
}

/// Host-provided native download primitive
///
/// Invoked only as fallback when the companion is unreachable or a forward
/// attempt fails. Implementations wrap whatever download facility the host
/// exposes.
#[async_trait]
pub trait NativeDownloader: Send + Sync {
    /// Start a native download of `url`, suggesting `filename` when present
    async fn download(
        &self,
        url: &str,
        filename: Option<&str>,
        conflict: ConflictPolicy,
    ) -> Result<()>;

    /// Name of the implementation, for logging
    fn name(&self) -> &str;
}

/// Native downloader that accepts everything and does nothing
///
/// Useful as a default in embedding code that has not wired a host primitive
/// yet, and in tests.
pub struct NoOpNativeDownloader;

#[async_trait]
impl NativeDownloader for NoOpNativeDownloader {
    async fn download(
        &self,
        url: &str,
        _filename: Option<&str>,
        _conflict: ConflictPolicy,
    ) -> Result<()> {
        tracing::debug!(url = %url, "no-op native downloader invoked");
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> CompanionClient {
        CompanionClient::new(reqwest::Client::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn forward_posts_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(serde_json::json!({
                "url": "https://x.com/v.mp4",
                "filename": "v.mp4",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client()
            .forward(&format!("{}/", server.uri()), "https://x.com/v.mp4", Some("v.mp4"))
            .await
            .expect("forward should succeed");
    }

    #[tokio::test]
    async fn forward_sends_null_filename_when_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({
                "url": "https://x.com/v.mp4",
                "filename": null,
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client()
            .forward(&format!("{}/", server.uri()), "https://x.com/v.mp4", None)
            .await
            .expect("forward should succeed");
    }

    #[tokio::test]
    async fn non_success_status_is_a_forward_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client()
            .forward(&format!("{}/", server.uri()), "https://x.com/v.mp4", None)
            .await
            .unwrap_err();

        match err {
            Error::ForwardFailure { url, reason } => {
                assert_eq!(url, "https://x.com/v.mp4");
                assert!(reason.contains("503"), "reason should carry the status");
            }
            other => panic!("expected ForwardFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn network_failure_is_a_forward_failure() {
        let err = client()
            .forward("http://127.0.0.1:1/", "https://x.com/v.mp4", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ForwardFailure { .. }));
    }

    #[tokio::test]
    async fn forward_timeout_is_a_forward_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = CompanionClient::new(reqwest::Client::new(), Duration::from_millis(50));
        let err = client
            .forward(&format!("{}/", server.uri()), "https://x.com/v.mp4", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ForwardFailure { .. }));
    }

    #[tokio::test]
    async fn noop_native_downloader_always_succeeds() {
        let downloader = NoOpNativeDownloader;
        downloader
            .download("https://x.com/v.mp4", Some("v.mp4"), ConflictPolicy::Uniquify)
            .await
            .expect("noop must accept everything");
        assert_eq!(downloader.name(), "noop");
    }
}
