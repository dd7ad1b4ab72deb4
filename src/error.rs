//! Error types for media-scout
//!
//! The probe layer never surfaces errors to callers — timeouts and network
//! failures are absorbed into a negative [`ProbeResult`](crate::types::ProbeResult)
//! so that classification can never block a page's normal operation. The
//! variants here cover the remaining failure surfaces: configuration,
//! canonicalization, forwarding to the companion application, and the
//! native-download fallback.

use thiserror::Error;

/// Result type alias for media-scout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-scout
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "companion.port")
        key: Option<String>,
    },

    /// A header probe did not complete within its timeout
    ///
    /// Absorbed by the probe cache into `ProbeResult { valid: false }`;
    /// only visible when probing is invoked directly.
    #[error("header probe timed out after {timeout_ms}ms: {url}")]
    ProbeTimeout {
        /// The URL being probed
        url: String,
        /// The timeout that fired, in milliseconds
        timeout_ms: u64,
    },

    /// A header probe failed at the network layer
    #[error("header probe failed for {url}: {reason}")]
    ProbeNetwork {
        /// The URL being probed
        url: String,
        /// The underlying network failure
        reason: String,
    },

    /// A URL could not be parsed for canonicalization
    ///
    /// Non-fatal: canonicalization degrades to identity and logs a warning.
    #[error("malformed URL: {url}")]
    MalformedUrl {
        /// The raw URL that failed to parse
        url: String,
    },

    /// Forwarding an intercepted download to the companion application failed
    #[error("companion forward failed for {url}: {reason}")]
    ForwardFailure {
        /// The URL that was being forwarded
        url: String,
        /// Why the forward failed (non-success status or network error)
        reason: String,
    },

    /// The native download primitive failed after a forward fallback
    #[error("native download failed for {url}: {reason}")]
    NativeDownloadFailure {
        /// The URL that could not be downloaded
        url: String,
        /// Why the host's download primitive failed
        reason: String,
    },
}

impl Error {
    /// Build a configuration error for a specific key
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}
