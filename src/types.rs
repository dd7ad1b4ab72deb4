//! Core types for media-scout

use serde::{Deserialize, Serialize};

/// Opaque identifier for a browsing session (one per browser tab)
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl SessionId {
    /// Create a new SessionId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for SessionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<SessionId> for i64 {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Where a candidate URL was observed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Observed in network traffic
    Network,
    /// Observed in the page DOM
    Dom,
}

/// Metadata gathered by a header-only probe of a URL
///
/// Produced at most once per canonical URL per process and shared by all
/// concurrent requesters. Immutable once cached: a `valid: false` result is
/// never retried automatically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Whether the probe reached the resource and exposed usable metadata
    pub valid: bool,

    /// Content-Type header, if exposed
    pub content_type: Option<String>,

    /// Content-Disposition header, if exposed
    pub content_disposition: Option<String>,

    /// Content-Length header, if exposed and parseable
    pub content_length: Option<u64>,
}

impl ProbeResult {
    /// The definite-negative result used for timeouts, network failures,
    /// and unverifiable (opaque) responses
    pub fn invalid() -> Self {
        Self {
            valid: false,
            content_type: None,
            content_disposition: None,
            content_length: None,
        }
    }
}

/// An accepted media resource, owned by the session registry
///
/// Immutable after insertion. Fragments (`is_fragment` without `is_manifest`)
/// are discarded before insertion, so persisted items always satisfy
/// `!is_fragment || is_manifest`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Canonical URL (deduplication key within a session)
    pub url: String,

    /// Sanitized, extension-correct display filename
    pub filename: String,

    /// Whether the probe classified this as genuine media
    pub is_valid_media: bool,

    /// Whether the content type matched a manifest signature (HLS/DASH)
    pub is_manifest: bool,

    /// Whether this looked like a small partial media response
    pub is_fragment: bool,
}

/// Kind of navigation reported for a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    /// Navigation to a new top-level document (purges the session's items)
    NewDocument,
    /// Same-document URL change (hash change, history.pushState); no purge
    SameDocument,
}

/// Context of an intercepted response, as reported by the network layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceContext {
    /// The response is the top-level document of the tab
    TopLevelDocument,
    /// A subordinate document or other sub-resource
    Subordinate,
}

/// Header snapshot of an intercepted response
///
/// Only the three headers the router inspects; the network layer hands these
/// over before the response body is allowed to proceed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// Content-Disposition header value
    pub content_disposition: Option<String>,

    /// Content-Type header value
    pub content_type: Option<String>,

    /// Content-Length header value
    pub content_length: Option<u64>,
}

/// The router's answer to the network layer
///
/// Returned before any asynchronous follow-up (liveness check, forward,
/// fallback) runs; that follow-up cannot change this decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Whether the native download in flight must be cancelled
    pub cancel_native_download: bool,
}

/// How the native download primitive resolves filename collisions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Append a counter to produce a unique name
    #[default]
    Uniquify,
    /// Overwrite the existing file
    Overwrite,
}

/// JSON body sent to the companion application when forwarding a download
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForwardPayload {
    /// The URL to download
    pub url: String,

    /// Suggested filename (None when no useful name could be derived)
    pub filename: Option<String>,
}

/// Event emitted to UI collaborators
///
/// Best-effort, non-blocking notifications over a broadcast channel; the
/// absence of a listener is not an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new media item was accepted into a session's registry
    ItemAdded {
        /// Owning session
        session_id: SessionId,
        /// The accepted item
        item: MediaItem,
    },

    /// An intercepted download was successfully forwarded to the companion app
    HandledExternally {
        /// Session whose download was forwarded
        session_id: SessionId,
        /// The forwarded URL
        url: String,
        /// Suggested filename sent along, if any
        filename: Option<String>,
    },

    /// Both the companion forward and the native fallback failed
    ///
    /// Surfaced so the UI can offer a user-visible retry — an intercepted
    /// download must never be lost silently.
    DownloadFailed {
        /// Session whose download failed
        session_id: SessionId,
        /// The URL that could not be downloaded
        url: String,
        /// Description of the final failure
        error: String,
    },

    /// A session's registry entries were purged (tab closed or navigated)
    SessionCleared {
        /// The purged session
        session_id: SessionId,
    },
}
