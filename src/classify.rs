//! Semantic classification of probe metadata
//!
//! Pure functions over [`ProbeResult`]: decide whether a URL is genuine
//! downloadable media, a playlist manifest, or a small partial fragment.
//! Fragments that are not manifests are discarded to avoid flooding the user
//! with partial-file noise; manifests are always wanted even when the server
//! reports them as tiny.

use crate::config::ProbeConfig;
use crate::types::ProbeResult;

/// Content-type substrings identifying playlist/description manifests
const MANIFEST_SIGNATURES: &[&str] = &["mpegurl", "dash+xml"];

/// Verdict produced by the classifier for one probe result
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Verdict {
    /// The content type is media-bearing
    pub is_valid_media: bool,
    /// The content type matches a manifest signature
    pub is_manifest: bool,
    /// Raw media below the fragment threshold (and not a manifest)
    pub is_fragment: bool,
}

impl Verdict {
    /// Whether an item with this verdict should be persisted
    ///
    /// Fragments are discarded unless they are themselves manifests.
    pub fn should_keep(&self) -> bool {
        self.is_valid_media && (!self.is_fragment || self.is_manifest)
    }
}

/// Whether a content type matches a manifest signature
pub fn is_manifest_content_type(content_type: &str) -> bool {
    let lowered = content_type.to_ascii_lowercase();
    MANIFEST_SIGNATURES.iter().any(|sig| lowered.contains(sig))
}

/// Whether a content type is media-bearing
///
/// `application/octet-stream` counts as possibly-media but is not
/// authoritative; the filename deriver compensates with URL hints.
pub fn is_media_content_type(content_type: &str) -> bool {
    let lowered = content_type.to_ascii_lowercase();
    lowered.starts_with("video/")
        || lowered.starts_with("audio/")
        || lowered.starts_with("image/gif")
        || lowered.contains("application/octet-stream")
        || is_manifest_content_type(&lowered)
}

/// Classify a probe result into a [`Verdict`]
///
/// An invalid probe (timeout, network failure, opaque response) classifies
/// to the all-false verdict and is never kept.
pub fn classify(config: &ProbeConfig, probe: &ProbeResult) -> Verdict {
    if !probe.valid {
        return Verdict::default();
    }

    let Some(content_type) = probe.content_type.as_deref() else {
        return Verdict::default();
    };
    let lowered = content_type.to_ascii_lowercase();

    let is_manifest = is_manifest_content_type(&lowered);
    let is_raw_av = lowered.starts_with("video/") || lowered.starts_with("audio/");

    let is_fragment = is_raw_av
        && !is_manifest
        && probe
            .content_length
            .is_some_and(|len| len < config.fragment_threshold_bytes);

    Verdict {
        is_valid_media: is_media_content_type(&lowered),
        is_manifest,
        is_fragment,
    }
}
