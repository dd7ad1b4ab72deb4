//! Download interception decision logic
//!
//! Pure functions deciding whether an intercepted response is a download
//! that should be taken away from the browser. The decision must be produced
//! before any suspending operation — the network layer cannot be kept
//! waiting — so everything here is synchronous; the liveness check and
//! forward/fallback work happens afterwards in a spawned task (see
//! [`crate::scout`]).
//!
//! Precedence: an explicit `attachment` disposition always wins; known
//! downloadable content types win unless the disposition says `inline`;
//! video/audio in a top-level document context counts as a download
//! (including small fragments — routing them to the companion, rather than
//! letting the native download proceed, is how fragments are suppressed);
//! manifest content types always count.

use crate::classify::is_manifest_content_type;
use crate::types::{ResourceContext, ResponseHeaders};

/// Content types that force a download decision (unless disposition is inline)
const DOWNLOADABLE_TYPES: &[&str] = &[
    "application/zip",
    "application/x-zip-compressed",
    "application/x-rar-compressed",
    "application/vnd.rar",
    "application/x-7z-compressed",
    "application/x-tar",
    "application/gzip",
    "application/x-gzip",
    "application/x-bzip2",
    "application/pdf",
    "application/octet-stream",
    "application/x-msdownload",
];

/// Disposition kinds the router distinguishes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Disposition {
    Attachment,
    Inline,
    None,
}

fn disposition_of(headers: &ResponseHeaders) -> Disposition {
    match headers.content_disposition.as_deref() {
        Some(value) => {
            let value = value.trim().to_ascii_lowercase();
            if value.starts_with("attachment") {
                Disposition::Attachment
            } else if value.starts_with("inline") {
                Disposition::Inline
            } else {
                Disposition::None
            }
        }
        None => Disposition::None,
    }
}

/// The content-type essence: lowercased, parameters stripped
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}

/// Decide whether an intercepted response is a download
///
/// See the module docs for the precedence rules. This runs before the
/// network layer is answered and must not await.
pub fn is_download(headers: &ResponseHeaders, context: ResourceContext) -> bool {
    let disposition = disposition_of(headers);

    // Explicit attachment always forces a download
    if disposition == Disposition::Attachment {
        return true;
    }

    let Some(content_type) = headers.content_type.as_deref() else {
        return false;
    };
    let essence = essence(content_type);

    // Known downloadable types, unless the server explicitly says inline
    if DOWNLOADABLE_TYPES.contains(&essence.as_str()) {
        return disposition != Disposition::Inline;
    }

    // Media in the top-level document is a full-page media load; take it.
    // Fragment-sized responses are included deliberately: forwarding them to
    // the companion is what suppresses partial-file noise.
    if (essence.starts_with("video/") || essence.starts_with("audio/"))
        && context == ResourceContext::TopLevelDocument
        && disposition != Disposition::Inline
    {
        return true;
    }

    // Manifests are always worth intercepting
    if is_manifest_content_type(&essence) {
        return true;
    }

    false
}
