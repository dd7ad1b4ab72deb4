//! Filename derivation and sanitization
//!
//! Produces a sanitized, extension-correct filename for an accepted media
//! item. Name extraction prefers the `Content-Disposition` header (including
//! RFC 5987 `filename*`), falling back to the last URL path segment, and
//! finally to a fixed placeholder. The extension is reconciled against the
//! probed content type so that `video/mp4` served from `/v/abc` still ends
//! up as `abc.mp4`.

use url::Url;

/// Placeholder used when no usable name survives derivation or sanitization
const PLACEHOLDER_NAME: &str = "download";

/// Maximum length of a derived filename, extension included
const MAX_FILENAME_LEN: usize = 200;

/// Characters stripped from the name portion (path-unsafe on some platform)
const UNSAFE_CHARS: &[char] = &['/', '?', '%', '*', ':', '|', '"', '<', '>', '\\'];

/// Extensions already recognized as media; a name carrying one of these is
/// never re-suffixed even when the content type suggests something else
const RECOGNIZED_MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mkv", "webm", "mov", "avi", "flv", "wmv", "ts", "m2ts", "mp3", "aac", "m4a",
    "ogg", "oga", "opus", "wav", "flac", "gif", "m3u8", "mpd",
];

/// Derive a display filename from response metadata and the URL
///
/// Priority: `Content-Disposition` filename (percent-decoded, raw token on
/// decode failure) → last URL path segment → `"download"`. The result is
/// sanitized and truncated to 200 characters with the extension preserved.
///
/// # Examples
///
/// ```
/// use media_scout::filename::derive_filename;
///
/// let name = derive_filename(
///     Some(r#"attachment; filename="clip.mp4""#),
///     Some("video/mp4"),
///     "https://x.com/v/abc?x=1",
/// );
/// assert_eq!(name, "clip.mp4");
///
/// let name = derive_filename(None, Some("video/mp4"), "https://x.com/v/abc?x=1");
/// assert_eq!(name, "abc.mp4");
/// ```
pub fn derive_filename(
    content_disposition: Option<&str>,
    content_type: Option<&str>,
    url: &str,
) -> String {
    let name = content_disposition
        .and_then(disposition_filename)
        .or_else(|| url_filename(url))
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());

    let name = reconcile_extension(name, content_type, url);
    sanitize(&name)
}

/// Extract the filename parameter from a Content-Disposition header
///
/// `filename*` (RFC 5987) takes priority over plain `filename`. Percent
/// decoding falls back to the raw token on failure.
fn disposition_filename(header: &str) -> Option<String> {
    let mut plain: Option<String> = None;
    let mut extended: Option<String> = None;

    for part in header.split(';') {
        let part = part.trim();
        if let Some(rest) = part.strip_prefix("filename*=") {
            // Format: charset'lang'encoded-filename
            let encoded = rest.rsplit_once('\'').map_or(rest, |(_, enc)| enc);
            let decoded = urlencoding::decode(encoded)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| encoded.to_string());
            extended = Some(decoded.trim_matches('"').to_string());
        } else if let Some(rest) = part.strip_prefix("filename=") {
            let token = rest.trim_matches('"');
            let decoded = urlencoding::decode(token)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| token.to_string());
            plain = Some(decoded);
        }
    }

    extended.or(plain).filter(|name| !name.is_empty())
}

/// Last path segment of the URL, query and fragment stripped
fn url_filename(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    if segment.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    Some(decoded)
}

/// Map a content type to a filename extension
///
/// Applies the explicit remaps for container subtleties; a generic
/// `octet-stream` is `bin` unless the URL path hints at an MPEG-TS segment.
fn extension_for_content_type(content_type: &str, url: &str) -> Option<String> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    let subtype = essence.split('/').nth(1)?;

    let ext = match subtype {
        "jpeg" => "jpg",
        "x-mpegurl" | "vnd.apple.mpegurl" | "mpegurl" => "m3u8",
        "dash+xml" => "mpd",
        "mp4a-latm" => "aac",
        "octet-stream" => {
            if url_path_has_extension(url, "ts") {
                "ts"
            } else {
                "bin"
            }
        }
        other => other,
    };
    Some(ext.to_string())
}

/// Whether the URL's path (ignoring query/fragment) ends with `.{ext}`
fn url_path_has_extension(url: &str, ext: &str) -> bool {
    Url::parse(url)
        .map(|u| u.path().to_ascii_lowercase().ends_with(&format!(".{ext}")))
        .unwrap_or(false)
}

/// Append a content-type-derived extension when the name needs one
///
/// The derived extension is appended only when it differs from the name's
/// current extension and the current extension is not already a recognized
/// media extension.
fn reconcile_extension(name: String, content_type: Option<&str>, url: &str) -> String {
    let Some(derived) = content_type.and_then(|ct| extension_for_content_type(ct, url)) else {
        return name;
    };

    let current = current_extension(&name);
    match current {
        Some(ext) if ext.eq_ignore_ascii_case(&derived) => name,
        Some(ext)
            if RECOGNIZED_MEDIA_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            name
        }
        _ => format!("{name}.{derived}"),
    }
}

/// Extension of a name, if it has a plausible one
fn current_extension(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.contains(|c: char| c.is_whitespace()) {
        return None;
    }
    Some(ext)
}

/// Strip unsafe characters, trim, and truncate while preserving the extension
fn sanitize(name: &str) -> String {
    let (stem, ext) = match current_extension(name) {
        Some(ext) => (&name[..name.len() - ext.len() - 1], Some(ext.to_string())),
        None => (name, None),
    };

    let mut clean: String = stem.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect();
    clean = clean.trim_matches(|c: char| c == '.' || c.is_whitespace()).to_string();

    if clean.is_empty() {
        clean = PLACEHOLDER_NAME.to_string();
    }

    let mut result = match &ext {
        Some(ext) => format!("{clean}.{ext}"),
        None => clean,
    };

    if result.chars().count() > MAX_FILENAME_LEN {
        result = truncate_preserving_extension(&result, ext.as_deref());
    }

    result
}

/// Truncate to the maximum length, keeping the extension suffix intact
fn truncate_preserving_extension(name: &str, ext: Option<&str>) -> String {
    match ext {
        Some(ext) => {
            let suffix = format!(".{ext}");
            let keep = MAX_FILENAME_LEN.saturating_sub(suffix.chars().count());
            let stem: String = name
                .chars()
                .take(name.chars().count() - suffix.chars().count())
                .take(keep)
                .collect();
            format!("{stem}{suffix}")
        }
        None => name.chars().take(MAX_FILENAME_LEN).collect(),
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_disposition_filename_wins() {
        let name = derive_filename(
            Some(r#"attachment; filename="clip.mp4""#),
            Some("video/mp4"),
            "https://x.com/ignored/path",
        );
        assert_eq!(name, "clip.mp4");
    }

    #[test]
    fn rfc5987_filename_star_takes_priority_over_plain() {
        let name = derive_filename(
            Some("attachment; filename=\"fallback.mp4\"; filename*=UTF-8''real%20name.mp4"),
            Some("video/mp4"),
            "https://x.com/v",
        );
        assert_eq!(name, "real name.mp4", "filename* is the more specific form");
    }

    #[test]
    fn undecodable_disposition_falls_back_to_raw_token() {
        // "%zz" is not valid percent-encoding; the raw token must survive
        let name = derive_filename(
            Some("attachment; filename*=UTF-8''bad%zzname.mp4"),
            None,
            "https://x.com/v",
        );
        assert_eq!(name, "badzzname.mp4", "raw token kept, then '%' stripped");
    }

    #[test]
    fn url_segment_plus_content_type_extension() {
        let name = derive_filename(None, Some("video/mp4"), "https://x.com/v/abc?x=1");
        assert_eq!(name, "abc.mp4");
    }

    #[test]
    fn unparsable_url_yields_placeholder_with_extension() {
        let name = derive_filename(None, Some("video/mp4"), "not a url");
        assert_eq!(name, "download.mp4");
    }

    #[test]
    fn no_metadata_at_all_yields_placeholder() {
        let name = derive_filename(None, None, "https://x.com/");
        assert_eq!(name, "download");
    }

    #[test]
    fn jpeg_remaps_to_jpg() {
        let name = derive_filename(None, Some("image/jpeg"), "https://x.com/photo");
        assert_eq!(name, "photo.jpg");
    }

    #[test]
    fn apple_mpegurl_remaps_to_m3u8() {
        let name = derive_filename(
            None,
            Some("application/vnd.apple.mpegurl"),
            "https://x.com/live/master",
        );
        assert_eq!(name, "master.m3u8");
    }

    #[test]
    fn dash_remaps_to_mpd() {
        let name = derive_filename(None, Some("application/dash+xml"), "https://x.com/s/stream");
        assert_eq!(name, "stream.mpd");
    }

    #[test]
    fn latm_audio_remaps_to_aac() {
        let name = derive_filename(None, Some("audio/mp4a-latm"), "https://x.com/a/track");
        assert_eq!(name, "track.aac");
    }

    #[test]
    fn octet_stream_defaults_to_bin() {
        let name = derive_filename(
            None,
            Some("application/octet-stream"),
            "https://x.com/blob/data",
        );
        assert_eq!(name, "data.bin");
    }

    #[test]
    fn octet_stream_with_ts_path_hint_keeps_ts() {
        let name = derive_filename(
            None,
            Some("application/octet-stream"),
            "https://x.com/seg/0001.ts?token=y",
        );
        assert_eq!(
            name, "0001.ts",
            "URL hint resolves generic binary to an MPEG-TS segment"
        );
    }

    #[test]
    fn recognized_media_extension_is_not_resuffixed() {
        let name = derive_filename(None, Some("video/mp4"), "https://x.com/v/movie.webm");
        assert_eq!(
            name, "movie.webm",
            "a recognized media extension beats the content-type hint"
        );
    }

    #[test]
    fn matching_extension_is_not_duplicated() {
        let name = derive_filename(None, Some("video/mp4"), "https://x.com/v/clip.mp4");
        assert_eq!(name, "clip.mp4");
    }

    #[test]
    fn unrecognized_extension_gets_suffix_appended() {
        let name = derive_filename(None, Some("video/mp4"), "https://x.com/play.php");
        assert_eq!(name, "play.php.mp4");
    }

    #[test]
    fn unsafe_characters_are_stripped_from_name_portion() {
        let name = derive_filename(
            Some(r#"attachment; filename="a:b|c<d>e?f.mp4""#),
            None,
            "https://x.com/v",
        );
        assert_eq!(name, "abcdef.mp4");
    }

    #[test]
    fn leading_and_trailing_dots_and_whitespace_are_trimmed() {
        let name = derive_filename(
            Some(r#"attachment; filename=" ..hidden.. .mp4""#),
            None,
            "https://x.com/v",
        );
        assert_eq!(name, "hidden.mp4");
    }

    #[test]
    fn long_name_truncates_to_exactly_200_keeping_extension() {
        let stem = "a".repeat(246);
        let header = format!(r#"attachment; filename="{stem}.mp4""#);
        let name = derive_filename(Some(&header), None, "https://x.com/v");
        assert_eq!(name.chars().count(), 200, "250-char input must become 200");
        assert!(name.ends_with(".mp4"), "extension survives truncation");
        assert_eq!(name, format!("{}.mp4", "a".repeat(196)));
    }

    #[test]
    fn fully_unsafe_name_resolves_to_placeholder() {
        let name = derive_filename(
            Some(r#"attachment; filename="////.mp4""#),
            None,
            "https://x.com/v",
        );
        assert_eq!(name, "download.mp4");
    }

    #[test]
    fn url_segment_is_percent_decoded() {
        let name = derive_filename(None, Some("video/mp4"), "https://x.com/v/my%20clip");
        assert_eq!(name, "my clip.mp4");
    }
}
