//! URL canonicalization for identity and deduplication
//!
//! Two requests for different byte ranges of the same logical resource must
//! collapse to one identity so the registry and the probe cache deduplicate
//! correctly. Canonicalization strips byte-range and tracking parameters and
//! sorts the remaining query pairs into a stable, order-independent form.

use crate::config::CanonicalizeConfig;
use url::Url;

/// Byte-range query parameters stripped unconditionally
///
/// Segmented media players request `?bytestart=0&byteend=1048575` style
/// windows of one underlying file.
const BYTE_RANGE_PARAMS: &[&str] = &["bytestart", "byteend"];

/// Canonicalize a URL for use as a deduplication key
///
/// Removes `bytestart`/`byteend` and configured tracking parameters, then
/// sorts the remaining query pairs by key then value. Idempotent.
///
/// On parse failure the input is returned unchanged (the `MalformedUrl`
/// condition is logged, never fatal).
///
/// # Examples
///
/// ```
/// use media_scout::config::CanonicalizeConfig;
/// use media_scout::canonical::canonicalize;
///
/// let config = CanonicalizeConfig::default();
/// let a = canonicalize(&config, "https://cdn.example.com/v.mp4?byteend=999&bytestart=0&b=2&a=1");
/// let b = canonicalize(&config, "https://cdn.example.com/v.mp4?a=1&b=2&bytestart=1000&byteend=1999");
/// assert_eq!(a, b);
/// ```
pub fn canonicalize(config: &CanonicalizeConfig, raw: &str) -> String {
    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(url = %raw, error = %e, "malformed URL, canonicalization degraded to identity");
            return raw.to_string();
        }
    };

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| {
            !BYTE_RANGE_PARAMS.contains(&key.as_ref())
                && !config.tracking_params.iter().any(|p| p == key.as_ref())
        })
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if pairs.is_empty() {
        url.set_query(None);
        return url.into();
    }

    pairs.sort();

    let mut query = url.query_pairs_mut();
    query.clear();
    for (key, value) in &pairs {
        query.append_pair(key, value);
    }
    drop(query);

    url.into()
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CanonicalizeConfig {
        CanonicalizeConfig::default()
    }

    #[test]
    fn byte_range_only_differences_collapse_to_same_identity() {
        let a = canonicalize(
            &config(),
            "https://cdn.example.com/video.mp4?bytestart=0&byteend=1048575",
        );
        let b = canonicalize(
            &config(),
            "https://cdn.example.com/video.mp4?bytestart=1048576&byteend=2097151",
        );
        assert_eq!(
            a, b,
            "different byte ranges of one resource must share an identity"
        );
        assert_eq!(a, "https://cdn.example.com/video.mp4");
    }

    #[test]
    fn query_pairs_are_sorted_by_key_then_value() {
        let result = canonicalize(&config(), "https://x.com/v?c=3&a=2&a=1&b=2");
        assert_eq!(result, "https://x.com/v?a=1&a=2&b=2&c=3");
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let inputs = [
            "https://x.com/v?b=2&a=1&bytestart=5",
            "https://x.com/v.mp4",
            "https://x.com/v?utm_source=feed&id=9",
            "not a url at all",
        ];
        for input in inputs {
            let once = canonicalize(&config(), input);
            let twice = canonicalize(&config(), &once);
            assert_eq!(once, twice, "canonicalize must be idempotent for {input}");
        }
    }

    #[test]
    fn tracking_params_are_removed() {
        let result = canonicalize(
            &config(),
            "https://x.com/v.mp4?utm_source=newsletter&utm_medium=email&id=42&fbclid=abc",
        );
        assert_eq!(result, "https://x.com/v.mp4?id=42");
    }

    #[test]
    fn url_with_no_query_is_unchanged() {
        let result = canonicalize(&config(), "https://x.com/path/v.mp4");
        assert_eq!(result, "https://x.com/path/v.mp4");
    }

    #[test]
    fn stripping_all_params_drops_the_question_mark() {
        let result = canonicalize(&config(), "https://x.com/v.mp4?bytestart=0");
        assert_eq!(
            result, "https://x.com/v.mp4",
            "an emptied query must not leave a trailing '?'"
        );
    }

    #[test]
    fn malformed_url_passes_through_unchanged() {
        let raw = "::not-a-url::";
        assert_eq!(
            canonicalize(&config(), raw),
            raw,
            "parse failure degrades to identity, never an error"
        );
    }

    #[test]
    fn fragment_identifier_is_preserved() {
        let result = canonicalize(&config(), "https://x.com/v.mp4?b=2&a=1#t=30");
        assert_eq!(result, "https://x.com/v.mp4?a=1&b=2#t=30");
    }

    #[test]
    fn custom_tracking_param_list_is_honored() {
        let custom = CanonicalizeConfig {
            tracking_params: vec!["ref".to_string()],
        };
        let result = canonicalize(&custom, "https://x.com/v.mp4?ref=home&utm_source=kept");
        assert_eq!(
            result, "https://x.com/v.mp4?utm_source=kept",
            "only the configured list is stripped"
        );
    }
}
