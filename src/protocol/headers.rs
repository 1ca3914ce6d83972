//! Header composition for outgoing requests.
//!
//! Two layers are applied to every request:
//!
//! | Layer | Source | Applied by |
//! |-------|--------|------------|
//! | Defaults + per-call overrides | [`SimFetch`](crate::SimFetch) | [`merge_headers`] |
//! | `Content-Type: application/json` default | executor | [`compose_request_headers`] |
//!
//! Both functions are pure: they never mutate their inputs.
//!
//! # Examples
//!
//! ```
//! use simfetch::protocol::{compose_request_headers, merge_headers};
//! use simfetch::Headers;
//!
//! let defaults = Headers::from([("Authorization", "Bearer token")]);
//! let merged = merge_headers(&defaults, [("X-Trace", Some("abc"))]);
//! let wire = compose_request_headers(&merged);
//!
//! assert_eq!(wire.get("content-type"), Some("application/json"));
//! assert_eq!(wire.get("authorization"), Some("Bearer token"));
//! assert_eq!(wire.get("x-trace"), Some("abc"));
//! ```

use super::constants::{headers, media_types};
use crate::types::Headers;

/// Overlay `overrides` on top of `base`.
///
/// Returns a new map containing every entry of `base`, then every override
/// whose value is `Some`. An override of `None` is skipped: it neither
/// removes the base entry nor adds a new one.
///
/// # Arguments
///
/// * `base` - The headers to start from (usually the client defaults)
/// * `overrides` - `(name, value)` pairs applied in order
///
/// # Examples
///
/// ```
/// use simfetch::protocol::merge_headers;
/// use simfetch::Headers;
///
/// let base = Headers::from([("A", "1")]);
/// let merged = merge_headers(&base, [("B", None::<&str>)]);
/// assert_eq!(merged, base);
/// ```
pub fn merge_headers<I, K, V>(base: &Headers, overrides: I) -> Headers
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut merged = base.clone();
    for (name, value) in overrides {
        if let Some(value) = value {
            merged.insert(name, value);
        }
    }
    merged
}

/// Produce the headers actually sent for a request.
///
/// Starts from `Content-Type: application/json` and overlays `headers`, so a
/// caller-supplied content type (in any letter case) replaces the default.
pub fn compose_request_headers(headers: &Headers) -> Headers {
    let mut composed = Headers::new();
    composed.insert(headers::CONTENT_TYPE.as_str(), media_types::APPLICATION_JSON);
    merge_headers(&composed, headers.iter().map(|(k, v)| (k, Some(v))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_existing() {
        let base = Headers::from([("A", "1"), ("B", "2")]);
        let merged = merge_headers(&base, [("B", Some("3"))]);
        assert_eq!(merged, Headers::from([("A", "1"), ("B", "3")]));
    }

    #[test]
    fn test_merge_skips_undefined_override() {
        let base = Headers::from([("A", "1")]);
        let merged = merge_headers(&base, [("B", None::<String>), ("A", None)]);
        assert_eq!(merged, Headers::from([("A", "1")]));
        assert!(!merged.contains("B"));
    }

    #[test]
    fn test_merge_does_not_mutate_base() {
        let base = Headers::from([("A", "1")]);
        let _ = merge_headers(&base, [("A", Some("2")), ("C", Some("3"))]);
        assert_eq!(base, Headers::from([("A", "1")]));
    }

    #[test]
    fn test_merge_empty_overrides() {
        let base = Headers::from([("A", "1")]);
        let merged = merge_headers(&base, std::iter::empty::<(String, Option<String>)>());
        assert_eq!(merged, base);
    }

    #[test]
    fn test_compose_injects_json_content_type() {
        let composed = compose_request_headers(&Headers::new());
        assert_eq!(composed.get("Content-Type"), Some("application/json"));
        assert_eq!(composed.len(), 1);
    }

    #[test]
    fn test_compose_content_type_is_overridable() {
        let custom = Headers::from([("Content-Type", "text/plain"), ("Accept", "text/plain")]);
        let composed = compose_request_headers(&custom);
        assert_eq!(composed.get("content-type"), Some("text/plain"));
        assert_eq!(composed.get("accept"), Some("text/plain"));
        assert_eq!(composed.len(), 2);
    }
}
