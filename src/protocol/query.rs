//! Query string construction.

use crate::types::QueryParams;
use url::form_urlencoded;

/// Append query parameters to `url`.
///
/// Returns `url` unchanged when `params` is `None` or empty. Otherwise the
/// pairs are encoded with `application/x-www-form-urlencoded` rules (a space
/// becomes `+`) in insertion order and joined with `&`. They are appended
/// after `?`, or after `&` when `url` already carries a query string.
///
/// # Examples
///
/// ```
/// use simfetch::protocol::with_params;
/// use simfetch::QueryParams;
///
/// assert_eq!(with_params("https://x/items", None), "https://x/items");
///
/// let params = QueryParams::from([("q", "a b"), ("tag", "x&y")]);
/// assert_eq!(
///     with_params("https://x/items", Some(&params)),
///     "https://x/items?q=a+b&tag=x%26y"
/// );
/// ```
pub fn with_params(url: &str, params: Option<&QueryParams>) -> String {
    let params = match params {
        Some(params) if !params.is_empty() => params,
        _ => return url.to_string(),
    };

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish();

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_param() {
        let params = QueryParams::from([("id", "1")]);
        assert_eq!(
            with_params("https://x/items", Some(&params)),
            "https://x/items?id=1"
        );
    }

    #[test]
    fn test_absent_params() {
        assert_eq!(with_params("https://x/items", None), "https://x/items");
    }

    #[test]
    fn test_empty_params() {
        let params = QueryParams::new();
        assert_eq!(with_params("https://x/items", Some(&params)), "https://x/items");
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let params = QueryParams::from([("b", "2"), ("a", "1")]);
        assert_eq!(with_params("https://x", Some(&params)), "https://x?b=2&a=1");
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let params = QueryParams::from([("name", "Jürgen=1")]);
        assert_eq!(
            with_params("https://x", Some(&params)),
            "https://x?name=J%C3%BCrgen%3D1"
        );
    }

    #[test]
    fn test_existing_query_is_extended() {
        let params = QueryParams::from([("page", "2")]);
        assert_eq!(
            with_params("https://x/items?sort=asc", Some(&params)),
            "https://x/items?sort=asc&page=2"
        );
    }
}
