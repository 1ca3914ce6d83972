//! Header and URL plumbing shared by every request.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`merge_headers`] | Overlay per-call headers on a base set |
//! | [`compose_request_headers`] | Apply the JSON content type default |
//! | [`with_params`] | Append query parameters to a URL |
//! | [`constants`] | Header names and media types |
//!
//! # Examples
//!
//! ```
//! use simfetch::protocol::{merge_headers, with_params};
//! use simfetch::{Headers, QueryParams};
//!
//! let base = Headers::from([("A", "1"), ("B", "2")]);
//! let merged = merge_headers(&base, [("B", Some("3"))]);
//! assert_eq!(merged, Headers::from([("A", "1"), ("B", "3")]));
//!
//! let params = QueryParams::from([("id", "1")]);
//! assert_eq!(
//!     with_params("https://x/items", Some(&params)),
//!     "https://x/items?id=1"
//! );
//! ```

mod headers;
mod query;

pub use headers::{compose_request_headers, merge_headers};
pub use query::with_params;

/// Protocol constants.
pub mod constants {
    /// Header names.
    pub mod headers {
        use http::HeaderName;

        /// `content-type`
        pub const CONTENT_TYPE: HeaderName = http::header::CONTENT_TYPE;
        /// `accept`
        pub const ACCEPT: HeaderName = http::header::ACCEPT;
        /// `authorization`
        pub const AUTHORIZATION: HeaderName = http::header::AUTHORIZATION;
    }

    /// Media types.
    pub mod media_types {
        /// JSON, the default request content type
        pub const APPLICATION_JSON: &str = "application/json";
    }
}
