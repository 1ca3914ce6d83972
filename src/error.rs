//! Error types for SimFetch.
//!
//! Every failure a request can end in is one variant of [`SimFetchError`]:
//!
//! | Variant | Raised when | Network call made? |
//! |---------|-------------|--------------------|
//! | [`DuplicateRequest`](SimFetchError::DuplicateRequest) | The URL already has a participating request in flight | No |
//! | [`Status`](SimFetchError::Status) | The server answered with a non-2xx status | Yes |
//! | [`Transport`](SimFetchError::Transport) | The request could not complete (DNS, refused, broken body) | Attempted |
//! | [`Cancelled`](SimFetchError::Cancelled) | The request was aborted through its cancellation handle | Attempted |
//! | [`Decode`](SimFetchError::Decode) | The response body is not valid JSON for the target type | Yes |
//! | [`Encode`](SimFetchError::Encode) | The request body could not be encoded as JSON | No |
//! | [`InvalidHeader`](SimFetchError::InvalidHeader) | A header name or value cannot be sent | No |
//!
//! The executor never converts one kind into another; callers of the
//! [`SimFetch`](crate::SimFetch) facade see exactly these values.

use thiserror::Error;

/// Result type alias for SimFetch operations.
pub type Result<T> = std::result::Result<T, SimFetchError>;

/// Errors produced by SimFetch requests.
#[derive(Debug, Error)]
pub enum SimFetchError {
    /// A participating request to the same URL is still in flight.
    #[error("Request to {url} is already in progress")]
    DuplicateRequest {
        /// The URL that is already being requested
        url: String,
    },

    /// The server responded, but with a failing status code.
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Human readable message, `HTTP error! Status: <status>`
        message: String,
    },

    /// The request could not be completed by the transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request was aborted via its cancellation handle.
    #[error("Request to {url} was aborted")]
    Cancelled {
        /// The URL of the aborted request
        url: String,
    },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request body could not be encoded.
    #[error("Encode error: {0}")]
    Encode(String),

    /// A header name or value is not valid on the wire.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl SimFetchError {
    /// Build the error returned for a failing HTTP status.
    pub fn from_status(status: u16) -> Self {
        SimFetchError::Status {
            status,
            message: format!("HTTP error! Status: {}", status),
        }
    }

    /// HTTP status code, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SimFetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request was aborted through its cancellation handle.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SimFetchError::Cancelled { .. })
    }

    /// Whether the request was rejected because the URL was already in flight.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, SimFetchError::DuplicateRequest { .. })
    }
}

impl From<reqwest::Error> for SimFetchError {
    fn from(err: reqwest::Error) -> Self {
        SimFetchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SimFetchError {
    fn from(err: serde_json::Error) -> Self {
        SimFetchError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = SimFetchError::from_status(404);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP error! Status: 404");
    }

    #[test]
    fn test_duplicate_message() {
        let err = SimFetchError::DuplicateRequest {
            url: "https://example.com/items".to_string(),
        };
        assert!(err.is_duplicate());
        assert!(!err.is_cancelled());
        assert_eq!(
            err.to_string(),
            "Request to https://example.com/items is already in progress"
        );
    }

    #[test]
    fn test_cancelled_has_no_status() {
        let err = SimFetchError::Cancelled {
            url: "https://example.com".to_string(),
        };
        assert!(err.is_cancelled());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_serde_error_is_decode() {
        let err: SimFetchError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SimFetchError::Decode(_)));
    }
}
