//! Core request dispatch.
//!
//! [`RequestExecutor::execute`] is the single path every request takes:
//!
//! 1. **Register** the URL with the [`InFlightTracker`] when the request
//!    participates, failing fast with [`SimFetchError::DuplicateRequest`]
//! 2. **Compose** headers, applying the JSON content type default
//! 3. **Encode** the body (text passes through, JSON values are serialized)
//! 4. **Send** through the [`Transport`] with the cancellation handle
//! 5. **Release** the tracker entry as soon as the transport returns, before
//!    the status is interpreted
//! 6. **Interpret** the status and decode the JSON body
//!
//! Every error is logged and returned unchanged; cancellation is logged as an
//! informational abort rather than as a failure.

use super::tracker::InFlightTracker;
use super::transport::{Transport, TransportRequest, TransportResponse};
use crate::client::CancellationHandle;
use crate::error::{Result, SimFetchError};
use crate::protocol::compose_request_headers;
use crate::types::{Headers, Method, RequestBody, RequestDescriptor, ResponseEnvelope};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Executes [`RequestDescriptor`]s against a [`Transport`].
///
/// Cloning is cheap; clones share the transport and the in-flight tracker.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    tracker: Arc<InFlightTracker>,
    enable_logging: bool,
}

impl RequestExecutor {
    /// Create an executor with its own, empty tracker.
    pub fn new(transport: Arc<dyn Transport>, enable_logging: bool) -> Self {
        Self {
            transport,
            tracker: Arc::new(InFlightTracker::new()),
            enable_logging,
        }
    }

    /// The tracker holding this executor's in-flight requests.
    pub fn tracker(&self) -> &InFlightTracker {
        &self.tracker
    }

    /// Execute one request and decode its JSON response into `T`.
    ///
    /// # Errors
    ///
    /// - [`SimFetchError::DuplicateRequest`] if `request.participate` is set
    ///   and the URL is already in flight; no network call is made
    /// - [`SimFetchError::Status`] for a non-2xx status
    /// - [`SimFetchError::Cancelled`] if the request's handle was triggered
    /// - [`SimFetchError::Transport`], [`SimFetchError::Decode`],
    ///   [`SimFetchError::Encode`], [`SimFetchError::InvalidHeader`] as raised
    ///
    /// Whatever the outcome, the tracker entry registered for this call is
    /// gone by the time this returns.
    pub async fn execute<T>(&self, request: RequestDescriptor) -> Result<ResponseEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let RequestDescriptor {
            method,
            url,
            body,
            headers,
            participate,
        } = request;

        let guard = if participate {
            match self.tracker.try_register(&url) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    if self.enable_logging {
                        tracing::warn!("{}", e);
                    }
                    return Err(e);
                }
            }
        } else {
            None
        };

        if self.enable_logging {
            tracing::debug!(%method, %url, participate, "Dispatching request");
        }

        let signal = guard.as_ref().map(|g| g.handle().clone());
        let sent = self.send(method, &url, body, &headers, signal).await;

        if let Some(guard) = guard {
            guard.release();
        }

        let result = sent.and_then(decode_response);
        if let Err(e) = &result {
            self.report(method, &url, e);
        }
        result
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<RequestBody>,
        headers: &Headers,
        signal: Option<CancellationHandle>,
    ) -> Result<TransportResponse> {
        let headers = compose_request_headers(headers);
        let body = body.map(RequestBody::encode).transpose()?;

        let request = TransportRequest {
            method,
            url: url.to_string(),
            headers,
            body,
        };
        self.transport.send(request, signal).await
    }

    fn report(&self, method: Method, url: &str, error: &SimFetchError) {
        if !self.enable_logging {
            return;
        }
        if error.is_cancelled() {
            tracing::info!("Request to {} was aborted", url);
        } else {
            tracing::error!(%method, %url, "{}", error);
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("tracker", &self.tracker)
            .field("enable_logging", &self.enable_logging)
            .finish_non_exhaustive()
    }
}

/// Turn a raw response into an envelope, or a status error.
///
/// An empty body decodes as JSON `null`, so `()` and `Option<_>` targets
/// accept bodiless responses such as `204 No Content`.
fn decode_response<T: DeserializeOwned>(response: TransportResponse) -> Result<ResponseEnvelope<T>> {
    if !response.is_success() {
        return Err(SimFetchError::from_status(response.status));
    }

    let data = if response.body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"null")?
    } else {
        serde_json::from_slice(&response.body)?
    };

    Ok(ResponseEnvelope {
        data,
        status: response.status,
    })
}
