//! Network transport abstraction.
//!
//! The executor never talks to the network directly. It hands a
//! [`TransportRequest`] and an optional [`CancellationHandle`] to a
//! [`Transport`] and gets back a status code plus the raw body. The transport
//! is responsible for mapping the handle to its own abort mechanism and for
//! reporting a triggered handle as [`SimFetchError::Cancelled`].
//!
//! [`ReqwestTransport`] is the default implementation.

use super::cancel::CancellationHandle;
use super::config::ClientConfig;
use crate::error::{Result, SimFetchError};
use crate::types::{Headers, Method};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

/// A fully composed request, ready for the wire.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Target URL
    pub url: String,
    /// Final headers
    pub headers: Headers,
    /// Encoded body, if any
    pub body: Option<String>,
}

/// Raw response returned by a transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Complete response body
    pub body: Bytes,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        StatusCode::from_u16(self.status)
            .map(|status| status.is_success())
            .unwrap_or(false)
    }
}

/// Capability to issue an HTTP request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the status and full body.
    ///
    /// # Errors
    ///
    /// - [`SimFetchError::Cancelled`] if `signal` is triggered before the
    ///   response body has been read
    /// - [`SimFetchError::Transport`] if the request could not complete
    /// - [`SimFetchError::InvalidHeader`] if a header cannot be encoded
    async fn send(
        &self,
        request: TransportRequest,
        signal: Option<CancellationHandle>,
    ) -> Result<TransportResponse>;
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with reqwest's default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport honoring the transport-level parts of `config`.
    ///
    /// A non-empty `proxy_url` that fails to parse is ignored.
    pub fn with_config(config: &ClientConfig) -> Self {
        let mut builder = reqwest::Client::builder();

        if !config.proxy_url.is_empty() {
            match reqwest::Proxy::all(&config.proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => {
                    if config.enable_logging {
                        tracing::warn!("Ignoring invalid proxy {}: {}", config.proxy_url, e);
                    }
                }
            }
        }

        let client = builder.build().unwrap_or_default();
        Self { client }
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn round_trip(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut req_builder = self
            .client
            .request(request.method.into(), &request.url)
            .headers(to_header_map(&request.headers)?);

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: TransportRequest,
        signal: Option<CancellationHandle>,
    ) -> Result<TransportResponse> {
        let url = request.url.clone();
        match signal {
            Some(signal) => tokio::select! {
                biased;
                _ = signal.cancelled() => Err(SimFetchError::Cancelled { url }),
                result = self.round_trip(request) => result,
            },
            None => self.round_trip(request).await,
        }
    }
}

/// Convert [`Headers`] into an `http::HeaderMap`.
fn to_header_map(headers: &Headers) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SimFetchError::InvalidHeader(format!("{}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| SimFetchError::InvalidHeader(format!("{}: {}", name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}
