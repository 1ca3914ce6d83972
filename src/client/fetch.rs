//! The `SimFetch` client facade.
//!
//! Provides typed GET/POST/PATCH/DELETE entry points on top of the
//! [`RequestExecutor`], plus the client-wide defaults every call starts from.
//!
//! # Examples
//!
//! ## Simple GET request
//!
//! ```ignore
//! use simfetch::{GetOptions, SimFetch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SimFetch::new();
//!     let response = client
//!         .get::<serde_json::Value>("https://example.com/items", GetOptions::new().param("id", "1"))
//!         .await?;
//!     println!("Status: {}", response.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Default headers
//!
//! ```ignore
//! use simfetch::{Headers, RequestOptions, SimFetch};
//!
//! let client = SimFetch::new();
//! client.set_default_headers(Headers::from([("Authorization", "Bearer token")]));
//!
//! let created = client
//!     .post::<_, serde_json::Value>(
//!         "https://example.com/item",
//!         &serde_json::json!({"id": "2", "name": "item2", "stock": 3}),
//!         RequestOptions::new().header("X-Request-Id", "42"),
//!     )
//!     .await?;
//! assert_eq!(created.status, 201);
//! ```
//!
//! ## Aborting an in-flight request
//!
//! ```ignore
//! let client = SimFetch::new();
//! let pending = tokio::spawn({
//!     let client = client.clone();
//!     async move { client.get::<serde_json::Value>("https://example.com/slow", GetOptions::new()).await }
//! });
//!
//! client.abort("https://example.com/slow");
//! assert!(pending.await?.unwrap_err().is_cancelled());
//! ```

use super::config::ClientConfig;
use super::executor::RequestExecutor;
use super::transport::{ReqwestTransport, Transport};
use crate::error::Result;
use crate::protocol::{merge_headers, with_params};
use crate::types::{Headers, Method, QueryParams, RequestBody, RequestDescriptor, ResponseEnvelope};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Per-call options for POST, PATCH and DELETE.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers overlaid on the client defaults for this call
    pub headers: Option<Headers>,
    /// Replaces the default cancellation participation for this call
    pub participate: Option<bool>,
}

impl RequestOptions {
    /// Options that use every client default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one header override.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.get_or_insert_with(Headers::new).insert(name, value);
        self
    }

    /// Set all header overrides at once.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Opt this call in or out of duplicate detection and cancellation.
    pub fn participate(mut self, participate: bool) -> Self {
        self.participate = Some(participate);
        self
    }
}

/// Per-call options for GET.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Query parameters appended to the URL
    pub params: Option<QueryParams>,
    /// Headers overlaid on the client defaults for this call
    pub headers: Option<Headers>,
    /// Replaces the default cancellation participation for this call
    pub participate: Option<bool>,
}

impl GetOptions {
    /// Options with no parameters that use every client default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.get_or_insert_with(QueryParams::new).insert(key, value);
        self
    }

    /// Set all query parameters at once.
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Add one header override.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.get_or_insert_with(Headers::new).insert(name, value);
        self
    }

    /// Set all header overrides at once.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Opt this call in or out of duplicate detection and cancellation.
    pub fn participate(mut self, participate: bool) -> Self {
        self.participate = Some(participate);
        self
    }
}

impl From<RequestOptions> for GetOptions {
    fn from(options: RequestOptions) -> Self {
        GetOptions {
            params: None,
            headers: options.headers,
            participate: options.participate,
        }
    }
}

#[derive(Debug)]
struct Defaults {
    headers: Headers,
    participate: bool,
}

/// Fetch-style HTTP client.
///
/// Holds the default headers and the default cancellation participation,
/// and routes every call through one [`RequestExecutor`].
///
/// # Features
///
/// - JSON request bodies and JSON-decoded responses
/// - Client-wide default headers with per-call overrides
/// - Query parameter construction for GET
/// - At most one participating request per URL, with cooperative abort
///
/// Clones share defaults, in-flight state and transport, so a default changed
/// through one clone is seen by all of them.
#[derive(Debug, Clone)]
pub struct SimFetch {
    executor: RequestExecutor,
    defaults: Arc<RwLock<Defaults>>,
}

impl SimFetch {
    /// Create a client with default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration over a reqwest transport.
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::with_config(&config));
        Self::with_transport(config, transport)
    }

    /// Create a client over a custom [`Transport`].
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let defaults = Defaults {
            headers: config.default_headers,
            participate: config.participate_in_cancellation,
        };

        SimFetch {
            executor: RequestExecutor::new(transport, config.enable_logging),
            defaults: Arc::new(RwLock::new(defaults)),
        }
    }

    // ========== Defaults ==========

    /// Replace the default headers wholesale.
    pub fn set_default_headers(&self, headers: Headers) {
        self.defaults.write().headers = headers;
    }

    /// Current default headers.
    pub fn default_headers(&self) -> Headers {
        self.defaults.read().headers.clone()
    }

    /// Remove one default header. Absent names are a no-op.
    pub fn remove_default_header(&self, name: &str) {
        self.defaults.write().headers.remove(name);
    }

    /// Set whether calls participate in duplicate detection by default.
    pub fn set_default_cancellation_participation(&self, enabled: bool) {
        self.defaults.write().participate = enabled;
    }

    /// Whether calls participate in duplicate detection by default.
    pub fn default_cancellation_participation(&self) -> bool {
        self.defaults.read().participate
    }

    // ========== Requests ==========

    /// Make a GET request.
    ///
    /// Query parameters are appended before dispatch, so the in-flight key is
    /// the expanded URL.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let items = client
    ///     .get::<Vec<Item>>("https://example.com/items", GetOptions::new().param("id", "1"))
    ///     .await?;
    /// ```
    pub async fn get<T>(&self, url: &str, options: GetOptions) -> Result<ResponseEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let url = with_params(url, options.params.as_ref());
        let request = RequestOptions {
            headers: options.headers,
            participate: options.participate,
        };
        self.request(Method::Get, url, None, request).await
    }

    /// Make a POST request with a JSON body.
    ///
    /// A body that serializes to a JSON string is sent as-is.
    pub async fn post<B, T>(&self, url: &str, body: &B, options: RequestOptions) -> Result<ResponseEnvelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = RequestBody::from_serialize(body)?;
        self.request(Method::Post, url.to_string(), body, options).await
    }

    /// Make a PATCH request with a JSON body.
    pub async fn patch<B, T>(&self, url: &str, body: &B, options: RequestOptions) -> Result<ResponseEnvelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = RequestBody::from_serialize(body)?;
        self.request(Method::Patch, url.to_string(), body, options).await
    }

    /// Make a DELETE request without a body.
    pub async fn delete<T>(&self, url: &str, options: RequestOptions) -> Result<ResponseEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        self.request(Method::Delete, url.to_string(), None, options).await
    }

    /// Make a DELETE request with a JSON body.
    pub async fn delete_with_body<B, T>(
        &self,
        url: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = RequestBody::from_serialize(body)?;
        self.request(Method::Delete, url.to_string(), body, options).await
    }

    /// Execute a prepared descriptor as-is, bypassing the client defaults.
    pub async fn fetch<T>(&self, request: RequestDescriptor) -> Result<ResponseEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        self.executor.execute(request).await
    }

    async fn request<T>(
        &self,
        method: Method,
        url: String,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let (headers, participate) = {
            let defaults = self.defaults.read();
            let headers = match &options.headers {
                Some(overrides) => merge_headers(
                    &defaults.headers,
                    overrides.iter().map(|(k, v)| (k, Some(v))),
                ),
                None => defaults.headers.clone(),
            };
            (headers, options.participate.unwrap_or(defaults.participate))
        };

        let request = RequestDescriptor {
            method,
            url,
            body,
            headers,
            participate,
        };
        self.executor.execute(request).await
    }

    // ========== In-flight control ==========

    /// Abort the participating request in flight for `url`.
    ///
    /// The aborted call fails with
    /// [`SimFetchError::Cancelled`](crate::SimFetchError::Cancelled). Returns
    /// `false` if nothing is in flight for `url`.
    pub fn abort(&self, url: &str) -> bool {
        self.executor.tracker().cancel(url)
    }

    /// Abort every participating request in flight, returning how many.
    pub fn abort_all(&self) -> usize {
        self.executor.tracker().cancel_all()
    }

    /// Whether a participating request for `url` is in flight.
    pub fn is_in_flight(&self, url: &str) -> bool {
        self.executor.tracker().is_active(url)
    }
}

impl Default for SimFetch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> SimFetch {
        SimFetch::with_config(ClientConfig {
            enable_logging: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_client_creation() {
        let client = SimFetch::new();
        assert!(client.default_headers().is_empty());
        assert!(client.default_cancellation_participation());
    }

    #[test]
    fn test_set_default_headers() {
        let client = quiet();
        let headers = Headers::from([("Authorization", "Bearer token")]);
        client.set_default_headers(headers.clone());
        assert_eq!(client.default_headers(), headers);
    }

    #[test]
    fn test_remove_default_header() {
        let client = quiet();
        client.set_default_headers(Headers::from([
            ("Authorization", "Bearer token"),
            ("Accept", "application/json"),
        ]));
        client.remove_default_header("Authorization");
        assert_eq!(
            client.default_headers(),
            Headers::from([("Accept", "application/json")])
        );
    }

    #[test]
    fn test_remove_absent_default_header() {
        let client = quiet();
        client.set_default_headers(Headers::from([("Accept", "application/json")]));
        client.remove_default_header("X-Missing");
        assert_eq!(client.default_headers().len(), 1);
    }

    #[test]
    fn test_defaults_shared_between_clones() {
        let client = quiet();
        let clone = client.clone();
        clone.set_default_cancellation_participation(false);
        clone.set_default_headers(Headers::from([("A", "1")]));

        assert!(!client.default_cancellation_participation());
        assert_eq!(client.default_headers().get("a"), Some("1"));
    }

    #[test]
    fn test_separate_clients_are_isolated() {
        let a = quiet();
        let b = quiet();
        a.set_default_headers(Headers::from([("A", "1")]));
        assert!(b.default_headers().is_empty());
    }

    #[test]
    fn test_option_builders() {
        let get = GetOptions::new()
            .param("id", "1")
            .param("id", "2")
            .header("Accept", "text/plain")
            .participate(false);
        assert_eq!(get.params.unwrap().get("id"), Some("2"));
        assert_eq!(get.headers.unwrap().get("accept"), Some("text/plain"));
        assert_eq!(get.participate, Some(false));

        let from_request: GetOptions = RequestOptions::new().participate(true).into();
        assert!(from_request.params.is_none());
        assert_eq!(from_request.participate, Some(true));
    }

    #[test]
    fn test_abort_without_request() {
        let client = quiet();
        assert!(!client.abort("https://example.com/items"));
        assert_eq!(client.abort_all(), 0);
        assert!(!client.is_in_flight("https://example.com/items"));
    }
}
