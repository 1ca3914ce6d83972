//! Client configuration.

use crate::types::Headers;
use serde::{Deserialize, Serialize};

/// Configuration for a [`SimFetch`](crate::SimFetch) client.
///
/// `default_headers` and `participate_in_cancellation` are only the initial
/// values: both can be changed later through the facade's setters.
///
/// # Examples
///
/// ```
/// use simfetch::client::ClientConfig;
/// use simfetch::Headers;
///
/// let config = ClientConfig {
///     default_headers: Headers::from([("Authorization", "Bearer token")]),
///     participate_in_cancellation: false,
///     ..Default::default()
/// };
/// assert!(config.enable_logging);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Headers sent with every request unless overridden per call
    pub default_headers: Headers,
    /// Whether requests join duplicate detection and cancellation by default
    pub participate_in_cancellation: bool,
    /// Emit `tracing` events for aborted and failed requests
    pub enable_logging: bool,
    /// Proxy for all requests; empty means no proxy
    pub proxy_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_headers: Headers::new(),
            participate_in_cancellation: true,
            enable_logging: true,
            proxy_url: String::new(),
        }
    }
}
