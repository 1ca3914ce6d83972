//! SimFetch HTTP client.
//!
//! This module provides the fetch-style client and the machinery behind it:
//!
//! - **Default headers** shared by every call, with per-call overrides
//! - **JSON bodies** encoded on the way out and decoded on the way back
//! - **Per-URL de-duplication**: at most one participating request per URL
//! - **Cooperative cancellation** through [`CancellationHandle`]s
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch     - SimFetch facade and per-call options
//! ├── executor  - Core request dispatch
//! ├── tracker   - In-flight request tracking
//! ├── cancel    - Cancellation handles
//! ├── transport - Transport trait and the reqwest implementation
//! ├── config    - Client configuration
//! └── handlers  - Callback-style result delivery
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SimFetch`] | Client facade with GET/POST/PATCH/DELETE |
//! | [`RequestExecutor`] | Registers, sends, releases, decodes |
//! | [`InFlightTracker`] | URL to cancellation handle map |
//! | [`Transport`] | Capability to send one HTTP request |
//! | [`ClientConfig`] | Client configuration options |
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use simfetch::client::{ClientConfig, SimFetch};
//!
//! // Default configuration
//! let client = SimFetch::new();
//!
//! // Custom configuration
//! let config = ClientConfig {
//!     participate_in_cancellation: false,
//!     ..Default::default()
//! };
//! let client = SimFetch::with_config(config);
//! assert!(!client.default_cancellation_participation());
//! ```
//!
//! ## Tracking In-Flight Requests
//!
//! ```
//! use simfetch::client::InFlightTracker;
//!
//! let tracker = InFlightTracker::new();
//! let guard = tracker.try_register("https://example.com/items").unwrap();
//! assert!(tracker.cancel("https://example.com/items"));
//! assert!(guard.handle().is_triggered());
//! ```

mod cancel;
mod config;
mod executor;
mod fetch;
mod handlers;
mod tracker;
mod transport;

pub use cancel::CancellationHandle;
pub use config::ClientConfig;
pub use executor::RequestExecutor;
pub use fetch::{GetOptions, RequestOptions, SimFetch};
pub use handlers::{deliver, Callbacks, ResponseHandlers};
pub use tracker::{InFlightGuard, InFlightTracker};
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
