#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # SimFetch: fetch-style HTTP for Rust
//!
//! A small convenience layer over an HTTP transport: one request path plus a
//! client facade offering GET/POST/PATCH/DELETE, default-header management,
//! query-parameter construction and optional per-URL request de-duplication
//! with cooperative cancellation.
//!
//! ## Key Features
//!
//! - **JSON by default**: bodies are JSON-encoded (strings pass through) and
//!   responses are decoded into any `DeserializeOwned` type
//! - **Default headers**: set once, overlaid per call
//! - **De-duplication**: while a participating request to a URL is in flight,
//!   another one to the same URL fails immediately with
//!   [`SimFetchError::DuplicateRequest`]
//! - **Cancellation**: [`SimFetch::abort`] triggers the in-flight request's
//!   handle, which then fails with [`SimFetchError::Cancelled`]
//! - **Typed errors**: a failing status becomes
//!   `SimFetchError::Status { status, message: "HTTP error! Status: <status>" }`
//!
//! ## Client Usage
//!
//! ```ignore
//! use simfetch::{GetOptions, RequestOptions, SimFetch, SimFetchError};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Item {
//!     id: String,
//!     name: String,
//!     stock: u32,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), SimFetchError> {
//!     let client = SimFetch::new();
//!
//!     let items = client
//!         .get::<Vec<Item>>("https://example.com/items", GetOptions::new().param("id", "1"))
//!         .await?;
//!     println!("{} -> {:?}", items.status, items.data);
//!
//!     let item = Item { id: "2".into(), name: "item2".into(), stock: 3 };
//!     let created = client
//!         .post::<_, Item>("https://example.com/item", &item, RequestOptions::new())
//!         .await?;
//!     assert_eq!(created.status, 201);
//!
//!     match client.get::<Item>("https://example.com/items/2", GetOptions::new()).await {
//!         Err(SimFetchError::Status { status, message }) => eprintln!("{status}: {message}"),
//!         other => println!("{:?}", other),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - Request/response types (Method, Headers, QueryParams, ...)
//! - **[error]** - Error types and result handling
//! - **[client]** - Client facade, executor, in-flight tracker, transport
//! - **[protocol]** - Header composition and query string construction

pub mod client;
pub mod error;
pub mod protocol;
pub mod types;

pub use client::{ClientConfig, GetOptions, RequestOptions, SimFetch};
pub use error::{Result, SimFetchError};
pub use types::{Headers, Method, QueryParams, RequestBody, RequestDescriptor, ResponseEnvelope};
