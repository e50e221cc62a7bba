//! # Host Bridge Traits
//!
//! Capability traits the host platform implements for the list engine.
//!
//! ## Overview
//!
//! The engine never talks to the network or the disk itself. Everything it
//! reads arrives through a [`ResourceStore`](storage::ResourceStore): a
//! "fetch this named JSON document" capability. Hosts pick the backing
//! (static site over HTTP, a data directory, an embedded bundle).
//!
//! ## Traits
//!
//! - [`ResourceStore`](storage::ResourceStore) - Fetch a named resource as bytes
//! - [`HttpClient`](http::HttpClient) - Async HTTP used by remote stores
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it and keep the resource name in the
//! message so failures can be traced back to a file.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single store can serve many
//! concurrent item fetches.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::storage::ResourceStore;
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//! use bytes::Bytes;
//!
//! pub struct BundledStore;
//!
//! #[async_trait]
//! impl ResourceStore for BundledStore {
//!     async fn fetch(&self, name: &str) -> Result<Bytes> {
//!         // Look the document up in the bundle
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod logging;
pub mod storage;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use storage::{MemoryResourceStore, ResourceStore};
