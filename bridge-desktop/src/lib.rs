//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `ReqwestHttpClient` - `HttpClient` using `reqwest`, with retry/backoff
//! - `DirectoryResourceStore` - `ResourceStore` over a local data directory
//! - `HttpResourceStore` - `ResourceStore` over a static HTTP host
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DirectoryResourceStore, HttpResourceStore, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! #[core_async::main]
//! async fn main() {
//!     let local = DirectoryResourceStore::new("./data");
//!     let remote = HttpResourceStore::new(
//!         Arc::new(ReqwestHttpClient::new()),
//!         "https://list.example/data",
//!     );
//!     // Hand either one to CoreConfig::builder().resource_store(...)
//! }
//! ```

mod filesystem;
mod http;
mod remote;

pub use filesystem::DirectoryResourceStore;
pub use http::ReqwestHttpClient;
pub use remote::HttpResourceStore;
