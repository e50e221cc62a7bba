//! Resource Store Abstraction
//!
//! The list content lives as a flat set of named JSON documents
//! (`_list.json`, `<level-id>.json`, `_packlist.json`, ...). A store only
//! knows how to hand back the bytes for one name; decoding belongs to the
//! core.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use parking_lot::RwLock;

use crate::error::{BridgeError, Result};

/// Fetch-by-name capability
///
/// Implementations must be safe to call concurrently: the core fans out one
/// `fetch` per level when it assembles a list.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::ResourceStore;
///
/// async fn read_index(store: &dyn ResourceStore) -> Result<Vec<String>> {
///     let bytes = store.fetch("_list.json").await?;
///     Ok(serde_json::from_slice(&bytes)?)
/// }
/// ```
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch the raw bytes of a named resource
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The resource does not exist (`BridgeError::NotFound`)
    /// - The transport fails (network, filesystem)
    async fn fetch(&self, name: &str) -> Result<Bytes>;

    /// Human-readable description of where resources come from
    fn describe(&self) -> String {
        "resource store".to_string()
    }
}

/// In-memory resource store
///
/// Serves documents from a map. Useful for embedded content bundles and for
/// tests; a name that was never inserted fails with `BridgeError::NotFound`.
#[derive(Debug, Default)]
pub struct MemoryResourceStore {
    resources: RwLock<HashMap<String, Bytes>>,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a resource
    pub fn insert(&self, name: impl Into<String>, body: impl Into<Bytes>) {
        self.resources.write().insert(name.into(), body.into());
    }

    /// Builder-style insert
    pub fn with(self, name: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.insert(name, body);
        self
    }

    /// Serialize a value as JSON and insert it
    pub fn insert_json<T: serde::Serialize>(&self, name: impl Into<String>, value: &T) -> Result<()> {
        let body = serde_json::to_vec(value).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON serialization failed: {}", e))
        })?;
        self.insert(name, body);
        Ok(())
    }

    /// Remove a resource, returning whether it existed
    pub fn remove(&self, name: &str) -> bool {
        self.resources.write().remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn fetch(&self, name: &str) -> Result<Bytes> {
        self.resources
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::NotFound(name.to_string()))
    }

    fn describe(&self) -> String {
        format!("memory ({} resources)", self.len())
    }
}
