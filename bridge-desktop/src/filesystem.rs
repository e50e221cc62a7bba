//! Resource store over a local data directory using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::ResourceStore,
};
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Serves `<root>/<name>` for every requested resource name.
///
/// Names are resolved relative to the root only; absolute names and `..`
/// components are rejected so a level id can never escape the data folder.
pub struct DirectoryResourceStore {
    root: PathBuf,
}

impl DirectoryResourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the platform data directory (`<data_dir>/demonlist`)
    pub fn in_default_location() -> Self {
        let root = dirs::data_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".local")
                    .join("share")
            })
            .join("demonlist");

        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if name.is_empty() || escapes {
            return Err(BridgeError::OperationFailed(format!(
                "Invalid resource name: {}",
                name
            )));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ResourceStore for DirectoryResourceStore {
    async fn fetch(&self, name: &str) -> Result<Bytes> {
        let path = self.resolve(name)?;

        match fs::read(&path).await {
            Ok(data) => {
                debug!(path = ?path, size = data.len(), "Read resource");
                Ok(Bytes::from(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BridgeError::NotFound(name.to_string())),
            Err(e) => Err(BridgeError::Io(e)),
        }
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}
