use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListError {
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Malformed resource {resource}: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    /// The index naming the items of a collection could not be loaded.
    #[error("Catalogue unavailable: {resource} - {reason}")]
    CatalogueUnavailable { resource: String, reason: String },

    #[error("Pack not found: {name}")]
    PackNotFound { name: String },
}

impl ListError {
    pub fn decode(resource: impl Into<String>, source: serde_json::Error) -> Self {
        ListError::Decode {
            resource: resource.into(),
            source,
        }
    }

    pub fn is_catalogue_unavailable(&self) -> bool {
        matches!(self, ListError::CatalogueUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, ListError>;
