//! # Core Configuration Module
//!
//! Provides configuration management for the demon list core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the content bridge and the tunables of the engine.
//! It enforces fail-fast validation so a misconfigured host finds out at
//! startup rather than on the first page load.
//!
//! ## Required Dependencies
//!
//! - `ResourceStore` - fetch-by-name access to the list data
//!
//! When the `desktop-shims` feature is enabled, a store can instead be derived
//! from a data directory (`DirectoryResourceStore`) or a base URL
//! (`HttpResourceStore` over `ReqwestHttpClient`).
//!
//! ## Usage
//!
//! ```
//! use bridge_traits::MemoryResourceStore;
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .resource_store(Arc::new(MemoryResourceStore::new()))
//!     .legacy_cutoff(150)
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.scoring.legacy_cutoff, 150);
//! ```
//!
//! ## Error Handling
//!
//! Missing capabilities produce an actionable message:
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - no resource store");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::ResourceStore;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Point value bounds and the rank past which levels count as legacy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Points awarded to rank 1
    pub top_value: f64,
    /// Floor for every rank, and the flat value for legacy ranks
    pub min_value: f64,
    /// Last rank on the main list; ranks above it are legacy
    pub legacy_cutoff: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            top_value: 100.0,
            min_value: 10.0,
            legacy_cutoff: 75,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.top_value.is_finite() || !self.min_value.is_finite() {
            return Err(Error::Config(
                "Score bounds must be finite numbers".to_string(),
            ));
        }

        if self.min_value > self.top_value {
            return Err(Error::Config(format!(
                "Minimum score ({}) exceeds top score ({})",
                self.min_value, self.top_value
            )));
        }

        if self.legacy_cutoff == 0 {
            return Err(Error::Config(
                "Legacy cutoff must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Resource names the content source reads.
///
/// Level documents are named `<id><level_suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLayout {
    pub list_index: String,
    pub pack_catalogue: String,
    pub editors: String,
    pub level_suffix: String,
}

impl Default for ResourceLayout {
    fn default() -> Self {
        Self {
            list_index: "_list.json".to_string(),
            pack_catalogue: "_packlist.json".to_string(),
            editors: "_editors.json".to_string(),
            level_suffix: ".json".to_string(),
        }
    }
}

impl ResourceLayout {
    /// Resource name of the level document for `id`.
    pub fn level_resource(&self, id: &str) -> String {
        format!("{}{}", id, self.level_suffix)
    }

    pub fn validate(&self) -> Result<()> {
        let names = [
            ("list index", &self.list_index),
            ("pack catalogue", &self.pack_catalogue),
            ("editors", &self.editors),
        ];

        for (label, name) in names {
            if name.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Resource name for the {} cannot be empty",
                    label
                )));
            }
        }

        Ok(())
    }
}

/// Core configuration for the demon list engine.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Fetch-by-name access to the list data (required)
    pub resource_store: Arc<dyn ResourceStore>,

    /// Point value curve
    pub scoring: ScoringConfig,

    /// Resource names for catalogues and level documents
    pub layout: ResourceLayout,

    /// Per-subscriber buffer of the event bus
    pub event_buffer_size: usize,
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("resource_store", &self.resource_store.describe())
            .field("scoring", &self.scoring)
            .field("layout", &self.layout)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Score bounds are finite and ordered, cutoff is at least 1
    /// - Resource names are not empty
    /// - Event buffer size is within (0, 10_000]
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        self.layout.validate()?;

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > 10_000 {
            return Err(Error::Config(
                "Event buffer size exceeds maximum of 10,000".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn resource_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "ResourceStore".to_string(),
        message: "ResourceStore implementation is required to fetch the list data. \
                 Desktop: enable the 'desktop-shims' feature and set .data_dir() or .base_url(). \
                 Other hosts: inject a ResourceStore with .resource_store()."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_resource_store(
    data_dir: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<Arc<dyn ResourceStore>> {
    use bridge_desktop::{DirectoryResourceStore, HttpResourceStore, ReqwestHttpClient};

    match (data_dir, base_url) {
        (Some(_), Some(_)) => Err(Error::Config(
            "Set either .data_dir() or .base_url(), not both".to_string(),
        )),
        (Some(dir), None) => Ok(Arc::new(DirectoryResourceStore::new(dir))),
        (None, Some(url)) => {
            if url.trim().is_empty() {
                return Err(Error::Config("Base URL cannot be empty".to_string()));
            }
            let client = Arc::new(ReqwestHttpClient::new());
            Ok(Arc::new(HttpResourceStore::new(client, url)))
        }
        (None, None) => Err(Error::CapabilityMissing {
            capability: "ResourceStore".to_string(),
            message: "No resource store configured. \
                     Set .data_dir() for local files, .base_url() for a static host, \
                     or inject one with .resource_store()."
                .to_string(),
        }),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_resource_store(
    _data_dir: Option<PathBuf>,
    _base_url: Option<String>,
) -> Result<Arc<dyn ResourceStore>> {
    Err(resource_store_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    resource_store: Option<Arc<dyn ResourceStore>>,
    data_dir: Option<PathBuf>,
    base_url: Option<String>,
    scoring: ScoringConfig,
    layout: ResourceLayout,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the resource store implementation.
    ///
    /// Takes precedence over `data_dir` and `base_url`.
    pub fn resource_store(mut self, store: Arc<dyn ResourceStore>) -> Self {
        self.resource_store = Some(store);
        self
    }

    /// Reads list data from a local directory (requires `desktop-shims`).
    pub fn data_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Reads list data from a static HTTP host (requires `desktop-shims`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Replaces the whole scoring configuration.
    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Default: 100
    pub fn top_value(mut self, value: f64) -> Self {
        self.scoring.top_value = value;
        self
    }

    /// Default: 10
    pub fn min_value(mut self, value: f64) -> Self {
        self.scoring.min_value = value;
        self
    }

    /// Default: 75
    pub fn legacy_cutoff(mut self, cutoff: usize) -> Self {
        self.scoring.legacy_cutoff = cutoff;
        self
    }

    pub fn layout(mut self, layout: ResourceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Default: [`DEFAULT_EVENT_BUFFER_SIZE`]
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns an error if no resource store can be provided or if any
    /// value fails validation.
    pub fn build(self) -> Result<CoreConfig> {
        let resource_store = match self.resource_store {
            Some(store) => store,
            None => provide_default_resource_store(self.data_dir, self.base_url)?,
        };

        let config = CoreConfig {
            resource_store,
            scoring: self.scoring,
            layout: self.layout,
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
