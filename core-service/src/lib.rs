//! Core service façade and bootstrap helpers.
//!
//! This crate wires a validated [`CoreConfig`] into the list engine: one
//! content source over the configured resource store, one repository shared
//! by every page, and one event bus. Desktop hosts typically enable the
//! `desktop-shims` feature so the config can point at a data directory or a
//! base URL instead of supplying their own `ResourceStore`.
//!
//! ```
//! # async fn example() -> core_service::Result<()> {
//! use bridge_traits::MemoryResourceStore;
//! use core_runtime::config::CoreConfig;
//! use core_service::CoreService;
//! use std::sync::Arc;
//!
//! let store = MemoryResourceStore::new().with("_list.json", "[]");
//! let config = CoreConfig::builder()
//!     .resource_store(Arc::new(store))
//!     .build()?;
//!
//! let core = CoreService::new(config)?;
//! let page = core.list_session();
//! page.load().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use core_async::sync::broadcast::Receiver;
use core_list::{JsonContentSource, ListRepository, ListSession, PackSession, ScoreCurve};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, EventStream};
use tracing::info;

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; clones share the repository, its pack catalogue cache
/// and the event bus.
#[derive(Clone)]
pub struct CoreService {
    repository: Arc<ListRepository>,
    scoring: ScoreCurve,
    events: EventBus,
}

impl CoreService {
    /// Create a new service from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Runtime` if the configuration does not validate.
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let events = EventBus::new(config.event_buffer_size);
        let source = JsonContentSource::with_layout(config.resource_store.clone(), config.layout);
        let repository = Arc::new(ListRepository::new(Arc::new(source), events.clone()));

        info!(
            store = %config.resource_store.describe(),
            legacy_cutoff = config.scoring.legacy_cutoff,
            "Core service ready"
        );

        Ok(Self {
            repository,
            scoring: ScoreCurve::from(&config.scoring),
            events,
        })
    }

    /// Repository shared by every session of this service.
    pub fn repository(&self) -> Arc<ListRepository> {
        Arc::clone(&self.repository)
    }

    /// A fresh ranked list page. Call `load` on it to populate it.
    pub fn list_session(&self) -> ListSession {
        ListSession::new(self.repository())
    }

    /// A fresh pack browser page. Call `load` on it to populate it.
    pub fn pack_session(&self) -> PackSession {
        PackSession::new(self.repository())
    }

    pub fn score_curve(&self) -> ScoreCurve {
        self.scoring
    }

    /// Points for `rank` under the configured curve.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is 0.
    pub fn score(&self, rank: usize) -> f64 {
        self.scoring.score(rank)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to content and navigation events of every session.
    pub fn subscribe_events(&self) -> Receiver<CoreEvent> {
        self.events.subscribe()
    }

    /// Selection changes only: pack and level selection, media toggles and
    /// discarded stale pack results.
    pub fn subscribe_navigation(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
            .filter(|event| matches!(event, CoreEvent::Navigation(_)))
    }

    /// Catalogue loads and item failures only.
    pub fn subscribe_content(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
            .filter(|event| matches!(event, CoreEvent::Content(_)))
    }
}
