//! Resilient resource loading
//!
//! Fetches many independently stored items at once and keeps going when
//! some of them fail. Each failure is pinned to the position of the item
//! that caused it, so callers always get back a collection the same length
//! and order as the names they asked for.

use core_async::task::join_ordered;
use core_runtime::events::{ContentEvent, CoreEvent, EventBus};
use std::fmt;
use std::future::Future;
use tracing::{debug, warn};

/// Outcome of loading one named item.
///
/// `resource` is only ever used to build messages; it never drives retries.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult<T> {
    Loaded(T),
    Failed { resource: String },
}

impl<T> LoadResult<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadResult::Loaded(_))
    }

    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            LoadResult::Loaded(value) => Some(value),
            LoadResult::Failed { .. } => None,
        }
    }

    pub fn into_loaded(self) -> Option<T> {
        match self {
            LoadResult::Loaded(value) => Some(value),
            LoadResult::Failed { .. } => None,
        }
    }

    pub fn failed_resource(&self) -> Option<&str> {
        match self {
            LoadResult::Loaded(_) => None,
            LoadResult::Failed { resource } => Some(resource),
        }
    }

    pub fn map<U, F>(self, f: F) -> LoadResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            LoadResult::Loaded(value) => LoadResult::Loaded(f(value)),
            LoadResult::Failed { resource } => LoadResult::Failed { resource },
        }
    }

    /// `Failed to load level. (<resource>)` for failures
    pub fn error_message(&self) -> Option<String> {
        self.failed_resource()
            .map(|resource| format!("Failed to load level. ({})", resource))
    }

    /// Row label shown in place of a level name, e.g. `Error (57.json)`
    pub fn placeholder_label(&self) -> Option<String> {
        self.failed_resource()
            .map(|resource| format!("Error ({})", resource))
    }
}

/// Concurrent fan-out loader with per-item failure isolation.
///
/// Holds no per-load state; one instance can serve any number of
/// concurrent loads. With an event bus attached, every failed item is
/// reported as `ContentEvent::ItemFailed`.
#[derive(Debug, Clone, Default)]
pub struct ResilientLoader {
    events: Option<EventBus>,
}

impl ResilientLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: EventBus) -> Self {
        Self {
            events: Some(events),
        }
    }

    /// Loads every `(resource, key)` pair concurrently.
    ///
    /// `fetch` is called once per key. Its error (transport, malformed
    /// document, schema mismatch alike) becomes `LoadResult::Failed` at that
    /// position and never affects the other items. The output has exactly
    /// one entry per input, in input order.
    pub async fn load_all<K, T, E, F, Fut>(
        &self,
        items: impl IntoIterator<Item = (String, K)>,
        fetch: F,
    ) -> Vec<LoadResult<T>>
    where
        F: Fn(K) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let events = self.events.as_ref();
        let pending = items.into_iter().map(|(resource, key)| {
            let fetched = fetch(key);
            async move {
                match fetched.await {
                    Ok(value) => LoadResult::Loaded(value),
                    Err(e) => {
                        warn!(resource = %resource, error = %e, "Item failed to load");
                        if let Some(events) = events {
                            events
                                .emit(CoreEvent::Content(ContentEvent::ItemFailed {
                                    resource: resource.clone(),
                                    reason: e.to_string(),
                                }))
                                .ok();
                        }
                        LoadResult::Failed { resource }
                    }
                }
            }
        });

        let results = join_ordered(pending).await;
        debug!(
            total = results.len(),
            failed = results.iter().filter(|r| !r.is_loaded()).count(),
            "Fan-out load finished"
        );
        results
    }
}
