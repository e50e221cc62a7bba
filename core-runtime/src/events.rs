//! # Event Bus System
//!
//! Broadcasts typed notifications about content loading and navigation so
//! hosts can react (log, toast, analytics) without polling session state.
//!
//! ## Overview
//!
//! - **Event Types**: [`ContentEvent`] for catalogue and item loads,
//!   [`NavigationEvent`] for pack/level/media selection changes
//! - **EventBus**: a cloneable handle over a broadcast channel
//! - **EventStream**: a receiver wrapper with optional filtering
//!
//! ```text
//! ┌────────────────┐   emit    ┌───────────┐   subscribe   ┌────────────┐
//! │ ListRepository ├──────────>│           ├──────────────>│ Subscriber │
//! └────────────────┘           │ EventBus  │               └────────────┘
//! ┌────────────────┐   emit    │           │   subscribe   ┌────────────┐
//! │ Sessions       ├──────────>│           ├──────────────>│ Subscriber │
//! └────────────────┘           └───────────┘               └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{ContentEvent, CoreEvent, EventBus};
//!
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Content(ContentEvent::ItemFailed {
//!         resource: "57.json".to_string(),
//!         reason: "not found".to_string(),
//!     }))
//!     .ok();
//!
//! assert!(subscriber.try_recv().is_ok());
//! ```
//!
//! Emitting with no subscribers returns an error; producers in this
//! workspace ignore it with `.ok()`.
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell behind and missed `n`
//!   events. Non-fatal.
//! - **`RecvError::Closed`**: every sender was dropped. Treat as shutdown.

use core_async::sync::broadcast;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published through the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Content(ContentEvent),
    Navigation(NavigationEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Content(e) => e.description(),
            CoreEvent::Navigation(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Content(ContentEvent::CatalogueUnavailable { .. }) => EventSeverity::Error,
            CoreEvent::Content(ContentEvent::ItemFailed { .. }) => EventSeverity::Warning,
            CoreEvent::Content(ContentEvent::CatalogueLoaded { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Content Events
// ============================================================================

/// Which catalogue a content event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogueKind {
    /// The ranked list index and its level documents
    List,
    /// The pack catalogue
    Packs,
    /// The levels of one pack
    PackLevels,
    /// The list editors roster
    Editors,
}

impl CatalogueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogueKind::List => "list",
            CatalogueKind::Packs => "packs",
            CatalogueKind::PackLevels => "pack_levels",
            CatalogueKind::Editors => "editors",
        }
    }
}

/// Events emitted while loading remote content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ContentEvent {
    /// A catalogue and its items finished loading.
    CatalogueLoaded {
        catalogue: CatalogueKind,
        /// Number of entries, including failed placeholders.
        item_count: usize,
        /// Entries that resolved to a failure placeholder.
        failed_count: usize,
    },
    /// A catalogue could not be fetched or decoded at all.
    CatalogueUnavailable {
        catalogue: CatalogueKind,
        resource: String,
        message: String,
    },
    /// A single item failed and was replaced with a placeholder.
    ItemFailed {
        /// Resource name of the failed item (e.g. `57.json`).
        resource: String,
        reason: String,
    },
}

impl ContentEvent {
    fn description(&self) -> &str {
        match self {
            ContentEvent::CatalogueLoaded { .. } => "Catalogue loaded",
            ContentEvent::CatalogueUnavailable { .. } => "Catalogue unavailable",
            ContentEvent::ItemFailed { .. } => "Item failed to load",
        }
    }
}

// ============================================================================
// Navigation Events
// ============================================================================

/// Events emitted when a session's selection changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum NavigationEvent {
    /// A pack became the current pack; its levels are being fetched.
    PackSelected { pack_index: usize, pack_name: String },
    /// The current level changed.
    LevelSelected {
        level_index: usize,
        /// `None` when the entry at that index is a failure placeholder.
        level_id: Option<String>,
    },
    /// The embedded video switched between verification and showcase.
    MediaToggled { level_index: usize, showcase: bool },
    /// A pack fetch finished after a newer selection and was dropped.
    StaleResultDiscarded { pack_index: usize },
}

impl NavigationEvent {
    fn description(&self) -> &str {
        match self {
            NavigationEvent::PackSelected { .. } => "Pack selected",
            NavigationEvent::LevelSelected { .. } => "Level selected",
            NavigationEvent::MediaToggled { .. } => "Media toggled",
            NavigationEvent::StaleResultDiscarded { .. } => "Stale pack result discarded",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning the bus clones the sender; every clone publishes to the same
/// subscribers. Slow subscribers get `RecvError::Lagged` instead of
/// blocking producers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` wrapper that skips events failing a predicate.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let navigation_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Navigation(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching event is currently buffered.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
