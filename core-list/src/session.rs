//! Observable page sessions
//!
//! A session owns the state of one page (the flat ranked list or the pack
//! browser) and publishes it through a `watch` channel. Every transition
//! replaces the snapshot in one step, so a reader never sees a new level
//! index next to an old collection.
//!
//! Pack navigation follows "last navigation wins": each `select_pack`
//! stamps a generation, and a pack fetch that completes after a newer
//! selection is dropped instead of overwriting it.

use crate::error::Result;
use crate::models::{Editor, LevelEntry, Pack, RankedList};
use crate::repository::ListRepository;
use crate::selection::{level_in_range, MediaVariant, SelectionState};
use core_async::sync::watch;
use core_runtime::events::{CoreEvent, EventBus, NavigationEvent};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const LIST_UNAVAILABLE_MESSAGE: &str =
    "Failed to load the list. Try again later or contact the list moderators.";
pub const PACKS_UNAVAILABLE_MESSAGE: &str =
    "Failed to load the pack list. Try again in a few minutes.";
pub const EDITORS_UNAVAILABLE_MESSAGE: &str = "Failed to load the list editors.";

/// Lifecycle of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagePhase {
    #[default]
    Loading,
    Ready,
    /// The page's catalogue could not be loaded
    Unavailable,
}

// =============================================================================
// Flat list page
// =============================================================================

/// State of the ranked list page
#[derive(Debug, Clone, Default)]
pub struct ListSnapshot {
    pub phase: PagePhase,
    pub levels: Arc<RankedList>,
    /// `None` until loaded, and when the roster failed
    pub editors: Option<Arc<Vec<Editor>>>,
    pub errors: Vec<String>,
    pub selection: SelectionState,
}

impl ListSnapshot {
    pub fn current_level(&self) -> Option<&LevelEntry> {
        self.levels.level_at(self.selection.level_index)
    }

    pub fn current_video(&self) -> Option<&str> {
        self.current_level()
            .and_then(|entry| entry.level.video(self.selection.media))
    }
}

/// Session behind the ranked list page
pub struct ListSession {
    repository: Arc<ListRepository>,
    events: EventBus,
    state: watch::Sender<ListSnapshot>,
}

impl ListSession {
    pub fn new(repository: Arc<ListRepository>) -> Self {
        let events = repository.events().clone();
        let (state, _) = watch::channel(ListSnapshot::default());
        Self {
            repository,
            events,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.state.borrow().clone()
    }

    /// Loads the ranked list and the editor roster concurrently.
    ///
    /// A list index failure leaves the page `Unavailable` with a single
    /// message; an editors failure only adds a message to a loaded page.
    ///
    /// # Errors
    ///
    /// Returns the catalogue error when the list index cannot be loaded.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<()> {
        self.state.send_modify(|s| s.phase = PagePhase::Loading);

        let (levels, editors) =
            futures::join!(self.repository.ranked_list(), self.repository.editors());

        match levels {
            Ok(levels) => {
                let mut errors = levels.error_messages();
                let editors = match editors {
                    Ok(editors) => Some(Arc::new(editors)),
                    Err(_) => {
                        errors.push(EDITORS_UNAVAILABLE_MESSAGE.to_string());
                        None
                    }
                };

                info!(levels = levels.len(), errors = errors.len(), "List page ready");
                self.state.send_modify(|s| {
                    s.phase = PagePhase::Ready;
                    s.levels = Arc::new(levels);
                    s.editors = editors;
                    s.errors = errors;
                    s.selection.collection_reloaded();
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| {
                    s.phase = PagePhase::Unavailable;
                    s.levels = Arc::new(RankedList::empty());
                    s.editors = None;
                    s.errors = vec![LIST_UNAVAILABLE_MESSAGE.to_string()];
                    s.selection.collection_reloaded();
                });
                Err(e)
            }
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range for a non-empty list.
    pub fn select_level(&self, index: usize) {
        let level_count = self.state.borrow().levels.len();
        assert_level_in_range(index, level_count);

        self.state.send_modify(|s| select_level_in(&mut s.selection, &s.levels, index));
        emit_level_selected(&self.events, &self.snapshot());
    }

    /// Switches between verification and showcase. No-op if the current
    /// level has no showcase.
    pub fn toggle_media(&self) -> bool {
        let toggled = self.state.send_if_modified(|s| {
            let has_showcase = s.current_level().is_some_and(|e| e.level.has_showcase());
            s.selection.toggle_media(has_showcase)
        });

        if toggled {
            emit_media_toggled(&self.events, &self.state.borrow().selection);
        }
        toggled
    }

    pub fn current_level(&self) -> Option<LevelEntry> {
        self.state.borrow().current_level().cloned()
    }

    pub fn current_level_index(&self) -> usize {
        self.state.borrow().selection.level_index
    }

    /// Always `None` on the flat list page
    pub fn current_pack_index(&self) -> Option<usize> {
        self.state.borrow().selection.pack_index
    }

    pub fn current_errors(&self) -> Vec<String> {
        self.state.borrow().errors.clone()
    }

    pub fn current_video(&self) -> Option<String> {
        self.state.borrow().current_video().map(str::to_string)
    }
}

// =============================================================================
// Pack page
// =============================================================================

/// State of the pack browser page
#[derive(Debug, Clone, Default)]
pub struct PackSnapshot {
    pub phase: PagePhase,
    pub packs: Arc<Vec<Pack>>,
    /// Levels of the selected pack; empty while they are being fetched
    pub levels: Arc<RankedList>,
    /// Errors of the selected pack only
    pub errors: Vec<String>,
    pub selection: SelectionState,
    pub loading_pack: bool,
    generation: u64,
}

impl PackSnapshot {
    pub fn current_pack(&self) -> Option<&Pack> {
        self.selection.pack_index.and_then(|i| self.packs.get(i))
    }

    pub fn current_level(&self) -> Option<&LevelEntry> {
        self.levels.level_at(self.selection.level_index)
    }

    pub fn current_video(&self) -> Option<&str> {
        self.current_level()
            .and_then(|entry| entry.level.video(self.selection.media))
    }
}

/// Session behind the pack browser page
pub struct PackSession {
    repository: Arc<ListRepository>,
    events: EventBus,
    state: watch::Sender<PackSnapshot>,
}

impl PackSession {
    pub fn new(repository: Arc<ListRepository>) -> Self {
        let events = repository.events().clone();
        let (state, _) = watch::channel(PackSnapshot::default());
        Self {
            repository,
            events,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PackSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> PackSnapshot {
        self.state.borrow().clone()
    }

    /// Loads the pack catalogue and selects the first pack, if any.
    ///
    /// # Errors
    ///
    /// Returns the catalogue error when the pack catalogue cannot be loaded;
    /// the page is then `Unavailable` with a single message.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<()> {
        self.state.send_modify(|s| s.phase = PagePhase::Loading);

        let packs = match self.repository.pack_catalogue().await {
            Ok(packs) => packs,
            Err(e) => {
                self.state.send_modify(|s| {
                    s.phase = PagePhase::Unavailable;
                    s.packs = Arc::new(Vec::new());
                    s.levels = Arc::new(RankedList::empty());
                    s.errors = vec![PACKS_UNAVAILABLE_MESSAGE.to_string()];
                    s.selection = SelectionState::new();
                    s.loading_pack = false;
                });
                return Err(e);
            }
        };

        let has_packs = !packs.is_empty();
        self.state.send_modify(|s| {
            s.phase = PagePhase::Ready;
            s.packs = packs;
            s.errors.clear();
        });

        if has_packs {
            self.select_pack(0).await;
        }
        Ok(())
    }

    /// Makes pack `index` current and fetches its levels.
    ///
    /// The level index and media reset immediately and the previous pack's
    /// levels and errors are cleared. If another `select_pack` starts
    /// before this one's fetch completes, this fetch's result is discarded.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the loaded catalogue.
    #[instrument(skip(self))]
    pub async fn select_pack(&self, index: usize) {
        let pack_count = self.state.borrow().packs.len();
        assert!(
            index < pack_count,
            "pack index {} out of range for {} packs",
            index,
            pack_count
        );

        let mut started = None;
        self.state.send_modify(|s| {
            let Some(pack) = s.packs.get(index) else {
                return;
            };
            let name = pack.name.clone();

            s.generation += 1;
            s.selection.select_pack(index, s.packs.len());
            s.levels = Arc::new(RankedList::empty());
            s.errors.clear();
            s.loading_pack = true;
            started = Some((s.generation, name));
        });
        let Some((generation, name)) = started else {
            return;
        };

        emit_navigation(
            &self.events,
            NavigationEvent::PackSelected {
                pack_index: index,
                pack_name: name.clone(),
            },
        );

        let result = self.repository.pack_levels(&name).await;

        let applied = self.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }

            match result {
                Ok(levels) => {
                    s.errors = levels.error_messages();
                    s.levels = Arc::new(levels);
                }
                Err(e) => {
                    debug!(pack = %name, error = %e, "Pack levels unavailable");
                    s.errors = vec![PACKS_UNAVAILABLE_MESSAGE.to_string()];
                }
            }
            s.loading_pack = false;
            s.selection.collection_reloaded();
            true
        });

        if !applied {
            debug!(pack = %name, generation, "Discarding stale pack result");
            emit_navigation(
                &self.events,
                NavigationEvent::StaleResultDiscarded { pack_index: index },
            );
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range for the current pack's non-empty
    /// level collection.
    pub fn select_level(&self, index: usize) {
        let level_count = self.state.borrow().levels.len();
        assert_level_in_range(index, level_count);

        self.state.send_modify(|s| select_level_in(&mut s.selection, &s.levels, index));
        emit_pack_level_selected(&self.events, &self.snapshot());
    }

    /// Switches between verification and showcase. No-op if the current
    /// level has no showcase.
    pub fn toggle_media(&self) -> bool {
        let toggled = self.state.send_if_modified(|s| {
            let has_showcase = s.current_level().is_some_and(|e| e.level.has_showcase());
            s.selection.toggle_media(has_showcase)
        });

        if toggled {
            emit_media_toggled(&self.events, &self.state.borrow().selection);
        }
        toggled
    }

    pub fn current_level(&self) -> Option<LevelEntry> {
        self.state.borrow().current_level().cloned()
    }

    pub fn current_level_index(&self) -> usize {
        self.state.borrow().selection.level_index
    }

    pub fn current_pack_index(&self) -> Option<usize> {
        self.state.borrow().selection.pack_index
    }

    pub fn current_errors(&self) -> Vec<String> {
        self.state.borrow().errors.clone()
    }

    pub fn current_video(&self) -> Option<String> {
        self.state.borrow().current_video().map(str::to_string)
    }
}

fn assert_level_in_range(index: usize, level_count: usize) {
    assert!(
        level_in_range(index, level_count),
        "level index {} out of range for {} levels",
        index,
        level_count
    );
}

/// Applies a level selection validated against an earlier read; skipped if
/// the collection changed underneath it.
fn select_level_in(selection: &mut SelectionState, levels: &RankedList, index: usize) {
    if level_in_range(index, levels.len()) {
        selection.select_level(index, levels.len());
    }
}

fn emit_level_selected(events: &EventBus, snapshot: &ListSnapshot) {
    emit_navigation(
        events,
        NavigationEvent::LevelSelected {
            level_index: snapshot.selection.level_index,
            level_id: snapshot.current_level().map(|entry| entry.id().to_string()),
        },
    );
}

fn emit_pack_level_selected(events: &EventBus, snapshot: &PackSnapshot) {
    emit_navigation(
        events,
        NavigationEvent::LevelSelected {
            level_index: snapshot.selection.level_index,
            level_id: snapshot.current_level().map(|entry| entry.id().to_string()),
        },
    );
}

fn emit_navigation(events: &EventBus, event: NavigationEvent) {
    events.emit(CoreEvent::Navigation(event)).ok();
}

fn emit_media_toggled(events: &EventBus, selection: &SelectionState) {
    emit_navigation(
        events,
        NavigationEvent::MediaToggled {
            level_index: selection.level_index,
            showcase: selection.media == MediaVariant::Showcase,
        },
    );
}
