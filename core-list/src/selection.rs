//! Selection and navigation state
//!
//! Pure transitions over the indices a page points at. The state holds
//! indices only; collections live in the page snapshot.

use serde::{Deserialize, Serialize};

/// Which video of the current level is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaVariant {
    #[default]
    Verification,
    Showcase,
}

impl MediaVariant {
    pub fn toggled(self) -> Self {
        match self {
            MediaVariant::Verification => MediaVariant::Showcase,
            MediaVariant::Showcase => MediaVariant::Verification,
        }
    }
}

/// Current pack, level and media of a page.
///
/// `pack_index` is `None` on the flat list page and on the pack page before
/// its catalogue has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub pack_index: Option<usize>,
    pub level_index: usize,
    pub media: MediaVariant,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points at pack `index` and resets the level and media.
    ///
    /// # Panics
    ///
    /// Panics if `index >= pack_count`.
    pub fn select_pack(&mut self, index: usize, pack_count: usize) {
        assert!(
            index < pack_count,
            "pack index {} out of range for {} packs",
            index,
            pack_count
        );

        self.pack_index = Some(index);
        self.level_index = 0;
        self.media = MediaVariant::Verification;
    }

    /// Points at level `index` of the current collection.
    ///
    /// Media is left as is; a level without a showcase shows its
    /// verification regardless.
    ///
    /// # Panics
    ///
    /// Panics if `index >= level_count` on a non-empty collection. On an
    /// empty collection the index stays 0.
    pub fn select_level(&mut self, index: usize, level_count: usize) {
        assert!(
            level_in_range(index, level_count),
            "level index {} out of range for {} levels",
            index,
            level_count
        );
        self.level_index = index.min(level_count.saturating_sub(1));
    }

    /// Flips the media variant if the current level has a showcase.
    ///
    /// Returns whether anything changed.
    pub fn toggle_media(&mut self, has_showcase: bool) -> bool {
        if !has_showcase {
            return false;
        }
        self.media = self.media.toggled();
        true
    }

    /// A new collection replaced the current one.
    pub fn collection_reloaded(&mut self) {
        self.level_index = 0;
    }

    /// Keeps the level index inside a collection of `level_count` items.
    pub fn clamp(&mut self, level_count: usize) {
        if self.level_index >= level_count {
            self.level_index = level_count.saturating_sub(1);
        }
    }
}

/// Whether `select_level(index)` is allowed on a collection of `level_count`.
///
/// Any index is accepted on an empty collection, where it clamps to 0.
pub fn level_in_range(index: usize, level_count: usize) -> bool {
    level_count == 0 || index < level_count
}
