//! # Demon List Content Module
//!
//! Turns the flat JSON documents of a demon list into ranked, scored and
//! navigable collections.
//!
//! ## Overview
//!
//! This module manages:
//! - Level, record, pack and editor models
//! - Rank-based scoring and enjoyment averages
//! - Concurrent loading that isolates per-level failures
//! - The ranked list and pack repository
//! - Observable page sessions with selection and media toggling

pub mod content;
pub mod enjoyment;
pub mod error;
pub mod loader;
pub mod models;
pub mod repository;
pub mod scoring;
pub mod selection;
pub mod session;

pub use content::{ContentSource, JsonContentSource};
pub use enjoyment::{average_enjoyment, format_enjoyment};
pub use error::{ListError, Result};
pub use loader::{LoadResult, ResilientLoader};
pub use models::{
    Editor, EditorRole, Level, LevelDocument, LevelEntry, LevelId, Pack, PackLevelRef, PackTag,
    RankedList, Record, TextColour,
};
pub use repository::ListRepository;
pub use scoring::{score, score_with_cutoff, ScoreCurve, DEFAULT_LEGACY_CUTOFF};
pub use selection::{MediaVariant, SelectionState};
pub use session::{
    ListSession, ListSnapshot, PackSession, PackSnapshot, PagePhase, EDITORS_UNAVAILABLE_MESSAGE,
    LIST_UNAVAILABLE_MESSAGE, PACKS_UNAVAILABLE_MESSAGE,
};
