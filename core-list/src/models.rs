//! Domain models for the ranked list
//!
//! Shapes follow the JSON documents served by the resource store. Level ids
//! may be written as numbers or strings and are normalized to strings.

use crate::enjoyment::average_enjoyment;
use crate::loader::LoadResult;
use crate::selection::MediaVariant;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// ID Types
// =============================================================================

/// Stable identifier of a level, also the stem of its resource name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LevelId(String);

impl LevelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LevelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LevelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for LevelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => LevelId(text),
            RawId::Integer(n) => LevelId(n.to_string()),
        })
    }
}

// =============================================================================
// Levels & Records
// =============================================================================

/// Level metadata, without its records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub creators: Vec<String>,
    pub verifier: String,
    /// Video reference of the verification run
    #[serde(default)]
    pub verification: Option<String>,
    /// Optional showcase video reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showcase: Option<String>,
    /// Song download link for levels using a non-official song
    #[serde(rename = "NONG", default, skip_serializing_if = "Option::is_none")]
    pub nong: Option<String>,
}

impl Level {
    pub fn has_showcase(&self) -> bool {
        self.showcase.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Video reference for the given media variant.
    ///
    /// Falls back to the verification when no showcase is declared.
    pub fn video(&self, media: MediaVariant) -> Option<&str> {
        match media {
            MediaVariant::Showcase if self.has_showcase() => self.showcase.as_deref(),
            _ => self.verification.as_deref(),
        }
    }
}

/// A completion record submitted by a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub user: String,
    /// Proof video
    pub link: String,
    /// Self-reported enjoyment; only 0..=10 counts towards the average.
    /// Values that are not an `i32` integer read as absent.
    #[serde(default, deserialize_with = "lenient_enjoyment")]
    pub enjoyment: Option<i32>,
    /// `null` and non-boolean values read as `false`
    #[serde(default, deserialize_with = "lenient_flag")]
    pub mobile: bool,
}

fn lenient_enjoyment<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64().and_then(|n| i32::try_from(n).ok()))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

/// A level document as stored: metadata plus its records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDocument {
    #[serde(flatten)]
    pub level: Level,
    #[serde(default)]
    pub records: Vec<Record>,
}

/// A loaded level as presented on a page
#[derive(Debug, Clone, PartialEq)]
pub struct LevelEntry {
    pub level: Level,
    pub records: Vec<Record>,
    /// Packs whose catalogue declaration includes this level
    pub packs: Vec<PackTag>,
}

impl LevelEntry {
    pub fn new(level: Level, records: Vec<Record>) -> Self {
        Self {
            level,
            records,
            packs: Vec::new(),
        }
    }

    pub fn id(&self) -> &LevelId {
        &self.level.id
    }

    pub fn average_enjoyment(&self) -> Option<f64> {
        average_enjoyment(&self.records)
    }
}

impl From<LevelDocument> for LevelEntry {
    fn from(document: LevelDocument) -> Self {
        Self::new(document.level, document.records)
    }
}

// =============================================================================
// Ranked List
// =============================================================================

/// Ordered collection of level loads; position `i` is rank `i + 1`.
///
/// Failed loads keep their position so every later rank stays correct.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedList {
    entries: Vec<LoadResult<LevelEntry>>,
}

impl RankedList {
    pub fn new(entries: Vec<LoadResult<LevelEntry>>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LoadResult<LevelEntry>> {
        self.entries.get(index)
    }

    /// Loaded entry at `index`, `None` for failures and out-of-range indices
    pub fn level_at(&self, index: usize) -> Option<&LevelEntry> {
        self.get(index).and_then(LoadResult::as_loaded)
    }

    pub fn entries(&self) -> &[LoadResult<LevelEntry>] {
        &self.entries
    }

    /// Entries paired with their 1-based rank
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &LoadResult<LevelEntry>)> {
        self.entries.iter().enumerate().map(|(i, entry)| (i + 1, entry))
    }

    pub fn loaded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_loaded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.loaded_count()
    }

    /// One message per failed entry, in rank order
    pub fn error_messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(LoadResult::error_message)
            .collect()
    }

    pub fn position_of(&self, id: &LevelId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.as_loaded().is_some_and(|entry| entry.id() == id))
    }

    pub fn into_entries(self) -> Vec<LoadResult<LevelEntry>> {
        self.entries
    }
}

// =============================================================================
// Packs
// =============================================================================

/// A level reference inside a pack declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackLevelRef {
    /// Resolved through the level's own document
    Id(LevelId),
    /// Full level document embedded in the pack catalogue
    Inline(Box<LevelDocument>),
}

impl PackLevelRef {
    pub fn id(&self) -> &LevelId {
        match self {
            PackLevelRef::Id(id) => id,
            PackLevelRef::Inline(document) => &document.level.id,
        }
    }
}

/// Themed sub-grouping of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pack {
    /// Unique key of the pack
    pub name: String,
    /// CSS colour, usually `#rrggbb`
    pub colour: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub levels: Vec<PackLevelRef>,
}

impl Pack {
    pub fn declares(&self, id: &LevelId) -> bool {
        self.levels.iter().any(|level| level.id() == id)
    }

    pub fn tag(&self) -> PackTag {
        PackTag {
            name: self.name.clone(),
            colour: self.colour.clone(),
        }
    }

    pub fn text_colour(&self) -> TextColour {
        TextColour::for_background(&self.colour)
    }
}

/// Pack badge shown next to a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackTag {
    pub name: String,
    pub colour: String,
}

impl PackTag {
    pub fn text_colour(&self) -> TextColour {
        TextColour::for_background(&self.colour)
    }
}

/// Readable text colour on top of a pack colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColour {
    Black,
    White,
}

impl TextColour {
    /// Luminance threshold above which black text is used
    const LIGHT_THRESHOLD: f64 = 186.0;

    /// Picks black on light backgrounds and white otherwise.
    ///
    /// Accepts `#rgb` and `#rrggbb`; anything else is treated as dark.
    pub fn for_background(colour: &str) -> Self {
        match parse_hex_colour(colour) {
            Some((r, g, b)) => {
                let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
                if luminance > Self::LIGHT_THRESHOLD {
                    TextColour::Black
                } else {
                    TextColour::White
                }
            }
            None => TextColour::White,
        }
    }

    pub fn as_css(&self) -> &'static str {
        match self {
            TextColour::Black => "#000000",
            TextColour::White => "#ffffff",
        }
    }
}

fn parse_hex_colour(colour: &str) -> Option<(u8, u8, u8)> {
    let hex = colour.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

// =============================================================================
// Editors
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorRole {
    Owner,
    Admin,
    Helper,
    Dev,
    Trial,
}

impl EditorRole {
    /// Icon asset key for the role; theme variants are the renderer's concern
    pub fn icon_name(&self) -> &'static str {
        match self {
            EditorRole::Owner => "crown",
            EditorRole::Admin => "user-gear",
            EditorRole::Helper => "user-shield",
            EditorRole::Dev => "code",
            EditorRole::Trial => "user-lock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editor {
    pub name: String,
    pub role: EditorRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_record_tolerates_malformed_enjoyment() {
        let overflow = record(json!({ "user": "a", "link": "l", "enjoyment": 4000000000u64 }));
        assert_eq!(overflow.enjoyment, None);

        let fractional = record(json!({ "user": "a", "link": "l", "enjoyment": 7.5 }));
        assert_eq!(fractional.enjoyment, None);

        let text = record(json!({ "user": "a", "link": "l", "enjoyment": "8" }));
        assert_eq!(text.enjoyment, None);

        let out_of_range = record(json!({ "user": "a", "link": "l", "enjoyment": -3 }));
        assert_eq!(out_of_range.enjoyment, Some(-3));

        let missing = record(json!({ "user": "a", "link": "l" }));
        assert_eq!(missing.enjoyment, None);
    }

    #[test]
    fn test_record_mobile_flag() {
        let null = record(json!({ "user": "a", "link": "l", "enjoyment": 8, "mobile": null }));
        assert!(!null.mobile);
        assert_eq!(null.enjoyment, Some(8));

        let set = record(json!({ "user": "a", "link": "l", "mobile": true }));
        assert!(set.mobile);

        let missing = record(json!({ "user": "a", "link": "l" }));
        assert!(!missing.mobile);
    }

    #[test]
    fn test_malformed_record_keeps_level_document() {
        let document: LevelDocument = serde_json::from_value(json!({
            "id": 1,
            "name": "Level 1",
            "author": "author",
            "verifier": "verifier",
            "records": [
                { "user": "a", "link": "l", "enjoyment": 8 },
                { "user": "b", "link": "l", "enjoyment": 4000000000u64, "mobile": null }
            ]
        }))
        .unwrap();

        let entry = LevelEntry::from(document);
        assert_eq!(entry.records.len(), 2);
        assert_eq!(entry.average_enjoyment(), Some(8.0));
    }

    fn level_json(id: serde_json::Value) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Bloodbath",
            "author": "Riot",
            "creators": ["Riot", "Serponge"],
            "verifier": "Riot",
            "verification": "https://youtu.be/verify",
            "records": [
                { "user": "Zoink", "link": "https://youtu.be/a", "percent": 100, "enjoyment": 8 },
                { "user": "Trick", "link": "https://youtu.be/b", "mobile": true }
            ]
        })
    }

    #[test]
    fn test_level_id_accepts_numbers_and_strings() {
        let numeric: LevelDocument = serde_json::from_value(level_json(json!(10565740))).unwrap();
        assert_eq!(numeric.level.id.as_str(), "10565740");

        let text: LevelDocument = serde_json::from_value(level_json(json!("bloodbath"))).unwrap();
        assert_eq!(text.level.id, LevelId::from("bloodbath"));
    }

    #[test]
    fn test_level_document_fields() {
        let document: LevelDocument = serde_json::from_value(level_json(json!(1))).unwrap();

        assert_eq!(document.level.creators.len(), 2);
        assert!(document.level.showcase.is_none());
        assert!(document.level.nong.is_none());
        assert_eq!(document.records.len(), 2);
        assert_eq!(document.records[0].enjoyment, Some(8));
        assert!(!document.records[0].mobile);
        assert!(document.records[1].mobile);
        assert_eq!(document.records[1].enjoyment, None);
    }

    #[test]
    fn test_nong_field_name() {
        let mut value = level_json(json!(2));
        value["NONG"] = json!("https://songs.example/2.mp3");

        let document: LevelDocument = serde_json::from_value(value).unwrap();
        assert_eq!(
            document.level.nong.as_deref(),
            Some("https://songs.example/2.mp3")
        );
    }

    #[test]
    fn test_video_falls_back_to_verification() {
        let mut document: LevelDocument = serde_json::from_value(level_json(json!(3))).unwrap();
        assert_eq!(
            document.level.video(MediaVariant::Showcase),
            Some("https://youtu.be/verify")
        );

        document.level.showcase = Some("https://youtu.be/show".to_string());
        assert_eq!(
            document.level.video(MediaVariant::Showcase),
            Some("https://youtu.be/show")
        );
        assert_eq!(
            document.level.video(MediaVariant::Verification),
            Some("https://youtu.be/verify")
        );

        document.level.showcase = Some(String::new());
        assert!(!document.level.has_showcase());
    }

    #[test]
    fn test_pack_level_refs_mix_ids_and_documents() {
        let pack: Pack = serde_json::from_value(json!({
            "name": "Gauntlet",
            "colour": "#ff8800",
            "levels": [1, "2", level_json(json!(3))]
        }))
        .unwrap();

        let ids: Vec<&str> = pack.levels.iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(matches!(pack.levels[2], PackLevelRef::Inline(_)));
        assert!(pack.declares(&LevelId::from("2")));
        assert!(!pack.declares(&LevelId::from("4")));
    }

    #[test]
    fn test_text_colour() {
        assert_eq!(TextColour::for_background("#ffffff"), TextColour::Black);
        assert_eq!(TextColour::for_background("#ffe066"), TextColour::Black);
        assert_eq!(TextColour::for_background("#1b1b3a"), TextColour::White);
        assert_eq!(TextColour::for_background("#fff"), TextColour::Black);
        assert_eq!(TextColour::for_background("rebeccapurple"), TextColour::White);
        assert_eq!(TextColour::White.as_css(), "#ffffff");
    }

    #[test]
    fn test_editor_roles() {
        let editors: Vec<Editor> = serde_json::from_value(json!([
            { "name": "Ada", "role": "owner", "link": "https://example.com/ada" },
            { "name": "Bo", "role": "trial" }
        ]))
        .unwrap();

        assert_eq!(editors[0].role.icon_name(), "crown");
        assert_eq!(editors[1].role, EditorRole::Trial);
        assert_eq!(editors[1].role.icon_name(), "user-lock");
        assert!(editors[1].link.is_none());

        let unknown = serde_json::from_value::<Editor>(json!({ "name": "X", "role": "janitor" }));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_ranked_list_positions_and_messages() {
        let document: LevelDocument = serde_json::from_value(level_json(json!(9))).unwrap();
        let list = RankedList::new(vec![
            LoadResult::Loaded(LevelEntry::from(document)),
            LoadResult::Failed {
                resource: "57.json".to_string(),
            },
        ]);

        assert_eq!(list.len(), 2);
        assert_eq!(list.loaded_count(), 1);
        assert_eq!(list.failed_count(), 1);
        assert!(list.level_at(1).is_none());
        assert_eq!(list.position_of(&LevelId::from("9")), Some(0));
        assert_eq!(
            list.error_messages(),
            vec!["Failed to load level. (57.json)".to_string()]
        );

        let ranks: Vec<usize> = list.ranked().map(|(rank, _)| rank).collect();
        assert_eq!(ranks, vec![1, 2]);
    }
}
