//! Content source abstraction
//!
//! [`ContentSource`] is the narrow async interface the repository reads
//! through. [`JsonContentSource`] implements it over any
//! [`ResourceStore`] using the flat JSON layout:
//!
//! | Resource         | Contents                                   |
//! |------------------|--------------------------------------------|
//! | `_list.json`     | ordered array of level ids                 |
//! | `<id>.json`      | level document with its `records` embedded |
//! | `_packlist.json` | array of pack declarations                 |
//! | `_editors.json`  | array of list editors                      |

use crate::error::{ListError, Result};
use crate::models::{Editor, Level, LevelDocument, LevelId, Pack, Record};
use async_trait::async_trait;
use bridge_traits::ResourceStore;
use core_runtime::config::ResourceLayout;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Async access to the list documents
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Ordered level ids of the ranked list
    async fn fetch_level_index(&self) -> Result<Vec<LevelId>>;

    async fn fetch_level(&self, id: &LevelId) -> Result<Level>;

    async fn fetch_records(&self, id: &LevelId) -> Result<Vec<Record>>;

    /// Level metadata and records together.
    ///
    /// The default runs both fetches concurrently and fails if either fails.
    async fn fetch_level_with_records(&self, id: &LevelId) -> Result<(Level, Vec<Record>)> {
        futures::try_join!(self.fetch_level(id), self.fetch_records(id))
    }

    async fn fetch_pack_catalogue(&self) -> Result<Vec<Pack>>;

    async fn fetch_editors(&self) -> Result<Vec<Editor>>;

    /// Resource name reported when the level `id` fails to load
    fn level_resource(&self, id: &LevelId) -> String {
        format!("{}.json", id)
    }

    /// Resource name of the ranked list index
    fn level_index_resource(&self) -> String {
        "_list.json".to_string()
    }

    /// Resource name of the pack catalogue
    fn pack_catalogue_resource(&self) -> String {
        "_packlist.json".to_string()
    }

    /// Resource name of the editor roster
    fn editors_resource(&self) -> String {
        "_editors.json".to_string()
    }
}

/// [`ContentSource`] decoding JSON documents from a [`ResourceStore`]
pub struct JsonContentSource {
    store: Arc<dyn ResourceStore>,
    layout: ResourceLayout,
}

impl JsonContentSource {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self::with_layout(store, ResourceLayout::default())
    }

    pub fn with_layout(store: Arc<dyn ResourceStore>, layout: ResourceLayout) -> Self {
        Self { store, layout }
    }

    pub fn layout(&self) -> &ResourceLayout {
        &self.layout
    }

    async fn fetch_json<T: DeserializeOwned>(&self, resource: &str) -> Result<T> {
        let body = self.store.fetch(resource).await?;
        debug!(resource, size = body.len(), "Decoding resource");
        serde_json::from_slice(&body).map_err(|e| ListError::decode(resource, e))
    }

    async fn fetch_document(&self, id: &LevelId) -> Result<LevelDocument> {
        self.fetch_json(&self.layout.level_resource(id.as_str()))
            .await
    }
}

#[async_trait]
impl ContentSource for JsonContentSource {
    #[instrument(skip(self), fields(store = %self.store.describe()))]
    async fn fetch_level_index(&self) -> Result<Vec<LevelId>> {
        self.fetch_json(&self.layout.list_index).await
    }

    async fn fetch_level(&self, id: &LevelId) -> Result<Level> {
        Ok(self.fetch_document(id).await?.level)
    }

    async fn fetch_records(&self, id: &LevelId) -> Result<Vec<Record>> {
        Ok(self.fetch_document(id).await?.records)
    }

    /// Records live inside the level document, so one read serves both.
    async fn fetch_level_with_records(&self, id: &LevelId) -> Result<(Level, Vec<Record>)> {
        let document = self.fetch_document(id).await?;
        Ok((document.level, document.records))
    }

    #[instrument(skip(self))]
    async fn fetch_pack_catalogue(&self) -> Result<Vec<Pack>> {
        self.fetch_json(&self.layout.pack_catalogue).await
    }

    #[instrument(skip(self))]
    async fn fetch_editors(&self) -> Result<Vec<Editor>> {
        self.fetch_json(&self.layout.editors).await
    }

    fn level_resource(&self, id: &LevelId) -> String {
        self.layout.level_resource(id.as_str())
    }

    fn level_index_resource(&self) -> String {
        self.layout.list_index.clone()
    }

    fn pack_catalogue_resource(&self) -> String {
        self.layout.pack_catalogue.clone()
    }

    fn editors_resource(&self) -> String {
        self.layout.editors.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{BridgeError, MemoryResourceStore};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn level(id: u32) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("Level {}", id),
            "author": "author",
            "creators": [],
            "verifier": "verifier",
            "verification": format!("https://youtu.be/{}", id),
            "records": [{ "user": "a", "link": "l", "enjoyment": 7 }]
        })
    }

    fn source(store: MemoryResourceStore) -> JsonContentSource {
        JsonContentSource::new(Arc::new(store))
    }

    #[core_async::test]
    async fn test_level_index_accepts_mixed_ids() {
        let store = MemoryResourceStore::new().with("_list.json", r#"[1, "2", 3]"#);
        let ids = source(store).fetch_level_index().await.unwrap();

        assert_eq!(ids, vec![LevelId::from("1"), LevelId::from("2"), LevelId::from("3")]);
    }

    #[core_async::test]
    async fn test_level_with_records() {
        let store = MemoryResourceStore::new();
        store.insert_json("7.json", &level(7)).unwrap();
        let source = source(store);

        let (level, records) = source
            .fetch_level_with_records(&LevelId::from("7"))
            .await
            .unwrap();
        assert_eq!(level.name, "Level 7");
        assert_eq!(records.len(), 1);

        let records = source.fetch_records(&LevelId::from("7")).await.unwrap();
        assert_eq!(records[0].enjoyment, Some(7));
    }

    #[core_async::test]
    async fn test_missing_level_is_bridge_not_found() {
        let err = source(MemoryResourceStore::new())
            .fetch_level(&LevelId::from("57"))
            .await
            .unwrap_err();

        assert!(matches!(err, ListError::Bridge(BridgeError::NotFound(name)) if name == "57.json"));
    }

    #[core_async::test]
    async fn test_malformed_document_is_decode_error() {
        let store = MemoryResourceStore::new()
            .with("8.json", r#"{"id": 8, "name": "no author"}"#)
            .with("_packlist.json", "not json");
        let source = source(store);

        let err = source.fetch_level(&LevelId::from("8")).await.unwrap_err();
        assert!(matches!(err, ListError::Decode { resource, .. } if resource == "8.json"));

        let err = source.fetch_pack_catalogue().await.unwrap_err();
        assert!(matches!(err, ListError::Decode { .. }));
    }

    #[core_async::test]
    async fn test_custom_layout() {
        let layout = ResourceLayout {
            list_index: "index.json".to_string(),
            level_suffix: ".level.json".to_string(),
            ..ResourceLayout::default()
        };
        let store = MemoryResourceStore::new().with("index.json", r#"["9"]"#);
        store.insert_json("9.level.json", &level(9)).unwrap();
        let source = JsonContentSource::with_layout(Arc::new(store), layout);

        assert_eq!(source.level_resource(&LevelId::from("9")), "9.level.json");
        assert_eq!(source.level_index_resource(), "index.json");
        assert_eq!(source.fetch_level_index().await.unwrap().len(), 1);
        assert!(source.fetch_level(&LevelId::from("9")).await.is_ok());
    }

    /// Source that only implements the split fetches, to exercise the
    /// default combined fetch.
    struct SplitSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentSource for SplitSource {
        async fn fetch_level_index(&self) -> Result<Vec<LevelId>> {
            Ok(Vec::new())
        }

        async fn fetch_level(&self, id: &LevelId) -> Result<Level> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let document: LevelDocument =
                serde_json::from_value(level(id.as_str().parse().unwrap_or(0))).unwrap();
            Ok(document.level)
        }

        async fn fetch_records(&self, id: &LevelId) -> Result<Vec<Record>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id.as_str() == "404" {
                return Err(BridgeError::NotFound(format!("{}.records.json", id)).into());
            }
            Ok(Vec::new())
        }

        async fn fetch_pack_catalogue(&self) -> Result<Vec<Pack>> {
            Ok(Vec::new())
        }

        async fn fetch_editors(&self) -> Result<Vec<Editor>> {
            Ok(Vec::new())
        }
    }

    #[core_async::test]
    async fn test_default_combined_fetch() {
        let source = SplitSource {
            calls: AtomicUsize::new(0),
        };

        let (level, records) = source
            .fetch_level_with_records(&LevelId::from("3"))
            .await
            .unwrap();
        assert_eq!(level.id, LevelId::from("3"));
        assert!(records.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        assert!(source
            .fetch_level_with_records(&LevelId::from("404"))
            .await
            .is_err());
        assert_eq!(source.level_resource(&LevelId::from("3")), "3.json");
    }
}
