//! List and pack repository
//!
//! Assembles ranked collections out of the individual level documents of a
//! [`ContentSource`]. Only catalogue-level failures are returned as errors;
//! a level that fails to load becomes a placeholder at its own position.

use crate::content::ContentSource;
use crate::error::{ListError, Result};
use crate::loader::{LoadResult, ResilientLoader};
use crate::models::{Editor, LevelEntry, LevelId, Pack, PackLevelRef, PackTag, RankedList};
use core_async::sync::RwLock;
use core_runtime::events::{CatalogueKind, ContentEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Read side of the list content.
///
/// The pack catalogue is cached for the lifetime of the repository and
/// replaced wholesale by [`reload_pack_catalogue`](Self::reload_pack_catalogue).
/// Level collections are fetched fresh on every call.
pub struct ListRepository {
    source: Arc<dyn ContentSource>,
    loader: ResilientLoader,
    events: EventBus,
    packs: RwLock<Option<Arc<Vec<Pack>>>>,
}

impl ListRepository {
    pub fn new(source: Arc<dyn ContentSource>, events: EventBus) -> Self {
        Self {
            source,
            loader: ResilientLoader::with_events(events.clone()),
            events,
            packs: RwLock::new(None),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// The ranked list, one entry per id in the list index, in index order.
    ///
    /// Entries are tagged with the packs that declare them when the pack
    /// catalogue is available; without it the tags are simply empty.
    ///
    /// # Errors
    ///
    /// `ListError::CatalogueUnavailable` if the index itself cannot be
    /// fetched or decoded.
    #[instrument(skip(self))]
    pub async fn ranked_list(&self) -> Result<RankedList> {
        let resource = self.source.level_index_resource();
        let ids = self
            .source
            .fetch_level_index()
            .await
            .map_err(|e| self.catalogue_unavailable(CatalogueKind::List, resource, e))?;

        let refs = ids.into_iter().map(PackLevelRef::Id).collect();
        let (entries, packs) = futures::join!(self.load_levels(refs), self.pack_catalogue());

        let entries = match packs {
            Ok(packs) => tag_with_packs(entries, &packs),
            Err(e) => {
                debug!(error = %e, "Ranked list loaded without pack tags");
                entries
            }
        };

        let list = RankedList::new(entries);
        self.catalogue_loaded(CatalogueKind::List, &list);
        Ok(list)
    }

    /// The pack catalogue, fetched on first use and cached afterwards.
    pub async fn pack_catalogue(&self) -> Result<Arc<Vec<Pack>>> {
        if let Some(packs) = self.packs.read().await.as_ref() {
            return Ok(Arc::clone(packs));
        }

        self.reload_pack_catalogue().await
    }

    /// Fetches the pack catalogue again and replaces the cached one.
    ///
    /// On failure the previously cached catalogue is kept.
    #[instrument(skip(self))]
    pub async fn reload_pack_catalogue(&self) -> Result<Arc<Vec<Pack>>> {
        let resource = self.source.pack_catalogue_resource();
        let packs = self
            .source
            .fetch_pack_catalogue()
            .await
            .map_err(|e| self.catalogue_unavailable(CatalogueKind::Packs, resource, e))?;

        let packs = Arc::new(packs);
        *self.packs.write().await = Some(Arc::clone(&packs));

        info!(packs = packs.len(), "Pack catalogue loaded");
        self.emit(ContentEvent::CatalogueLoaded {
            catalogue: CatalogueKind::Packs,
            item_count: packs.len(),
            failed_count: 0,
        });
        Ok(packs)
    }

    /// Levels of the pack named `name`, in declaration order.
    ///
    /// Never cached: every call fetches the level documents again.
    ///
    /// # Errors
    ///
    /// - `ListError::PackNotFound` if the catalogue has no such pack
    /// - `ListError::CatalogueUnavailable` if the catalogue cannot be loaded
    #[instrument(skip(self))]
    pub async fn pack_levels(&self, name: &str) -> Result<RankedList> {
        let packs = self.pack_catalogue().await?;
        let pack = packs
            .iter()
            .find(|pack| pack.name == name)
            .ok_or_else(|| ListError::PackNotFound {
                name: name.to_string(),
            })?;

        let entries = self.load_levels(pack.levels.clone()).await;
        let list = RankedList::new(tag_with_packs(entries, &packs));

        self.catalogue_loaded(CatalogueKind::PackLevels, &list);
        Ok(list)
    }

    /// The list editors roster.
    pub async fn editors(&self) -> Result<Vec<Editor>> {
        let resource = self.source.editors_resource();
        let editors = self
            .source
            .fetch_editors()
            .await
            .map_err(|e| self.catalogue_unavailable(CatalogueKind::Editors, resource, e))?;

        debug!(editors = editors.len(), "Editors loaded");
        Ok(editors)
    }

    /// Resolves level references concurrently. Inline documents need no fetch.
    async fn load_levels(&self, refs: Vec<PackLevelRef>) -> Vec<LoadResult<LevelEntry>> {
        let source = self.source.as_ref();
        let items = refs.into_iter().map(|level_ref| {
            let resource = source.level_resource(level_ref.id());
            (resource, level_ref)
        });

        self.loader
            .load_all(items, move |level_ref| async move {
                match level_ref {
                    PackLevelRef::Id(id) => source
                        .fetch_level_with_records(&id)
                        .await
                        .map(|(level, records)| LevelEntry::new(level, records)),
                    PackLevelRef::Inline(document) => Ok(LevelEntry::from(*document)),
                }
            })
            .await
    }

    fn catalogue_unavailable(
        &self,
        catalogue: CatalogueKind,
        resource: String,
        error: ListError,
    ) -> ListError {
        warn!(
            catalogue = catalogue.as_str(),
            resource = %resource,
            error = %error,
            "Catalogue unavailable"
        );

        let reason = error.to_string();
        self.emit(ContentEvent::CatalogueUnavailable {
            catalogue,
            resource: resource.clone(),
            message: reason.clone(),
        });
        ListError::CatalogueUnavailable { resource, reason }
    }

    fn catalogue_loaded(&self, catalogue: CatalogueKind, list: &RankedList) {
        info!(
            catalogue = catalogue.as_str(),
            levels = list.len(),
            failed = list.failed_count(),
            "Levels loaded"
        );
        self.emit(ContentEvent::CatalogueLoaded {
            catalogue,
            item_count: list.len(),
            failed_count: list.failed_count(),
        });
    }

    fn emit(&self, event: ContentEvent) {
        self.events.emit(CoreEvent::Content(event)).ok();
    }
}

/// Attaches the tags of every pack declaring each loaded level.
fn tag_with_packs(
    entries: Vec<LoadResult<LevelEntry>>,
    packs: &[Pack],
) -> Vec<LoadResult<LevelEntry>> {
    entries
        .into_iter()
        .map(|entry| {
            entry.map(|mut level| {
                level.packs = packs_declaring(packs, level.id());
                level
            })
        })
        .collect()
}

fn packs_declaring(packs: &[Pack], id: &LevelId) -> Vec<PackTag> {
    packs
        .iter()
        .filter(|pack| pack.declares(id))
        .map(Pack::tag)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::JsonContentSource;
    use crate::models::{Level, Record};
    use async_trait::async_trait;
    use bridge_traits::{BridgeError, MemoryResourceStore};
    use mockall::mock;
    use serde_json::json;

    mock! {
        pub Source {}

        #[async_trait]
        impl ContentSource for Source {
            async fn fetch_level_index(&self) -> Result<Vec<LevelId>>;
            async fn fetch_level(&self, id: &LevelId) -> Result<Level>;
            async fn fetch_records(&self, id: &LevelId) -> Result<Vec<Record>>;
            async fn fetch_pack_catalogue(&self) -> Result<Vec<Pack>>;
            async fn fetch_editors(&self) -> Result<Vec<Editor>>;
        }
    }

    fn level(id: &str) -> Level {
        Level {
            id: LevelId::from(id),
            name: format!("Level {}", id),
            author: "author".to_string(),
            creators: Vec::new(),
            verifier: "verifier".to_string(),
            verification: Some(format!("https://youtu.be/{}", id)),
            showcase: None,
            nong: None,
        }
    }

    fn level_json(id: u32) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("Level {}", id),
            "author": "author",
            "verifier": "verifier",
            "verification": format!("https://youtu.be/{}", id),
            "records": []
        })
    }

    fn store_with_levels(ids: &[u32]) -> MemoryResourceStore {
        let store = MemoryResourceStore::new();
        store.insert_json("_list.json", &ids.to_vec()).unwrap();
        for id in ids {
            store
                .insert_json(format!("{}.json", id), &level_json(*id))
                .unwrap();
        }
        store
    }

    fn repository(store: MemoryResourceStore) -> ListRepository {
        ListRepository::new(
            Arc::new(JsonContentSource::new(Arc::new(store))),
            EventBus::new(64),
        )
    }

    #[core_async::test]
    async fn test_ranked_list_isolates_failures() {
        let store = store_with_levels(&[1, 2, 3, 4, 5, 6]);
        store.remove("3.json");
        store.insert("6.json", "{ truncated");

        let list = repository(store).ranked_list().await.unwrap();

        assert_eq!(list.len(), 6);
        assert_eq!(list.level_at(0).unwrap().level.name, "Level 1");
        assert!(list.level_at(2).is_none());
        assert!(list.level_at(5).is_none());
        assert_eq!(
            list.error_messages(),
            vec![
                "Failed to load level. (3.json)".to_string(),
                "Failed to load level. (6.json)".to_string(),
            ]
        );
    }

    #[core_async::test]
    async fn test_missing_index_is_catalogue_failure() {
        let err = repository(MemoryResourceStore::new())
            .ranked_list()
            .await
            .unwrap_err();

        assert!(
            matches!(err, ListError::CatalogueUnavailable { ref resource, .. } if resource == "_list.json")
        );
    }

    #[core_async::test]
    async fn test_empty_index_is_empty_list() {
        let store = MemoryResourceStore::new().with("_list.json", "[]");
        let list = repository(store).ranked_list().await.unwrap();

        assert!(list.is_empty());
        assert!(list.error_messages().is_empty());
    }

    #[core_async::test]
    async fn test_ranked_list_carries_pack_tags() {
        let store = store_with_levels(&[1, 2]);
        store
            .insert_json(
                "_packlist.json",
                &json!([
                    { "name": "Gauntlet", "colour": "#ff8800", "levels": [2] },
                    { "name": "Classic", "colour": "#1b1b3a", "levels": [1, 2] }
                ]),
            )
            .unwrap();

        let list = repository(store).ranked_list().await.unwrap();

        let tags = |i: usize| -> Vec<String> {
            list.level_at(i)
                .unwrap()
                .packs
                .iter()
                .map(|t| t.name.clone())
                .collect()
        };
        assert_eq!(tags(0), vec!["Classic".to_string()]);
        assert_eq!(tags(1), vec!["Gauntlet".to_string(), "Classic".to_string()]);
    }

    #[core_async::test]
    async fn test_pack_levels_follow_declaration_order() {
        let store = store_with_levels(&[1, 2, 3]);
        store
            .insert_json(
                "_packlist.json",
                &json!([
                    { "name": "Mixed", "colour": "#ffffff", "levels": [3, 99, level_json(42), 1] }
                ]),
            )
            .unwrap();

        let levels = repository(store).pack_levels("Mixed").await.unwrap();

        assert_eq!(levels.len(), 4);
        assert_eq!(levels.level_at(0).unwrap().id().as_str(), "3");
        assert_eq!(levels.get(1).unwrap().failed_resource(), Some("99.json"));
        assert_eq!(levels.level_at(2).unwrap().id().as_str(), "42");
        assert_eq!(levels.level_at(3).unwrap().id().as_str(), "1");
        assert_eq!(levels.level_at(3).unwrap().packs[0].name, "Mixed");
    }

    #[core_async::test]
    async fn test_unknown_pack() {
        let store = MemoryResourceStore::new().with("_packlist.json", "[]");
        let err = repository(store).pack_levels("Nope").await.unwrap_err();

        assert!(matches!(err, ListError::PackNotFound { name } if name == "Nope"));
    }

    #[core_async::test]
    async fn test_pack_catalogue_cached_until_reload() {
        let mut source = MockSource::new();
        let mut calls = 0;
        source.expect_fetch_pack_catalogue().times(2).returning(move || {
            calls += 1;
            Ok(vec![Pack {
                name: format!("Pack {}", calls),
                colour: "#000000".to_string(),
                image: None,
                levels: Vec::new(),
            }])
        });

        let repo = ListRepository::new(Arc::new(source), EventBus::new(8));

        let first = repo.pack_catalogue().await.unwrap();
        let cached = repo.pack_catalogue().await.unwrap();
        assert!(Arc::ptr_eq(&first, &cached));

        let reloaded = repo.reload_pack_catalogue().await.unwrap();
        assert_eq!(reloaded[0].name, "Pack 2");
        assert_eq!(repo.pack_catalogue().await.unwrap()[0].name, "Pack 2");
    }

    #[core_async::test]
    async fn test_pack_levels_refetched_every_call() {
        let mut source = MockSource::new();
        source.expect_fetch_pack_catalogue().times(1).returning(|| {
            Ok(vec![Pack {
                name: "Solo".to_string(),
                colour: "#000000".to_string(),
                image: None,
                levels: vec![PackLevelRef::Id(LevelId::from("5"))],
            }])
        });
        source
            .expect_fetch_level()
            .times(2)
            .returning(|id| Ok(level(id.as_str())));
        source
            .expect_fetch_records()
            .times(2)
            .returning(|_| Ok(Vec::new()));

        let repo = ListRepository::new(Arc::new(source), EventBus::new(8));

        assert_eq!(repo.pack_levels("Solo").await.unwrap().loaded_count(), 1);
        assert_eq!(repo.pack_levels("Solo").await.unwrap().loaded_count(), 1);
    }

    #[core_async::test]
    async fn test_records_failure_fails_only_that_level() {
        let mut source = MockSource::new();
        source
            .expect_fetch_level_index()
            .returning(|| Ok(vec![LevelId::from("1"), LevelId::from("2")]));
        source
            .expect_fetch_level()
            .returning(|id| Ok(level(id.as_str())));
        source.expect_fetch_records().returning(|id| {
            if id.as_str() == "2" {
                Err(BridgeError::OperationFailed("HTTP 503".to_string()).into())
            } else {
                Ok(Vec::new())
            }
        });
        source
            .expect_fetch_pack_catalogue()
            .returning(|| Err(BridgeError::NotFound("_packlist.json".to_string()).into()));

        let repo = ListRepository::new(Arc::new(source), EventBus::new(8));
        let list = repo.ranked_list().await.unwrap();

        assert_eq!(list.loaded_count(), 1);
        assert_eq!(list.get(1).unwrap().failed_resource(), Some("2.json"));
        assert!(list.level_at(0).unwrap().packs.is_empty());
    }

    #[core_async::test]
    async fn test_events_emitted() {
        let store = store_with_levels(&[1, 2]);
        store.remove("2.json");
        let repo = repository(store);
        let mut events = repo.events().subscribe();

        repo.ranked_list().await.unwrap();

        let mut received = Vec::new();
        while let Ok(event) = events.try_recv() {
            received.push(event);
        }

        assert!(received.contains(&CoreEvent::Content(ContentEvent::CatalogueLoaded {
            catalogue: CatalogueKind::List,
            item_count: 2,
            failed_count: 1,
        })));
        assert!(received.iter().any(|e| matches!(
            e,
            CoreEvent::Content(ContentEvent::ItemFailed { resource, .. }) if resource == "2.json"
        )));
        assert!(received.iter().any(|e| matches!(
            e,
            CoreEvent::Content(ContentEvent::CatalogueUnavailable {
                catalogue: CatalogueKind::Packs,
                ..
            })
        )));
    }

    #[core_async::test]
    async fn test_editors() {
        let store = MemoryResourceStore::new().with(
            "_editors.json",
            r#"[{"name": "Ada", "role": "owner"}, {"name": "Bo", "role": "helper"}]"#,
        );
        let editors = repository(store).editors().await.unwrap();
        assert_eq!(editors.len(), 2);

        let err = repository(MemoryResourceStore::new())
            .editors()
            .await
            .unwrap_err();
        assert!(err.is_catalogue_unavailable());
    }
}
