//! The watched list, mirrored write-through into a storage slot

use std::sync::Arc;
use anyhow::{Context, Result};

use super::content::{WatchedItem, WatchedSummary};
use super::storage::Storage;

pub struct WatchedStore {
    storage: Arc<dyn Storage>,
    slot: String,
    items: Vec<WatchedItem>,
}

impl WatchedStore {
    /// Load the list from `slot`. A missing or unreadable slot yields an empty list.
    pub fn open(storage: Arc<dyn Storage>, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let items = match storage.read(&slot) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<WatchedItem>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(slot = %slot, error = %e, "Stored watched list is unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(slot = %slot, error = %e, "Could not read watched list, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(slot = %slot, count = items.len(), "Watched list loaded");
        Self { storage, slot, items }
    }

    /// Append and persist. Returns `Ok(false)` (and writes nothing) when the
    /// movie is already in the list.
    ///
    /// The in-memory list keeps the item even if the write fails; the next
    /// successful append persists it.
    pub fn push(&mut self, item: WatchedItem) -> Result<bool> {
        if self.contains(&item.id) {
            tracing::debug!(id = %item.id, "Movie already in watched list");
            return Ok(false);
        }
        tracing::info!(id = %item.id, title = %item.title, rating = item.user_rating, "Adding to watched list");
        self.items.push(item);
        self.save()?;
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string(&self.items)?;
        self.storage
            .write(&self.slot, &content)
            .with_context(|| format!("saving watched list to slot '{}'", self.slot))
    }

    pub fn items(&self) -> &[WatchedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&WatchedItem> {
        self.items.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_items(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::storage::{FileStorage, MemoryStorage};

    fn watched(id: &str, title: &str, rating: u8) -> WatchedItem {
        WatchedItem {
            id: id.to_string(),
            title: title.to_string(),
            year: "1985".to_string(),
            poster: "https://example.com/p.jpg".to_string(),
            runtime: 116,
            imdb_rating: 8.5,
            user_rating: rating,
            plot: "Marty travels back in time.".to_string(),
            actors: "Michael J. Fox, Christopher Lloyd".to_string(),
            director: "Robert Zemeckis".to_string(),
        }
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn read(&self, _slot: &str) -> Result<Option<String>> {
            Err(anyhow::anyhow!("disk on fire"))
        }
        fn write(&self, _slot: &str, _contents: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    #[test]
    fn absent_slot_starts_empty() {
        let store = WatchedStore::open(Arc::new(MemoryStorage::new()), "watched");
        assert!(store.is_empty());
    }

    #[test]
    fn unparseable_slot_starts_empty() {
        let storage = Arc::new(MemoryStorage::with_slot("watched", "{not json"));
        let store = WatchedStore::open(storage, "watched");
        assert!(store.is_empty());
    }

    #[test]
    fn read_failure_starts_empty() {
        let store = WatchedStore::open(Arc::new(FailingStorage), "watched");
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn push_writes_through_and_reopen_reproduces_order() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = WatchedStore::open(storage.clone(), "watched");
        assert!(store.push(watched("tt0088763", "Back to the Future", 9)).unwrap());
        assert!(store.push(watched("tt1375666", "Inception", 10)).unwrap());

        let raw = storage.read("watched").unwrap().expect("slot written");
        assert!(raw.contains("\"imdbID\":\"tt0088763\""));

        let reopened = WatchedStore::open(storage, "watched");
        assert_eq!(reopened.items(), store.items());
        assert_eq!(reopened.items()[0].id, "tt0088763");
        assert_eq!(reopened.items()[1].id, "tt1375666");
    }

    #[test]
    fn reopen_from_file_storage() {
        let tmp = tempfile::tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(tmp.path()));
        let mut store = WatchedStore::open(storage.clone(), "watched");
        store.push(watched("tt1", "One", 3)).unwrap();
        store.push(watched("tt2", "Two", 0)).unwrap();

        let reopened = WatchedStore::open(Arc::new(FileStorage::new(tmp.path())), "watched");
        assert_eq!(reopened.items(), store.items());
    }

    #[test]
    fn duplicate_push_is_rejected_without_write() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = WatchedStore::open(storage.clone(), "watched");
        store.push(watched("tt1", "One", 5)).unwrap();
        let before = storage.read("watched").unwrap();

        assert!(!store.push(watched("tt1", "One again", 1)).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.find("tt1").map(|m| m.user_rating), Some(5));
        assert_eq!(storage.read("watched").unwrap(), before);
    }

    #[test]
    fn failed_write_is_reported_but_item_kept() {
        let mut store = WatchedStore::open(Arc::new(FailingStorage), "watched");
        let err = store.push(watched("tt1", "One", 5)).unwrap_err();
        assert!(format!("{:#}", err).contains("disk on fire"));
        assert!(store.contains("tt1"));
    }

    #[test]
    fn serialization_round_trip_is_identity() {
        let items = vec![watched("tt3", "C", 1), watched("tt1", "A", 10), watched("tt2", "B", 7)];
        let json = serde_json::to_string(&items).unwrap();
        let back: Vec<WatchedItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn reads_stored_list_with_camel_case_fields() {
        let raw = r#"[{"imdbID":"tt1375666","title":"Inception","year":"2010","poster":"p","imdbRating":8.8,"runtime":148,"userRating":10,"plot":"x","actors":"y","director":"z"}]"#;
        let store = WatchedStore::open(Arc::new(MemoryStorage::with_slot("watched", raw)), "watched");
        assert_eq!(store.len(), 1);
        let summary = store.summary();
        assert_eq!(summary.count, 1);
        assert!((summary.avg_runtime - 148.0).abs() < 1e-6);
    }
}
