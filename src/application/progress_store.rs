// src/application/progress_store.rs
use crate::constants::PROGRESS_STORAGE_KEY;
use crate::domain::{ProgressRecord, ProgressTable, StoreError};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

/// Durable string key-value backend.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Stored table before per-language decoding
type RawTable = Map<String, Value>;

/// Per-language study progress, kept as one JSON table under a single key.
///
/// Persistence is best effort: backend and decoding failures are logged and
/// degrade to "no progress" or "save skipped", never to an error. Entries are
/// decoded one by one, so a malformed record only hides its own language and
/// is carried through writes untouched.
pub struct ProgressStore<S: KeyValueStore> {
    backend: S,
}

fn decode_record(language_code: &str, value: &Value) -> Option<ProgressRecord> {
    match ProgressRecord::deserialize(value) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(language_code, "Ignoring malformed progress record: {}", e);
            None
        }
    }
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Missing blob reads as an empty table.
    fn read_table(&self) -> Result<RawTable> {
        let raw = self
            .backend
            .get(PROGRESS_STORAGE_KEY)
            .context("Failed to read progress store")?;
        match raw {
            None => Ok(RawTable::new()),
            Some(json) => {
                serde_json::from_str(&json).context("Stored progress is not a JSON object")
            }
        }
    }

    fn write_table(&mut self, table: &RawTable) -> Result<()> {
        let json = serde_json::to_string(table).context("Failed to serialize progress")?;
        self.backend
            .set(PROGRESS_STORAGE_KEY, &json)
            .context("Failed to write progress store")?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, language_code: &str) -> Option<ProgressRecord> {
        match self.read_table() {
            Ok(table) => table
                .get(language_code)
                .and_then(|value| decode_record(language_code, value)),
            Err(e) => {
                warn!("Failed to load progress: {:#}", e);
                None
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn save(&mut self, language_code: &str, current_index: usize, card_order: &[u32]) {
        let mut table = self.read_table().unwrap_or_else(|e| {
            warn!("Discarding unreadable progress before save: {:#}", e);
            RawTable::new()
        });

        let record = ProgressRecord {
            current_index,
            card_order: card_order.to_vec(),
            last_visited: Utc::now(),
        };
        let value = match serde_json::to_value(&record) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to serialize progress: {}", e);
                return;
            }
        };
        table.insert(language_code.to_string(), value);

        if let Err(e) = self.write_table(&table) {
            warn!("Failed to save progress: {:#}", e);
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self, language_code: &str) {
        let mut table = match self.read_table() {
            Ok(table) => table,
            Err(e) => {
                warn!("Failed to reset progress: {:#}", e);
                return;
            }
        };

        if table.remove(language_code).is_none() {
            debug!("No progress to reset");
            return;
        }

        if let Err(e) = self.write_table(&table) {
            warn!("Failed to reset progress: {:#}", e);
        }
    }

    /// Every decodable record; malformed entries are skipped
    pub fn list_all(&self) -> ProgressTable {
        match self.read_table() {
            Ok(table) => table
                .iter()
                .filter_map(|(code, value)| decode_record(code, value).map(|r| (code.clone(), r)))
                .collect(),
            Err(e) => {
                warn!("Failed to list progress: {:#}", e);
                ProgressTable::new()
            }
        }
    }

    pub fn clear_all(&mut self) {
        if let Err(e) = self.backend.remove(PROGRESS_STORAGE_KEY) {
            warn!("Failed to clear all progress: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::MemoryStore;

    fn order() -> Vec<u32> {
        vec![2, 1, 3, 4, 5, 6, 7, 8, 9, 10]
    }

    #[test]
    fn given_saved_progress_when_loading_then_returns_same_position_and_order() {
        // Arrange
        let mut store = ProgressStore::new(MemoryStore::new());

        // Act
        store.save("es", 3, &order());
        let record = store.load("es").expect("progress should exist");

        // Assert
        assert_eq!(record.current_index, 3);
        assert_eq!(record.card_order, order());
    }

    #[test]
    fn given_save_when_loading_then_stamps_last_visited() {
        let before = Utc::now();
        let mut store = ProgressStore::new(MemoryStore::new());

        store.save("es", 0, &[1, 2]);
        let record = store.load("es").unwrap();

        assert!(record.last_visited >= before);
        assert!(record.last_visited <= Utc::now());
    }

    #[test]
    fn given_nothing_saved_when_loading_then_absent() {
        let store = ProgressStore::new(MemoryStore::new());

        assert!(store.load("es").is_none());
    }

    #[test]
    fn given_saved_progress_when_resetting_then_load_is_absent() {
        // Arrange
        let mut store = ProgressStore::new(MemoryStore::new());
        store.save("es", 3, &order());
        store.save("fr", 1, &[1, 2, 3]);

        // Act
        store.reset("es");

        // Assert
        assert!(store.load("es").is_none());
        assert_eq!(store.load("fr").map(|r| r.current_index), Some(1));
    }

    #[test]
    fn given_corrupt_blob_when_loading_then_absent() {
        let store = ProgressStore::new(
            MemoryStore::builder()
                .with_value(PROGRESS_STORAGE_KEY, "{not json")
                .build(),
        );

        assert!(store.load("es").is_none());
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn given_corrupt_blob_when_saving_then_replaces_with_fresh_table() {
        let mut store = ProgressStore::new(
            MemoryStore::builder()
                .with_value(PROGRESS_STORAGE_KEY, "[1, 2, 3]")
                .build(),
        );

        store.save("es", 2, &[3, 1, 2]);

        let table = store.list_all();
        assert_eq!(table.len(), 1);
        assert_eq!(table["es"].card_order, vec![3, 1, 2]);
    }

    #[test]
    fn given_corrupt_blob_when_resetting_then_leaves_blob_untouched() {
        let mut store = ProgressStore::new(
            MemoryStore::builder()
                .with_value(PROGRESS_STORAGE_KEY, "{not json")
                .build(),
        );

        store.reset("es");

        assert_eq!(
            store.backend().raw(PROGRESS_STORAGE_KEY).as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn given_unreadable_backend_when_loading_then_absent() {
        let store = ProgressStore::new(MemoryStore::builder().failing_reads().build());

        assert!(store.load("es").is_none());
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn given_unwritable_backend_when_saving_then_swallows_failure() {
        let mut store = ProgressStore::new(MemoryStore::builder().failing_writes().build());

        store.save("es", 1, &[1, 2]);
        store.reset("es");
        store.clear_all();

        assert!(store.load("es").is_none());
    }

    #[test]
    fn given_several_languages_when_listing_all_then_returns_every_record() {
        let mut store = ProgressStore::new(MemoryStore::new());
        store.save("es", 1, &[2, 1]);
        store.save("haw", 0, &[1, 2, 3]);

        let table = store.list_all();

        assert_eq!(table.keys().cloned().collect::<Vec<_>>(), vec!["es", "haw"]);
    }

    #[test]
    fn given_saved_progress_when_clearing_all_then_table_is_empty() {
        let mut store = ProgressStore::new(MemoryStore::new());
        store.save("es", 1, &[2, 1]);
        store.save("haw", 0, &[1, 2, 3]);

        store.clear_all();

        assert!(store.list_all().is_empty());
        assert!(store.backend().raw(PROGRESS_STORAGE_KEY).is_none());
    }

    #[test]
    fn given_save_when_inspecting_blob_then_uses_wire_field_names() {
        let mut store = ProgressStore::new(MemoryStore::new());

        store.save("es", 4, &[5, 1, 2, 3, 4]);

        let raw = store.backend().raw(PROGRESS_STORAGE_KEY).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["es"]["currentIndex"], 4);
        assert_eq!(json["es"]["cardOrder"], serde_json::json!([5, 1, 2, 3, 4]));
        assert!(json["es"]["lastVisited"].is_string());
    }

    const MIXED_BLOB: &str = r#"{
        "es": { "currentIndex": 2, "cardOrder": [3, 1, 2], "lastVisited": "2026-01-15T10:20:30.000Z" },
        "fr": { "currentIndex": -1, "cardOrder": [1, 2], "lastVisited": "2026-01-15T10:20:30Z" }
    }"#;

    #[test]
    fn given_one_malformed_record_when_loading_then_only_that_language_is_absent() {
        // Arrange
        let store = ProgressStore::new(
            MemoryStore::builder()
                .with_value(PROGRESS_STORAGE_KEY, MIXED_BLOB)
                .build(),
        );

        // Act
        let es = store.load("es");
        let fr = store.load("fr");

        // Assert
        assert_eq!(es.map(|r| r.card_order), Some(vec![3, 1, 2]));
        assert!(fr.is_none());
        assert_eq!(store.list_all().keys().cloned().collect::<Vec<_>>(), vec!["es"]);
    }

    #[test]
    fn given_one_malformed_record_when_saving_other_language_then_keeps_every_entry() {
        // Arrange
        let mut store = ProgressStore::new(
            MemoryStore::builder()
                .with_value(PROGRESS_STORAGE_KEY, MIXED_BLOB)
                .build(),
        );

        // Act
        store.save("de", 1, &[2, 1]);

        // Assert
        let raw = store.backend().raw(PROGRESS_STORAGE_KEY).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["es"]["cardOrder"], serde_json::json!([3, 1, 2]));
        assert_eq!(json["fr"]["currentIndex"], -1);
        assert_eq!(store.load("es").map(|r| r.current_index), Some(2));
        assert_eq!(store.load("de").map(|r| r.current_index), Some(1));
    }

    #[test]
    fn given_one_malformed_record_when_resetting_other_language_then_keeps_it() {
        let mut store = ProgressStore::new(
            MemoryStore::builder()
                .with_value(PROGRESS_STORAGE_KEY, MIXED_BLOB)
                .build(),
        );

        store.reset("es");

        let raw = store.backend().raw(PROGRESS_STORAGE_KEY).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json.get("es").is_none());
        assert!(json.get("fr").is_some());
    }

    #[test]
    fn given_timestamp_without_offset_when_loading_then_reads_record() {
        let store = ProgressStore::new(
            MemoryStore::builder()
                .with_value(
                    PROGRESS_STORAGE_KEY,
                    r#"{"haw":{"currentIndex":1,"cardOrder":[2,1],"lastVisited":"2026-01-15T10:20:30"}}"#,
                )
                .build(),
        );

        let record = store.load("haw").expect("record should decode");

        assert_eq!(record.last_visited.to_rfc3339(), "2026-01-15T10:20:30+00:00");
    }
}
