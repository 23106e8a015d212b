//! History store backed by a named blob.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::types::{restore, HistoryItem, RestoredAnalysis};
use super::HISTORY_CAPACITY;
use crate::analysis::AnalysisResult;
use crate::metrics;
use crate::storage::BlobStore;

/// Owns the ordered history log and its persisted copy.
pub struct HistoryStore {
    blobs: Arc<dyn BlobStore>,
    key: String,
    items: RwLock<Vec<HistoryItem>>,
}

impl HistoryStore {
    /// Open the store, loading whatever valid log is persisted under `key`.
    pub fn open(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = Self::read_persisted(blobs.as_ref(), &key);
        debug!("Loaded {} history items from blob '{}'", items.len(), key);
        Self {
            blobs,
            key,
            items: RwLock::new(items),
        }
    }

    fn read_persisted(blobs: &dyn BlobStore, key: &str) -> Vec<HistoryItem> {
        let raw = match blobs.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read history blob '{}': {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryItem>>(&raw) {
            Ok(mut items) => {
                items.truncate(HISTORY_CAPACITY);
                items
            }
            Err(e) => {
                warn!("Ignoring corrupt history blob '{}': {}", key, e);
                Vec::new()
            }
        }
    }

    /// Snapshot of the log, most recent first.
    pub fn load(&self) -> Vec<HistoryItem> {
        self.items.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Find an entry by id.
    pub fn get(&self, id: &str) -> Option<HistoryItem> {
        self.items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }

    /// Project an entry back into the current result. See [`restore`].
    pub fn restore(&self, item: &HistoryItem) -> RestoredAnalysis {
        restore(item)
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a result at the head, evict past capacity, persist.
    pub fn append(&self, result: AnalysisResult) -> HistoryItem {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());

        let timestamp = Utc::now().timestamp_millis();
        let item = HistoryItem {
            id: unique_id(timestamp, &items),
            timestamp,
            result,
        };

        items.insert(0, item.clone());
        items.truncate(HISTORY_CAPACITY);

        self.persist(&items);
        info!("Appended history item {} ({} stored)", item.id, items.len());

        item
    }

    /// Drop every entry, in memory and persisted.
    pub fn clear(&self) {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.clear();
        if let Err(e) = self.blobs.remove(&self.key) {
            metrics::HISTORY_PERSIST_FAILURES.inc();
            warn!("Failed to remove history blob '{}': {}", self.key, e);
        }
    }

    fn persist(&self, items: &[HistoryItem]) {
        let result = serde_json::to_string(items)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.blobs
                    .write(&self.key, &json)
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = result {
            metrics::HISTORY_PERSIST_FAILURES.inc();
            warn!("Failed to persist history blob '{}': {}", self.key, e);
        }
    }
}

/// Millisecond timestamp as id, suffixed when it would collide.
fn unique_id(timestamp: i64, existing: &[HistoryItem]) -> String {
    let base = timestamp.to_string();
    let taken = |candidate: &str| existing.iter().any(|item| item.id == candidate);

    if !taken(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}
