//! Mock verse source for testing.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::verse_source::{Collection, CollectionInfo, VerseSource, VerseSourceError};

/// A recorded verse source query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedVerseQuery {
    FetchCatalog,
    FetchCollection { index: u32 },
}

/// Mock implementation of the VerseSource trait.
///
/// The catalog is derived from the added collections.
#[derive(Debug)]
pub struct MockVerseSource {
    /// Collections by index.
    collections: Arc<RwLock<BTreeMap<u32, Collection>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedVerseQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<VerseSourceError>>>,
}

impl Default for MockVerseSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVerseSource {
    /// Create a new empty mock verse source.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(BTreeMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a collection.
    pub async fn add_collection(&self, collection: Collection) {
        self.collections
            .write()
            .await
            .insert(collection.index, collection);
    }

    /// Make the next operation fail.
    pub async fn set_next_error(&self, error: VerseSourceError) {
        *self.next_error.write().await = Some(error);
    }

    /// All recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedVerseQuery> {
        self.queries.read().await.clone()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    async fn take_error(&self) -> Option<VerseSourceError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl VerseSource for MockVerseSource {
    async fn fetch_catalog(&self) -> Result<Vec<CollectionInfo>, VerseSourceError> {
        self.queries.write().await.push(RecordedVerseQuery::FetchCatalog);

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        Ok(self
            .collections
            .read()
            .await
            .values()
            .map(|c| CollectionInfo {
                index: c.index,
                name: c.name.clone(),
                english_name: None,
                english_name_translation: None,
                unit_count: c.units.len() as u32,
                revelation_type: None,
            })
            .collect())
    }

    async fn fetch_collection(&self, index: u32) -> Result<Collection, VerseSourceError> {
        self.queries
            .write()
            .await
            .push(RecordedVerseQuery::FetchCollection { index });

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        self.collections
            .read()
            .await
            .get(&index)
            .cloned()
            .ok_or_else(|| VerseSourceError::NotFound(format!("Collection {}", index)))
    }
}
