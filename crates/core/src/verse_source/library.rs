//! Listing and range policy over a [`VerseSource`].

use std::sync::Arc;

use tracing::{debug, warn};

use super::types::{CollectionInfo, Unit, VerseRangeQuery};
use super::{VerseSource, VerseSourceError};
use crate::metrics::VERSE_FETCHES;

/// Separator between annotated units in a fetched range.
const UNIT_SEPARATOR: &str = " ";

/// Verse access used by callers of the core.
#[derive(Clone)]
pub struct VerseLibrary {
    source: Arc<dyn VerseSource>,
}

impl VerseLibrary {
    pub fn new(source: Arc<dyn VerseSource>) -> Self {
        Self { source }
    }

    /// List collections. Any failure yields an empty list.
    pub async fn list_collections(&self) -> Vec<CollectionInfo> {
        match self.source.fetch_catalog().await {
            Ok(catalog) => {
                VERSE_FETCHES.with_label_values(&["catalog", "success"]).inc();
                catalog
            }
            Err(e) => {
                VERSE_FETCHES.with_label_values(&["catalog", "failed"]).inc();
                warn!("Collection listing unavailable, returning empty list: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch a range of units as one annotated string.
    ///
    /// The full collection is fetched and filtered here. Bounds past the
    /// end of the collection are tolerated; only matching units are kept.
    /// Transport failures propagate.
    pub async fn fetch_range(&self, query: &VerseRangeQuery) -> Result<String, VerseSourceError> {
        let collection = match self.source.fetch_collection(query.collection_index()).await {
            Ok(collection) => {
                VERSE_FETCHES.with_label_values(&["range", "success"]).inc();
                collection
            }
            Err(e) => {
                VERSE_FETCHES.with_label_values(&["range", "failed"]).inc();
                return Err(e);
            }
        };

        let mut units: Vec<&Unit> = collection
            .units
            .iter()
            .filter(|unit| query.contains(unit.ordinal))
            .collect();
        units.sort_by_key(|unit| unit.ordinal);

        if units.is_empty() {
            warn!(
                "No units of collection {} in range {}..={} ({} units available)",
                query.collection_index(),
                query.start_unit(),
                query.end_unit(),
                collection.units.len()
            );
        } else {
            debug!(
                "Fetched {} units of collection {}",
                units.len(),
                query.collection_index()
            );
        }

        Ok(units
            .iter()
            .map(|unit| unit.annotated())
            .collect::<Vec<_>>()
            .join(UNIT_SEPARATOR))
    }
}
