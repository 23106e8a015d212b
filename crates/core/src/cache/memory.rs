//! In-memory analysis cache.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use tracing::debug;

use super::{AnalysisCache, Fingerprint};
use crate::analysis::AnalysisResult;

#[derive(Default)]
struct CacheInner {
    entries: HashMap<Fingerprint, AnalysisResult>,
    /// Insertion order, only tracked when bounded.
    order: VecDeque<Fingerprint>,
}

/// Process-lifetime analysis cache.
///
/// Unbounded unless built with [`InMemoryAnalysisCache::bounded`], in which
/// case the oldest inserted fingerprint is evicted first.
#[derive(Default)]
pub struct InMemoryAnalysisCache {
    inner: RwLock<CacheInner>,
    max_entries: Option<usize>,
}

impl InMemoryAnalysisCache {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache holding at most `max_entries` analyses.
    pub fn bounded(max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(CacheInner::default()),
            max_entries: Some(max_entries.max(1)),
        }
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }
}

impl AnalysisCache for InMemoryAnalysisCache {
    fn get(&self, fingerprint: &Fingerprint) -> Option<AnalysisResult> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.entries.get(fingerprint).cloned()
    }

    fn set(&self, fingerprint: Fingerprint, result: AnalysisResult) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());

        let is_new = inner.entries.insert(fingerprint.clone(), result).is_none();

        if let Some(max) = self.max_entries {
            if is_new {
                inner.order.push_back(fingerprint);
            }
            while inner.entries.len() > max {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                debug!("Evicting cached analysis for model {}", oldest.model());
                inner.entries.remove(&oldest);
            }
        }
    }

    fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.entries.len()
    }
}
