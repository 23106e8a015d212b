//! Fingerprint cache - memoized analyses keyed by (model, trimmed text).
//!
//! Once a fingerprint is set, every later lookup for it is served locally
//! for the life of the process. Nothing here is persisted.

mod memory;

pub use memory::InMemoryAnalysisCache;

use serde::Serialize;

use crate::analysis::{AnalysisRequest, AnalysisResult, ModelId};

/// Cache key: model identifier plus trimmed text.
///
/// Only leading/trailing whitespace is normalized; any other difference
/// is a different fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint {
    model: ModelId,
    text: String,
}

impl Fingerprint {
    pub fn new(model: ModelId, text: &str) -> Self {
        Self {
            model,
            text: text.trim().to_string(),
        }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<&AnalysisRequest> for Fingerprint {
    fn from(request: &AnalysisRequest) -> Self {
        Self::new(request.model(), request.text())
    }
}

/// Trait for analysis cache storage.
pub trait AnalysisCache: Send + Sync {
    /// Look up a completed analysis.
    fn get(&self, fingerprint: &Fingerprint) -> Option<AnalysisResult>;

    /// Store a completed analysis. Last write wins.
    fn set(&self, fingerprint: Fingerprint, result: AnalysisResult);

    /// Number of cached analyses.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
