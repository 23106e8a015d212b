//! Analysis orchestrator - cache-first generation with history recording.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::prompt::{build_generation_request, parse_analysis_response};
use super::types::{AnalysisOutcome, AnalysisRequest, ModelId};
use super::AnalysisError;
use crate::cache::{AnalysisCache, Fingerprint};
use crate::generation::GenerationClient;
use crate::history::HistoryStore;
use crate::metrics::{ANALYSIS_REQUESTS, CACHE_ENTRIES, GENERATION_DURATION};

/// Tunables for the generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorOptions {
    /// Sampling temperature passed to the backend.
    pub temperature: f32,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self { temperature: 0.4 }
    }
}

/// Whether an analysis is currently running or queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    Idle,
    Requesting,
}

/// Coordinates cache, generation backend and history for one analysis at a time.
pub struct AnalysisOrchestrator {
    client: Arc<dyn GenerationClient>,
    cache: Arc<dyn AnalysisCache>,
    history: Arc<HistoryStore>,
    options: OrchestratorOptions,
    // Calls queue here behind the in-flight one
    gate: Mutex<()>,
    in_flight: AtomicUsize,
}

/// Decrements the in-flight counter however `analyze` exits.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AnalysisOrchestrator {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        cache: Arc<dyn AnalysisCache>,
        history: Arc<HistoryStore>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            client,
            cache,
            history,
            options,
            gate: Mutex::new(()),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> OrchestratorState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            OrchestratorState::Requesting
        } else {
            OrchestratorState::Idle
        }
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn cache(&self) -> &Arc<dyn AnalysisCache> {
        &self.cache
    }

    pub fn options(&self) -> OrchestratorOptions {
        self.options
    }

    /// Analyze `text` with `model`, serving repeats from the cache.
    ///
    /// Empty input is rejected before anything is touched. On failure
    /// nothing is cached or recorded in history.
    pub async fn analyze(&self, text: &str, model: ModelId) -> Result<AnalysisOutcome, AnalysisError> {
        let request = match AnalysisRequest::new(text, model) {
            Ok(request) => request,
            Err(e) => {
                ANALYSIS_REQUESTS.with_label_values(&["rejected"]).inc();
                return Err(e);
            }
        };

        let _in_flight = InFlight::enter(&self.in_flight);
        let _gate = self.gate.lock().await;

        let fingerprint = Fingerprint::from(&request);
        if let Some(result) = self.cache.get(&fingerprint) {
            info!("Analysis cache hit: model={}, chars={}", model, request.text().chars().count());
            ANALYSIS_REQUESTS.with_label_values(&["cache_hit"]).inc();
            return Ok(AnalysisOutcome {
                result,
                from_cache: true,
            });
        }

        let generation_request = build_generation_request(&request, self.options.temperature);

        debug!(
            "Requesting analysis from {}: model={}, chars={}",
            self.client.provider(),
            model,
            request.text().chars().count()
        );

        let started = Instant::now();
        let raw = self.client.generate(&generation_request).await;
        let elapsed = started.elapsed().as_secs_f64();

        let parsed = raw
            .map_err(AnalysisError::from)
            .and_then(|raw| parse_analysis_response(request.text(), &raw));

        let result = match parsed {
            Ok(result) => {
                GENERATION_DURATION
                    .with_label_values(&[model.as_str(), "success"])
                    .observe(elapsed);
                result
            }
            Err(e) => {
                GENERATION_DURATION
                    .with_label_values(&[model.as_str(), "failed"])
                    .observe(elapsed);
                ANALYSIS_REQUESTS.with_label_values(&["failed"]).inc();
                warn!("Analysis failed after {:.2}s: {}", elapsed, e);
                return Err(e);
            }
        };

        if !result.has_consistent_dominant_theme() {
            warn!(
                "Dominant theme '{}' does not match heaviest theme {:?}",
                result.dominant_theme,
                result.computed_dominant_theme().map(|t| t.theme.as_str())
            );
        }

        self.cache.set(fingerprint, result.clone());
        CACHE_ENTRIES.set(self.cache.len() as i64);

        let item = self.history.append(result.clone());
        info!(
            "Analysis complete in {:.2}s: model={}, history_id={}",
            elapsed, model, item.id
        );
        ANALYSIS_REQUESTS.with_label_values(&["success"]).inc();

        Ok(AnalysisOutcome {
            result,
            from_cache: false,
        })
    }
}
