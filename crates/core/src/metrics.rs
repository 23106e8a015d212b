//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Analysis (cache hits, generation outcomes, generation latency)
//! - Verse source (catalog and range fetches)
//! - History persistence

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Analysis Metrics
// =============================================================================

/// Analysis requests total by result.
pub static ANALYSIS_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mizan_analysis_requests_total", "Total analysis requests"),
        &["result"], // "cache_hit", "success", "failed", "rejected"
    )
    .unwrap()
});

/// Generation call duration in seconds.
pub static GENERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "mizan_generation_duration_seconds",
            "Duration of generation service calls",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]),
        &["model", "result"],
    )
    .unwrap()
});

/// Entries currently held by the analysis cache.
pub static CACHE_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("mizan_cache_entries", "Entries held by the analysis cache").unwrap()
});

// =============================================================================
// Verse Source Metrics
// =============================================================================

/// Verse source fetches by operation and result.
pub static VERSE_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mizan_verse_fetches_total", "Total verse source fetches"),
        &["operation", "result"], // operation: "catalog", "range"
    )
    .unwrap()
});

// =============================================================================
// History Metrics
// =============================================================================

/// History writes that failed to persist.
pub static HISTORY_PERSIST_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "mizan_history_persist_failures_total",
        "History writes that failed to persist",
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Analysis
        Box::new(ANALYSIS_REQUESTS.clone()),
        Box::new(GENERATION_DURATION.clone()),
        Box::new(CACHE_ENTRIES.clone()),
        // Verse source
        Box::new(VERSE_FETCHES.clone()),
        // History
        Box::new(HISTORY_PERSIST_FAILURES.clone()),
    ]
}
