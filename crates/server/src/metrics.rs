//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Mizan server:
//! - HTTP request metrics (latency, counts, errors)
//! - Analysis and history status (collected dynamically)

use mizan_core::OrchestratorState;
use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "mizan_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mizan_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "mizan_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Analysis Metrics (collected dynamically)
// =============================================================================

/// Whether an analysis is running or queued (1) or not (0).
pub static ANALYSIS_REQUESTING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "mizan_analysis_requesting",
        "Whether an analysis is running or queued (1) or idle (0)",
    )
    .unwrap()
});

/// History items currently retained.
pub static HISTORY_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("mizan_history_items", "Number of retained history items").unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Analysis
    registry
        .register(Box::new(ANALYSIS_REQUESTING.clone()))
        .unwrap();
    registry.register(Box::new(HISTORY_ITEMS.clone())).unwrap();

    // Core metrics (analysis, verse source, history persistence)
    for metric in mizan_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect the orchestrator and history
/// at scrape time.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let requesting = state.orchestrator().state() == OrchestratorState::Requesting;
    ANALYSIS_REQUESTING.set(if requesting { 1 } else { 0 });
    HISTORY_ITEMS.set(state.history().len() as i64);
    mizan_core::metrics::CACHE_ENTRIES.set(state.orchestrator().cache().len() as i64);
}

/// Collection indices and history ids ("1700000000000" or "1700000000000-1").
static NUMERIC_SEGMENT: Lazy<regex_lite::Regex> =
    Lazy::new(|| regex_lite::Regex::new(r"/\d[\d-]*(/|$)").unwrap());

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    NUMERIC_SEGMENT.replace_all(path, "/{id}$1").to_string()
}
