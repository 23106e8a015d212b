use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{analysis, handlers, history, middleware::metrics_middleware, verses};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health, config and models
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/models", get(handlers::list_models))
        // Analysis
        .route("/analyze", post(analysis::analyze))
        .route("/equation/tokenize", post(analysis::tokenize))
        // History
        .route("/history", get(history::list_history).delete(history::clear_history))
        .route("/history/{id}", get(history::get_history_item))
        .route("/history/{id}/restore", post(history::restore_history_item))
        // Verse source
        .route("/collections", get(verses::list_collections))
        .route("/collections/{index}/verses", get(verses::fetch_verses));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
