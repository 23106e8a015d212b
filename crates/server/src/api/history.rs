//! History API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mizan_core::{HistoryItem, RestoredAnalysis};
use serde::Serialize;
use std::sync::Arc;

use super::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListHistoryResponse {
    pub items: Vec<HistoryItem>,
    pub total: usize,
}

fn not_found(id: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("History item not found: {}", id))),
    )
}

/// List history, most recent first
pub async fn list_history(State(state): State<Arc<AppState>>) -> Json<ListHistoryResponse> {
    let items = state.history().load();
    Json(ListHistoryResponse {
        total: items.len(),
        items,
    })
}

/// Get a history item by ID
pub async fn get_history_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryItem>, impl IntoResponse> {
    state.history().get(&id).map(Json).ok_or_else(|| not_found(&id))
}

/// Restore a history item into a result plus the input text that produced it
pub async fn restore_history_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RestoredAnalysis>, impl IntoResponse> {
    match state.history().get(&id) {
        Some(item) => Ok(Json(state.history().restore(&item))),
        None => Err(not_found(&id)),
    }
}

/// Drop every history item
pub async fn clear_history(State(state): State<Arc<AppState>>) -> StatusCode {
    state.history().clear();
    StatusCode::NO_CONTENT
}
