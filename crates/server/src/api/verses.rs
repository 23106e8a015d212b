//! Verse source API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mizan_core::{CollectionInfo, VerseRangeQuery, VerseSourceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::ErrorResponse;
use crate::state::AppState;

/// Query parameters for a verse range
#[derive(Debug, Deserialize)]
pub struct VerseRangeParams {
    /// First unit, inclusive
    pub start: u32,
    /// Last unit, inclusive
    pub end: u32,
}

#[derive(Debug, Serialize)]
pub struct VersesResponse {
    pub text: String,
}

/// List collections (empty when the verse source is unavailable)
pub async fn list_collections(State(state): State<Arc<AppState>>) -> Json<Vec<CollectionInfo>> {
    Json(state.verses().list_collections().await)
}

/// Fetch a range of units as one annotated string
pub async fn fetch_verses(
    State(state): State<Arc<AppState>>,
    Path(index): Path<u32>,
    Query(params): Query<VerseRangeParams>,
) -> Result<Json<VersesResponse>, impl IntoResponse> {
    let query = match VerseRangeQuery::new(index, params.start, params.end) {
        Ok(query) => query,
        Err(e) => {
            return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))));
        }
    };

    match state.verses().fetch_range(&query).await {
        Ok(text) => Ok(Json(VersesResponse { text })),
        Err(VerseSourceError::NotFound(what)) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Not found: {}", what))),
        )),
        Err(e) => {
            warn!("Verse fetch failed for collection {}: {}", index, e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new(format!("Verse source unavailable: {}", e))),
            ))
        }
    }
}
