//! Analysis API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use mizan_core::{
    analysis::GENERIC_FAILURE_MESSAGE, tokenize_equation, AnalysisError, AnalysisResult,
    EquationToken, ModelId,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for an analysis
#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    /// Text to analyze
    pub text: String,
    /// Model identifier; the configured default when absent
    pub model: Option<String>,
}

/// Response for an analysis
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub result: AnalysisResult,
    pub from_cache: bool,
    pub equation_tokens: Vec<EquationToken>,
}

/// Request body for equation tokenization
#[derive(Debug, Deserialize)]
pub struct TokenizeBody {
    pub equation: String,
}

#[derive(Debug, Serialize)]
pub struct TokenizeResponse {
    pub tokens: Vec<EquationToken>,
}

fn error_status(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::EmptyText | AnalysisError::UnknownModel(_) => StatusCode::BAD_REQUEST,
        AnalysisError::MissingCredential => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::Transport(_) | AnalysisError::Contract(_) => StatusCode::BAD_GATEWAY,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Run (or serve from cache) an analysis
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<AnalyzeResponse>, impl IntoResponse> {
    let model = match body.model.as_deref().map(str::parse::<ModelId>).transpose() {
        Ok(model) => model.unwrap_or_else(|| state.default_model()),
        Err(e) => {
            return Err((
                error_status(&e),
                Json(ErrorResponse::new(e.user_message())),
            ))
        }
    };

    match state.orchestrator().analyze(&body.text, model).await {
        Ok(outcome) => {
            let equation_tokens = tokenize_equation(&outcome.result.equation);
            Ok(Json(AnalyzeResponse {
                result: outcome.result,
                from_cache: outcome.from_cache,
                equation_tokens,
            }))
        }
        Err(e) => {
            let status = error_status(&e);
            if status == StatusCode::BAD_GATEWAY {
                // Details stay in the log, callers see one message
                warn!("Analysis request failed: {}", e);
                Err((status, Json(ErrorResponse::new(GENERIC_FAILURE_MESSAGE))))
            } else {
                Err((status, Json(ErrorResponse::new(e.user_message()))))
            }
        }
    }
}

/// Split an equation into typed tokens
pub async fn tokenize(Json(body): Json<TokenizeBody>) -> Json<TokenizeResponse> {
    Json(TokenizeResponse {
        tokens: tokenize_equation(&body.equation),
    })
}
