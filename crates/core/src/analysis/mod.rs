//! Analysis - request building, response validation and orchestration.
//!
//! ```text
//! analyze(text, model)
//!   │
//!   ├─ AnalysisRequest::new ──── empty? ──► EmptyText (nothing touched)
//!   │
//!   ├─ AnalysisCache::get ────── hit? ────► AnalysisOutcome { from_cache: true }
//!   │
//!   ├─ build_generation_request
//!   ├─ GenerationClient::generate
//!   ├─ parse_analysis_response ─ bad? ────► Contract (nothing cached)
//!   │
//!   ├─ AnalysisCache::set
//!   ├─ HistoryStore::append
//!   └─────────────────────────────────────► AnalysisOutcome { from_cache: false }
//! ```

mod equation;
mod orchestrator;
mod prompt;
mod types;

pub use equation::{tokenize_equation, EquationToken, TokenKind};
pub use orchestrator::{AnalysisOrchestrator, OrchestratorOptions, OrchestratorState};
pub use prompt::{
    analysis_schema, build_generation_request, build_instruction, parse_analysis_response,
    RESPONSE_MIME_TYPE,
};
pub use types::{AnalysisOutcome, AnalysisRequest, AnalysisResult, ModelId, ThemeWeight};

use thiserror::Error;

use crate::generation::GenerationError;

/// Message shown for every transport or contract failure.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "An error occurred while analyzing the text. Please try again.";

/// Errors surfaced by the analysis path.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Input text is empty")]
    EmptyText,

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("API key is missing")]
    MissingCredential,

    #[error("Generation call failed: {0}")]
    Transport(String),

    #[error("Response does not match the analysis schema: {0}")]
    Contract(String),
}

impl AnalysisError {
    /// Rejected before any external call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            AnalysisError::EmptyText
                | AnalysisError::UnknownModel(_)
                | AnalysisError::MissingCredential
        )
    }

    /// Text safe to show to the user. Transport and contract failures
    /// collapse into one message.
    pub fn user_message(&self) -> String {
        if self.is_precondition() {
            self.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }
}

impl From<GenerationError> for AnalysisError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingCredential => AnalysisError::MissingCredential,
            GenerationError::Json(_) | GenerationError::EmptyResponse => {
                AnalysisError::Contract(err.to_string())
            }
            GenerationError::Http(_) | GenerationError::Api { .. } | GenerationError::Timeout(_) => {
                AnalysisError::Transport(err.to_string())
            }
        }
    }
}
