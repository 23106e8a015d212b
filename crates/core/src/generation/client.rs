//! Generation client trait and request type.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::analysis::ModelId;

/// Error type for generation calls.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Generation backend returned no text")]
    EmptyResponse,

    #[error("API key is missing")]
    MissingCredential,
}

/// A fully specified, schema-constrained generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model to run.
    pub model: ModelId,
    /// Natural-language instruction, input text included.
    pub instruction: String,
    /// MIME type the backend must answer with.
    pub response_mime_type: String,
    /// Schema the answer must conform to.
    pub response_schema: Value,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Trait for generation backends.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Provider name (e.g., "gemini")
    fn provider(&self) -> &str;

    /// Send the request and return the raw response text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
