//! Generation backend abstraction.
//!
//! The backend is an opaque oracle: it receives an instruction plus a
//! response schema and returns text that is expected to be JSON matching
//! that schema. Validation of the returned text happens in `analysis`.

mod client;
mod gemini;

pub use client::{GenerationClient, GenerationError, GenerationRequest};
pub use gemini::{GeminiClient, GeminiConfig};
