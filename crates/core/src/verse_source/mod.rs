//! Verse source integration.
//!
//! [`VerseSource`] is the transport: catalog listing and full-collection
//! reads. [`VerseLibrary`] layers the policy on top of it: listing degrades
//! to an empty catalog, range reads fetch the whole collection and slice it
//! client side.

mod alquran;
mod library;
mod types;

pub use alquran::{AlQuranCloudClient, AlQuranCloudConfig};
pub use library::VerseLibrary;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the verse source.
#[derive(Debug, Error)]
pub enum VerseSourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Requested range is malformed.
    #[error("Invalid verse range: {0}")]
    InvalidRange(String),
}

/// Trait for verse source clients.
#[async_trait]
pub trait VerseSource: Send + Sync {
    /// List all collections with their unit counts.
    async fn fetch_catalog(&self) -> Result<Vec<CollectionInfo>, VerseSourceError>;

    /// Fetch one collection with every unit in it.
    async fn fetch_collection(&self, index: u32) -> Result<Collection, VerseSourceError>;
}
