pub mod analysis;
pub mod handlers;
pub mod history;
pub mod middleware;
pub mod routes;
pub mod verses;

pub use routes::create_router;

use serde::Serialize;

/// Error body shared by all handlers.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
