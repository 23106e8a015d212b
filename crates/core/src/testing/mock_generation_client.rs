//! Mock generation client for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::generation::{GenerationClient, GenerationError, GenerationRequest};

/// Mock implementation of the GenerationClient trait.
///
/// Provides controllable behavior for testing:
/// - Return a fixed response, or queued responses in order
/// - Record every request for assertions
/// - Simulate failures and slow backends
#[derive(Debug)]
pub struct MockGenerationClient {
    /// Returned when the queue is empty.
    response: Arc<RwLock<Option<String>>>,
    /// Consumed front to back before `response`.
    queued: Arc<RwLock<VecDeque<String>>>,
    /// Recorded requests.
    requests: Arc<RwLock<Vec<GenerationRequest>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<GenerationError>>>,
    /// Artificial latency per call.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerationClient {
    /// Create a mock with no configured response.
    pub fn new() -> Self {
        Self {
            response: Arc::new(RwLock::new(None)),
            queued: Arc::new(RwLock::new(VecDeque::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the response returned for every call.
    pub async fn set_response(&self, response: String) {
        *self.response.write().await = Some(response);
    }

    /// Queue a response for a single call.
    pub async fn queue_response(&self, response: String) {
        self.queued.write().await.push_back(response);
    }

    /// Make the next call fail.
    pub async fn set_next_error(&self, error: GenerationError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every call by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// All recorded requests.
    pub async fn recorded_requests(&self) -> Vec<GenerationRequest> {
        self.requests.read().await.clone()
    }

    /// Number of calls made.
    pub async fn call_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Clear recorded requests.
    pub async fn clear_recorded(&self) {
        self.requests.write().await.clear();
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    fn provider(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.write().await.push(request.clone());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        if let Some(response) = self.queued.write().await.pop_front() {
            return Ok(response);
        }

        self.response
            .read()
            .await
            .clone()
            .ok_or(GenerationError::EmptyResponse)
    }
}
