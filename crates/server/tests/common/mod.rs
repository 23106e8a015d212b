//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling E2E testing without network
//! access to the generation backend or the verse source.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use mizan_core::{
    testing::{MockGenerationClient, MockVerseSource},
    AnalysisOrchestrator, Config, HistoryStore, InMemoryAnalysisCache, OrchestratorOptions,
    SqliteBlobStore, VerseLibrary,
};

/// Re-export fixtures for test convenience
pub use mizan_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Generation backend (MockGenerationClient)
/// - Verse source (MockVerseSource)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_analysis() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/analyze", json!({ "text": "..." })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock generation client - configure analysis responses
    pub generation: Arc<MockGenerationClient>,
    /// Mock verse source - configure collections
    pub verses: Arc<MockVerseSource>,
    /// History store shared with the router
    pub history: Arc<HistoryStore>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    ///
    /// The generation mock answers every call with a two-theme analysis.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        // Create mocks
        let generation = Arc::new(MockGenerationClient::new());
        generation
            .set_response(fixtures::analysis_response_json(&[
                ("الصبر", 0.9),
                ("الإيمان", 0.6),
            ]))
            .await;
        let verses = Arc::new(MockVerseSource::new());

        // Create config
        let mut config = Config::default();
        config.storage.path = db_path.clone();

        // Create stores
        let blobs = SqliteBlobStore::new(&db_path).expect("Failed to create blob store");
        let history = Arc::new(HistoryStore::open(
            Arc::new(blobs),
            config.storage.history_key.clone(),
        ));

        let orchestrator = Arc::new(AnalysisOrchestrator::new(
            Arc::clone(&generation) as Arc<dyn mizan_core::GenerationClient>,
            Arc::new(InMemoryAnalysisCache::new()),
            Arc::clone(&history),
            OrchestratorOptions::default(),
        ));

        // Create app state with mocks
        let state = Arc::new(mizan_server::state::AppState::new(
            config,
            orchestrator,
            VerseLibrary::new(Arc::clone(&verses) as Arc<dyn mizan_core::VerseSource>),
        ));

        // Create router
        let router = mizan_server::api::create_router(state);

        Self {
            router,
            generation,
            verses,
            history,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Send a GET request and return the raw text body.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
