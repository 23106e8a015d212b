use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mizan_core::{
    load_config, validate_config, AlQuranCloudClient, AlQuranCloudConfig, AnalysisCache,
    AnalysisOrchestrator, GeminiClient, GeminiConfig, GenerationClient, HistoryStore,
    InMemoryAnalysisCache, OrchestratorOptions, SqliteBlobStore, VerseLibrary, VerseSource,
};

use mizan_server::api::create_router;
use mizan_server::metrics::REGISTRY;
use mizan_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Mizan {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("MIZAN_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    // Hash of the sanitized config, so restarts with different settings are visible in logs
    let sanitized_json =
        serde_json::to_string(&mizan_core::SanitizedConfig::from(&config)).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(sanitized_json.as_bytes()));

    info!("Configuration loaded successfully (hash {})", &config_hash[..16]);
    info!("Database path: {:?}", config.storage.path);
    info!("Default model: {}", config.generation.default_model);

    // History persisted as a named blob in SQLite
    let blobs = SqliteBlobStore::new(&config.storage.path).context("Failed to open blob store")?;
    let history = Arc::new(HistoryStore::open(
        Arc::new(blobs),
        config.storage.history_key.clone(),
    ));
    info!("History store initialized ({} items)", history.len());

    // Analysis cache
    let cache: Arc<dyn AnalysisCache> = match config.cache.max_entries {
        Some(max_entries) => {
            info!("Analysis cache bounded to {} entries", max_entries);
            Arc::new(InMemoryAnalysisCache::bounded(max_entries))
        }
        None => Arc::new(InMemoryAnalysisCache::new()),
    };

    // Generation client
    let gemini = GeminiClient::new(GeminiConfig {
        api_key: config.generation.api_key.clone(),
        api_base: Some(config.generation.api_base.clone()),
        timeout_secs: config.generation.timeout_secs,
    })
    .context("Failed to create generation client")?;
    if !gemini.has_credential() {
        warn!("No generation API key configured; only cached analyses will succeed");
    }
    let client: Arc<dyn GenerationClient> = Arc::new(gemini);

    let orchestrator = Arc::new(AnalysisOrchestrator::new(
        client,
        cache,
        history,
        OrchestratorOptions {
            temperature: config.generation.temperature,
        },
    ));

    // Verse source
    let verse_source: Arc<dyn VerseSource> = Arc::new(
        AlQuranCloudClient::new(AlQuranCloudConfig {
            base_url: Some(config.verse_source.base_url.clone()),
            edition: Some(config.verse_source.edition.clone()),
            timeout_secs: config.verse_source.timeout_secs,
        })
        .context("Failed to create verse source client")?,
    );
    info!(
        "Verse source: {} (edition {})",
        config.verse_source.base_url, config.verse_source.edition
    );

    // Register metrics before the first scrape
    once_cell::sync::Lazy::force(&REGISTRY);

    // Create app state
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(
        config,
        orchestrator,
        VerseLibrary::new(verse_source),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
