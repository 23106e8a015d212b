pub mod analysis;
pub mod cache;
pub mod config;
pub mod generation;
pub mod history;
pub mod metrics;
pub mod storage;
pub mod testing;
pub mod verse_source;

pub use analysis::{
    tokenize_equation, AnalysisError, AnalysisOrchestrator, AnalysisOutcome, AnalysisRequest,
    AnalysisResult, EquationToken, ModelId, OrchestratorOptions, OrchestratorState, ThemeWeight,
    TokenKind,
};
pub use cache::{AnalysisCache, Fingerprint, InMemoryAnalysisCache};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use generation::{GeminiClient, GeminiConfig, GenerationClient, GenerationError};
pub use history::{HistoryItem, HistoryStore, RestoredAnalysis};
pub use storage::{BlobStore, InMemoryBlobStore, SqliteBlobStore, StorageError};
pub use verse_source::{
    AlQuranCloudClient, AlQuranCloudConfig, CollectionInfo, VerseLibrary, VerseRangeQuery,
    VerseSource, VerseSourceError,
};
