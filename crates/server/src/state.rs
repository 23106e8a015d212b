use mizan_core::{
    AnalysisOrchestrator, Config, HistoryStore, ModelId, SanitizedConfig, VerseLibrary,
};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<AnalysisOrchestrator>,
    verses: VerseLibrary,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<AnalysisOrchestrator>, verses: VerseLibrary) -> Self {
        Self {
            config,
            orchestrator,
            verses,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn default_model(&self) -> ModelId {
        self.config.generation.default_model
    }

    pub fn orchestrator(&self) -> &AnalysisOrchestrator {
        self.orchestrator.as_ref()
    }

    pub fn history(&self) -> &HistoryStore {
        self.orchestrator.history().as_ref()
    }

    pub fn verses(&self) -> &VerseLibrary {
        &self.verses
    }
}
