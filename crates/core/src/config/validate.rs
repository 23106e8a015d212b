use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Generation temperature and timeouts are in range
/// - Endpoints and the history blob key are not empty
/// - Cache bound, when set, is positive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let generation = &config.generation;
    if !(0.0..=2.0).contains(&generation.temperature) {
        return Err(ConfigError::ValidationError(format!(
            "generation.temperature must be between 0.0 and 2.0, got {}",
            generation.temperature
        )));
    }
    if generation.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "generation.timeout_secs cannot be 0".to_string(),
        ));
    }
    if generation.api_base.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "generation.api_base cannot be empty".to_string(),
        ));
    }

    if config.verse_source.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "verse_source.base_url cannot be empty".to_string(),
        ));
    }
    if config.verse_source.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "verse_source.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.storage.history_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.history_key cannot be empty".to_string(),
        ));
    }

    if config.cache.max_entries == Some(0) {
        return Err(ConfigError::ValidationError(
            "cache.max_entries must be greater than 0 when set".to_string(),
        ));
    }

    Ok(())
}
