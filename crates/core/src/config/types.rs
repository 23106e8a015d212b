use serde::{Deserialize, Deserializer, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::analysis::ModelId;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub verse_source: VerseSourceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Generation backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// API key for the generation backend. Missing key is only an error
    /// at call time, so cached analyses keep working without one.
    #[serde(
        default,
        deserialize_with = "deserialize_api_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<String>,
    /// Base URL (default: https://generativelanguage.googleapis.com).
    #[serde(default = "default_generation_api_base")]
    pub api_base: String,
    /// Model used when a request does not name one.
    #[serde(default)]
    pub default_model: ModelId,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds.
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u32,
}

/// Env values are typed by content, so an all-digit key arrives as a number.
fn deserialize_api_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawKey {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<RawKey>::deserialize(deserializer)?.map(|key| match key {
        RawKey::Text(text) => text,
        RawKey::Unsigned(n) => n.to_string(),
        RawKey::Signed(n) => n.to_string(),
    }))
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_generation_api_base(),
            default_model: ModelId::default(),
            temperature: default_temperature(),
            timeout_secs: default_generation_timeout(),
        }
    }
}

fn default_generation_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_temperature() -> f32 {
    0.4
}

fn default_generation_timeout() -> u32 {
    60
}

/// Verse source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerseSourceConfig {
    /// Base URL (default: https://api.alquran.cloud/v1).
    #[serde(default = "default_verse_base_url")]
    pub base_url: String,
    /// Text edition requested for collection payloads.
    #[serde(default = "default_edition")]
    pub edition: String,
    /// Request timeout in seconds.
    #[serde(default = "default_verse_timeout")]
    pub timeout_secs: u32,
}

impl Default for VerseSourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_verse_base_url(),
            edition: default_edition(),
            timeout_secs: default_verse_timeout(),
        }
    }
}

fn default_verse_base_url() -> String {
    "https://api.alquran.cloud/v1".to_string()
}

fn default_edition() -> String {
    "ar.quran-simple".to_string()
}

fn default_verse_timeout() -> u32 {
    30
}

/// Persistent storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Name of the blob holding the analysis history.
    #[serde(default = "default_history_key")]
    pub history_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            history_key: default_history_key(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("mizan.db")
}

fn default_history_key() -> String {
    "analysis_history".to_string()
}

/// Analysis cache configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Upper bound on cached analyses. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub generation: SanitizedGenerationConfig,
    pub verse_source: VerseSourceConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
}

/// Sanitized generation config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGenerationConfig {
    pub api_base: String,
    pub api_key_configured: bool,
    pub default_model: ModelId,
    pub temperature: f32,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let generation = &config.generation;
        Self {
            server: config.server.clone(),
            generation: SanitizedGenerationConfig {
                api_base: generation.api_base.clone(),
                api_key_configured: generation
                    .api_key
                    .as_ref()
                    .is_some_and(|k| !k.trim().is_empty()),
                default_model: generation.default_model,
                temperature: generation.temperature,
                timeout_secs: generation.timeout_secs,
            },
            verse_source: config.verse_source.clone(),
            storage: config.storage.clone(),
            cache: config.cache.clone(),
        }
    }
}
