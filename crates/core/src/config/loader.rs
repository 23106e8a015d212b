use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// `MIZAN_SECTION__FIELD` overrides a single field; `GEMINI_API_KEY`
/// fills `generation.api_key` when set.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(
            Env::raw()
                .only(&["GEMINI_API_KEY"])
                .map(|_| "generation.api_key".into()),
        )
        .merge(Env::prefixed("MIZAN_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ModelId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[server]
port = 9000

[generation]
default_model = "gemini-2.5-pro"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.generation.default_model, ModelId::Gemini25Pro);
    }

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.history_key, "analysis_history");
        assert!(config.cache.max_entries.is_none());
    }

    #[test]
    fn test_load_config_from_str_unknown_model() {
        let toml = r#"
[generation]
default_model = "gpt-4"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 3000

[storage]
path = "/tmp/mizan-test.db"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(
            config.storage.path.to_str().unwrap(),
            "/tmp/mizan-test.db"
        );
    }

    #[test]
    fn test_gemini_api_key_env_fills_generation_key() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[generation]
default_model = "gemini-2.5-pro"
"#,
            )?;
            jail.set_env("GEMINI_API_KEY", "abc-key");

            let config = load_config(Path::new("config.toml")).unwrap();
            assert_eq!(config.generation.api_key.as_deref(), Some("abc-key"));
            assert_eq!(config.generation.default_model, ModelId::Gemini25Pro);
            Ok(())
        });
    }

    #[test]
    fn test_numeric_gemini_api_key_is_kept_as_text() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "")?;
            jail.set_env("GEMINI_API_KEY", "12345");

            let config = load_config(Path::new("config.toml")).unwrap();
            assert_eq!(config.generation.api_key.as_deref(), Some("12345"));
            Ok(())
        });
    }

    #[test]
    fn test_numeric_api_key_in_toml() {
        let config = load_config_from_str(
            r#"
[generation]
api_key = 98765
"#,
        )
        .unwrap();
        assert_eq!(config.generation.api_key.as_deref(), Some("98765"));
    }
}
