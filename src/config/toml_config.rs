use crate::config::{RedisConfig, StorageBackend, StorageConfig};
use crate::utils::error::{DeckError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub storage: StorageSection,
    pub redis: Option<RedisConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeckError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DeckError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DeckError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            backend: self.storage.backend,
            redis: self.redis.clone(),
        }
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.storage_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_redis_config() {
        let toml_content = r#"
[storage]
backend = "redis"

[redis]
host = "cache.internal"
port = 6380
password = "hunter2"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let storage = config.storage_config();

        assert_eq!(storage.backend, StorageBackend::Redis);
        let redis = storage.redis.unwrap();
        assert_eq!(redis.host, "cache.internal");
        assert_eq!(redis.port, 6380);
        assert_eq!(redis.password.as_deref(), Some("hunter2"));
        assert_eq!(redis.connect_timeout_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_means_in_memory() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.storage_config(), StorageConfig::in_memory());
        assert!(!config.verbose());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_memory_alias() {
        let config = TomlConfig::from_toml_str("[storage]\nbackend = \"memory\"\n").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::InMemory);
    }

    #[test]
    fn test_env_var_substitution() {
        let _guard = crate::config::ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        std::env::set_var("DECKS_TEST_REDIS_HOST", "redis.test");

        let toml_content = r#"
[storage]
backend = "redis"

[redis]
host = "${DECKS_TEST_REDIS_HOST}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.redis.unwrap().host, "redis.test");

        std::env::remove_var("DECKS_TEST_REDIS_HOST");
    }

    #[test]
    fn test_redis_backend_without_section_fails_validation() {
        let config = TomlConfig::from_toml_str("[storage]\nbackend = \"redis\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_backend_is_a_parse_error() {
        let err = TomlConfig::from_toml_str("[storage]\nbackend = \"postgres\"\n").unwrap_err();
        assert!(matches!(err, DeckError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[storage]
backend = "in-memory"

[logging]
verbose = true
json = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::InMemory);
        assert!(config.verbose());
        assert!(config.json_logs());
    }
}
