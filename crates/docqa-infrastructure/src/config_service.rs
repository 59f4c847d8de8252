//! Configuration service implementation.
//!
//! Loads `ClientConfig` from `config.toml` and applies environment
//! overrides. A missing file yields the defaults; the file is never created
//! implicitly.

use docqa_core::config::ClientConfig;
use docqa_core::error::{DocqaError, Result};
use std::path::PathBuf;

use crate::paths::DocqaPaths;
use crate::storage::AtomicFile;

/// Overrides `api_base_url`.
pub const ENV_API_BASE_URL: &str = "DOCQA_API_BASE_URL";
/// Overrides `log_level`.
pub const ENV_LOG: &str = "DOCQA_LOG";

#[derive(Debug, Clone)]
pub struct ConfigService {
    config_file: PathBuf,
}

impl ConfigService {
    pub fn new(paths: &DocqaPaths) -> Result<Self> {
        let config_file = paths
            .config_file()
            .map_err(|e| DocqaError::config(e.to_string()))?;
        Ok(Self { config_file })
    }

    /// File contents, then process environment.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = self.load_file()?;
        Ok(apply_overrides(config, |key| std::env::var(key).ok()))
    }

    /// Reads only the file.
    pub fn load_file(&self) -> Result<ClientConfig> {
        let file = AtomicFile::new(self.config_file.clone());
        let content = file
            .load()
            .map_err(|e| DocqaError::config(e.to_string()))?;

        match content {
            Some(content) => toml::from_str(&content).map_err(|e| {
                DocqaError::config(format!("{}: {}", self.config_file.display(), e))
            }),
            None => {
                tracing::debug!(
                    "[Config] No config file at {}, using defaults",
                    self.config_file.display()
                );
                Ok(ClientConfig::default())
            }
        }
    }

    /// Writes `config` to the config file.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let content =
            toml::to_string_pretty(config).map_err(|e| DocqaError::config(e.to_string()))?;
        AtomicFile::new(self.config_file.clone())
            .save(&content)
            .map_err(|e| DocqaError::storage(e.to_string()))
    }

    pub fn config_file(&self) -> &PathBuf {
        &self.config_file
    }
}

/// Applies environment overrides through `lookup`. Blank values are ignored.
pub fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_blank(ENV_API_BASE_URL) {
        config.api_base_url = url;
    }
    if let Some(level) = non_blank(ENV_LOG) {
        config.log_level = level;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::new(&DocqaPaths::new(Some(dir.path()))).unwrap()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = service(&temp_dir).load_file().unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(!temp_dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("config.toml"),
            "api_base_url = \"https://qa.example.com\"\n",
        )
        .unwrap();

        let config = service(&temp_dir).load_file().unwrap();
        assert_eq!(config.api_base_url, "https://qa.example.com");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.toml"), "api_base_url = [").unwrap();

        let err = service(&temp_dir).load_file().unwrap_err();
        assert!(matches!(err, DocqaError::Config(_)));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let config = ClientConfig {
            api_base_url: "http://10.0.0.2:5000".to_string(),
            log_level: "debug".to_string(),
        };
        service.save(&config).unwrap();
        assert_eq!(service.load_file().unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_API_BASE_URL, "http://override:1"), (ENV_LOG, " ")]
            .into_iter()
            .collect();

        let config = apply_overrides(ClientConfig::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });
        assert_eq!(config.api_base_url, "http://override:1");
        assert_eq!(config.log_level, "info");
    }
}
