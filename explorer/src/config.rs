//! Explorer configuration.
//!
//! Settings are read from an optional `explorer.toml` and then overridden by
//! environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::services::{PosterTemplate, TrimPolicy};
use crate::source::SourceType;

pub const ENV_API_BASE: &str = "EXPLORER_API_BASE";
pub const ENV_API_TIMEOUT_SECS: &str = "EXPLORER_API_TIMEOUT_SECS";
pub const ENV_DEBOUNCE_MS: &str = "EXPLORER_DEBOUNCE_MS";
pub const ENV_SOURCE: &str = "EXPLORER_SOURCE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    90
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Panel behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Quiet period before a filter change is fetched.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Cards in each top-films list.
    #[serde(default = "default_top_count")]
    pub top_count: usize,
}

fn default_debounce_ms() -> u64 {
    400
}

fn default_top_count() -> usize {
    12
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            top_count: default_top_count(),
        }
    }
}

impl DashboardSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub source: SourceType,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub posters: PosterTemplate,
    #[serde(default)]
    pub trimming: TrimPolicy,
}

impl ExplorerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// First `explorer.toml` found in the current or `explorer/` directory.
    pub fn from_default_location() -> Result<Option<Self>, ConfigError> {
        let search_paths = [
            PathBuf::from("explorer.toml"),
            PathBuf::from("explorer/explorer.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Defaults, then the default config file if any, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_default_location()?.unwrap_or_default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override settings from environment variables.
    ///
    /// # Environment Variables
    /// - `EXPLORER_API_BASE`: backend base URL
    /// - `EXPLORER_API_TIMEOUT_SECS`: request timeout in seconds
    /// - `EXPLORER_DEBOUNCE_MS`: quiet period before fetching
    /// - `EXPLORER_SOURCE`: `http` | `local`
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(base) = env::var(ENV_API_BASE) {
            if !base.is_empty() {
                self.api.base_url = base;
            }
        }
        if let Ok(value) = env::var(ENV_API_TIMEOUT_SECS) {
            self.api.timeout_secs = parse_env(ENV_API_TIMEOUT_SECS, value)?;
        }
        if let Ok(value) = env::var(ENV_DEBOUNCE_MS) {
            self.dashboard.debounce_ms = parse_env(ENV_DEBOUNCE_MS, value)?;
        }
        if let Ok(value) = env::var(ENV_SOURCE) {
            self.source = parse_env(ENV_SOURCE, value)?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
source = "local"

[api]
base_url = "https://films.example.org"

[trimming]
budget_floor = 50000.0
"#;

        let config: ExplorerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.source, SourceType::Local);
        assert_eq!(config.api.base_url, "https://films.example.org");
        assert_eq!(config.api.timeout_secs, 90);
        assert_eq!(config.dashboard.debounce_ms, 400);
        assert_eq!(config.trimming.budget_floor, 50000.0);
        assert_eq!(config.trimming.revenue_floor, 1000.0);
        assert_eq!(config.posters, PosterTemplate::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: ExplorerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.dashboard.debounce(), Duration::from_millis(400));
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            ExplorerConfig::from_file(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[api\nbase_url = 1").unwrap();
        assert!(matches!(
            ExplorerConfig::from_file(&broken),
            Err(ConfigError::Parse(_))
        ));
    }
}
