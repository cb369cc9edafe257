//! Application Configuration
//! Optional JSON settings file in the working directory plus environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "avocado_analytics.json";

/// Overrides `data_path` when set.
pub const DATA_PATH_ENV: &str = "AVOCADO_DATA_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub default_region: String,
    pub default_type: String,
    pub window_width: f32,
    pub window_height: f32,
    pub open_after_export: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("avocado.csv"),
            default_region: "Albany".to_string(),
            default_type: "organic".to_string(),
            window_width: 1400.0,
            window_height: 900.0,
            open_after_export: true,
        }
    }
}

impl AppConfig {
    /// Load from [`CONFIG_FILE`] in the working directory and apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(DATA_PATH_ENV).map(PathBuf::from);
        Self::load_from(Path::new(CONFIG_FILE), env_path)
    }

    /// A missing file means defaults; an unreadable or malformed one is an error.
    pub fn load_from(path: &Path, data_path_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            let config: AppConfig =
                serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;
            info!(path = %path.display(), "loaded config file");
            config
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            AppConfig::default()
        };

        if let Some(data_path) = data_path_override.filter(|p| !p.as_os_str().is_empty()) {
            debug!(path = %data_path.display(), "data path overridden from {}", DATA_PATH_ENV);
            config.data_path = data_path;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join(CONFIG_FILE), None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.data_path, PathBuf::from("avocado.csv"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"default_region": "Boise", "open_after_export": false}"#).unwrap();

        let config = AppConfig::load_from(&path, None).unwrap();
        assert_eq!(config.default_region, "Boise");
        assert!(!config.open_after_export);
        assert_eq!(config.default_type, "organic");
    }

    #[test]
    fn test_env_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"data_path": "from_file.csv"}"#).unwrap();

        let config = AppConfig::load_from(&path, Some(PathBuf::from("from_env.csv"))).unwrap();
        assert_eq!(config.data_path, PathBuf::from("from_env.csv"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let result = AppConfig::load_from(&path, None);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
