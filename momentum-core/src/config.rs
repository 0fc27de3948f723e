//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/momentum/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/momentum/` (~/.config/momentum/)
//! - Data: `$XDG_DATA_HOME/momentum/` (~/.local/share/momentum/)
//! - State/Logs: `$XDG_STATE_HOME/momentum/` (~/.local/state/momentum/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    /// Override for the SQLite database path; defaults to the XDG data dir
    pub database_path: Option<PathBuf>,
}

/// Analytics window defaults
#[derive(Debug, Deserialize)]
pub struct AnalyticsConfig {
    /// Days covered by the activity heatmap
    #[serde(default = "default_heatmap_days")]
    pub heatmap_days: i64,

    /// Days covered by the consistency score and insights
    #[serde(default = "default_consistency_days")]
    pub consistency_days: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            heatmap_days: default_heatmap_days(),
            consistency_days: default_consistency_days(),
        }
    }
}

fn default_heatmap_days() -> i64 {
    365
}

fn default_consistency_days() -> i64 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configured values
    pub fn validate(&self) -> Result<()> {
        if self.analytics.heatmap_days <= 0 {
            return Err(Error::Config(
                "analytics.heatmap_days must be positive".to_string(),
            ));
        }
        if self.analytics.consistency_days <= 0 {
            return Err(Error::Config(
                "analytics.consistency_days must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/momentum/config.toml` (~/.config/momentum/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("momentum").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite database)
    ///
    /// `$XDG_DATA_HOME/momentum/` (~/.local/share/momentum/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("momentum")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/momentum/` (~/.local/state/momentum/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("momentum")
    }

    /// Returns the configured database path, or the XDG default
    ///
    /// `$XDG_DATA_HOME/momentum/data.db` (~/.local/share/momentum/data.db)
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("data.db"))
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/momentum/momentum.log` (~/.local/state/momentum/momentum.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("momentum.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analytics.heatmap_days, 365);
        assert_eq!(config.analytics.consistency_days, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.storage.database_path.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
            [storage]
            database_path = "/tmp/momentum-test.db"

            [analytics]
            heatmap_days = 180

            [logging]
            level = "debug"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.storage.database_path,
            Some(PathBuf::from("/tmp/momentum-test.db"))
        );
        assert_eq!(config.analytics.heatmap_days, 180);
        // Unset fields keep their defaults
        assert_eq!(config.analytics.consistency_days, 30);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validate_rejects_non_positive_windows() {
        let toml_str = r#"
            [analytics]
            heatmap_days = 0
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_path_prefers_override() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/custom.db"));
    }
}
