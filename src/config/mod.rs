// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Configuration module

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::analysis::FixedDecimal;
use crate::sensors::{DEFAULT_TARGET_LABEL, OTHER_LABEL};

/// Environment variables consulted for the listening port, in order
pub const PORT_ENV_VARS: [&str; 2] = ["DETECTOR_PORT", "detector.port"];

/// Default alarm threshold (0.0004)
pub const DEFAULT_THRESHOLD: FixedDecimal = FixedDecimal::from_parts(4, 4);

/// Environment variable for the listening host
pub const HOST_ENV_VAR: &str = "DETECTOR_HOST";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid port {value:?} in {var}")]
    InvalidPort { var: String, value: String },

    #[error("target label must not be empty")]
    EmptyTargetLabel,

    #[error("target label {0:?} is reserved")]
    ReservedTargetLabel(String),

    #[error("alarm threshold {0} must be between 0 and 1 (exclusive)")]
    ThresholdOutOfRange(FixedDecimal),

    #[error("check interval must be greater than zero")]
    ZeroInterval,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Alarm evaluation configuration
    pub alarm: AlarmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            alarm: AlarmConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("detector"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV_VAR) {
            self.server.host = host;
        }

        for var in PORT_ENV_VARS {
            if let Some(value) = lookup(var) {
                self.server.port = value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                    var: var.to_string(),
                    value: value.clone(),
                })?;
                break;
            }
        }

        Ok(())
    }

    /// Check values that parse but cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.alarm.validate()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Listening port (0 picks a free port)
    pub port: u16,

    /// Request worker threads (0 = one per core)
    pub worker_threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7890,
            worker_threads: 0,
        }
    }
}

/// Alarm evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Label counted as the monitored particle
    pub target_label: String,

    /// Ratio above which an alarm is raised
    pub threshold: FixedDecimal,

    /// Delay before the first evaluation in milliseconds
    pub initial_delay_ms: u64,

    /// Evaluation period in milliseconds
    pub check_interval_ms: u64,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            target_label: DEFAULT_TARGET_LABEL.to_string(),
            threshold: DEFAULT_THRESHOLD,
            initial_delay_ms: 1000,
            check_interval_ms: 1000,
        }
    }
}

impl AlarmConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_label.is_empty() {
            return Err(ConfigError::EmptyTargetLabel);
        }
        if self.target_label.eq_ignore_ascii_case(OTHER_LABEL) {
            return Err(ConfigError::ReservedTargetLabel(self.target_label.clone()));
        }

        if self.threshold.is_zero() || self.threshold >= FixedDecimal::ONE {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }

        if self.check_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 7890);
        assert_eq!(config.alarm.target_label, "CO");
        assert_eq!(config.alarm.threshold.to_string(), "0.0004");
        assert_eq!(config.alarm.check_interval(), Duration::from_secs(1));
        assert_eq!(config.alarm.initial_delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [alarm]
            threshold = "0.05"
            "#,
        )
        .unwrap();

        assert_eq!(config.alarm.threshold.to_string(), "0.05");
        assert_eq!(config.alarm.target_label, "CO");
        assert_eq!(config.server.port, 7890);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_bad_threshold_fails_to_parse() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [alarm]
            threshold = "four"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_env_port_override() {
        let mut config = Config::default();
        config.apply_env_from(env(&[("DETECTOR_PORT", "9000")])).unwrap();
        assert_eq!(config.server.port, 9000);

        let mut config = Config::default();
        config
            .apply_env_from(env(&[("detector.port", "7891"), (HOST_ENV_VAR, "127.0.0.1")]))
            .unwrap();
        assert_eq!(config.server.port, 7891);
        assert_eq!(config.server.host, "127.0.0.1");

        let mut config = Config::default();
        config
            .apply_env_from(env(&[("DETECTOR_PORT", "9000"), ("detector.port", "7891")]))
            .unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_env_invalid_port() {
        let mut config = Config::default();
        let err = config
            .apply_env_from(env(&[("DETECTOR_PORT", "seventy")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));

        let err = config
            .apply_env_from(env(&[("detector.port", "70000")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        config.alarm.target_label.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyTargetLabel)));

        config.alarm.target_label = "Other".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ReservedTargetLabel(_))));

        let mut config = Config::default();
        config.alarm.threshold = "0".parse().unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ThresholdOutOfRange(_))));

        config.alarm.threshold = "1.0".parse().unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ThresholdOutOfRange(_))));

        let mut config = Config::default();
        config.alarm.check_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn test_load_or_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());

        let mut changed = created.clone();
        changed.alarm.target_label = "NO2".to_string();
        changed.save(&path).unwrap();

        let loaded = Config::load_or_create(&path).unwrap();
        assert_eq!(loaded.alarm.target_label, "NO2");
        assert_eq!(loaded.alarm.threshold, created.alarm.threshold);
    }
}
