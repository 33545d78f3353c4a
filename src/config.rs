//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Stats store defaults
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StatsConfig {
    /// Store path used when none is given on the command line
    pub path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether logs should be emitted as JSON lines
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Logging is not up yet when this runs, so files that fail to load are
    /// handed back in the result instead of being logged here.
    pub fn load_default() -> ConfigLoad {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("stats-list").join("config.toml")),
            Some(PathBuf::from("/etc/stats-list/config.toml")),
            Some(PathBuf::from("./stats-list.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first of `paths` that exists and parses
    ///
    /// Falls back to the environment alone when none does.
    pub fn load_first(paths: &[PathBuf]) -> ConfigLoad {
        let mut skipped = Vec::new();

        for path in paths {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        return ConfigLoad {
                            config,
                            source: Some(path.clone()),
                            skipped,
                        };
                    }
                    Err(e) => skipped.push(e),
                }
            }
        }

        ConfigLoad {
            config: Self::from_env(),
            source: None,
            skipped,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("STATS_LIST_PATH") {
            self.stats.path = Some(path);
        }
        if let Ok(level) = std::env::var("STATS_LIST_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("STATS_LIST_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Result of searching the default config locations
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    /// File the config came from, `None` when only the environment was used
    pub source: Option<PathBuf>,
    /// Config files that exist but could not be loaded
    pub skipped: Vec<ConfigError>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}
