//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/funnelgraph/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/funnelgraph/` (~/.config/funnelgraph/)
//! - State/Logs: `$XDG_STATE_HOME/funnelgraph/` (~/.local/state/funnelgraph/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

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

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Journey segmentation configuration
    #[serde(default)]
    pub journey: JourneyConfig,

    /// Raw log ingestion configuration
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Remote log source configuration
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Journey segmentation configuration
#[derive(Debug, Deserialize, Clone)]
pub struct JourneyConfig {
    /// Seconds of inactivity after which the next event starts a new journey
    #[serde(default = "default_journey_timeout")]
    pub timeout_secs: u32,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_journey_timeout(),
        }
    }
}

impl JourneyConfig {
    /// Config with an explicit timeout, in seconds.
    pub fn with_timeout_secs(timeout_secs: u32) -> Self {
        Self { timeout_secs }
    }

    /// Config with an explicit timeout, in whole minutes.
    pub fn with_timeout_minutes(timeout_minutes: u32) -> Self {
        Self::with_timeout_secs(timeout_minutes.saturating_mul(60))
    }

    /// The timeout as a duration.
    pub fn timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::from(self.timeout_secs))
    }
}

fn default_journey_timeout() -> u32 {
    2 * 60 * 60
}

/// Raw log ingestion configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct IngestConfig {
    /// Rows whose url contains any of these substrings are dropped (test traffic)
    #[serde(default)]
    pub exclude_url_patterns: Vec<String>,
}

/// Remote log source configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CollectorConfig {
    /// URL of the raw log file
    pub url: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_collector_timeout")]
    pub timeout_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_collector_timeout(),
        }
    }
}

impl CollectorConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        match self.url.as_deref() {
            None => Err(Error::Config(
                "collector.url is required to fetch logs".to_string(),
            )),
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => Err(
                Error::Config(format!("collector.url must be an http(s) URL, got {:?}", url)),
            ),
            Some(_) if self.timeout_secs == 0 => Err(Error::Config(
                "collector.timeout_secs must be greater than 0".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }
}

fn default_collector_timeout() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
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
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/funnelgraph/config.toml` (~/.config/funnelgraph/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("funnelgraph").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/funnelgraph/` (~/.local/state/funnelgraph/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("funnelgraph")
    }
}
