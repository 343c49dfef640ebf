//! Application configuration management
//!
//! Configuration is read from environment variables (a `.env` file is honoured
//! through `dotenvy`). The CLI may override individual values per invocation.

use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_LEVEL, DEFAULT_LOGS_DIR, DEFAULT_RUST_LOG, DEFAULT_TOOL_TIMEOUT_SECS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid configuration, falling back to defaults: {}", e);
        Config::default()
    })
});

/// Main application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub runner: RunnerConfig,
    pub log: LogConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub rust_log: String,
}

/// Benchmark runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory receiving the CSV run logs
    pub logs_dir: PathBuf,
    /// Parent of the per-job scratch directories (system temp dir when `None`)
    pub temp_root: Option<PathBuf>,
    /// Per-tool wall clock limit; `None` waits indefinitely
    pub tool_timeout: Option<Duration>,
    /// Leave the scratch directory on disk after the job
    pub keep_temp: bool,
    /// Level used by the CLI when none is given
    pub default_level: i64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            rust_log: DEFAULT_RUST_LOG.to_string(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
            temp_root: None,
            tool_timeout: timeout_from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
            keep_temp: false,
            default_level: DEFAULT_LEVEL,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            runner: RunnerConfig::from_env()?,
            log: LogConfig::from_env()?,
        })
    }
}

impl LogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string()),
        })
    }
}

impl RunnerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs: u64 = env::var("COMPBENCH_TOOL_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TOOL_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("COMPBENCH_TOOL_TIMEOUT_SECS".to_string()))?;

        Ok(Self {
            logs_dir: PathBuf::from(
                env::var("COMPBENCH_LOGS_DIR").unwrap_or_else(|_| DEFAULT_LOGS_DIR.to_string()),
            ),
            temp_root: env::var("COMPBENCH_TEMP_DIR").ok().map(PathBuf::from),
            tool_timeout: timeout_from_secs(timeout_secs),
            keep_temp: parse_bool(
                "COMPBENCH_KEEP_TEMP",
                &env::var("COMPBENCH_KEEP_TEMP").unwrap_or_else(|_| "false".to_string()),
            )?,
            default_level: env::var("COMPBENCH_DEFAULT_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LEVEL.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("COMPBENCH_DEFAULT_LEVEL".to_string()))?,
        })
    }
}

/// Zero means "no timeout"
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name.to_string())),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
