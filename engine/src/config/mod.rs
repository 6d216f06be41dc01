//! Configuration management
//!
//! This module handles loading, validation, and management of the Edithra configuration.
//! Configuration is stored in TOML format at ~/.edithra/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level and the service's AI mode settings
//! - **server**: HTTP bind host and port
//! - **execution**: Task execution mode, concurrency bound and record retention
//! - **optimizer**: Self-optimization counter start, step and cap
//! - **websearch**: External search endpoint and timeout
//!
//! Every section has defaults, so an empty file is a valid configuration.
//!
//! # Examples
//!
//! ```no_run
//! use edithra_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Listening on {}", config.server.bind_address());
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Accepted values for `core.log_level` and the `--log` flag
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Core service settings
    #[serde(default)]
    pub core: CoreConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Task execution settings
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Self-optimization counter settings
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Web search collaborator settings
    #[serde(default)]
    pub websearch: WebSearchConfig,
}

/// Core service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Reported by the status endpoint
    #[serde(default = "default_ai_mode")]
    pub ai_mode: String,

    /// Reported by the status endpoint
    #[serde(default = "default_execution_speed")]
    pub execution_speed: String,

    /// Forces debug logging regardless of `log_level`
    #[serde(default)]
    pub debug_mode: bool,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// How launched tasks are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Status is recorded and the caller gets an awaitable handle
    #[default]
    Tracked,
    /// Fire and forget: nothing is recorded, the handle cannot be awaited
    Detached,
}

/// Task execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Maximum number of task units running at the same time
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Tracked execution records kept before the oldest completed ones are evicted
    #[serde(default = "default_max_tracked")]
    pub max_tracked: usize,
}

/// Self-optimization counter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default = "default_initial_level")]
    pub initial_level: u32,

    #[serde(default = "default_step")]
    pub step: u32,

    #[serde(default = "default_max_level")]
    pub max_level: u32,
}

/// Web search collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Instant-answer endpoint queried with `?q=<query>&format=json`
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_ai_mode() -> String {
    "consciousness_enabled".to_string()
}

fn default_execution_speed() -> String {
    "optimized".to_string()
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_concurrent() -> usize {
    16
}

fn default_max_tracked() -> usize {
    1024
}

fn default_initial_level() -> u32 {
    90
}

fn default_step() -> u32 {
    5
}

fn default_max_level() -> u32 {
    100
}

fn default_search_endpoint() -> String {
    "https://api.duckduckgo.com/".to_string()
}

fn default_search_timeout() -> u64 {
    10
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            ai_mode: default_ai_mode(),
            execution_speed: default_execution_speed(),
            debug_mode: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            max_concurrent: default_max_concurrent(),
            max_tracked: default_max_tracked(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            initial_level: default_initial_level(),
            step: default_step(),
            max_level: default_max_level(),
        }
    }
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_search_endpoint(),
            timeout_secs: default_search_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.edithra/config.toml)
    ///
    /// If the configuration file doesn't exist, writes the default configuration
    /// there first.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default();
        fs::write(path, config.to_toml_string()?)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Wrote default configuration to {}", path.display());
        Ok(config)
    }

    /// Get the default configuration file path (~/.edithra/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".edithra").join("config.toml"))
    }

    /// Log level after applying `debug_mode`
    pub fn effective_log_level(&self) -> &str {
        if self.core.debug_mode {
            "debug"
        } else {
            &self.core.log_level
        }
    }

    /// Validate field ranges and enumerations
    pub fn validate(&self) -> Result<(), EngineError> {
        if !LOG_LEVELS.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.server.host.trim().is_empty() {
            return Err(EngineError::Config("server.host must not be empty".to_string()));
        }

        if self.execution.max_concurrent == 0 {
            return Err(EngineError::Config(
                "execution.max_concurrent must be at least 1".to_string(),
            ));
        }

        if self.execution.max_tracked == 0 {
            return Err(EngineError::Config(
                "execution.max_tracked must be at least 1".to_string(),
            ));
        }

        if self.optimizer.initial_level > self.optimizer.max_level {
            return Err(EngineError::Config(format!(
                "optimizer.initial_level ({}) must not exceed optimizer.max_level ({})",
                self.optimizer.initial_level, self.optimizer.max_level
            )));
        }

        if self.websearch.enabled {
            if !(self.websearch.endpoint.starts_with("http://")
                || self.websearch.endpoint.starts_with("https://"))
            {
                return Err(EngineError::Config(format!(
                    "websearch.endpoint must be an http(s) URL, got '{}'",
                    self.websearch.endpoint
                )));
            }
            if self.websearch.timeout_secs == 0 {
                return Err(EngineError::Config(
                    "websearch.timeout_secs must be at least 1".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default();

        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.core.ai_mode, "consciousness_enabled");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.execution.mode, ExecutionMode::Tracked);
        assert_eq!(config.optimizer.initial_level, 90);
        assert_eq!(config.optimizer.step, 5);
        assert_eq!(config.optimizer.max_level, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.server.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_debug_mode_overrides_log_level() {
        let mut config = Config::default();
        assert_eq!(config.effective_log_level(), "info");

        config.core.debug_mode = true;
        assert_eq!(config.effective_log_level(), "debug");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let err = Config::from_toml_str("[core]\nlog_level = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("Invalid log level 'loud'"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = Config::from_toml_str("[execution]\nmax_concurrent = 0\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_zero_tracked_records_rejected() {
        let err = Config::from_toml_str("[execution]\nmax_tracked = 0\n").unwrap_err();
        assert!(err.to_string().contains("execution.max_tracked"));
        assert_eq!(Config::default().execution.max_tracked, 1024);
    }

    #[test]
    fn test_optimizer_bounds_rejected() {
        let toml = "[optimizer]\ninitial_level = 120\nmax_level = 100\n";
        assert!(Config::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_detached_mode_parses() {
        let config = Config::from_toml_str("[execution]\nmode = \"detached\"\n").unwrap();
        assert_eq!(config.execution.mode, ExecutionMode::Detached);
    }

    #[test]
    fn test_websearch_endpoint_must_be_http() {
        let err = Config::from_toml_str("[websearch]\nendpoint = \"ftp://example\"\n").unwrap_err();
        assert!(err.to_string().contains("websearch.endpoint"));

        // Disabled search skips endpoint checks
        let ok = Config::from_toml_str("[websearch]\nenabled = false\nendpoint = \"\"\n");
        assert!(ok.is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_string = config.to_toml_string().unwrap();

        let deserialized: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(config.core.log_level, deserialized.core.log_level);
        assert_eq!(config.server.port, deserialized.server.port);
        assert_eq!(config.execution.mode, deserialized.execution.mode);
    }
}
