//! Configuration management for Cogito
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{CogitoError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Cogito
///
/// This structure holds all configuration consumed by the core:
/// evaluator complexity bounds, recall window sizing, storage location,
/// and the HTTP server bind address.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Expression evaluator limits
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    /// Conversation recall settings
    #[serde(default)]
    pub recall: RecallConfig,

    /// Conversation storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Expression evaluator complexity bounds
///
/// These limits are the sole defense against adversarial expressions:
/// the length gate runs before any parsing, the depth cap bounds parser
/// recursion, and the overflow bound stops unbounded growth from nested
/// exponentiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Maximum raw expression length in characters
    #[serde(default = "default_max_expression_length")]
    pub max_expression_length: usize,

    /// Maximum AST nesting depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum absolute magnitude of any intermediate or final result
    #[serde(default = "default_overflow_bound")]
    pub overflow_bound: f64,
}

fn default_max_expression_length() -> usize {
    256
}

fn default_max_depth() -> usize {
    32
}

fn default_overflow_bound() -> f64 {
    1e15
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_expression_length: default_max_expression_length(),
            max_depth: default_max_depth(),
            overflow_bound: default_overflow_bound(),
        }
    }
}

/// Conversation recall configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallConfig {
    /// Number of turns returned when a recall request names no count
    #[serde(default = "default_recall_window")]
    pub default_window: usize,
}

fn default_recall_window() -> usize {
    5
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            default_window: default_recall_window(),
        }
    }
}

/// Conversation storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Database file path
    ///
    /// When unset the store lives in the platform data directory
    /// (see [`crate::storage::TurnStore::new`]).
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CogitoError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| CogitoError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(db_path) = std::env::var("COGITO_DB") {
            self.storage.db_path = Some(PathBuf::from(db_path));
        }

        if let Ok(host) = std::env::var("COGITO_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("COGITO_PORT") {
            if let Ok(value) = port.parse() {
                self.server.port = value;
            } else {
                tracing::warn!("Invalid COGITO_PORT: {}", port);
            }
        }

        if let Ok(length) = std::env::var("COGITO_MAX_EXPRESSION_LENGTH") {
            if let Ok(value) = length.parse() {
                self.evaluator.max_expression_length = value;
            } else {
                tracing::warn!("Invalid COGITO_MAX_EXPRESSION_LENGTH: {}", length);
            }
        }

        if let Ok(window) = std::env::var("COGITO_RECALL_WINDOW") {
            if let Ok(value) = window.parse() {
                self.recall.default_window = value;
            } else {
                tracing::warn!("Invalid COGITO_RECALL_WINDOW: {}", window);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(db_path) = &cli.db_path {
            self.storage.db_path = Some(db_path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.evaluator.max_expression_length == 0 {
            return Err(CogitoError::Config(
                "evaluator.max_expression_length must be greater than 0".to_string(),
            )
            .into());
        }

        if self.evaluator.max_expression_length > 65_536 {
            return Err(CogitoError::Config(
                "evaluator.max_expression_length must be at most 65536".to_string(),
            )
            .into());
        }

        if self.evaluator.max_depth == 0 {
            return Err(
                CogitoError::Config("evaluator.max_depth must be greater than 0".to_string())
                    .into(),
            );
        }

        if self.evaluator.max_depth > 4096 {
            return Err(CogitoError::Config(
                "evaluator.max_depth must be at most 4096".to_string(),
            )
            .into());
        }

        if !self.evaluator.overflow_bound.is_finite() || self.evaluator.overflow_bound <= 0.0 {
            return Err(CogitoError::Config(
                "evaluator.overflow_bound must be a positive finite number".to_string(),
            )
            .into());
        }

        if self.recall.default_window == 0 {
            return Err(CogitoError::Config(
                "recall.default_window must be greater than 0".to_string(),
            )
            .into());
        }

        if self.server.host.is_empty() {
            return Err(CogitoError::Config("server.host cannot be empty".to_string()).into());
        }

        Ok(())
    }
}
