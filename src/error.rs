//! Error types for Cogito
//!
//! This module defines the application-level error type, using `thiserror`
//! for ergonomic error handling. Evaluator failures have their own taxonomy
//! in [`crate::eval::EvalError`] because every one of them is recovered into
//! a user-facing reply by the dispatcher rather than propagated.

use thiserror::Error;

/// Main error type for Cogito operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, conversation storage, and the server lifecycle.
/// None of these are fatal to a chat exchange: the dispatcher always
/// returns a reply string to the caller.
#[derive(Error, Debug)]
pub enum CogitoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Conversation storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// HTTP server errors (bind failures, shutdown)
    #[error("Server error: {0}")]
    Server(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Cogito operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
