//! Error types for wordhint core
//!
//! Split by concern:
//! - Catalog loading failures (fatal at startup)
//! - Guess validation failures (client errors)
//! - Configuration validation failures (fatal at startup)

use crate::session::GamePhase;
use std::path::PathBuf;

/// Main wordhint error type
#[derive(Debug, thiserror::Error)]
pub enum WordhintError {
    /// Category data could not be loaded
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Guess was rejected
    #[error("guess rejected: {0}")]
    Guess(#[from] GuessError),

    /// Configuration is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl WordhintError {
    /// Check if the error was caused by the request rather than the server
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Guess(_))
    }
}

/// Category data loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Data file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was opened
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Data file is not valid JSON of the expected shape
    #[error("failed to decode category data: {0}")]
    Parse(#[from] serde_json::Error),

    /// No categories were provided
    #[error("category list is empty")]
    Empty,

    /// A category entry is unusable
    #[error("category #{index} is invalid: {reason}")]
    InvalidCategory {
        /// Zero-based position in the source list
        index: usize,
        /// What is wrong with it
        reason: String,
    },
}

/// Guess submission errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuessError {
    /// Blank guess
    #[error("Guess cannot be empty")]
    Empty,

    /// Session no longer accepts guesses
    #[error("game is already over ({0})")]
    SessionFinished(GamePhase),
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `max_attempts` must allow at least one guess
    #[error("max_attempts must be at least 1")]
    InvalidMaxAttempts,

    /// Session lifetime must be positive and representable
    #[error("session_ttl_secs must be between 1 and {max}, got {got}")]
    InvalidSessionTtl {
        /// Value supplied
        got: u64,
        /// Largest accepted value
        max: u64,
    },

    /// Extra-hint threshold that can never be reached
    #[error("extra hint threshold {after_guesses} is outside 1..={max_attempts}")]
    UnreachableExtraHint {
        /// Configured threshold
        after_guesses: usize,
        /// Configured attempt limit
        max_attempts: usize,
    },
}
