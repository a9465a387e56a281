//! Error types for the HTTP front end
//!
//! - Startup configuration failures (fatal)
//! - Rendering failures (server errors)
//! - Rejections carried through warp filters to the recovery handler

use std::path::PathBuf;
use wordhint_core::{ConfigError, GuessError, ResolvedSessionId};

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was opened
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML of the expected shape
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Game policy is invalid
    #[error(transparent)]
    Game(#[from] ConfigError),

    /// Sweep period must be positive
    #[error("sweep_interval_secs must be at least 1")]
    InvalidSweepInterval,

    /// Connection timeouts must be positive
    #[error("{0} must be at least 1")]
    InvalidTimeout(&'static str),
}

/// Page rendering failure
#[derive(Debug, thiserror::Error)]
#[error("couldn't render page: {0}")]
pub struct RenderError(#[from] std::fmt::Error);

/// Guess rejected by the state machine
///
/// Carries the session the request resolved to, so a newly assigned id still
/// reaches the client on the error response.
#[derive(Debug)]
pub(crate) struct GuessRejected {
    pub(crate) error: GuessError,
    pub(crate) session: ResolvedSessionId,
}

impl warp::reject::Reject for GuessRejected {}

/// Page could not be produced
#[derive(Debug)]
pub(crate) struct RenderFailed(pub(crate) RenderError);

impl warp::reject::Reject for RenderFailed {}

/// Form body declared a length above the limit
#[derive(Debug)]
pub(crate) struct FormTooLarge;

impl warp::reject::Reject for FormTooLarge {}

/// Response could not be assembled
#[derive(Debug)]
pub(crate) struct InvalidHeader(pub(crate) String);

impl warp::reject::Reject for InvalidHeader {}
