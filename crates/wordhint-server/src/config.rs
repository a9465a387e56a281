//! Server configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then CLI flags and
//! environment variables (see [`crate::cli`]). Validated once at startup.

use crate::error::ConfigLoadError;
use crate::server::Timeouts;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use wordhint_core::GameConfig;

/// Default bind port
pub const DEFAULT_PORT: u16 = 8080;

/// Default number of preloaded sessions
pub const DEFAULT_PRELOAD_COUNT: usize = 5;

/// Default sweep period in seconds
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Default read, write and idle timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: IpAddr,
    /// Bind port
    pub port: u16,
    /// Category data file
    pub words_path: PathBuf,
    /// Static file root served under `/public/`
    pub public_dir: PathBuf,
    /// Preloaded sessions created at startup
    pub preload_count: usize,
    /// Background sweep period, in seconds
    pub sweep_interval_secs: u64,
    /// Time allowed to receive request headers, in seconds
    pub read_timeout_secs: u64,
    /// Time allowed to produce a response, in seconds
    pub write_timeout_secs: u64,
    /// TCP keep-alive period for idle connections, in seconds
    pub idle_timeout_secs: u64,
    /// Game policy
    pub game: GameConfig,
}

impl ServerConfig {
    /// Parse configuration from TOML; missing keys take their defaults
    ///
    /// # Errors
    /// Returns `ConfigLoadError::Toml` on malformed input.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(toml)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns `ConfigLoadError::Io` if the file cannot be read, otherwise as
    /// [`ServerConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let toml = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&toml)
    }

    /// Check that the configuration is usable
    ///
    /// # Errors
    /// - `ConfigLoadError::InvalidSweepInterval` for a zero sweep period
    /// - `ConfigLoadError::InvalidTimeout` for a zero timeout
    /// - `ConfigLoadError::Game` for an invalid game policy
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.sweep_interval_secs == 0 {
            return Err(ConfigLoadError::InvalidSweepInterval);
        }
        for (name, secs) in [
            ("read_timeout_secs", self.read_timeout_secs),
            ("write_timeout_secs", self.write_timeout_secs),
            ("idle_timeout_secs", self.idle_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigLoadError::InvalidTimeout(name));
            }
        }
        self.game.validate()?;
        Ok(())
    }

    /// Socket address to bind
    #[inline]
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Background sweep period
    #[inline]
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Connection timeouts
    #[must_use]
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            read: Duration::from_secs(self.read_timeout_secs),
            write: Duration::from_secs(self.write_timeout_secs),
            idle: Duration::from_secs(self.idle_timeout_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            words_path: PathBuf::from("words.json"),
            public_dir: PathBuf::from("public"),
            preload_count: DEFAULT_PRELOAD_COUNT,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            read_timeout_secs: DEFAULT_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_TIMEOUT_SECS,
            idle_timeout_secs: DEFAULT_TIMEOUT_SECS,
            game: GameConfig::default(),
        }
    }
}
