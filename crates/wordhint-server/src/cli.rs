//! Command-line interface
//!
//! Flags override values from the config file; most flags can also be set
//! through environment variables.

use crate::config::ServerConfig;
use crate::error::ConfigLoadError;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::net::IpAddr;
use std::path::PathBuf;

/// Build the `wordhint` command
#[must_use]
pub fn command() -> Command {
    Command::new("wordhint")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Word guessing game server")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .env("WORDHINT_CONFIG")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .env("WORDHINT_HOST")
                .value_parser(value_parser!(IpAddr))
                .help("Address to bind"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .env("PORT")
                .value_parser(value_parser!(u16))
                .help("Port to bind"),
        )
        .arg(
            Arg::new("words")
                .long("words")
                .env("WORDHINT_WORDS")
                .value_parser(value_parser!(PathBuf))
                .help("Category data file (JSON)"),
        )
        .arg(
            Arg::new("public-dir")
                .long("public-dir")
                .value_parser(value_parser!(PathBuf))
                .help("Directory served under /public/"),
        )
        .arg(
            Arg::new("preload")
                .long("preload")
                .value_parser(value_parser!(usize))
                .help("Number of sessions to preload at startup"),
        )
        .arg(
            Arg::new("sweep-interval")
                .long("sweep-interval")
                .value_parser(value_parser!(u64))
                .help("Seconds between expired-session sweeps"),
        )
        .arg(
            Arg::new("max-attempts")
                .long("max-attempts")
                .value_parser(value_parser!(usize))
                .help("Guesses allowed per game"),
        )
        .arg(
            Arg::new("session-ttl")
                .long("session-ttl")
                .value_parser(value_parser!(u64))
                .help("Session lifetime in seconds"),
        )
        .arg(
            Arg::new("case-sensitive")
                .long("case-sensitive")
                .action(ArgAction::SetTrue)
                .help("Compare guesses to the keyword case-sensitively"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .env("WORDHINT_LOG_JSON")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
}

/// Whether JSON log output was requested
#[must_use]
pub fn log_json(matches: &ArgMatches) -> bool {
    matches.get_flag("log-json")
}

/// Resolve the effective configuration from parsed arguments
///
/// # Errors
/// Returns an error if the config file cannot be loaded or the merged
/// configuration is invalid.
pub fn load_config(matches: &ArgMatches) -> Result<ServerConfig, ConfigLoadError> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ServerConfig::from_path(path)?,
        None => ServerConfig::default(),
    };

    if let Some(host) = matches.get_one::<IpAddr>("host") {
        config.host = *host;
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.port = *port;
    }
    if let Some(words) = matches.get_one::<PathBuf>("words") {
        config.words_path = words.clone();
    }
    if let Some(dir) = matches.get_one::<PathBuf>("public-dir") {
        config.public_dir = dir.clone();
    }
    if let Some(count) = matches.get_one::<usize>("preload") {
        config.preload_count = *count;
    }
    if let Some(secs) = matches.get_one::<u64>("sweep-interval") {
        config.sweep_interval_secs = *secs;
    }
    if let Some(max) = matches.get_one::<usize>("max-attempts") {
        config.game.max_attempts = *max;
    }
    if let Some(secs) = matches.get_one::<u64>("session-ttl") {
        config.game.session_ttl_secs = *secs;
    }
    if matches.get_flag("case-sensitive") {
        config.game.case_sensitive = true;
    }

    config.validate()?;
    Ok(config)
}
