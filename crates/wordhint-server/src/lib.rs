//! wordhint server - HTTP front end for the word guessing game
//!
//! Wires the core crate to the outside world:
//! - Loads configuration and the category catalog
//! - Preloads sessions and runs the background expiry sweep
//! - Serves the landing page, the game page and static files over warp
//! - Shuts down gracefully on Ctrl-C

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod server;
pub mod sweeper;

pub use config::ServerConfig;
pub use error::{ConfigLoadError, RenderError};
pub use handlers::{AppState, SESSION_COOKIE};
pub use routes::routes;
pub use server::Timeouts;
pub use sweeper::spawn_sweeper;

use anyhow::Context;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use wordhint_core::SessionStore;

/// Load the catalog and build a store with preloaded sessions
///
/// # Errors
/// Returns an error if the category data cannot be loaded.
pub fn build_store(config: &ServerConfig) -> anyhow::Result<Arc<SessionStore>> {
    let store = SessionStore::open(&config.words_path, config.game.clone()).with_context(|| {
        format!(
            "couldn't set up the game from {}",
            config.words_path.display()
        )
    })?;
    let store = Arc::new(store);

    let preloaded = store.preload(config.preload_count, Utc::now(), &mut rand::rng());
    tracing::info!("Preloaded {} sessions", preloaded.len());

    Ok(store)
}

/// Run the server until `shutdown` resolves
///
/// # Errors
/// Returns an error if the catalog cannot be loaded or the address cannot be bound.
pub async fn run_until<S>(config: ServerConfig, shutdown: S) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let store = build_store(&config)?;
    let sweeper = spawn_sweeper(Arc::clone(&store), config.sweep_interval());

    let app = routes(AppState::new(store), config.public_dir.clone());
    let (addr, server) = server::bind(app, config.addr(), config.timeouts(), shutdown)
        .with_context(|| format!("couldn't bind {}", config.addr()))?;

    tracing::info!("Running word guessing game server on {}", addr);
    let served = server.await;

    sweeper.abort();
    served.context("server failed")?;
    tracing::info!("Server stopped");
    Ok(())
}

/// Run the server until Ctrl-C
///
/// # Errors
/// As [`run_until`].
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    run_until(config, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Couldn't listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
