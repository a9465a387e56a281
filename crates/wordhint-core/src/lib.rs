//! wordhint core - word catalog, hint-reveal state machine and session store
//!
//! The pieces a request handler needs:
//! - Loads and validates the category catalog
//! - Tracks one game per cookie id in a lock-guarded session store
//! - Advances the hint-reveal state machine on each guess
//! - Projects sessions into a view model for rendering
//!
//! # Example
//!
//! ```rust,ignore
//! use wordhint_core::prelude::*;
//!
//! let store = SessionStore::open("words.json", GameConfig::default())?;
//!
//! let mut rng = rand::rng();
//! let now = chrono::Utc::now();
//! let resolved = store.resolve_session_id(None, now, &mut rng);
//! let view = store.update(&resolved.id, now, &mut rng, |session| {
//!     session.submit_guess("ocean", store.config())?;
//!     session.mark_rendered();
//!     Ok::<_, GuessError>(session.view(store.config()))
//! })?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod catalog;
pub mod error;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

pub use catalog::{Catalog, Category};
pub use error::{CatalogError, ConfigError, GuessError, WordhintError};
pub use session::{GamePhase, GuessOutcome, ReplaceReason, Session};
pub use store::{ResolvedSessionId, SessionStore};
pub use types::{
    ExtraHintKind, ExtraHintRule, GameConfig, SessionId, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_SESSION_TTL_SECS, MAX_SESSION_TTL_SECS, PRELOADED_PREFIX,
};
pub use view::{GameView, GAME_TITLE};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with wordhint core
    pub use crate::{
        Catalog, Category, GameConfig, GamePhase, GameView, GuessError, GuessOutcome, Session,
        SessionId, SessionStore,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
