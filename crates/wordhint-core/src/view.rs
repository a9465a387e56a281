//! View model handed to rendering

use serde::Serialize;

/// Page title of the game view
pub const GAME_TITLE: &str = "Word Guessing Game";

/// Read-only projection of a session
///
/// Built by [`Session::view`](crate::session::Session::view). The keyword is
/// only present once the game is won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub title: String,
    pub current_hint: String,
    pub all_hints: Vec<String>,
    pub extra_hints: Vec<String>,
    pub guesses: Vec<String>,
    pub attempts: usize,
    pub max_attempts: usize,
    pub attempts_remaining: usize,
    pub won: bool,
    pub exhausted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl GameView {
    /// Whether the page should still offer the guess form
    #[inline]
    #[must_use]
    pub fn accepts_guesses(&self) -> bool {
        !self.won && !self.exhausted
    }
}
