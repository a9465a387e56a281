//! Per-player game session and the hint-reveal state machine
//!
//! A session moves `Fresh -> InProgress -> {Won, Exhausted}`. Terminal
//! sessions are never revived: the store replaces them on next access.

use crate::catalog::Category;
use crate::error::GuessError;
use crate::types::GameConfig;
use crate::view::{GameView, GAME_TITLE};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Phase of a session in the hint-reveal state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No hint revealed yet
    Fresh,
    /// At least one hint revealed, guesses remain
    InProgress,
    /// Keyword guessed
    Won,
    /// Attempt limit reached without a correct guess
    Exhausted,
}

impl GamePhase {
    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::InProgress => "in_progress",
            Self::Won => "won",
            Self::Exhausted => "exhausted",
        }
    }

    /// Whether the session accepts no further guesses
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::Exhausted)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an accepted guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Guess matched the keyword
    Correct,
    /// Guess did not match
    Incorrect {
        /// Whether another hint was revealed
        revealed_hint: bool,
    },
}

/// Why the store discarded a session and started a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplaceReason {
    /// No session under that id
    Missing,
    /// Expiry timestamp has passed
    Expired,
    /// Previous game was won
    Won,
    /// Previous game ran out of attempts
    Exhausted,
}

impl ReplaceReason {
    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Expired => "expired",
            Self::Won => "won",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for ReplaceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable game state for one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    category: Arc<Category>,
    hint_index: usize,
    guesses: Vec<String>,
    won: bool,
    extra_hints: Vec<String>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Start a fresh game on `category`, stale after `expires_at`
    #[must_use]
    pub fn new(category: Arc<Category>, expires_at: DateTime<Utc>) -> Self {
        Self {
            category,
            hint_index: 0,
            guesses: Vec::new(),
            won: false,
            extra_hints: Vec::new(),
            expires_at,
        }
    }

    /// Category name
    #[inline]
    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.category.name
    }

    /// Word to guess
    #[inline]
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.category.keyword
    }

    /// All hints of the category, revealed or not
    #[inline]
    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.category.hints
    }

    /// Number of hints revealed so far
    #[inline]
    #[must_use]
    pub fn hint_index(&self) -> usize {
        self.hint_index
    }

    /// Guesses submitted so far, oldest first
    #[inline]
    #[must_use]
    pub fn guesses(&self) -> &[String] {
        &self.guesses
    }

    /// Number of guesses submitted
    #[inline]
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.guesses.len()
    }

    /// Whether the keyword has been guessed
    #[inline]
    #[must_use]
    pub fn won(&self) -> bool {
        self.won
    }

    /// Supplementary hints unlocked so far
    #[inline]
    #[must_use]
    pub fn extra_hints(&self) -> &[String] {
        &self.extra_hints
    }

    /// Absolute expiry time
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Stale once `now` is past the expiry timestamp
    #[inline]
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Current phase under `config`
    #[must_use]
    pub fn phase(&self, config: &GameConfig) -> GamePhase {
        if self.won {
            GamePhase::Won
        } else if self.guesses.len() >= config.max_attempts {
            GamePhase::Exhausted
        } else if self.hint_index == 0 {
            GamePhase::Fresh
        } else {
            GamePhase::InProgress
        }
    }

    /// Reason this session must be replaced on access, if any
    #[must_use]
    pub fn replace_reason(&self, now: DateTime<Utc>, config: &GameConfig) -> Option<ReplaceReason> {
        if self.is_expired(now) {
            return Some(ReplaceReason::Expired);
        }
        match self.phase(config) {
            GamePhase::Won => Some(ReplaceReason::Won),
            GamePhase::Exhausted => Some(ReplaceReason::Exhausted),
            GamePhase::Fresh | GamePhase::InProgress => None,
        }
    }

    /// Apply a guess
    ///
    /// # Errors
    /// - `GuessError::Empty` for a blank guess
    /// - `GuessError::SessionFinished` if the game is already won or exhausted
    ///
    /// Neither error mutates the session.
    pub fn submit_guess(
        &mut self,
        guess: &str,
        config: &GameConfig,
    ) -> Result<GuessOutcome, GuessError> {
        let guess = guess.trim();
        if guess.is_empty() {
            return Err(GuessError::Empty);
        }
        let phase = self.phase(config);
        if phase.is_terminal() {
            return Err(GuessError::SessionFinished(phase));
        }

        self.guesses.push(guess.to_string());

        if config.is_match(guess, &self.category.keyword) {
            self.won = true;
            return Ok(GuessOutcome::Correct);
        }

        let revealed_hint = self.hint_index < self.category.hints.len();
        if revealed_hint {
            self.hint_index += 1;
        }

        // exact equality: each rule fires once
        let attempts = self.guesses.len();
        for rule in config.extra_hints.iter().filter(|r| r.after_guesses == attempts) {
            self.extra_hints
                .push(rule.kind.render(&self.category.name, &self.category.keyword));
        }

        Ok(GuessOutcome::Incorrect { revealed_hint })
    }

    /// Record that the session has been shown to the player
    ///
    /// The first render reveals the first hint.
    pub fn mark_rendered(&mut self) {
        if self.hint_index == 0 {
            self.hint_index = 1;
        }
    }

    /// Number of hints to display: at least one, never past the end
    #[inline]
    #[must_use]
    pub fn visible_hints(&self) -> usize {
        self.hint_index.max(1).min(self.category.hints.len())
    }

    /// Project the session into the view consumed by rendering
    #[must_use]
    pub fn view(&self, config: &GameConfig) -> GameView {
        let visible = self.visible_hints();
        let hints = &self.category.hints[..visible];
        GameView {
            title: GAME_TITLE.to_string(),
            current_hint: hints.last().cloned().unwrap_or_default(),
            all_hints: hints.to_vec(),
            extra_hints: self.extra_hints.clone(),
            guesses: self.guesses.clone(),
            attempts: self.guesses.len(),
            max_attempts: config.max_attempts,
            attempts_remaining: config.max_attempts.saturating_sub(self.guesses.len()),
            won: self.won,
            exhausted: self.phase(config) == GamePhase::Exhausted,
            keyword: self.won.then(|| self.category.keyword.clone()),
        }
    }
}
