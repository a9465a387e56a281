//! Core types for wordhint
//!
//! Defines:
//! - Session identifiers
//! - Game policy configuration
//! - Extra-hint rules

use crate::error::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by all preloaded session identifiers
pub const PRELOADED_PREFIX: &str = "preloaded-";

/// Default number of guesses per session
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Default session lifetime (10 minutes)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 600;

/// Longest accepted session lifetime (one year)
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Session identifier, the value of the `session_id` cookie
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap an existing identifier (e.g. a cookie value)
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Reserved identifier for the `n`-th preloaded session (1-based)
    #[inline]
    #[must_use]
    pub fn preloaded(n: usize) -> Self {
        Self(format!("{PRELOADED_PREFIX}{n}"))
    }

    /// Fresh identifier: decimal string of a random non-negative 63-bit integer
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let value = rng.random::<u64>() >> 1;
        Self(value.to_string())
    }

    /// Whether this id was reserved by preloading
    #[inline]
    #[must_use]
    pub fn is_preloaded(&self) -> bool {
        self.0.starts_with(PRELOADED_PREFIX)
    }

    /// Borrow the raw identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Kind of supplementary hint unlocked after repeated misses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraHintKind {
    /// Reveal the category name
    Category,
    /// Reveal the number of letters in the keyword
    KeywordLength,
}

impl ExtraHintKind {
    /// Render the supplementary hint text for a given category and keyword
    #[must_use]
    pub fn render(self, category: &str, keyword: &str) -> String {
        match self {
            Self::Category => format!("The category is {category}"),
            Self::KeywordLength => {
                format!("The word has {} letters", keyword.chars().count())
            }
        }
    }
}

/// One-shot extra hint fired when the guess count reaches `after_guesses`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraHintRule {
    /// Exact number of (wrong) guesses that unlocks the hint
    pub after_guesses: usize,
    /// What the hint reveals
    pub kind: ExtraHintKind,
}

impl ExtraHintRule {
    /// Create new rule
    #[inline]
    #[must_use]
    pub fn new(after_guesses: usize, kind: ExtraHintKind) -> Self {
        Self {
            after_guesses,
            kind,
        }
    }
}

/// Game policy configuration
///
/// Every rule that differed between historical deployments of the game is a
/// field here instead of a constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Guesses allowed per session
    pub max_attempts: usize,
    /// Compare guesses to the keyword case-sensitively
    pub case_sensitive: bool,
    /// Lifetime of new and preloaded sessions, in seconds
    pub session_ttl_secs: u64,
    /// Supplementary hints unlocked at exact guess counts
    pub extra_hints: Vec<ExtraHintRule>,
}

impl GameConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max attempts
    #[inline]
    #[must_use]
    pub fn with_max_attempts(mut self, max: usize) -> Self {
        self.max_attempts = max;
        self
    }

    /// With case sensitivity
    #[inline]
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// With session lifetime
    #[inline]
    #[must_use]
    pub fn with_session_ttl_secs(mut self, secs: u64) -> Self {
        self.session_ttl_secs = secs;
        self
    }

    /// With an additional extra-hint rule
    #[inline]
    #[must_use]
    pub fn with_extra_hint(mut self, after_guesses: usize, kind: ExtraHintKind) -> Self {
        self.extra_hints.push(ExtraHintRule::new(after_guesses, kind));
        self
    }

    /// Check that the configuration is usable
    ///
    /// # Errors
    /// - `ConfigError::InvalidMaxAttempts` if no guesses are allowed
    /// - `ConfigError::InvalidSessionTtl` if the lifetime is zero or too large
    /// - `ConfigError::UnreachableExtraHint` if a rule can never fire
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts);
        }
        if self.session_ttl_secs == 0 || self.session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::InvalidSessionTtl {
                got: self.session_ttl_secs,
                max: MAX_SESSION_TTL_SECS,
            });
        }
        if let Some(rule) = self
            .extra_hints
            .iter()
            .find(|r| r.after_guesses == 0 || r.after_guesses > self.max_attempts)
        {
            return Err(ConfigError::UnreachableExtraHint {
                after_guesses: rule.after_guesses,
                max_attempts: self.max_attempts,
            });
        }
        Ok(())
    }

    /// Session lifetime as a chrono duration
    #[inline]
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        let secs = self.session_ttl_secs.min(MAX_SESSION_TTL_SECS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000))
    }

    /// Compare a guess against the keyword under the configured case policy
    #[must_use]
    pub fn is_match(&self, guess: &str, keyword: &str) -> bool {
        if self.case_sensitive {
            guess == keyword
        } else {
            guess.to_lowercase() == keyword.to_lowercase()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            case_sensitive: false,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            extra_hints: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn session_id_preloaded() {
        let id = SessionId::preloaded(3);
        assert_eq!(id.as_str(), "preloaded-3");
        assert!(id.is_preloaded());
        assert!(!SessionId::new("12345").is_preloaded());
    }

    #[test]
    fn session_id_random_is_decimal() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = SessionId::random(&mut rng);
        assert!(id.as_str().parse::<i64>().is_ok());
        assert!(!id.is_preloaded());
    }

    #[test]
    fn game_config_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert!(!config.case_sensitive);
        assert_eq!(config.session_ttl(), chrono::Duration::minutes(10));
        assert!(config.extra_hints.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn game_config_validation() {
        assert_eq!(
            GameConfig::new().with_max_attempts(0).validate(),
            Err(ConfigError::InvalidMaxAttempts)
        );
        assert!(matches!(
            GameConfig::new().with_session_ttl_secs(0).validate(),
            Err(ConfigError::InvalidSessionTtl { got: 0, .. })
        ));
        assert!(matches!(
            GameConfig::new()
                .with_extra_hint(6, ExtraHintKind::Category)
                .validate(),
            Err(ConfigError::UnreachableExtraHint { after_guesses: 6, .. })
        ));
        assert!(GameConfig::new()
            .with_max_attempts(20)
            .with_extra_hint(3, ExtraHintKind::Category)
            .with_extra_hint(5, ExtraHintKind::KeywordLength)
            .validate()
            .is_ok());
    }

    #[test]
    fn keyword_match_policy() {
        let insensitive = GameConfig::new();
        assert!(insensitive.is_match("ocean", "OCEAN"));
        assert!(insensitive.is_match("Ocean", "OCEAN"));
        assert!(!insensitive.is_match("oceans", "OCEAN"));

        let sensitive = GameConfig::new().with_case_sensitive(true);
        assert!(sensitive.is_match("OCEAN", "OCEAN"));
        assert!(!sensitive.is_match("ocean", "OCEAN"));
    }

    #[test]
    fn extra_hint_rendering() {
        assert_eq!(
            ExtraHintKind::Category.render("Nature", "OCEAN"),
            "The category is Nature"
        );
        assert_eq!(
            ExtraHintKind::KeywordLength.render("Nature", "OCEAN"),
            "The word has 5 letters"
        );
    }

    #[test]
    fn game_config_deserializes_partial() {
        let config: GameConfig = serde_json::from_str(
            r#"{"max_attempts": 20, "extra_hints": [{"after_guesses": 3, "kind": "category"}]}"#,
        )
        .unwrap();
        assert_eq!(config.max_attempts, 20);
        assert_eq!(config.session_ttl_secs, DEFAULT_SESSION_TTL_SECS);
        assert_eq!(
            config.extra_hints,
            vec![ExtraHintRule::new(3, ExtraHintKind::Category)]
        );
    }
}
