//! Testing utilities for wordhint workspace
//!
//! Shared fixtures: sample categories, catalogs, seeded RNGs and fixed clocks.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use wordhint_core::{Catalog, Category, GameConfig, SessionStore};

/// Category data in the on-disk JSON format
pub const SAMPLE_WORDS_JSON: &str = r#"{
  "categories": [
    {"category": "Nature", "key_word": "OCEAN", "hints": ["Found on Earth", "Salty", "Covers 70%"]},
    {"category": "Animals", "key_word": "TIGER", "hints": ["Has stripes", "Big cat", "Lives in Asia"]},
    {"category": "Food", "key_word": "BREAD", "hints": ["Baked", "Sliced", "Made from flour"]},
    {"category": "Space", "key_word": "COMET", "hints": ["Has a tail", "Made of ice", "Orbits the Sun"]},
    {"category": "Music", "key_word": "PIANO", "hints": ["Has keys", "Black and white", "88 of them"]},
    {"category": "Sports", "key_word": "TENNIS", "hints": ["Uses a racket", "Played on a court", "Wimbledon"]}
  ]
}"#;

pub fn ocean_category() -> Category {
    Category::new("Nature", "OCEAN", ["Found on Earth", "Salty", "Covers 70%"])
}

/// Catalog containing only the OCEAN category, so every pick is deterministic
pub fn ocean_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(vec![ocean_category()]).unwrap())
}

/// Six-category catalog parsed from [`SAMPLE_WORDS_JSON`]
pub fn sample_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_json_str(SAMPLE_WORDS_JSON).unwrap())
}

pub fn ocean_store(config: GameConfig) -> SessionStore {
    SessionStore::new(ocean_catalog(), config)
}

pub fn sample_store(config: GameConfig) -> SessionStore {
    SessionStore::new(sample_catalog(), config)
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Fixed point in time for expiry arithmetic
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}
