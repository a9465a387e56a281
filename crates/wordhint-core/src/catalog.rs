//! Category catalog
//!
//! The static word list, loaded once before serving begins and read-only
//! afterwards. Categories are shared with sessions through `Arc` so a new
//! session never copies hint text.

use crate::error::CatalogError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// A hidden word together with its category and ordered hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name
    #[serde(rename = "category")]
    pub name: String,
    /// Word to guess
    #[serde(rename = "key_word")]
    pub keyword: String,
    /// Hints, revealed in order
    pub hints: Vec<String>,
}

impl Category {
    /// Create new category
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        keyword: impl Into<String>,
        hints: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            keyword: keyword.into(),
            hints: hints.into_iter().map(Into::into).collect(),
        }
    }

    fn check(&self, index: usize) -> Result<(), CatalogError> {
        let reason = if self.name.trim().is_empty() {
            "category name is blank"
        } else if self.keyword.trim().is_empty() {
            "keyword is blank"
        } else if self.hints.is_empty() {
            "no hints"
        } else {
            return Ok(());
        };
        Err(CatalogError::InvalidCategory {
            index,
            reason: reason.to_string(),
        })
    }
}

/// On-disk layout of the category data file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<Category>,
}

/// Non-empty, validated list of categories
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Arc<Category>>,
}

impl Catalog {
    /// Build a catalog from categories
    ///
    /// # Errors
    /// - `CatalogError::Empty` if no categories are given
    /// - `CatalogError::InvalidCategory` for a blank name/keyword or no hints
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        if categories.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, category) in categories.iter().enumerate() {
            category.check(index)?;
        }
        Ok(Self {
            categories: categories.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a catalog from the JSON data format
    ///
    /// # Errors
    /// Returns `CatalogError::Parse` on malformed JSON, otherwise as [`Catalog::new`].
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.categories)
    }

    /// Load a catalog from a JSON file
    ///
    /// # Errors
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise as
    /// [`Catalog::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            categories = catalog.len(),
            "Loaded category catalog"
        );
        Ok(catalog)
    }

    /// Pick a category uniformly at random
    #[must_use]
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Arc<Category> {
        let index = rng.random_range(0..self.categories.len());
        Arc::clone(&self.categories[index])
    }

    /// All categories in a random order
    #[must_use]
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Arc<Category>> {
        let mut categories = self.categories.clone();
        categories.shuffle(rng);
        categories
    }

    /// Number of categories
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always false for a validated catalog
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterate over categories in load order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().map(|c| &**c)
    }
}
