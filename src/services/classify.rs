// src/services/classify.rs

//! Category classification from free-text product names.
//!
//! Product records carry no category column; the category is inferred
//! from the name on every pass, using the configured keyword rules.

use crate::models::{CategoryRule, Config};

/// Keyword-based product category classifier.
///
/// Rules are evaluated in order and the first rule with a matching
/// keyword wins, so overlapping keyword lists resolve to the earlier
/// rule. Names matching nothing get the fallback label.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: Vec<CategoryRule>,
    fallback: String,
}

impl CategoryClassifier {
    /// Build a classifier from explicit rules.
    pub fn new(rules: Vec<CategoryRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Build a classifier from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.categories.clone(), config.fallback_category.clone())
    }

    /// Classify a product name.
    ///
    /// Total: always returns one of the configured labels or the
    /// fallback, never fails.
    pub fn classify(&self, produto: &str) -> &str {
        let lower = produto.to_lowercase();
        for rule in &self.rules {
            if rule.keywords.iter().any(|k| lower.contains(k.as_str())) {
                return &rule.label;
            }
        }
        &self.fallback
    }

    /// All labels this classifier can return, fallback last.
    pub fn labels(&self) -> Vec<&str> {
        self.rules
            .iter()
            .map(|r| r.label.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
            .collect()
    }
}
