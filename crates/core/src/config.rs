//! Explicit configuration passed down to the theme resolver and exporter.

use crate::types::Language;
use std::path::PathBuf;

/// Deck generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckConfig {
    /// Directory exported decks are written to.
    pub export_dir: PathBuf,
    /// Prefix of the public reference returned for an export (e.g. `/exports`).
    pub public_prefix: String,
    /// Directory holding `<template_id>.json` theme templates, if any.
    pub theme_dir: Option<PathBuf>,
    /// Language used when a request does not name one.
    pub default_language: Language,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("exports"),
            public_prefix: "/exports".to_string(),
            theme_dir: None,
            default_language: Language::Chinese,
        }
    }
}

impl DeckConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Set the public prefix. Trailing slashes are dropped.
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.public_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_theme_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.theme_dir = dir;
        self
    }

    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeckConfig::new();
        assert_eq!(config.export_dir, PathBuf::from("exports"));
        assert_eq!(config.public_prefix, "/exports");
        assert!(config.theme_dir.is_none());
    }

    #[test]
    fn test_public_prefix_trailing_slash() {
        let config = DeckConfig::new().with_public_prefix("/static/decks/");
        assert_eq!(config.public_prefix, "/static/decks");
    }
}
