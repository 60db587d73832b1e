//! Theme resolution for named deck styles.
//!
//! A style name maps to a template identifier, whose theme description is
//! fetched from a [`ThemeStore`]. Resolution is total: any failure to load
//! or parse the description degrades to [`Theme::default`].

use crate::color::{normalize_value, Color};
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Template used for any style not listed in [`STYLE_TEMPLATES`].
pub const DEFAULT_TEMPLATE: &str = "template_1";

/// Style name to template identifier lookup table.
const STYLE_TEMPLATES: &[(&str, &str)] = &[
    ("学术风", "template_2"),
    ("academic", "template_2"),
    ("职场风", "template_3"),
    ("business", "template_3"),
    ("教育风", "template_4"),
    ("education", "template_4"),
    ("营销风", "template_5"),
    ("marketing", "template_5"),
];

/// Map a style name to its template identifier.
pub fn template_for_style(style: &str) -> &'static str {
    let style = style.trim();
    STYLE_TEMPLATES
        .iter()
        .find(|(name, _)| *name == style)
        .map(|(_, template)| *template)
        .unwrap_or(DEFAULT_TEMPLATE)
}

/// Fully resolved colors used across every page of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub font_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            accent: Color::ACCENT_BLUE,
            font_color: Color::DARK_GRAY,
        }
    }
}

impl Theme {
    /// Build a theme from a template's theme description.
    ///
    /// Recognized fields are `backgroundColor`, `themeColors` (first entry is
    /// the accent) and `fontColor`; each falls back independently.
    pub fn from_description(description: &Value) -> Self {
        let defaults = Self::default();
        let accent = description
            .get("themeColors")
            .and_then(Value::as_array)
            .and_then(|colors| colors.first());

        Self {
            background: normalize_value(description.get("backgroundColor"), defaults.background),
            accent: normalize_value(accent, defaults.accent),
            font_color: normalize_value(description.get("fontColor"), defaults.font_color),
        }
    }
}

/// Key-value lookup from template identifier to theme description.
pub trait ThemeStore {
    /// Load the theme description (a JSON object) for a template.
    fn load(&self, template_id: &str) -> Result<Value>;
}

impl<T: ThemeStore + ?Sized> ThemeStore for Box<T> {
    fn load(&self, template_id: &str) -> Result<Value> {
        (**self).load(template_id)
    }
}

/// Reads `<dir>/<template_id>.json` and returns its `theme` object.
#[derive(Debug, Clone)]
pub struct DirThemeStore {
    dir: PathBuf,
}

impl DirThemeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ThemeStore for DirThemeStore {
    fn load(&self, template_id: &str) -> Result<Value> {
        let path = self.dir.join(format!("{}.json", template_id));
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Theme(format!("Failed to read '{}': {}", path.display(), e)))?;
        let mut template: Value = serde_json::from_str(&content)
            .map_err(|e| Error::Theme(format!("Failed to parse '{}': {}", path.display(), e)))?;

        match template.get_mut("theme").map(Value::take) {
            Some(theme) if theme.is_object() => Ok(theme),
            _ => Err(Error::Theme(format!(
                "'{}' has no theme object",
                path.display()
            ))),
        }
    }
}

/// In-memory theme descriptions, keyed by template identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    themes: HashMap<String, Value>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a theme description for a template.
    pub fn with_theme(mut self, template_id: impl Into<String>, description: Value) -> Self {
        self.themes.insert(template_id.into(), description);
        self
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self, template_id: &str) -> Result<Value> {
        self.themes
            .get(template_id)
            .cloned()
            .ok_or_else(|| Error::Theme(format!("Unknown template '{}'", template_id)))
    }
}

/// Resolves style names into fully populated [`Theme`]s.
#[derive(Debug, Clone)]
pub struct ThemeResolver<S> {
    store: S,
}

impl<S: ThemeStore> ThemeResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Resolve a style name. Never fails; load errors are logged and
    /// replaced by the default theme.
    pub fn resolve(&self, style: &str) -> Theme {
        let template_id = template_for_style(style);
        match self.store.load(template_id) {
            Ok(description) => Theme::from_description(&description),
            Err(e) => {
                log::warn!(
                    "Failed to load theme for style '{}' ({}), using defaults: {}",
                    style,
                    template_id,
                    e
                );
                Theme::default()
            }
        }
    }
}
