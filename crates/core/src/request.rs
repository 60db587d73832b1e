//! Validation of caller requests into a language, style and slide source.

use crate::error::{Error, Result};
use crate::types::{Language, SlideRecord};
use serde::Deserialize;
use serde_json::Value;

/// A deck generation request as submitted by a caller.
///
/// Either `slides` is supplied directly (an array of records, or a JSON
/// string holding one), or `content` and `model` are supplied and the
/// records come from the upstream text source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub slides: Option<Value>,
}

/// Where the records of a validated request come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideSource {
    /// Records supplied by the caller, already filtered to known types.
    Records(Vec<SlideRecord>),
    /// Records must be generated upstream from this outline.
    Generate { content: String, model: String },
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub language: Language,
    pub style: String,
    pub source: SlideSource,
}

impl DeckRequest {
    /// Parse a request body.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| Error::InvalidInput(format!("Request is not valid JSON: {}", e)))
    }

    /// Validate the request. No partial processing happens on failure.
    pub fn validate(&self) -> Result<ValidatedRequest> {
        let (Some(language), Some(style)) = (present(&self.language), present(&self.style)) else {
            return Err(Error::InvalidInput(
                "Missing required parameters: language, style".to_string(),
            ));
        };

        let source = match &self.slides {
            Some(slides) if !slides.is_null() => SlideSource::Records(parse_slides(slides)?),
            _ => match (present(&self.content), present(&self.model)) {
                (Some(content), Some(model)) => SlideSource::Generate {
                    content: content.to_string(),
                    model: model.to_string(),
                },
                _ => {
                    return Err(Error::InvalidInput(
                        "content and model are required when slides are not provided".to_string(),
                    ))
                }
            },
        };

        Ok(ValidatedRequest {
            language: Language::parse(language),
            style: style.to_string(),
            source,
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// Parse caller-supplied slides, keeping only records with a known type.
fn parse_slides(slides: &Value) -> Result<Vec<SlideRecord>> {
    let parsed;
    let slides = match slides {
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text).map_err(|e| {
                Error::InvalidInput(format!(
                    "slides must be a JSON array or a string containing one: {}",
                    e
                ))
            })?;
            &parsed
        }
        other => other,
    };

    let items = match slides.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Err(Error::InvalidInput(
                "slides must be a non-empty array".to_string(),
            ))
        }
    };

    let records: Vec<SlideRecord> = items.iter().filter_map(SlideRecord::from_value).collect();
    if records.is_empty() {
        return Err(Error::NoUsableSlides(format!(
            "none of the {} supplied slides has a known type",
            items.len()
        )));
    }
    if records.len() < items.len() {
        log::debug!(
            "Dropped {} supplied slides without a known type",
            items.len() - records.len()
        );
    }

    Ok(records)
}
