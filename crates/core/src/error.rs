//! Error types for deck extraction, rendering and export.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning slide records into a deck file.
///
/// Recoverable noise (malformed extractor lines, unreadable themes) never
/// becomes an `Error`; only conditions that make the artifact impossible
/// to produce are represented here.
#[derive(Error, Debug)]
pub enum Error {
    /// The caller supplied a request that is missing fields or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Extraction or filtering left nothing to render.
    #[error("No usable slides: {0}")]
    NoUsableSlides(String),

    /// A document with zero pages was handed to the exporter.
    #[error("Document has no pages to export")]
    EmptyDeck,

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact store could not persist or publish an export.
    #[error("Storage error: {0}")]
    Storage(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML writing or parsing error (for PPTX).
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A theme resource could not be loaded.
    #[error("Theme error: {0}")]
    Theme(String),
}

impl Error {
    /// Stable machine-readable category for this error.
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::NoUsableSlides(_) => "no_usable_slides",
            Error::EmptyDeck => "empty_deck",
            Error::Io(_) => "io",
            Error::Storage(_) => "storage",
            Error::Zip(_) | Error::Xml(_) | Error::Json(_) => "serialization",
            Error::Theme(_) => "theme",
        }
    }

    /// Build a flat, serializable report suitable for showing to a caller.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            error: self.category(),
            details: self.to_string(),
        }
    }
}

/// Caller-facing view of an [`Error`]: a category plus a detail string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Machine-readable category, see [`Error::category`].
    pub error: &'static str,
    /// Human-readable detail.
    pub details: String,
}
