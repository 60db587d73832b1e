//! Core domain types, record extraction, theme resolution and deck rendering
//! for AI generated slide decks.

pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod render;
pub mod request;
pub mod sse;
pub mod theme;
pub mod types;

pub use color::Color;
pub use config::DeckConfig;
pub use error::{Error, ErrorReport, Result};
pub use extract::{extract_records, Chunk, IncrementalExtractor, Records};
pub use render::DeckRenderer;
pub use request::{DeckRequest, SlideSource, ValidatedRequest};
pub use sse::{SseChunks, SseDecoder};
pub use theme::{DirThemeStore, MemoryThemeStore, Theme, ThemeResolver, ThemeStore};
pub use types::{ContentItem, Document, Language, Page, SlideRecord, TextBlock};

#[cfg(feature = "stream")]
pub use extract::records_stream;
