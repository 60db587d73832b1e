//! PPTX (Office Open XML) backend for rendered slide decks.
//!
//! Serializes [`deck_core::Document`]s into .pptx archives, publishes them
//! through an [`ExportManager`], and reads exported files back for inspection.

pub mod export;
pub mod pipeline;
pub mod reader;
pub mod writer;

pub use export::{ArtifactStore, DirStore, ExportManager, ExportRef, Publish};
pub use pipeline::DeckPipeline;
pub use reader::{PptxReader, ShapeText, SlideSummary};
pub use writer::PptxWriter;
