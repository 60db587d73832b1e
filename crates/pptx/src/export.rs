//! Export of rendered documents to a directory-backed artifact store.
//!
//! Every export gets a fresh identity (`aippt_<millis>_<suffix>.pptx`) and
//! is published atomically without ever replacing an existing file.

use crate::writer::PptxWriter;
use chrono::Utc;
use deck_core::{DeckConfig, Document, Error, Result};
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Length of the random part of an export file name.
const SUFFIX_LEN: usize = 6;

/// Attempts at finding an unused file name before giving up.
const MAX_NAME_ATTEMPTS: usize = 8;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Outcome of a publish attempt.
#[derive(Debug)]
pub enum Publish {
    /// The artifact is fully written and visible at this path.
    Published(PathBuf),
    /// An artifact with the requested name already exists; nothing was written.
    Collision,
}

/// Persistent storage for exported artifacts.
pub trait ArtifactStore {
    /// Persist `bytes` under `name`, never overwriting an existing artifact.
    fn publish(&self, name: &str, bytes: &[u8]) -> Result<Publish>;

    /// Stable reference a caller can later use to fetch `name`.
    fn reference(&self, name: &str) -> String;
}

/// Stores artifacts as files in one directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    public_prefix: String,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a store for the configured export directory, creating it if needed.
    pub fn from_config(config: &DeckConfig) -> Result<Self> {
        let store = Self::new(&config.export_dir, config.public_prefix.clone());
        std::fs::create_dir_all(&store.root).map_err(|e| {
            Error::Storage(format!(
                "Failed to create export directory '{}': {}",
                store.root.display(),
                e
            ))
        })?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for DirStore {
    fn publish(&self, name: &str, bytes: &[u8]) -> Result<Publish> {
        let storage = |what: &str, e: std::io::Error| {
            Error::Storage(format!("Failed to {} '{}': {}", what, name, e))
        };

        // Written under a hidden temporary name so readers never see a partial file.
        let mut tmp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".partial")
            .tempfile_in(&self.root)
            .map_err(|e| storage("create", e))?;
        tmp.write_all(bytes).map_err(|e| storage("write", e))?;
        tmp.as_file().sync_all().map_err(|e| storage("flush", e))?;

        let target = self.root.join(name);
        match tmp.persist_noclobber(&target) {
            Ok(_) => Ok(Publish::Published(target)),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(Publish::Collision),
            Err(e) => Err(storage("publish", e.error)),
        }
    }

    fn reference(&self, name: &str) -> String {
        format!("{}/{}", self.public_prefix, name)
    }
}

/// Reference to a published export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRef {
    pub file_name: String,
    /// Public reference, e.g. `/exports/aippt_1700000000000_k3j9x2.pptx`.
    pub url: String,
    pub path: PathBuf,
    pub pages: usize,
}

/// Serializes documents to PPTX and publishes them to an [`ArtifactStore`].
#[derive(Debug, Clone)]
pub struct ExportManager<S> {
    store: S,
    writer: PptxWriter,
}

impl<S: ArtifactStore> ExportManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            writer: PptxWriter::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize and publish a document.
    ///
    /// Storage failures are returned as-is and not retried; only a name
    /// collision causes a new identity to be drawn.
    pub fn export(&self, document: &Document) -> Result<ExportRef> {
        if document.is_empty() {
            return Err(Error::EmptyDeck);
        }
        let bytes = self.writer.write(document)?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let file_name = new_file_name();
            match self.store.publish(&file_name, &bytes)? {
                Publish::Published(path) => {
                    let url = self.store.reference(&file_name);
                    log::info!(
                        "Exported {} pages ({} bytes) to {}",
                        document.pages.len(),
                        bytes.len(),
                        path.display()
                    );
                    return Ok(ExportRef {
                        file_name,
                        url,
                        path,
                        pages: document.pages.len(),
                    });
                }
                Publish::Collision => {
                    log::debug!("Export name {} already taken, drawing another", file_name);
                }
            }
        }

        Err(Error::Storage(format!(
            "No unused file name after {} attempts",
            MAX_NAME_ATTEMPTS
        )))
    }
}

/// A new export file name: wall-clock millis plus a random base36 suffix.
pub fn new_file_name() -> String {
    format!(
        "aippt_{}_{}.pptx",
        Utc::now().timestamp_millis(),
        random_suffix(SUFFIX_LEN)
    )
}

fn random_suffix(len: usize) -> String {
    let mut n = Uuid::new_v4().as_u128();
    (0..len)
        .map(|_| {
            let c = BASE36[(n % 36) as usize] as char;
            n /= 36;
            c
        })
        .collect()
}
