//! End-to-end deck generation: theme resolution, rendering and export.

use crate::export::{ArtifactStore, DirStore, ExportManager, ExportRef};
use deck_core::extract::extract_records;
use deck_core::{
    Chunk, DeckConfig, DeckRenderer, DeckRequest, DirThemeStore, Document, Error, Language,
    MemoryThemeStore, Records, Result, SlideRecord, SlideSource, ThemeResolver, ThemeStore,
};

/// Composes a [`ThemeResolver`], a [`DeckRenderer`] and an [`ExportManager`].
pub struct DeckPipeline<T, S> {
    resolver: ThemeResolver<T>,
    exporter: ExportManager<S>,
}

impl DeckPipeline<Box<dyn ThemeStore>, DirStore> {
    /// Build a pipeline from configuration.
    ///
    /// Without a theme directory every style resolves to the default theme.
    pub fn from_config(config: &DeckConfig) -> Result<Self> {
        let themes: Box<dyn ThemeStore> = match &config.theme_dir {
            Some(dir) => Box::new(DirThemeStore::new(dir)),
            None => Box::new(MemoryThemeStore::new()),
        };
        let store = DirStore::from_config(config)?;
        Ok(Self::new(ThemeResolver::new(themes), ExportManager::new(store)))
    }
}

impl<T: ThemeStore, S: ArtifactStore> DeckPipeline<T, S> {
    pub fn new(resolver: ThemeResolver<T>, exporter: ExportManager<S>) -> Self {
        Self { resolver, exporter }
    }

    pub fn exporter(&self) -> &ExportManager<S> {
        &self.exporter
    }

    fn renderer(&self, style: &str, language: Language) -> DeckRenderer {
        DeckRenderer::new(self.resolver.resolve(style), language)
    }

    /// Render and export already parsed records.
    pub fn from_records(
        &self,
        records: &[SlideRecord],
        style: &str,
        language: Language,
    ) -> Result<ExportRef> {
        if records.is_empty() {
            return Err(Error::NoUsableSlides("no slide records".to_string()));
        }
        let document = self.renderer(style, language).render(records);
        self.exporter.export(&document)
    }

    /// Extract records from complete model output, then render and export.
    pub fn from_text(&self, text: &str, style: &str, language: Language) -> Result<ExportRef> {
        let records = extract_records(text);
        if records.is_empty() {
            return Err(Error::NoUsableSlides(
                "no slide records could be extracted from the text".to_string(),
            ));
        }
        log::info!("Extracted {} slide records", records.len());
        self.from_records(&records, style, language)
    }

    /// Render pages while chunks arrive; export once the source ends.
    pub fn from_chunks<I>(&self, chunks: I, style: &str, language: Language) -> Result<ExportRef>
    where
        I: IntoIterator<Item = Chunk>,
    {
        self.from_chunk_results(chunks.into_iter().map(Ok), style, language)
    }

    /// Like [`from_chunks`](Self::from_chunks) over a source that can fail.
    ///
    /// A source error ends the render with that error and nothing is exported.
    pub fn from_chunk_results<I>(
        &self,
        chunks: I,
        style: &str,
        language: Language,
    ) -> Result<ExportRef>
    where
        I: IntoIterator<Item = Result<Chunk>>,
    {
        let renderer = self.renderer(style, language);
        let mut document = Document::new().with_language(renderer.language());
        let mut failure = None;
        let chunks = chunks.into_iter().map_while(|chunk| match chunk {
            Ok(chunk) => Some(chunk),
            Err(e) => {
                failure = Some(e);
                None
            }
        });
        for record in Records::new(chunks) {
            log::debug!("Received {} record", record.kind());
            document.add_page(renderer.render_page(&record));
        }
        if let Some(e) = failure {
            log::warn!("Source failed after {} pages", document.pages.len());
            return Err(e);
        }
        if document.is_empty() {
            return Err(Error::NoUsableSlides(
                "the stream ended without any slide records".to_string(),
            ));
        }
        self.exporter.export(&document)
    }

    /// Handle a caller request whose slides are supplied directly.
    ///
    /// Requests that need upstream generation are rejected.
    pub fn from_request(&self, request: &DeckRequest) -> Result<ExportRef> {
        self.from_request_with(request, |_, _| {
            Err(Error::InvalidInput(
                "no upstream generator is configured; supply slides".to_string(),
            ))
        })
    }

    /// Handle a caller request, calling `generate(content, model)` for
    /// requests without slides. The generator returns raw model output.
    pub fn from_request_with<G>(&self, request: &DeckRequest, generate: G) -> Result<ExportRef>
    where
        G: FnOnce(&str, &str) -> Result<String>,
    {
        let validated = request.validate()?;
        match validated.source {
            SlideSource::Records(records) => {
                self.from_records(&records, &validated.style, validated.language)
            }
            SlideSource::Generate { content, model } => {
                let text = generate(&content, &model)?;
                self.from_text(&text, &validated.style, validated.language)
            }
        }
    }
}
