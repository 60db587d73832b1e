//! Deck rendering: slide records plus a theme into a page-based document.
//!
//! Each record variant maps onto one fixed layout on a 16:9 page of
//! 10 x 5.625 inches. Pages are independent of their neighbours.

use crate::color::Color;
use crate::theme::Theme;
use crate::types::{ContentItem, Document, Language, Page, SlideRecord, TextBlock};

/// Page width in inches (16:9).
pub const PAGE_WIDTH: f64 = 10.0;
/// Page height in inches (16:9).
pub const PAGE_HEIGHT: f64 = 5.625;

/// Placement and type size of one text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
}

impl Frame {
    const fn new(x: f64, y: f64, width: f64, height: f64, font_size: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            font_size,
        }
    }
}

pub const COVER_TITLE: Frame = Frame::new(0.5, 1.0, 9.0, 1.2, 32.0);
pub const COVER_SUBTITLE: Frame = Frame::new(1.0, 2.2, 8.0, 1.5, 18.0);
pub const CONTENTS_HEADING: Frame = Frame::new(0.5, 0.7, 9.0, 1.0, 28.0);
pub const CONTENTS_LIST: Frame = Frame::new(1.0, 1.8, 8.0, 4.0, 18.0);
pub const TRANSITION_TITLE: Frame = Frame::new(0.5, 1.2, 9.0, 1.2, 30.0);
pub const TRANSITION_BODY: Frame = Frame::new(1.0, 2.5, 8.0, 2.5, 20.0);
pub const CONTENT_HEADING: Frame = Frame::new(0.5, 0.7, 9.0, 1.0, 26.0);
pub const CONTENT_LIST: Frame = Frame::new(0.8, 1.8, 8.4, 4.0, 18.0);
pub const END_TITLE: Frame = Frame::new(0.5, 2.0, 9.0, 1.5, 30.0);

/// Text styling applied on top of a [`Frame`].
#[derive(Debug, Clone, Copy)]
struct Style {
    color: Color,
    bold: bool,
    centered: bool,
    bulleted: bool,
}

impl Style {
    fn title(color: Color) -> Self {
        Self {
            color,
            bold: true,
            centered: true,
            bulleted: false,
        }
    }

    fn heading(color: Color) -> Self {
        Self {
            centered: false,
            ..Self::title(color)
        }
    }

    fn body(color: Color) -> Self {
        Self {
            color,
            bold: false,
            centered: true,
            bulleted: false,
        }
    }

    fn list(color: Color) -> Self {
        Self {
            color,
            bold: false,
            centered: false,
            bulleted: true,
        }
    }
}

fn block(text: impl Into<String>, frame: Frame, style: Style) -> TextBlock {
    TextBlock {
        text: text.into(),
        x: frame.x,
        y: frame.y,
        width: frame.width,
        height: frame.height,
        font_size: frame.font_size,
        bold: style.bold,
        centered: style.centered,
        color: style.color,
        bulleted: style.bulleted,
    }
}

/// Renders slide records into a [`Document`] using one theme and language.
#[derive(Debug, Clone, Copy)]
pub struct DeckRenderer {
    theme: Theme,
    language: Language,
}

impl DeckRenderer {
    pub fn new(theme: Theme, language: Language) -> Self {
        Self { theme, language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Render records in order, one page each.
    pub fn render<'a, I>(&self, records: I) -> Document
    where
        I: IntoIterator<Item = &'a SlideRecord>,
    {
        let mut document = Document::new().with_language(self.language);
        for record in records {
            document.add_page(self.render_page(record));
        }
        log::debug!("Rendered {} pages", document.pages.len());
        document
    }

    /// Render raw JSON records, skipping those without a known type.
    ///
    /// Skipped records contribute no page at all.
    pub fn render_values<'a, I>(&self, values: I) -> Document
    where
        I: IntoIterator<Item = &'a serde_json::Value>,
    {
        let records: Vec<SlideRecord> = values
            .into_iter()
            .filter_map(|value| {
                let record = SlideRecord::from_value(value);
                if record.is_none() {
                    log::debug!("Skipping record without a known type");
                }
                record
            })
            .collect();
        self.render(&records)
    }

    /// Render a single record into a page.
    pub fn render_page(&self, record: &SlideRecord) -> Page {
        let mut page = Page::new(self.theme.background);
        let accent = self.theme.accent;
        let font = self.theme.font_color;

        match record {
            SlideRecord::Cover { title, subtitle } => {
                let title = if title.is_empty() {
                    self.language.title_placeholder()
                } else {
                    title.as_str()
                };
                page.add_block(block(title, COVER_TITLE, Style::title(accent)));
                if let Some(subtitle) = non_empty(subtitle) {
                    page.add_block(block(subtitle, COVER_SUBTITLE, Style::body(font)));
                }
            }
            SlideRecord::Contents { items } => {
                page.add_block(block(
                    self.language.contents_label(),
                    CONTENTS_HEADING,
                    Style::heading(accent),
                ));
                let lines: Vec<&str> = items
                    .iter()
                    .map(String::as_str)
                    .filter(|s| !s.is_empty())
                    .collect();
                if !lines.is_empty() {
                    page.add_block(block(lines.join("\n"), CONTENTS_LIST, Style::list(font)));
                }
            }
            SlideRecord::Transition { title, body } => {
                let title = non_empty(title).unwrap_or(self.language.section_placeholder());
                page.add_block(block(title, TRANSITION_TITLE, Style::title(accent)));
                if let Some(body) = non_empty(body) {
                    page.add_block(block(body, TRANSITION_BODY, Style::body(font)));
                }
            }
            SlideRecord::Content { title, items } => {
                if let Some(title) = non_empty(title) {
                    page.add_block(block(title, CONTENT_HEADING, Style::heading(accent)));
                }
                let lines: Vec<String> = items
                    .iter()
                    .map(ContentItem::line)
                    .filter(|line| !line.is_empty())
                    .collect();
                if !lines.is_empty() {
                    page.add_block(block(lines.join("\n"), CONTENT_LIST, Style::list(font)));
                }
            }
            SlideRecord::End => {
                page.add_block(block(
                    self.language.closing_label(),
                    END_TITLE,
                    Style::title(accent),
                ));
            }
        }

        page
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer(language: Language) -> DeckRenderer {
        DeckRenderer::new(Theme::default(), language)
    }

    #[test]
    fn test_one_page_per_known_record_in_order() {
        let values = vec![
            json!({ "type": "cover", "data": { "title": "A" } }),
            json!({ "type": "contents", "data": { "items": ["x"] } }),
            json!({ "type": "diagram", "data": { "title": "ignored" } }),
            json!({ "type": "transition", "data": { "title": "Part 1" } }),
            json!({ "type": "content", "data": { "title": "Points", "items": [] } }),
            json!({ "type": "end" }),
        ];
        let document = renderer(Language::English).render_values(&values);

        let first_texts: Vec<&str> = document
            .pages
            .iter()
            .map(|p| p.blocks[0].text.as_str())
            .collect();
        assert_eq!(
            first_texts,
            vec!["A", "Contents", "Part 1", "Points", "Thank you"]
        );
    }

    #[test]
    fn test_every_page_carries_background() {
        let theme = Theme {
            background: Color::rgb(0, 0, 0),
            ..Theme::default()
        };
        let document = DeckRenderer::new(theme, Language::Chinese)
            .render(&[SlideRecord::End, SlideRecord::Contents { items: vec![] }]);
        assert!(document.pages.iter().all(|p| p.background == theme.background));
    }

    #[test]
    fn test_cover_layout() {
        let page = renderer(Language::English).render_page(&SlideRecord::Cover {
            title: "Deck".to_string(),
            subtitle: Some("Sub".to_string()),
        });
        assert_eq!(page.blocks.len(), 2);

        let title = &page.blocks[0];
        assert!(title.bold && title.centered && !title.bulleted);
        assert_eq!(title.color, Color::ACCENT_BLUE);
        assert_eq!((title.x, title.y, title.font_size), (0.5, 1.0, 32.0));

        let subtitle = &page.blocks[1];
        assert_eq!(subtitle.text, "Sub");
        assert!(subtitle.centered && !subtitle.bold);
        assert_eq!(subtitle.color, Color::DARK_GRAY);
    }

    #[test]
    fn test_cover_without_text_uses_placeholder_only() {
        let page = renderer(Language::Chinese).render_page(&SlideRecord::Cover {
            title: String::new(),
            subtitle: None,
        });
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].text, "标题");
    }

    #[test]
    fn test_contents_joins_items_as_bullets() {
        let page = renderer(Language::Japanese).render_page(&SlideRecord::Contents {
            items: vec!["x".to_string(), "y".to_string()],
        });
        assert_eq!(page.blocks[0].text, "目次");
        assert!(!page.blocks[0].centered);
        assert_eq!(page.blocks[1].text, "x\ny");
        assert!(page.blocks[1].bulleted);
    }

    #[test]
    fn test_transition_placeholder_and_body() {
        let page = renderer(Language::English).render_page(&SlideRecord::Transition {
            title: None,
            body: Some("Next up".to_string()),
        });
        assert_eq!(page.blocks[0].text, "Part");
        assert_eq!(page.blocks[1].text, "Next up");
        assert!(page.blocks[1].centered);
    }

    #[test]
    fn test_content_lines() {
        let page = renderer(Language::English).render_page(&SlideRecord::Content {
            title: None,
            items: vec![
                ContentItem {
                    heading: Some("Speed".to_string()),
                    body: Some("fast".to_string()),
                },
                ContentItem::default(),
                ContentItem {
                    heading: None,
                    body: Some("safe".to_string()),
                },
            ],
        });
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].text, "Speed：fast\nsafe");
        assert_eq!(page.blocks[0].x, CONTENT_LIST.x);
    }

    #[test]
    fn test_content_without_lines_still_yields_page() {
        let document = renderer(Language::English).render(&[SlideRecord::Content {
            title: Some("Only heading".to_string()),
            items: vec![ContentItem::default()],
        }]);
        assert_eq!(document.pages.len(), 1);
        assert_eq!(document.pages[0].blocks.len(), 1);
        assert_eq!(document.pages[0].blocks[0].text, "Only heading");
    }

    #[test]
    fn test_end_label() {
        let page = renderer(Language::Chinese).render_page(&SlideRecord::End);
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].text, "谢谢聆听");
        assert_eq!(page.blocks[0].color, Color::ACCENT_BLUE);
    }

    #[test]
    fn test_document_records_render_language() {
        let document = renderer(Language::Japanese).render(&[SlideRecord::End]);
        assert_eq!(document.language, Language::Japanese);
    }
}
