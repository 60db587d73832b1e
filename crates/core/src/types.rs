//! Domain types: slide records, display language and the rendered document model.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tagged unit of deck content, rendered as exactly one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideRecord {
    /// Title page.
    Cover {
        title: String,
        subtitle: Option<String>,
    },
    /// Table of contents.
    Contents { items: Vec<String> },
    /// Section divider.
    Transition {
        title: Option<String>,
        body: Option<String>,
    },
    /// Regular content page with a list of points.
    Content {
        title: Option<String>,
        items: Vec<ContentItem>,
    },
    /// Closing page.
    End,
}

/// A single point on a [`SlideRecord::Content`] page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub heading: Option<String>,
    pub body: Option<String>,
}

impl ContentItem {
    /// Compose the display line, `"{heading}：{body}"` or just the body.
    pub fn line(&self) -> String {
        let body = self.body.as_deref().unwrap_or_default();
        match self.heading.as_deref() {
            Some(heading) => format!("{}：{}", heading, body),
            None => body.to_string(),
        }
    }
}

impl SlideRecord {
    /// The wire tag of this record (`"cover"`, `"contents"`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            SlideRecord::Cover { .. } => "cover",
            SlideRecord::Contents { .. } => "contents",
            SlideRecord::Transition { .. } => "transition",
            SlideRecord::Content { .. } => "content",
            SlideRecord::End => "end",
        }
    }

    /// Build a record from a loosely-shaped JSON object.
    ///
    /// Returns `None` when the `type` tag is missing or not one of the known
    /// tags. A known tag with absent or wrong-shaped `data` degrades to the
    /// variant's empty form.
    pub fn from_value(value: &Value) -> Option<Self> {
        let kind = value.get("type")?.as_str()?;
        let data = value.get("data").filter(|d| d.is_object());

        let record = match kind {
            "cover" => SlideRecord::Cover {
                title: text_field(data, "title").unwrap_or_default(),
                subtitle: text_field(data, "text"),
            },
            "contents" => SlideRecord::Contents {
                items: data
                    .and_then(|d| d.get("items"))
                    .and_then(Value::as_array)
                    .map(|items| items.iter().filter_map(scalar_text).collect())
                    .unwrap_or_default(),
            },
            "transition" => SlideRecord::Transition {
                title: text_field(data, "title"),
                body: text_field(data, "text"),
            },
            "content" => SlideRecord::Content {
                title: text_field(data, "title"),
                items: data
                    .and_then(|d| d.get("items"))
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter(|it| it.is_object())
                            .map(|it| ContentItem {
                                heading: text_field(Some(it), "title"),
                                body: text_field(Some(it), "text"),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            "end" => SlideRecord::End,
            _ => return None,
        };

        Some(record)
    }

    /// Parse a single line of text as a record, see [`SlideRecord::from_value`].
    pub fn from_json_line(line: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(line).ok()?;
        Self::from_value(&value)
    }
}

/// Read a non-empty string field from an optional JSON object.
fn text_field(data: Option<&Value>, key: &str) -> Option<String> {
    data?
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Display text of a list entry. Strings, non-zero numbers and `true` are
/// kept; empty strings, zero, `false`, null and nested values are dropped.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Display language for locale-dependent boilerplate labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Chinese,
    English,
    Japanese,
}

impl Language {
    /// Parse a language selector. Unrecognized values fall back to Chinese.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "English" | "english" | "en" => Self::English,
            "日本語" | "Japanese" | "japanese" | "ja" => Self::Japanese,
            _ => Self::Chinese,
        }
    }

    /// Heading for the contents page.
    pub fn contents_label(self) -> &'static str {
        match self {
            Self::Chinese => "目录",
            Self::English => "Contents",
            Self::Japanese => "目次",
        }
    }

    /// Text of the closing page.
    pub fn closing_label(self) -> &'static str {
        match self {
            Self::Chinese => "谢谢聆听",
            Self::English => "Thank you",
            Self::Japanese => "ご清聴ありがとうございました",
        }
    }

    /// Placeholder used when a cover has no title.
    pub fn title_placeholder(self) -> &'static str {
        match self {
            Self::Chinese => "标题",
            Self::English => "Title",
            Self::Japanese => "タイトル",
        }
    }

    /// BCP 47 tag written on text runs.
    pub fn locale(self) -> &'static str {
        match self {
            Self::Chinese => "zh-CN",
            Self::English => "en-US",
            Self::Japanese => "ja-JP",
        }
    }

    /// Placeholder used when a transition page has no title.
    pub fn section_placeholder(self) -> &'static str {
        match self {
            Self::Chinese => "章节",
            Self::English => "Part",
            Self::Japanese => "章",
        }
    }
}

/// An entire rendered deck, one page per rendered slide record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Language the deck's boilerplate was rendered in.
    pub language: Language,
    /// Pages in presentation order.
    pub pages: Vec<Page>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Append a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// A single page of the deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub background: Color,
    /// Text blocks in drawing order.
    pub blocks: Vec<TextBlock>,
}

impl Page {
    /// Create an empty page with the given background.
    pub fn new(background: Color) -> Self {
        Self {
            background,
            blocks: Vec::new(),
        }
    }

    /// Add a text block to this page.
    pub fn add_block(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }
}

/// A positioned run of text. Positions and sizes are in inches, font size in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub bold: bool,
    pub centered: bool,
    pub color: Color,
    /// Each line of `text` is rendered as its own bullet point.
    pub bulleted: bool,
}
