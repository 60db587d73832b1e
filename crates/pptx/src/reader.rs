//! PPTX file reader, used to inspect exported decks.

use deck_core::{Color, Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

use crate::writer::EMU_PER_INCH;

/// A slide read back from a PPTX file.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideSummary {
    /// 1-based slide number.
    pub number: usize,
    /// Solid background color, if the slide declares one.
    pub background: Option<Color>,
    /// Text shapes in document order.
    pub blocks: Vec<ShapeText>,
}

impl SlideSummary {
    /// Texts of all shapes on this slide.
    pub fn texts(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.text.as_str()).collect()
    }
}

/// Text of one shape, paragraphs joined by `\n`. Offsets are in inches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeText {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Reader for PPTX (Office Open XML) files.
pub struct PptxReader;

impl PptxReader {
    /// Create a new PPTX reader.
    pub fn new() -> Self {
        Self
    }

    /// Read every slide of a PPTX file in presentation order.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<SlideSummary>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.get_slide_order(&mut archive)?;

        slide_order
            .iter()
            .enumerate()
            .map(|(idx, path)| {
                let content = read_file_from_archive(&mut archive, path)?;
                let (background, blocks) = parse_slide_xml(&content)?;
                Ok(SlideSummary {
                    number: idx + 1,
                    background,
                    blocks,
                })
            })
            .collect()
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let rel_type = attribute(e, b"Type").unwrap_or_default();
                    let target = attribute(e, b"Target").unwrap_or_default();
                    let id = attribute(e, b"Id").unwrap_or_default();

                    if rel_type.ends_with("/slide") {
                        let order = extract_trailing_number(&id)
                            .or_else(|| extract_trailing_number(&target));
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((full_path, order));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the background color and text shapes from slide XML.
fn parse_slide_xml(xml_content: &str) -> Result<(Option<Color>, Vec<ShapeText>)> {
    let mut shapes = Vec::new();
    let mut background = None;
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut current_shape: Option<ShapeText> = None;
    let mut in_background = false;
    let mut in_text_body = false;
    let mut in_paragraph = false;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"bg" => in_background = true,
                b"sp" => current_shape = Some(ShapeText::default()),
                b"txBody" => in_text_body = true,
                b"p" if in_text_body => {
                    in_paragraph = true;
                    if !current_text.is_empty() {
                        current_text.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"off" => {
                    if let Some(ref mut shape) = current_shape {
                        shape.x = emu_attribute(e, b"x");
                        shape.y = emu_attribute(e, b"y");
                    }
                }
                b"srgbClr" if in_background && background.is_none() => {
                    background = attribute(e, b"val")
                        .map(|val| deck_core::color::normalize(Some(val.as_str()), Color::WHITE));
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_paragraph {
                    let text = e.unescape().unwrap_or_default();
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"bg" => in_background = false,
                b"sp" => {
                    if let Some(mut shape) = current_shape.take() {
                        shape.text = std::mem::take(&mut current_text);
                        if !shape.text.trim().is_empty() {
                            shapes.push(shape);
                        }
                    }
                    current_text.clear();
                    in_text_body = false;
                    in_paragraph = false;
                }
                b"txBody" => in_text_body = false,
                b"p" => in_paragraph = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok((background, shapes))
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::Zip(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn emu_attribute(e: &BytesStart<'_>, key: &[u8]) -> f64 {
    attribute(e, key)
        .and_then(|v| v.parse::<f64>().ok())
        .map(|emu| emu / EMU_PER_INCH)
        .unwrap_or_default()
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a trailing number from a string like "rId2" or "slide3.xml".
fn extract_trailing_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)?;
    s[start..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::PptxWriter;
    use deck_core::{DeckRenderer, Language, SlideRecord, Theme};
    use std::io::Cursor;

    #[test]
    fn test_extract_trailing_number() {
        assert_eq!(extract_trailing_number("rId1"), Some(1));
        assert_eq!(extract_trailing_number("rId12"), Some(12));
        assert_eq!(extract_trailing_number("slides/slide123.xml"), Some(123));
        assert_eq!(extract_trailing_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_reads_back_written_deck() {
        let records: Vec<SlideRecord> = (1..=11)
            .map(|n| SlideRecord::Transition {
                title: Some(format!("Part {}", n)),
                body: None,
            })
            .collect();
        let theme = Theme {
            background: Color::rgb(0x10, 0x20, 0x30),
            ..Theme::default()
        };
        let document = DeckRenderer::new(theme, Language::English).render(&records);
        let bytes = PptxWriter::new().write(&document).unwrap();

        let slides = PptxReader::new().read(Cursor::new(bytes)).unwrap();
        assert_eq!(slides.len(), 11);
        // rId ordering is numeric, so slide 10 follows slide 9.
        assert_eq!(slides[9].texts(), vec!["Part 10"]);
        assert_eq!(slides[0].background, Some(theme.background));
        assert!((slides[0].blocks[0].x - 0.5).abs() < 1e-9);
        assert!((slides[0].blocks[0].y - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_zip() {
        let err = PptxReader::new()
            .read(Cursor::new(b"not a zip".to_vec()))
            .unwrap_err();
        assert_eq!(err.category(), "serialization");
    }
}
