//! PPTX file writer implementation.
//!
//! Produces a minimal but complete Office Open XML presentation: one blank
//! layout, one master, one theme and one slide per document page.

use chrono::{DateTime, SecondsFormat, Utc};
use deck_core::{Document, Error, Page, Result, TextBlock};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// 16:9 slide size in EMU (10 x 5.625 in).
const SLIDE_CX: &str = "9144000";
const SLIDE_CY: &str = "5143500";

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_APP_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Fixed parts that do not depend on the document: (path, content type, xml).
const STATIC_PARTS: &[(&str, &str, &str)] = &[
    (
        "ppt/slideMasters/slideMaster1.xml",
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml",
        SLIDE_MASTER_XML,
    ),
    (
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        "",
        SLIDE_MASTER_RELS_XML,
    ),
    (
        "ppt/slideLayouts/slideLayout1.xml",
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml",
        SLIDE_LAYOUT_XML,
    ),
    (
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        "",
        SLIDE_LAYOUT_RELS_XML,
    ),
    (
        "ppt/theme/theme1.xml",
        "application/vnd.openxmlformats-officedocument.theme+xml",
        THEME_XML,
    ),
    (
        "ppt/presProps.xml",
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml",
        PRES_PROPS_XML,
    ),
    (
        "ppt/viewProps.xml",
        "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml",
        VIEW_PROPS_XML,
    ),
    (
        "ppt/tableStyles.xml",
        "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml",
        TABLE_STYLES_XML,
    ),
];

/// Writer for PPTX (Office Open XML) files.
#[derive(Debug, Clone, Default)]
pub struct PptxWriter {
    created: Option<DateTime<Utc>>,
}

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the creation timestamp instead of using the current time.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Serialize a document to PPTX bytes.
    pub fn write(&self, document: &Document) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let slide_count = document.pages.len();

        let add = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, path: &str, bytes: &[u8]| -> Result<()> {
            zip.start_file(path, options)
                .map_err(|e| Error::Zip(format!("Failed to add '{}': {}", path, e)))?;
            zip.write_all(bytes)
                .map_err(|e| Error::Zip(format!("Failed to write '{}': {}", path, e)))
        };

        add(&mut zip, "[Content_Types].xml", &content_types_xml(slide_count)?)?;
        add(&mut zip, "_rels/.rels", &root_rels_xml()?)?;
        add(&mut zip, "docProps/core.xml", &self.core_props_xml(document)?)?;
        add(&mut zip, "docProps/app.xml", &app_props_xml(slide_count)?)?;
        add(&mut zip, "ppt/presentation.xml", &presentation_xml(slide_count)?)?;
        add(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &presentation_rels_xml(slide_count)?,
        )?;

        for &(path, _, xml) in STATIC_PARTS {
            add(&mut zip, path, xml.as_bytes())?;
        }

        for (idx, page) in document.pages.iter().enumerate() {
            let number = idx + 1;
            add(
                &mut zip,
                &format!("ppt/slides/slide{}.xml", number),
                &slide_xml(page, document.language.locale())?,
            )?;
            add(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &slide_rels_xml()?,
            )?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::Zip(format!("Failed to finish archive: {}", e)))?;
        Ok(cursor.into_inner())
    }

    fn core_props_xml(&self, document: &Document) -> Result<Vec<u8>> {
        let created = self
            .created
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        // The first block of the first page is the cover title.
        let title = document
            .pages
            .first()
            .and_then(|p| p.blocks.first())
            .map(|b| b.text.as_str())
            .unwrap_or_default();
        let locale = document.language.locale();

        let mut xml = Xml::new()?;
        xml.start(
            "cp:coreProperties",
            &[
                (
                    "xmlns:cp",
                    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
                ),
                ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
                ("xmlns:dcterms", "http://purl.org/dc/terms/"),
                ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ],
        )?;
        xml.text_element("dc:title", &[], title)?;
        xml.text_element("dc:language", &[], locale)?;
        xml.text_element("dc:creator", &[], "deck-render")?;
        xml.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
        xml.text_element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
        xml.end("cp:coreProperties")?;
        Ok(xml.into_bytes())
    }
}

/// Thin wrapper over a quick-xml writer producing a standalone XML part.
struct Xml {
    writer: Writer<Vec<u8>>,
}

impl Xml {
    fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { writer })
    }

    fn element(name: &str, attrs: &[(&str, &str)]) -> BytesStart<'static> {
        let mut element = BytesStart::new(name.to_string());
        for attr in attrs {
            element.push_attribute(*attr);
        }
        element
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.writer
            .write_event(Event::Start(Self::element(name, attrs)))
            .map_err(xml_error)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.writer
            .write_event(Event::Empty(Self::element(name, attrs)))
            .map_err(xml_error)
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)
    }

    fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::Xml(e.to_string())
}

fn emu(inches: f64) -> String {
    ((inches * EMU_PER_INCH).round() as i64).to_string()
}

fn content_types_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = Xml::new()?;
    xml.start("Types", &[("xmlns", NS_TYPES)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;

    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), CT_PRESENTATION),
        (
            "/docProps/core.xml".to_string(),
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
        (
            "/docProps/app.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
    ];
    overrides.extend(
        STATIC_PARTS
            .iter()
            .filter(|(_, content_type, _)| !content_type.is_empty())
            .map(|(path, content_type, _)| (format!("/{}", path), *content_type)),
    );
    overrides.extend((1..=slide_count).map(|n| (format!("/ppt/slides/slide{}.xml", n), CT_SLIDE)));

    for (part, content_type) in &overrides {
        xml.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", *content_type)],
        )?;
    }
    xml.end("Types")?;
    Ok(xml.into_bytes())
}

fn relationships_xml(rels: &[(String, &str, String)]) -> Result<Vec<u8>> {
    let mut xml = Xml::new()?;
    xml.start("Relationships", &[("xmlns", NS_RELS)])?;
    for (id, rel_type, target) in rels {
        xml.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", *rel_type), ("Target", target.as_str())],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.into_bytes())
}

fn root_rels_xml() -> Result<Vec<u8>> {
    relationships_xml(&[
        ("rId1".to_string(), REL_OFFICE_DOCUMENT, "ppt/presentation.xml".to_string()),
        ("rId2".to_string(), REL_CORE_PROPS, "docProps/core.xml".to_string()),
        ("rId3".to_string(), REL_APP_PROPS, "docProps/app.xml".to_string()),
    ])
}

/// `rId1` is the master, slides follow from `rId2`, then theme and properties.
fn presentation_rels_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut rels = vec![(
        "rId1".to_string(),
        REL_SLIDE_MASTER,
        "slideMasters/slideMaster1.xml".to_string(),
    )];
    rels.extend((1..=slide_count).map(|n| {
        (
            format!("rId{}", n + 1),
            REL_SLIDE,
            format!("slides/slide{}.xml", n),
        )
    }));
    let trailing = [
        (REL_THEME, "theme/theme1.xml"),
        (REL_PRES_PROPS, "presProps.xml"),
        (REL_VIEW_PROPS, "viewProps.xml"),
        (REL_TABLE_STYLES, "tableStyles.xml"),
    ];
    for (offset, &(rel_type, target)) in trailing.iter().enumerate() {
        rels.push((
            format!("rId{}", slide_count + 2 + offset),
            rel_type,
            target.to_string(),
        ));
    }
    relationships_xml(&rels)
}

fn slide_rels_xml() -> Result<Vec<u8>> {
    relationships_xml(&[(
        "rId1".to_string(),
        REL_SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml".to_string(),
    )])
}

fn presentation_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = Xml::new()?;
    xml.start(
        "p:presentation",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;
    xml.start("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    xml.end("p:sldMasterIdLst")?;

    xml.start("p:sldIdLst", &[])?;
    for n in 1..=slide_count {
        let id = (255 + n).to_string();
        let rel = format!("rId{}", n + 1);
        xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
    }
    xml.end("p:sldIdLst")?;

    xml.empty(
        "p:sldSz",
        &[("cx", SLIDE_CX), ("cy", SLIDE_CY), ("type", "screen16x9")],
    )?;
    xml.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;
    xml.end("p:presentation")?;
    Ok(xml.into_bytes())
}

fn app_props_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = Xml::new()?;
    xml.start(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?;
    xml.text_element("Application", &[], "deck-render")?;
    xml.text_element("PresentationFormat", &[], "On-screen Show (16:9)")?;
    xml.text_element("Slides", &[], &slide_count.to_string())?;
    xml.end("Properties")?;
    Ok(xml.into_bytes())
}

fn slide_xml(page: &Page, locale: &str) -> Result<Vec<u8>> {
    let mut xml = Xml::new()?;
    xml.start(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    xml.start("p:cSld", &[])?;

    let background = page.background.to_hex();
    xml.start("p:bg", &[])?;
    xml.start("p:bgPr", &[])?;
    xml.start("a:solidFill", &[])?;
    xml.empty("a:srgbClr", &[("val", background.as_str())])?;
    xml.end("a:solidFill")?;
    xml.empty("a:effectLst", &[])?;
    xml.end("p:bgPr")?;
    xml.end("p:bg")?;

    xml.start("p:spTree", &[])?;
    write_group_properties(&mut xml)?;
    for (idx, block) in page.blocks.iter().enumerate() {
        // Shape id 1 belongs to the group.
        write_text_shape(&mut xml, block, idx + 2, locale)?;
    }
    xml.end("p:spTree")?;
    xml.end("p:cSld")?;

    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sld")?;
    Ok(xml.into_bytes())
}

fn write_group_properties(xml: &mut Xml) -> Result<()> {
    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;
    xml.start("p:grpSpPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    xml.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    xml.end("a:xfrm")?;
    xml.end("p:grpSpPr")
}

fn write_text_shape(xml: &mut Xml, block: &TextBlock, shape_id: usize, locale: &str) -> Result<()> {
    let id = shape_id.to_string();
    let name = format!("Text {}", shape_id - 1);
    let (x, y) = (emu(block.x), emu(block.y));
    let (cx, cy) = (emu(block.width), emu(block.height));

    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
    xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvSpPr")?;

    xml.start("p:spPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.end("a:xfrm")?;
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")?;
    xml.empty("a:noFill", &[])?;
    xml.end("p:spPr")?;

    xml.start("p:txBody", &[])?;
    let anchor = if block.centered { "ctr" } else { "t" };
    xml.empty(
        "a:bodyPr",
        &[("wrap", "square"), ("rtlCol", "0"), ("anchor", anchor)],
    )?;
    xml.empty("a:lstStyle", &[])?;
    for line in block.text.split('\n') {
        write_paragraph(xml, block, line, locale)?;
    }
    xml.end("p:txBody")?;
    xml.end("p:sp")
}

fn write_paragraph(xml: &mut Xml, block: &TextBlock, line: &str, locale: &str) -> Result<()> {
    let align = if block.centered { "ctr" } else { "l" };
    let size = ((block.font_size * 100.0).round() as i64).to_string();
    let color = block.color.to_hex();

    xml.start("a:p", &[])?;
    if block.bulleted {
        xml.start(
            "a:pPr",
            &[("marL", "285750"), ("indent", "-285750"), ("algn", align)],
        )?;
        xml.empty("a:buFont", &[("typeface", "Arial")])?;
        xml.empty("a:buChar", &[("char", "\u{2022}")])?;
    } else {
        xml.start("a:pPr", &[("algn", align)])?;
        xml.empty("a:buNone", &[])?;
    }
    xml.end("a:pPr")?;

    xml.start("a:r", &[])?;
    xml.start(
        "a:rPr",
        &[
            ("lang", locale),
            ("sz", size.as_str()),
            ("b", if block.bold { "1" } else { "0" }),
            ("dirty", "0"),
        ],
    )?;
    xml.start("a:solidFill", &[])?;
    xml.empty("a:srgbClr", &[("val", color.as_str())])?;
    xml.end("a:solidFill")?;
    xml.end("a:rPr")?;
    xml.text_element("a:t", &[], line)?;
    xml.end("a:r")?;
    xml.end("a:p")
}

const SLIDE_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles></p:sldMaster>"#;

const SLIDE_MASTER_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/></Relationships>"#;

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const SLIDE_LAYOUT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Deck"><a:themeElements><a:clrScheme name="Deck"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="333333"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="2E75B6"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Deck"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Deck"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

const PRES_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentationPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#;

const VIEW_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:viewPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#;

const TABLE_STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Color, DeckRenderer, Language, SlideRecord, Theme};
    use std::io::Read;
    use zip::ZipArchive;

    fn sample_document() -> Document {
        DeckRenderer::new(Theme::default(), Language::English).render(&[
            SlideRecord::Cover {
                title: "Fish & <Chips>".to_string(),
                subtitle: None,
            },
            SlideRecord::Contents {
                items: vec!["x".to_string(), "y".to_string()],
            },
        ])
    }

    fn read_part(bytes: &[u8], path: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(path).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_emu() {
        assert_eq!(emu(1.0), "914400");
        assert_eq!(emu(0.5), "457200");
        assert_eq!(emu(5.625), SLIDE_CY);
    }

    #[test]
    fn test_archive_contains_all_parts() {
        let bytes = PptxWriter::new().write(&sample_document()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
            "ppt/theme/theme1.xml",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        assert!(!names.contains(&"ppt/slides/slide3.xml"));
    }

    #[test]
    fn test_presentation_is_16_9() {
        let bytes = PptxWriter::new().write(&sample_document()).unwrap();
        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains(r#"<p:sldSz cx="9144000" cy="5143500" type="screen16x9"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));
    }

    #[test]
    fn test_slide_text_is_escaped_and_colored() {
        let bytes = PptxWriter::new().write(&sample_document()).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(slide.contains(&format!(r#"<a:srgbClr val="{}"/>"#, Color::ACCENT_BLUE)));
        assert!(slide.contains(r#"sz="3200" b="1""#));
    }

    #[test]
    fn test_bulleted_block_has_one_paragraph_per_line() {
        let bytes = PptxWriter::new().write(&sample_document()).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide2.xml");
        assert_eq!(slide.matches("<a:buChar").count(), 2);
    }

    #[test]
    fn test_core_properties() {
        let created = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let bytes = PptxWriter::new()
            .with_created(created)
            .write(&sample_document())
            .unwrap();
        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Fish &amp; &lt;Chips&gt;</dc:title>"));
        assert!(core.contains("2026-01-02T03:04:05Z"));
        assert!(core.contains("<dc:language>en-US</dc:language>"));
    }

    #[test]
    fn test_runs_carry_render_language() {
        let document = DeckRenderer::new(Theme::default(), Language::Japanese)
            .render(&[SlideRecord::End]);
        let bytes = PptxWriter::new().write(&document).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"lang="ja-JP""#));
        assert!(!slide.contains("en-US"));
    }
}
