use std::fmt::Write as _;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::assemble::DocumentBuilder;
use crate::error::Error;
use crate::model::{
    Alignment, LayoutDefinition, PageField, PagePosition, Segment, StyleDefinition, StyleSet,
    heading_level, split_page_fields,
};

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml";

const HYPERLINK_COLOR: &str = "0563C1";
const TOC_FIELD: &str = r#"TOC \o "1-3" \h \z \u"#;
const BULLET_NUM_ID: u32 = 1;
const DECIMAL_NUM_ID: u32 = 2;
const MAX_LIST_STYLE_LEVEL: usize = 5;
const MAX_LIST_ILVL: usize = 8;

fn inches_to_twips(inches: f32) -> u32 {
    (inches * 1440.0).round().max(0.0) as u32
}

fn points_to_twips(points: f32) -> u32 {
    (points * 20.0).round().max(0.0) as u32
}

fn half_points(points: f32) -> u32 {
    (points * 2.0).round().max(1.0) as u32
}

/// Escapes markup and drops control characters XML 1.0 cannot carry.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            '\u{0}'..='\u{1f}' => {}
            _ => out.push(c),
        }
    }
    out
}

fn jc_value(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "both",
    }
}

fn hex(color: [u8; 3]) -> String {
    format!("{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

/// Run formatting. `link` forces the hyperlink color and underline.
fn run_properties(style: &StyleDefinition, link: bool, hidden: bool) -> String {
    let font = escape_xml(&style.font_name);
    let mut rpr = String::from("<w:rPr>");
    let _ = write!(
        rpr,
        r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#
    );
    if style.bold {
        rpr.push_str("<w:b/>");
    }
    if style.italic {
        rpr.push_str("<w:i/>");
    }
    if hidden {
        rpr.push_str("<w:vanish/>");
    }
    let color = if link {
        Some(HYPERLINK_COLOR.to_string())
    } else {
        style.color.map(hex)
    };
    if let Some(color) = color {
        let _ = write!(rpr, r#"<w:color w:val="{color}"/>"#);
    }
    let size = half_points(style.font_size);
    let _ = write!(rpr, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#);
    if link || style.underline {
        rpr.push_str(r#"<w:u w:val="single"/>"#);
    }
    rpr.push_str("</w:rPr>");
    rpr
}

fn push_text_run(out: &mut String, text: &str, style: &StyleDefinition, link: bool) {
    out.push_str("<w:r>");
    out.push_str(&run_properties(style, link, false));
    let _ = write!(out, r#"<w:t xml:space="preserve">{}</w:t>"#, escape_xml(text));
    out.push_str("</w:r>");
}

/// A complex field: begin / instruction / separate / end, each in its own
/// run. The result is left empty and filled in by the word processor.
fn push_field(out: &mut String, instruction: &str, style: &StyleDefinition, hidden: bool) {
    let rpr = run_properties(style, false, hidden);
    let _ = write!(
        out,
        r#"<w:r>{rpr}<w:fldChar w:fldCharType="begin" w:dirty="true"/></w:r>"#
    );
    let _ = write!(
        out,
        r#"<w:r>{rpr}<w:instrText xml:space="preserve"> {} </w:instrText></w:r>"#,
        escape_xml(instruction)
    );
    let _ = write!(out, r#"<w:r>{rpr}<w:fldChar w:fldCharType="separate"/></w:r>"#);
    let _ = write!(out, r#"<w:r>{rpr}<w:fldChar w:fldCharType="end"/></w:r>"#);
}

/// Header/footer paragraph with `{page}`/`{total}` turned into PAGE and
/// NUMPAGES fields.
fn running_paragraph(text: &str, style: &StyleDefinition, alignment: Alignment) -> String {
    let mut p = String::from("<w:p><w:pPr>");
    let _ = write!(p, r#"<w:jc w:val="{}"/>"#, jc_value(alignment));
    p.push_str("</w:pPr>");
    for piece in split_page_fields(text) {
        match piece {
            PageField::Text(t) => push_text_run(&mut p, t, style, false),
            PageField::Page => push_field(&mut p, "PAGE", style, false),
            PageField::Total => push_field(&mut p, "NUMPAGES", style, false),
        }
    }
    p.push_str("</w:p>");
    p
}

fn list_style_id(ordered: bool, level: usize) -> String {
    let base = if ordered { "ListNumber" } else { "ListBullet" };
    match level.min(MAX_LIST_STYLE_LEVEL) {
        0 | 1 => base.to_string(),
        n => format!("{base}{n}"),
    }
}

/// Header and footer part bodies, produced by `apply_header_footer`.
struct RunningParts {
    header: Option<String>,
    footer: Option<String>,
}

/// Builds a WordprocessingML package in memory.
pub struct DocxBuilder {
    styles: StyleSet,
    layout: LayoutDefinition,
    body: String,
    running: Option<RunningParts>,
    next_bookmark_id: u32,
}

impl DocxBuilder {
    pub fn new(styles: StyleSet, layout: LayoutDefinition) -> Self {
        Self {
            styles,
            layout,
            body: String::new(),
            running: None,
            next_bookmark_id: 0,
        }
    }

    fn next_bookmark_id(&mut self) -> u32 {
        self.next_bookmark_id += 1;
        self.next_bookmark_id
    }

    fn push_segments(&mut self, segments: &[Segment]) {
        for segment in segments {
            let style = self.styles.get(&segment.style);
            match &segment.link_target {
                Some(anchor) => {
                    let _ = write!(
                        self.body,
                        r#"<w:hyperlink w:anchor="{}" w:history="1">"#,
                        escape_xml(anchor)
                    );
                    push_text_run(&mut self.body, &segment.text, style, true);
                    self.body.push_str("</w:hyperlink>");
                }
                None => push_text_run(&mut self.body, &segment.text, style, false),
            }
        }
    }

    fn push_bookmark_start(&mut self, name: &str) -> u32 {
        let id = self.next_bookmark_id();
        let _ = write!(
            self.body,
            r#"<w:bookmarkStart w:id="{id}" w:name="{}"/>"#,
            escape_xml(name)
        );
        id
    }

    fn running_part(&self, position: PagePosition) -> Option<String> {
        let (text, style_name) = match position {
            PagePosition::Header => (&self.layout.header_text, &self.layout.header_style),
            PagePosition::Footer => (&self.layout.footer_text, &self.layout.footer_style),
        };
        let style = self.styles.get(style_name);
        let mut part = String::new();
        if let Some(text) = text {
            part.push_str(&running_paragraph(text, style, style.alignment));
        }
        if let Some(numbering) = self.layout.page_numbering_at(position) {
            part.push_str(&running_paragraph(&numbering.format, style, numbering.alignment));
        }
        (!part.is_empty()).then_some(part)
    }

    fn document_xml(&self, rels: &PartRels) -> String {
        let layout = &self.layout;
        let mut sect = String::from("<w:sectPr>");
        for (kind, reference, id) in rels.running_references() {
            let _ = write!(
                sect,
                r#"<w:{kind}Reference w:type="{reference}" r:id="{id}"/>"#
            );
        }
        let _ = write!(
            sect,
            r#"<w:pgSz w:w="{}" w:h="{}"/>"#,
            inches_to_twips(layout.page_width),
            inches_to_twips(layout.page_height)
        );
        let _ = write!(
            sect,
            r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="720" w:footer="720" w:gutter="0"/>"#,
            inches_to_twips(layout.margin_top),
            inches_to_twips(layout.margin_right),
            inches_to_twips(layout.margin_bottom),
            inches_to_twips(layout.margin_left)
        );
        if rels.first_page_blank {
            sect.push_str("<w:titlePg/>");
        }
        sect.push_str("</w:sectPr>");

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{WML_NS}" xmlns:r="{REL_NS}"><w:body>{}{sect}</w:body></w:document>"#,
            self.body
        )
    }

    fn styles_xml(&self) -> String {
        let normal = self.styles.normal();
        let font = escape_xml(&normal.font_name);
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{WML_NS}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#,
            size = half_points(normal.font_size)
        );
        xml.push_str(
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
        );
        for level in 1..=6 {
            let _ = write!(
                xml,
                r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="{}"/></w:pPr></w:style>"#,
                level - 1
            );
        }
        for ordered in [false, true] {
            let num_id = if ordered { DECIMAL_NUM_ID } else { BULLET_NUM_ID };
            for level in 1..=MAX_LIST_STYLE_LEVEL {
                let id = list_style_id(ordered, level);
                let name = if level == 1 {
                    (if ordered { "List Number" } else { "List Bullet" }).to_string()
                } else if ordered {
                    format!("List Number {level}")
                } else {
                    format!("List Bullet {level}")
                };
                let _ = write!(
                    xml,
                    r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="{name}"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr></w:style>"#,
                    level - 1
                );
            }
        }
        xml.push_str(
            r#"<w:style w:type="paragraph" w:styleId="Header"><w:name w:val="header"/><w:basedOn w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Footer"><w:name w:val="footer"/><w:basedOn w:val="Normal"/></w:style>"#,
        );
        xml.push_str("</w:styles>");
        xml
    }
}

fn numbering_xml() -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="{WML_NS}">"#
    );
    for (abstract_id, ordered) in [(0, false), (1, true)] {
        let _ = write!(xml, r#"<w:abstractNum w:abstractNumId="{abstract_id}"><w:multiLevelType w:val="hybridMultilevel"/>"#);
        for ilvl in 0..=MAX_LIST_ILVL {
            let (fmt, text) = if ordered {
                ("decimal", format!("%{}.", ilvl + 1))
            } else {
                ("bullet", "\u{2022}".to_string())
            };
            let _ = write!(
                xml,
                r#"<w:lvl w:ilvl="{ilvl}"><w:start w:val="1"/><w:numFmt w:val="{fmt}"/><w:lvlText w:val="{text}"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{}" w:hanging="360"/></w:pPr></w:lvl>"#,
                720 * (ilvl + 1)
            );
        }
        xml.push_str("</w:abstractNum>");
    }
    let _ = write!(
        xml,
        r#"<w:num w:numId="{BULLET_NUM_ID}"><w:abstractNumId w:val="0"/></w:num><w:num w:numId="{DECIMAL_NUM_ID}"><w:abstractNumId w:val="1"/></w:num></w:numbering>"#
    );
    xml
}

fn settings_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="{WML_NS}"><w:updateFields w:val="true"/><w:defaultTabStop w:val="720"/><w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat></w:settings>"#
    )
}

fn running_part_xml(kind: &str, body: &str) -> String {
    let root = if kind == "header" { "hdr" } else { "ftr" };
    let body = if body.is_empty() { "<w:p/>" } else { body };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:{root} xmlns:w="{WML_NS}" xmlns:r="{REL_NS}">{body}</w:{root}>"#
    )
}

const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:creator>kdp-builder</dc:creator></cp:coreProperties>"#;

/// One package part: zip path, content type and, for parts referenced from
/// the main document, relationship type and id.
struct Part {
    path: String,
    content_type: String,
    rel: Option<(&'static str, String)>,
    xml: String,
}

/// Relationship ids of the running header/footer parts.
#[derive(Default)]
struct PartRels {
    default_header: Option<String>,
    default_footer: Option<String>,
    first_header: Option<String>,
    first_footer: Option<String>,
    first_page_blank: bool,
}

impl PartRels {
    fn running_references(&self) -> Vec<(&'static str, &'static str, &str)> {
        let mut refs = Vec::new();
        let entries = [
            ("header", "default", &self.default_header),
            ("header", "first", &self.first_header),
            ("footer", "default", &self.default_footer),
            ("footer", "first", &self.first_footer),
        ];
        for (kind, reference, id) in entries {
            if let Some(id) = id {
                refs.push((kind, reference, id.as_str()));
            }
        }
        // Schema order: all headerReference elements before footerReference.
        refs
    }
}

impl DocxBuilder {
    fn package_parts(&self) -> Vec<Part> {
        let mut parts = vec![
            Part {
                path: "word/styles.xml".into(),
                content_type: format!("{CT_BASE}.styles+xml"),
                rel: Some(("styles", String::new())),
                xml: self.styles_xml(),
            },
            Part {
                path: "word/settings.xml".into(),
                content_type: format!("{CT_BASE}.settings+xml"),
                rel: Some(("settings", String::new())),
                xml: settings_xml(),
            },
            Part {
                path: "word/numbering.xml".into(),
                content_type: format!("{CT_BASE}.numbering+xml"),
                rel: Some(("numbering", String::new())),
                xml: numbering_xml(),
            },
        ];

        if let Some(running) = &self.running {
            let first_page_blank = !self.layout.first_page_header_footer;
            let mut index = 0;
            for (kind, body) in [("header", &running.header), ("footer", &running.footer)] {
                let Some(body) = body else { continue };
                index += 1;
                parts.push(Part {
                    path: format!("word/{kind}{index}.xml"),
                    content_type: format!("{CT_BASE}.{kind}+xml"),
                    rel: Some((kind, "default".into())),
                    xml: running_part_xml(kind, body),
                });
                if first_page_blank {
                    index += 1;
                    parts.push(Part {
                        path: format!("word/{kind}{index}.xml"),
                        content_type: format!("{CT_BASE}.{kind}+xml"),
                        rel: Some((kind, "first".into())),
                        xml: running_part_xml(kind, ""),
                    });
                }
            }
        }
        parts
    }
}

impl DocumentBuilder for DocxBuilder {
    fn add_paragraph(
        &mut self,
        segments: &[Segment],
        auto_bookmark: Option<&str>,
    ) -> Result<(), Error> {
        let Some(first) = segments.first() else {
            self.body.push_str("<w:p/>");
            return Ok(());
        };

        let style = self.styles.get(&first.style).clone();
        self.body.push_str("<w:p><w:pPr>");
        if let Some(level) = heading_level(&first.style).filter(|l| (1..=6).contains(l)) {
            let _ = write!(self.body, r#"<w:pStyle w:val="Heading{level}"/>"#);
        }
        if style.space_before > 0.0 || style.space_after > 0.0 {
            let _ = write!(
                self.body,
                r#"<w:spacing w:before="{}" w:after="{}"/>"#,
                points_to_twips(style.space_before),
                points_to_twips(style.space_after)
            );
        }
        let _ = write!(self.body, r#"<w:jc w:val="{}"/>"#, jc_value(style.alignment));
        self.body.push_str("</w:pPr>");

        let bookmark = auto_bookmark.map(|name| self.push_bookmark_start(name));
        self.push_segments(segments);
        if let Some(id) = bookmark {
            let _ = write!(self.body, r#"<w:bookmarkEnd w:id="{id}"/>"#);
        }
        self.body.push_str("</w:p>");
        Ok(())
    }

    fn add_page_break(&mut self) -> Result<(), Error> {
        self.body
            .push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
        Ok(())
    }

    fn add_table_of_contents(&mut self) -> Result<(), Error> {
        let normal = self.styles.normal().clone();
        self.body.push_str("<w:p>");
        push_field(&mut self.body, TOC_FIELD, &normal, false);
        self.body.push_str("</w:p>");
        Ok(())
    }

    fn add_index_entry(&mut self, term: &str) -> Result<(), Error> {
        let normal = self.styles.normal().clone();
        let instruction = format!(r#"XE "{}""#, term.replace('"', "\"\""));
        self.body
            .push_str("<w:p><w:pPr><w:rPr><w:vanish/></w:rPr></w:pPr>");
        push_field(&mut self.body, &instruction, &normal, true);
        self.body.push_str("</w:p>");
        Ok(())
    }

    fn add_bookmark(&mut self, name: &str) -> Result<(), Error> {
        self.body.push_str("<w:p>");
        let id = self.push_bookmark_start(name);
        let _ = write!(self.body, r#"<w:bookmarkEnd w:id="{id}"/></w:p>"#);
        Ok(())
    }

    fn add_list_item(
        &mut self,
        ordered: bool,
        level: usize,
        segments: &[Segment],
    ) -> Result<(), Error> {
        let num_id = if ordered { DECIMAL_NUM_ID } else { BULLET_NUM_ID };
        let ilvl = level.saturating_sub(1).min(MAX_LIST_ILVL);
        let _ = write!(
            self.body,
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/><w:numPr><w:ilvl w:val="{ilvl}"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr>"#,
            list_style_id(ordered, level)
        );
        self.push_segments(segments);
        self.body.push_str("</w:p>");
        Ok(())
    }

    fn apply_header_footer(&mut self) -> Result<(), Error> {
        let header = self.running_part(PagePosition::Header);
        let footer = self.running_part(PagePosition::Footer);
        if header.is_some() || footer.is_some() {
            self.running = Some(RunningParts { header, footer });
        }
        Ok(())
    }

    fn to_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let parts = self.package_parts();

        let mut rels = PartRels::default();
        let mut doc_rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{PKG_REL_NS}">"#
        );
        for (i, part) in parts.iter().enumerate() {
            let Some((rel_type, reference)) = &part.rel else { continue };
            let id = format!("rId{}", i + 1);
            let target = part.path.trim_start_matches("word/");
            let _ = write!(
                doc_rels,
                r#"<Relationship Id="{id}" Type="{REL_TYPE_BASE}/{rel_type}" Target="{target}"/>"#
            );
            let slot = match (*rel_type, reference.as_str()) {
                ("header", "default") => &mut rels.default_header,
                ("header", "first") => &mut rels.first_header,
                ("footer", "default") => &mut rels.default_footer,
                ("footer", "first") => &mut rels.first_footer,
                _ => continue,
            };
            *slot = Some(id);
        }
        doc_rels.push_str("</Relationships>");
        rels.first_page_blank = self.running.is_some() && !self.layout.first_page_header_footer;

        let mut content_types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
        );
        let _ = write!(
            content_types,
            r#"<Override PartName="/word/document.xml" ContentType="{CT_BASE}.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#
        );
        for part in &parts {
            let _ = write!(
                content_types,
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                part.path, part.content_type
            );
        }
        content_types.push_str("</Types>");

        let root_rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_TYPE_BASE}/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#
        );

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut add = |path: &str, xml: &str| -> Result<(), Error> {
            zip.start_file(path, options)?;
            zip.write_all(xml.as_bytes())?;
            Ok(())
        };
        add("[Content_Types].xml", &content_types)?;
        add("_rels/.rels", &root_rels)?;
        add("docProps/core.xml", CORE_XML)?;
        add("word/document.xml", &self.document_xml(&rels))?;
        add("word/_rels/document.xml.rels", &doc_rels)?;
        for part in &parts {
            add(&part.path, &part.xml)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_styles_cap_at_five() {
        assert_eq!(list_style_id(true, 1), "ListNumber");
        assert_eq!(list_style_id(true, 2), "ListNumber2");
        assert_eq!(list_style_id(false, 9), "ListBullet5");
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(inches_to_twips(1.0), 1440);
        assert_eq!(points_to_twips(12.0), 240);
        assert_eq!(half_points(10.5), 21);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn drops_xml_invalid_control_characters() {
        assert_eq!(escape_xml("a\u{0}b\u{1}c\u{b}d\u{c}e\u{1f}f"), "abcdef");
        assert_eq!(escape_xml("tab\there"), "tab\there");
    }

    #[test]
    fn running_paragraph_uses_page_fields() {
        let p = running_paragraph("Page {page} of {total}", &StyleDefinition::default(), Alignment::Right);
        assert!(p.contains(r#"<w:jc w:val="right"/>"#));
        assert!(p.contains(" PAGE "));
        assert!(p.contains(" NUMPAGES "));
        assert!(p.contains(">Page </w:t>"));
    }
}
