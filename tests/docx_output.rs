use std::io::{Cursor, Read};

use kdp_builder::config::{parse_layout, parse_styles};
use kdp_builder::model::{LayoutDefinition, StyleSet};
use kdp_builder::{OutputFormat, render};

const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const STYLES: &str = r##"
styles:
  normal:
    font_name: Georgia
    font_size: 11
  heading1:
    font_size: 20
    bold: true
  strong:
    bold: true
  emphasis:
    italic: true
  highlight:
    color: "C00000"
    underline: true
    alignment: right
    space_before: 6
"##;

struct Package {
    zip: zip::ZipArchive<Cursor<Vec<u8>>>,
}

impl Package {
    fn build(markdown: &str, layout: LayoutDefinition) -> Self {
        let styles = parse_styles(STYLES).unwrap();
        let bytes = render(markdown, styles, layout, OutputFormat::Docx).unwrap();
        Self {
            zip: zip::ZipArchive::new(Cursor::new(bytes)).unwrap(),
        }
    }

    fn part(&mut self, name: &str) -> String {
        let mut file = self.zip.by_name(name).unwrap();
        let mut xml = String::new();
        file.read_to_string(&mut xml).unwrap();
        xml
    }

    fn has_part(&mut self, name: &str) -> bool {
        self.zip.by_name(name).is_ok()
    }
}

fn w_attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute((W, name))
}

fn paragraph_styles(xml: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml).unwrap();
    doc.descendants()
        .filter(|n| n.has_tag_name((W, "pStyle")))
        .filter_map(|n| w_attr(n, "val").map(str::to_string))
        .collect()
}

fn instructions(xml: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml).unwrap();
    doc.descendants()
        .filter(|n| n.has_tag_name((W, "instrText")))
        .filter_map(|n| n.text().map(|t| t.trim().to_string()))
        .collect()
}

#[test]
fn package_has_the_required_parts() {
    let mut pkg = Package::build("Hello", LayoutDefinition::default());
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "word/document.xml",
        "word/styles.xml",
        "word/settings.xml",
        "word/numbering.xml",
        "word/_rels/document.xml.rels",
    ] {
        assert!(pkg.has_part(part), "missing {part}");
        // Every part is well-formed XML.
        roxmltree::Document::parse(&pkg.part(part)).unwrap();
    }
    assert!(!pkg.has_part("word/header1.xml"));
    assert!(pkg.part("word/settings.xml").contains("<w:updateFields w:val=\"true\"/>"));
}

#[test]
fn runs_carry_style_formatting() {
    let mut pkg = Package::build(
        "Plain **bold** and {red}[highlight] & <escaped>",
        LayoutDefinition::default(),
    );
    let xml = pkg.part("word/document.xml");
    let doc = roxmltree::Document::parse(&xml).unwrap();

    let runs: Vec<_> = doc
        .descendants()
        .filter(|n| n.has_tag_name((W, "r")))
        .collect();
    let text_of = |run: &roxmltree::Node| {
        run.children()
            .find(|c| c.has_tag_name((W, "t")))
            .and_then(|t| t.text())
            .unwrap_or_default()
            .to_string()
    };
    let texts: Vec<String> = runs.iter().map(text_of).collect();
    assert_eq!(texts, vec!["Plain ", "bold", " and ", "red", " & <escaped>"]);

    let has = |run: &roxmltree::Node, tag: &str| run.descendants().any(|n| n.has_tag_name((W, tag)));
    assert!(has(&runs[1], "b"));
    assert!(!has(&runs[0], "b"));
    let color = runs[3]
        .descendants()
        .find(|n| n.has_tag_name((W, "color")))
        .and_then(|n| w_attr(n, "val"));
    assert_eq!(color, Some("C00000"));
    assert!(has(&runs[3], "u"));

    let font = runs[0]
        .descendants()
        .find(|n| n.has_tag_name((W, "rFonts")))
        .and_then(|n| w_attr(n, "ascii"));
    assert_eq!(font, Some("Georgia"));
    let size = runs[0]
        .descendants()
        .find(|n| n.has_tag_name((W, "sz")))
        .and_then(|n| w_attr(n, "val"));
    assert_eq!(size, Some("22"));
}

#[test]
fn first_segment_style_drives_paragraph_properties() {
    let mut pkg = Package::build("{Right}[highlight] then normal", LayoutDefinition::default());
    let xml = pkg.part("word/document.xml");
    assert!(xml.contains(r#"<w:jc w:val="right"/>"#));
    assert!(xml.contains(r#"<w:spacing w:before="120" w:after="0"/>"#));
}

#[test]
fn headings_get_styles_and_bookmarks() {
    let mut pkg = Package::build(
        "# Getting Started\n## 2. Setup\n{Appendix}[heading2]",
        LayoutDefinition::default(),
    );
    let xml = pkg.part("word/document.xml");
    assert_eq!(paragraph_styles(&xml), vec!["Heading1", "Heading2", "Heading2"]);

    let doc = roxmltree::Document::parse(&xml).unwrap();
    let names: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name((W, "bookmarkStart")))
        .filter_map(|n| w_attr(n, "name"))
        .collect();
    assert_eq!(names, vec!["getting_started", "h_2_setup", "appendix"]);

    let starts: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name((W, "bookmarkStart")))
        .filter_map(|n| w_attr(n, "id"))
        .collect();
    let ends: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name((W, "bookmarkEnd")))
        .filter_map(|n| w_attr(n, "id"))
        .collect();
    assert_eq!(starts, vec!["1", "2", "3"]);
    assert_eq!(starts, ends);

    let styles = pkg.part("word/styles.xml");
    assert!(styles.contains(r#"w:styleId="Heading1""#));
    assert!(styles.contains(r#"<w:outlineLvl w:val="0"/>"#));
}

#[test]
fn explicit_bookmarks_and_links() {
    let mut pkg = Package::build(
        "<<<bookmark:intro>>>\nSee [the intro](#intro).",
        LayoutDefinition::default(),
    );
    let xml = pkg.part("word/document.xml");
    let doc = roxmltree::Document::parse(&xml).unwrap();

    let link = doc
        .descendants()
        .find(|n| n.has_tag_name((W, "hyperlink")))
        .unwrap();
    assert_eq!(w_attr(link, "anchor"), Some("intro"));
    let color = link
        .descendants()
        .find(|n| n.has_tag_name((W, "color")))
        .and_then(|n| w_attr(n, "val"));
    assert_eq!(color, Some("0563C1"));
    let underline = link
        .descendants()
        .find(|n| n.has_tag_name((W, "u")))
        .and_then(|n| w_attr(n, "val"));
    assert_eq!(underline, Some("single"));

    assert!(xml.contains(r#"w:name="intro""#));
}

#[test]
fn numbered_lists_use_list_number_styles() {
    let mut pkg = Package::build(
        "1. first\n    2. nested\n3) third\n- bullet\n\t\t\t\t\t\t- deep",
        LayoutDefinition::default(),
    );
    let xml = pkg.part("word/document.xml");
    assert_eq!(
        paragraph_styles(&xml),
        vec!["ListNumber", "ListNumber2", "ListNumber", "ListBullet", "ListBullet5"]
    );

    let doc = roxmltree::Document::parse(&xml).unwrap();
    let num_ids: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name((W, "numId")))
        .filter_map(|n| w_attr(n, "val"))
        .collect();
    assert_eq!(num_ids, vec!["2", "2", "2", "1", "1"]);
    let levels: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name((W, "ilvl")))
        .filter_map(|n| w_attr(n, "val"))
        .collect();
    assert_eq!(levels, vec!["0", "1", "0", "0", "6"]);

    let numbering = pkg.part("word/numbering.xml");
    assert!(numbering.contains(r#"<w:numFmt w:val="decimal"/>"#));
    assert!(numbering.contains(r#"<w:numFmt w:val="bullet"/>"#));
}

#[test]
fn toc_and_index_are_native_fields() {
    let mut pkg = Package::build(
        "<<<toc>>>\n# Chapter\n<<<index:Say \"hi\">>>\n<<<pagebreak>>>",
        LayoutDefinition::default(),
    );
    let xml = pkg.part("word/document.xml");
    let fields = instructions(&xml);
    assert_eq!(
        fields,
        vec![r#"TOC \o "1-3" \h \z \u"#, r#"XE "Say ""hi""""#]
    );
    assert!(xml.contains("<w:vanish/>"));
    assert!(xml.contains(r#"<w:br w:type="page"/>"#));
}

#[test]
fn blank_lines_are_empty_paragraphs() {
    let mut pkg = Package::build("a\n\nb", LayoutDefinition::default());
    let xml = pkg.part("word/document.xml");
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let body = doc
        .descendants()
        .find(|n| n.has_tag_name((W, "body")))
        .unwrap();
    let paragraphs = body
        .children()
        .filter(|n| n.has_tag_name((W, "p")))
        .count();
    assert_eq!(paragraphs, 3);
}

#[test]
fn page_geometry_in_twips() {
    let layout = parse_layout("layout:\n  page_width: 6\n  page_height: 9\n  margin_left: 0.75\n")
        .unwrap();
    let mut pkg = Package::build("x", layout);
    let xml = pkg.part("word/document.xml");
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let size = doc
        .descendants()
        .find(|n| n.has_tag_name((W, "pgSz")))
        .unwrap();
    assert_eq!(w_attr(size, "w"), Some("8640"));
    assert_eq!(w_attr(size, "h"), Some("12960"));
    let margins = doc
        .descendants()
        .find(|n| n.has_tag_name((W, "pgMar")))
        .unwrap();
    assert_eq!(w_attr(margins, "left"), Some("1080"));
    assert_eq!(w_attr(margins, "top"), Some("1440"));
    assert!(!xml.contains("titlePg"));
}

#[test]
fn header_and_footer_with_page_fields() {
    let layout = parse_layout(
        r#"
layout:
  header_text: "My Book"
  footer_text: "Page {page} of {total}"
"#,
    )
    .unwrap();
    let mut pkg = Package::build("body", layout);

    let header = pkg.part("word/header1.xml");
    assert!(header.contains("My Book"));
    let footer = pkg.part("word/footer3.xml");
    assert_eq!(instructions(&footer), vec!["PAGE", "NUMPAGES"]);

    // First page excluded by default: empty first-page parts and titlePg.
    let first_header = pkg.part("word/header2.xml");
    assert!(!first_header.contains("My Book"));
    let xml = pkg.part("word/document.xml");
    assert!(xml.contains("<w:titlePg/>"));
    assert!(xml.contains(r#"<w:headerReference w:type="first""#));
    assert!(xml.contains(r#"<w:footerReference w:type="default""#));

    let rels = pkg.part("word/_rels/document.xml.rels");
    assert!(rels.contains(r#"Target="header1.xml""#));
    assert!(rels.contains(r#"Target="footer4.xml""#));
    let types = pkg.part("[Content_Types].xml");
    assert!(types.contains("/word/footer3.xml"));
}

#[test]
fn running_content_on_first_page_when_asked() {
    let layout = parse_layout(
        "layout:\n  page_number_format: \"{page}\"\n  page_number_position: header\n  first_page_header_footer: true\n",
    )
    .unwrap();
    let mut pkg = Package::build("body", layout);
    assert_eq!(instructions(&pkg.part("word/header1.xml")), vec!["PAGE"]);
    assert!(!pkg.has_part("word/header2.xml"));
    assert!(!pkg.has_part("word/footer2.xml"));
    assert!(!pkg.part("word/document.xml").contains("titlePg"));
}

#[test]
fn unknown_styles_fall_back_to_normal() {
    let bytes = render(
        "{text}[nope]",
        StyleSet::default(),
        LayoutDefinition::default(),
        OutputFormat::Docx,
    )
    .unwrap();
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    zip.by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    assert!(xml.contains(r#"w:ascii="Arial""#));
    assert!(xml.contains(">text</w:t>"));
}

#[test]
fn control_characters_are_dropped() {
    let mut layout = LayoutDefinition::default();
    layout.header_text = Some("Run\u{1}ning".to_string());
    let mut pkg = Package::build("tab\u{1}bell\u{b}vt\n- item\u{1f}\n# Head\u{c}ing", layout);
    let xml = pkg.part("word/document.xml");
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let text: String = doc
        .descendants()
        .filter(|n| n.has_tag_name((W, "t")))
        .filter_map(|n| n.text())
        .collect();
    assert!(text.contains("tabbellvt"));
    assert!(text.contains("item"));
    assert!(text.contains("Heading"));

    let header = pkg.part("word/header1.xml");
    assert!(roxmltree::Document::parse(&header).is_ok());
    assert!(header.contains("Running"));
}
