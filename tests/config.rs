use std::fs;

use kdp_builder::Error;
use kdp_builder::config::{load_layout, load_styles, parse_layout, parse_styles};
use kdp_builder::model::{Alignment, PagePosition, StyleDefinition};

const STYLES: &str = r##"
styles:
  normal:
    font_name: Georgia
    font_size: 12
    alignment: justify
    space_after: 6
  heading1:
    font_name: Georgia
    font_size: 24
    bold: true
    color: "#1F3864"
    alignment: center
    space_before: 18
  quote:
    italic: true
    color: "000000"
"##;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn styles_resolve_with_defaults() {
    let styles = parse_styles(STYLES).unwrap();
    assert_eq!(styles.len(), 3);

    let heading = styles.get("heading1");
    assert_eq!(heading.font_size, 24.0);
    assert!(heading.bold);
    assert_eq!(heading.color, Some([0x1f, 0x38, 0x64]));
    assert_eq!(heading.alignment, Alignment::Center);
    assert_eq!(heading.space_before, 18.0);

    let quote = styles.get("quote");
    assert_eq!(quote.font_name, "Arial");
    assert_eq!(quote.font_size, 11.0);
    assert!(quote.italic);
    assert_eq!(quote.color, Some([0, 0, 0]));

    assert_eq!(styles.normal().alignment, Alignment::Justify);
    assert_eq!(styles.get("undefined").font_name, "Georgia");
}

#[test]
fn normal_is_synthesized() {
    let styles = parse_styles("styles:\n  strong:\n    bold: true\n").unwrap();
    assert!(styles.contains("normal"));
    assert_eq!(styles.normal(), &StyleDefinition::default());

    for empty in ["", "   \n", "styles:\n", "other: 1\n"] {
        let styles = parse_styles(empty).unwrap();
        assert_eq!(styles.len(), 1, "input {empty:?}");
    }
}

#[test]
fn style_with_no_options_uses_defaults() {
    let styles = parse_styles("styles:\n  plain:\n").unwrap();
    assert_eq!(styles.get("plain"), &StyleDefinition::default());
}

#[test]
fn unquoted_numeric_color() {
    let styles = parse_styles("styles:\n  dark:\n    color: 000000\n  grey:\n    color: 333333\n")
        .unwrap();
    assert_eq!(styles.get("dark").color, Some([0, 0, 0]));
    assert_eq!(styles.get("grey").color, Some([0x33, 0x33, 0x33]));
}

#[test]
fn invalid_styles_are_config_errors() {
    for yaml in [
        "styles:\n  s:\n    color: \"#12345\"\n",
        "styles:\n  s:\n    color: \"ZZZZZZ\"\n",
        "styles:\n  s:\n    alignment: middle\n",
        "styles:\n  s:\n    font_size: 0\n",
        "styles:\n  s:\n    font_size: -3\n",
        "styles:\n  s:\n    space_after: -1\n",
    ] {
        let err = parse_styles(yaml).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{yaml}: {err}");
        assert!(err.to_string().contains("style 's'"), "{err}");
    }
}

#[test]
fn malformed_yaml_is_a_yaml_error() {
    assert!(matches!(
        parse_styles("styles: [unclosed"),
        Err(Error::Yaml(_))
    ));
}

#[test]
fn layout_defaults() {
    let layout = parse_layout("").unwrap();
    assert_eq!(layout.page_width, 8.5);
    assert_eq!(layout.page_height, 11.0);
    assert_eq!(layout.margin_left, 1.0);
    assert_eq!(layout.header_text, None);
    assert_eq!(layout.header_style, "normal");
    assert!(!layout.first_page_header_footer);
    assert!(!layout.has_running_content());
}

#[test]
fn layout_in_millimetres() {
    let layout = parse_layout("layout:\n  unit: mm\n  page_width: 210\n  page_height: 297\n  margin_top: 25.4\n").unwrap();
    assert!(approx(layout.page_width, 8.268));
    assert!(approx(layout.page_height, 11.693));
    assert!(approx(layout.margin_top, 1.0));
    // Unset values keep their inch defaults.
    assert_eq!(layout.margin_bottom, 1.0);

    let layout = parse_layout("layout:\n  unit: mm\n").unwrap();
    assert_eq!(layout.page_width, 8.5);
    assert_eq!(layout.page_height, 11.0);
    assert_eq!(layout.margin_left, 1.0);
}

#[test]
fn layout_in_centimetres() {
    let layout = parse_layout("layout:\n  unit: CM\n  page_width: 15.24\n").unwrap();
    assert!(approx(layout.page_width, 6.0));
}

#[test]
fn layout_rejects_bad_values() {
    for yaml in [
        "layout:\n  margin_left: -0.5\n",
        "layout:\n  unit: furlongs\n",
        "layout:\n  page_number_format: \"{page}\"\n  page_number_position: sidebar\n",
        "layout:\n  page_number_format: \"{page}\"\n  page_number_alignment: middle\n",
    ] {
        assert!(matches!(parse_layout(yaml), Err(Error::Config(_))), "{yaml}");
    }
}

#[test]
fn running_content_and_page_numbers() {
    let layout = parse_layout(
        r#"
layout:
  header_text: "My Book"
  header_style: headerStyle
  footer_text: "Page {page} of {total}"
  page_number_format: "{page}"
  page_number_position: header
  page_number_alignment: right
  first_page_header_footer: true
"#,
    )
    .unwrap();
    assert_eq!(layout.header_text.as_deref(), Some("My Book"));
    assert_eq!(layout.header_style, "headerStyle");
    assert_eq!(layout.footer_style, "normal");
    assert!(layout.first_page_header_footer);
    assert!(layout.has_running_content());

    let numbering = layout.page_numbering_at(PagePosition::Header).unwrap();
    assert_eq!(numbering.format, "{page}");
    assert_eq!(numbering.alignment, Alignment::Right);
    assert!(layout.page_numbering_at(PagePosition::Footer).is_none());
}

#[test]
fn page_numbers_default_to_centered_footer() {
    let layout = parse_layout("layout:\n  page_number_format: \"- {page} -\"\n").unwrap();
    let numbering = layout.page_numbering_at(PagePosition::Footer).unwrap();
    assert_eq!(numbering.alignment, Alignment::Center);
}

#[test]
fn loads_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let styles_path = dir.path().join("styles.yaml");
    let layout_path = dir.path().join("layout.yaml");
    fs::write(&styles_path, STYLES).unwrap();
    fs::write(&layout_path, "layout:\n  unit: inches\n  page_width: 6\n  page_height: 9\n").unwrap();

    assert_eq!(load_styles(&styles_path).unwrap().len(), 3);
    let layout = load_layout(&layout_path).unwrap();
    assert_eq!((layout.page_width, layout.page_height), (6.0, 9.0));

    assert!(matches!(
        load_styles(&dir.path().join("missing.yaml")),
        Err(Error::Io(_))
    ));
}
