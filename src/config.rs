//! Loading of the YAML style and layout definitions.
//!
//! The files are deserialized into loose `serde` structs first and then
//! validated into the immutable model types, so every configuration error
//! surfaces before any document construction begins.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::model::{
    Alignment, LayoutDefinition, NORMAL_STYLE, PageNumbering, PagePosition, StyleDefinition,
    StyleSet, Unit, parse_hex_color,
};

#[derive(Debug, Default, Deserialize)]
struct StylesFile {
    #[serde(default)]
    styles: Option<BTreeMap<String, Option<RawStyle>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStyle {
    font_name: Option<String>,
    font_size: Option<f32>,
    bold: Option<bool>,
    italic: Option<bool>,
    underline: Option<bool>,
    color: Option<serde_yaml::Value>,
    alignment: Option<String>,
    space_before: Option<f32>,
    space_after: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    layout: Option<RawLayout>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLayout {
    unit: Option<String>,
    page_width: Option<f32>,
    page_height: Option<f32>,
    margin_top: Option<f32>,
    margin_bottom: Option<f32>,
    margin_left: Option<f32>,
    margin_right: Option<f32>,
    header_text: Option<String>,
    header_style: Option<String>,
    footer_text: Option<String>,
    footer_style: Option<String>,
    page_number_format: Option<String>,
    page_number_position: Option<String>,
    page_number_alignment: Option<String>,
    first_page_header_footer: Option<bool>,
}

pub fn load_styles(path: &Path) -> Result<StyleSet, Error> {
    let text = std::fs::read_to_string(path)?;
    parse_styles(&text)
}

pub fn load_layout(path: &Path) -> Result<LayoutDefinition, Error> {
    let text = std::fs::read_to_string(path)?;
    parse_layout(&text)
}

/// Parse a `styles:` document. An empty document yields a set holding only
/// the synthesized `normal` style.
pub fn parse_styles(yaml: &str) -> Result<StyleSet, Error> {
    let file: StylesFile = if yaml.trim().is_empty() {
        StylesFile::default()
    } else {
        serde_yaml::from_str::<Option<StylesFile>>(yaml)?.unwrap_or_default()
    };

    let mut styles = HashMap::new();
    for (name, raw) in file.styles.unwrap_or_default() {
        let style = resolve_style(&name, raw.unwrap_or_default())?;
        styles.insert(name, style);
    }
    if !styles.contains_key(NORMAL_STYLE) {
        log::debug!("no '{NORMAL_STYLE}' style configured, using defaults");
    }
    Ok(StyleSet::new(styles))
}

fn resolve_style(name: &str, raw: RawStyle) -> Result<StyleDefinition, Error> {
    let defaults = StyleDefinition::default();
    let in_style = |e: Error| match e {
        Error::Config(reason) => Error::Config(format!("style '{name}': {reason}")),
        other => other,
    };

    let font_size = raw.font_size.unwrap_or(defaults.font_size);
    if font_size.is_nan() || font_size <= 0.0 {
        return Err(Error::Config(format!(
            "style '{name}': font_size must be positive, got {font_size}"
        )));
    }
    let space_before = non_negative(name, "space_before", raw.space_before)?;
    let space_after = non_negative(name, "space_after", raw.space_after)?;

    let color = raw
        .color
        .as_ref()
        .and_then(color_text)
        .map(|text| parse_hex_color(&text))
        .transpose()
        .map_err(&in_style)?;
    let alignment = raw
        .alignment
        .as_deref()
        .map(Alignment::parse)
        .transpose()
        .map_err(&in_style)?
        .unwrap_or(defaults.alignment);

    Ok(StyleDefinition {
        font_name: raw.font_name.unwrap_or(defaults.font_name),
        font_size,
        bold: raw.bold.unwrap_or(false),
        italic: raw.italic.unwrap_or(false),
        underline: raw.underline.unwrap_or(false),
        color,
        alignment,
        space_before,
        space_after,
    })
}

/// Unquoted all-digit colors such as `000000` arrive as YAML integers.
fn color_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => match n.as_u64() {
            Some(v) => Some(format!("{v:06}")),
            None => Some(n.to_string()),
        },
        serde_yaml::Value::Null => None,
        other => Some(format!("{other:?}")),
    }
}

fn non_negative(style: &str, field: &str, value: Option<f32>) -> Result<f32, Error> {
    match value {
        Some(v) if v < 0.0 => Err(Error::Config(format!(
            "style '{style}': {field} must not be negative, got {v}"
        ))),
        Some(v) => Ok(v),
        None => Ok(0.0),
    }
}

/// Parse a `layout:` document, converting every dimension to inches.
pub fn parse_layout(yaml: &str) -> Result<LayoutDefinition, Error> {
    let file: LayoutFile = if yaml.trim().is_empty() {
        LayoutFile::default()
    } else {
        serde_yaml::from_str::<Option<LayoutFile>>(yaml)?.unwrap_or_default()
    };
    let raw = file.layout.unwrap_or_default();
    let defaults = LayoutDefinition::default();

    let unit = raw
        .unit
        .as_deref()
        .map(Unit::parse)
        .transpose()?
        .unwrap_or_default();
    // Defaults are expressed in inches whatever the configured unit is.
    let dimension = |value: Option<f32>, default: f32| match value {
        Some(v) => unit.to_inches(v),
        None => Ok(default),
    };

    let page_numbering = match raw.page_number_format {
        Some(format) => Some(PageNumbering {
            format,
            position: raw
                .page_number_position
                .as_deref()
                .map(PagePosition::parse)
                .transpose()?
                .unwrap_or_default(),
            alignment: raw
                .page_number_alignment
                .as_deref()
                .map(Alignment::parse)
                .transpose()?
                .unwrap_or(Alignment::Center),
        }),
        None => None,
    };

    Ok(LayoutDefinition {
        page_width: dimension(raw.page_width, defaults.page_width)?,
        page_height: dimension(raw.page_height, defaults.page_height)?,
        margin_top: dimension(raw.margin_top, defaults.margin_top)?,
        margin_bottom: dimension(raw.margin_bottom, defaults.margin_bottom)?,
        margin_left: dimension(raw.margin_left, defaults.margin_left)?,
        margin_right: dimension(raw.margin_right, defaults.margin_right)?,
        header_text: raw.header_text,
        header_style: raw.header_style.unwrap_or(defaults.header_style),
        footer_text: raw.footer_text,
        footer_style: raw.footer_style.unwrap_or(defaults.footer_style),
        page_numbering,
        first_page_header_footer: raw.first_page_header_footer.unwrap_or(false),
    })
}
