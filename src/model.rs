use std::collections::HashMap;

use crate::error::Error;

pub const NORMAL_STYLE: &str = "normal";
pub const STRONG_STYLE: &str = "strong";
pub const EMPHASIS_STYLE: &str = "emphasis";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn parse(val: &str) -> Result<Self, Error> {
        match val.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            "justify" => Ok(Alignment::Justify),
            other => Err(Error::Config(format!(
                "invalid alignment '{other}'. Must be 'left', 'center', 'right' or 'justify'."
            ))),
        }
    }
}

/// Resolved formatting for one named style.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleDefinition {
    pub font_name: String,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<[u8; 3]>, // None = automatic (black)
    pub alignment: Alignment,
    pub space_before: f32,
    pub space_after: f32,
}

impl Default for StyleDefinition {
    fn default() -> Self {
        Self {
            font_name: String::from("Arial"),
            font_size: 11.0,
            bold: false,
            italic: false,
            underline: false,
            color: None,
            alignment: Alignment::Left,
            space_before: 0.0,
            space_after: 0.0,
        }
    }
}

/// Parse `RRGGBB` or `#RRGGBB`.
pub fn parse_hex_color(val: &str) -> Result<[u8; 3], Error> {
    let hex = val.strip_prefix('#').unwrap_or(val);
    if hex.len() != 6 {
        return Err(Error::Config(format!(
            "invalid color format: {val}. Expected 6 hex characters."
        )));
    }
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(|| {
                Error::Config(format!("invalid hex color: {val}. Must contain only hex digits."))
            })
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// Style name → definition, with a guaranteed `normal` entry that every
/// lookup miss resolves to.
#[derive(Clone, Debug)]
pub struct StyleSet {
    styles: HashMap<String, StyleDefinition>,
}

impl StyleSet {
    pub fn new(mut styles: HashMap<String, StyleDefinition>) -> Self {
        styles
            .entry(NORMAL_STYLE.to_string())
            .or_insert_with(StyleDefinition::default);
        Self { styles }
    }

    pub fn get(&self, name: &str) -> &StyleDefinition {
        match self.styles.get(name) {
            Some(style) => style,
            None => {
                log::debug!("style '{name}' not defined, falling back to '{NORMAL_STYLE}'");
                self.normal()
            }
        }
    }

    pub fn normal(&self) -> &StyleDefinition {
        &self.styles[NORMAL_STYLE]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleSet {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl FromIterator<(String, StyleDefinition)> for StyleSet {
    fn from_iter<I: IntoIterator<Item = (String, StyleDefinition)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Unit {
    #[default]
    Inches,
    Mm,
    Cm,
}

impl Unit {
    pub const MM_TO_INCHES: f32 = 1.0 / 25.4;
    pub const CM_TO_INCHES: f32 = 1.0 / 2.54;

    pub fn parse(val: &str) -> Result<Self, Error> {
        match val.trim().to_ascii_lowercase().as_str() {
            "inches" => Ok(Unit::Inches),
            "mm" => Ok(Unit::Mm),
            "cm" => Ok(Unit::Cm),
            other => Err(Error::Config(format!(
                "invalid unit '{other}'. Must be 'inches', 'mm', or 'cm'."
            ))),
        }
    }

    pub fn to_inches(self, value: f32) -> Result<f32, Error> {
        if value < 0.0 || !value.is_finite() {
            return Err(Error::Config(format!(
                "dimension values must be positive, got {value}"
            )));
        }
        Ok(match self {
            Unit::Inches => value,
            Unit::Mm => value * Self::MM_TO_INCHES,
            Unit::Cm => value * Self::CM_TO_INCHES,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PagePosition {
    Header,
    #[default]
    Footer,
}

impl PagePosition {
    pub fn parse(val: &str) -> Result<Self, Error> {
        match val.trim().to_ascii_lowercase().as_str() {
            "header" => Ok(PagePosition::Header),
            "footer" => Ok(PagePosition::Footer),
            other => Err(Error::Config(format!(
                "invalid page number position '{other}'. Must be 'header' or 'footer'."
            ))),
        }
    }
}

/// Page number line, e.g. `Page {page} of {total}`.
#[derive(Clone, Debug, PartialEq)]
pub struct PageNumbering {
    pub format: String,
    pub position: PagePosition,
    pub alignment: Alignment,
}

/// Page geometry and running header/footer content. Lengths are in inches.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutDefinition {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub header_text: Option<String>,
    pub header_style: String,
    pub footer_text: Option<String>,
    pub footer_style: String,
    pub page_numbering: Option<PageNumbering>,
    pub first_page_header_footer: bool,
}

impl Default for LayoutDefinition {
    fn default() -> Self {
        Self {
            page_width: 8.5,
            page_height: 11.0,
            margin_top: 1.0,
            margin_bottom: 1.0,
            margin_left: 1.0,
            margin_right: 1.0,
            header_text: None,
            header_style: NORMAL_STYLE.to_string(),
            footer_text: None,
            footer_style: NORMAL_STYLE.to_string(),
            page_numbering: None,
            first_page_header_footer: false,
        }
    }
}

impl LayoutDefinition {
    pub fn has_running_content(&self) -> bool {
        self.header_text.is_some() || self.footer_text.is_some() || self.page_numbering.is_some()
    }

    pub fn page_numbering_at(&self, position: PagePosition) -> Option<&PageNumbering> {
        self.page_numbering
            .as_ref()
            .filter(|numbering| numbering.position == position)
    }
}

/// A run of text tagged with a style name and, for internal hyperlinks,
/// the anchor it points to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: String,
    pub link_target: Option<String>,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, NORMAL_STYLE)
    }

    pub fn styled(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: style.into(),
            link_target: None,
        }
    }

    pub fn link(label: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            text: label.into(),
            style: NORMAL_STYLE.to_string(),
            link_target: Some(anchor.into()),
        }
    }

    pub fn is_link(&self) -> bool {
        self.link_target.is_some()
    }
}

/// `heading3` → 3. Case-insensitive; anything else is not a heading style.
pub fn heading_level(style: &str) -> Option<u8> {
    let prefix = style.get(..7)?;
    if !prefix.eq_ignore_ascii_case("heading") {
        return None;
    }
    let digits = &style[7..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Points per inch, shared by both back ends.
pub const POINTS_PER_INCH: f32 = 72.0;

pub fn inches_to_points(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

/// A piece of header/footer text: literal text or a page-number field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageField<'a> {
    Text(&'a str),
    Page,
    Total,
}

const PAGE_PLACEHOLDER: &str = "{page}";
const TOTAL_PLACEHOLDER: &str = "{total}";

/// Split running text on `{page}` and `{total}`.
pub fn split_page_fields(text: &str) -> Vec<PageField<'_>> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let next = [PAGE_PLACEHOLDER, TOTAL_PLACEHOLDER]
            .into_iter()
            .filter_map(|p| rest.find(p).map(|at| (at, p)))
            .min_by_key(|&(at, _)| at);
        let Some((at, placeholder)) = next else {
            pieces.push(PageField::Text(rest));
            break;
        };
        if at > 0 {
            pieces.push(PageField::Text(&rest[..at]));
        }
        pieces.push(if placeholder == PAGE_PLACEHOLDER {
            PageField::Page
        } else {
            PageField::Total
        });
        rest = &rest[at + placeholder.len()..];
    }
    pieces
}

/// Substitute page numbers into running text.
pub fn fill_page_fields(text: &str, page: usize, total: usize) -> String {
    split_page_fields(text)
        .into_iter()
        .map(|piece| match piece {
            PageField::Text(t) => t.to_string(),
            PageField::Page => page.to_string(),
            PageField::Total => total.to_string(),
        })
        .collect()
}
