use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

/// Colon (semicolon on Windows) separated list of extra font directories.
pub(crate) const FONT_DIRS_ENV: &str = "KDP_BUILDER_FONTS";

const FIRST_CHAR: u8 = 32;
const HELVETICA_LINE_HEIGHT: f32 = 1.15;
const HELVETICA_ASCENDER: f32 = 0.718;

/// Hands out sequential indirect object ids.
pub(crate) struct RefAlloc {
    next: i32,
}

impl RefAlloc {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn bump(&mut self) -> Ref {
        let id = Ref::new(self.next);
        self.next += 1;
        id
    }
}

/// A font registered in the output PDF.
pub(crate) struct FontEntry {
    /// Resource name used in content streams (`F1`, `F2`, ...).
    pub(crate) resource: String,
    pub(crate) font_ref: Ref,
    /// Advance widths at 1000 units/em for WinAnsi bytes 32..=255.
    widths: Vec<f32>,
    pub(crate) line_height_ratio: f32,
    pub(crate) ascender_ratio: f32,
}

impl FontEntry {
    pub(crate) fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: f32 = to_winansi_bytes(text)
            .into_iter()
            .filter_map(|b| b.checked_sub(FIRST_CHAR))
            .map(|i| self.widths.get(i as usize).copied().unwrap_or(0.0))
            .sum();
        units * size / 1000.0
    }

    pub(crate) fn line_height(&self, size: f32) -> f32 {
        size * self.line_height_ratio
    }

    pub(crate) fn ascent(&self, size: f32) -> f32 {
        size * self.ascender_ratio
    }
}

/// Fonts keyed by (lowercase family, bold, italic), registered on first use.
#[derive(Default)]
pub(crate) struct FontBook {
    entries: Vec<FontEntry>,
    by_key: HashMap<(String, bool, bool), usize>,
}

impl FontBook {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get_or_register(
        &mut self,
        pdf: &mut Pdf,
        refs: &mut RefAlloc,
        font_name: &str,
        bold: bool,
        italic: bool,
    ) -> usize {
        let key = (font_name.to_lowercase(), bold, italic);
        if let Some(&idx) = self.by_key.get(&key) {
            return idx;
        }
        let resource = format!("F{}", self.entries.len() + 1);
        let entry = register_font(pdf, refs, font_name, bold, italic, resource);
        self.entries.push(entry);
        let idx = self.entries.len() - 1;
        self.by_key.insert(key, idx);
        idx
    }

    pub(crate) fn entry(&self, idx: usize) -> &FontEntry {
        &self.entries[idx]
    }

    pub(crate) fn entries(&self) -> &[FontEntry] {
        &self.entries
    }
}

/// (lowercase family name, bold, italic) -> (file path, face index within TTC)
type FontLookup = HashMap<(String, bool, bool), (PathBuf, u32)>;

static FONT_INDEX: OnceLock<FontLookup> = OnceLock::new();

fn font_family_name(face: &Face) -> Option<String> {
    // Name ID 1 keeps "Arial Narrow" apart from "Arial".
    face.names()
        .into_iter()
        .filter(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
        .find_map(|name| name.to_string())
}

fn read_font_style(data: &[u8], face_index: u32) -> Option<(String, bool, bool)> {
    let face = Face::parse(data, face_index).ok()?;
    let family = font_family_name(&face)?;
    Some((family, face.is_bold(), face.is_italic()))
}

fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    if let Ok(val) = std::env::var(FONT_DIRS_ENV) {
        let sep = if cfg!(windows) { ';' } else { ':' };
        dirs.extend(
            val.split(sep)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(PathBuf::from),
        );
    }

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        match std::env::var("WINDIR") {
            Ok(windir) => dirs.push(PathBuf::from(windir).join("Fonts")),
            Err(_) => dirs.push("C:\\Windows\\Fonts".into()),
        }
    }

    dirs
}

fn scan_font_dirs() -> FontLookup {
    let mut index = FontLookup::new();
    let mut stack = font_directories();
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase);
            let is_collection = match ext.as_deref() {
                Some("ttf" | "otf") => false,
                Some("ttc") => true,
                _ => continue,
            };
            let Ok(data) = std::fs::read(&path) else {
                continue;
            };
            let face_count = if is_collection {
                ttf_parser::fonts_in_collection(&data).unwrap_or(1)
            } else {
                1
            };
            for face_idx in 0..face_count {
                if let Some((family, bold, italic)) = read_font_style(&data, face_idx) {
                    index
                        .entry((family.to_lowercase(), bold, italic))
                        .or_insert((path.clone(), face_idx));
                }
            }
        }
    }
    log::debug!("font index: {} faces", index.len());
    index
}

/// Exact style match first, then the regular face of the same family.
fn find_font_file(font_name: &str, bold: bool, italic: bool) -> Option<(PathBuf, u32)> {
    let index = FONT_INDEX.get_or_init(scan_font_dirs);
    let key = font_name.to_lowercase();
    index
        .get(&(key.clone(), bold, italic))
        .or_else(|| (bold || italic).then(|| index.get(&(key, false, false))).flatten())
        .cloned()
}

/// Windows-1252 bytes 0x80..=0x9F that do not map to the same code point.
const WINANSI_HIGH: [(u8, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

fn winansi_to_char(byte: u8) -> char {
    WINANSI_HIGH
        .iter()
        .find(|&&(b, _)| b == byte)
        .map(|&(_, c)| c)
        .unwrap_or(byte as char)
}

fn char_to_winansi(c: char) -> Option<u8> {
    match c as u32 {
        0x00..=0x7F | 0xA0..=0xFF => Some(c as u8),
        _ => WINANSI_HIGH
            .iter()
            .find(|&&(_, ch)| ch == c)
            .map(|&(b, _)| b),
    }
}

/// Encode for a WinAnsi PDF string. Characters outside the code page are
/// dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().filter_map(char_to_winansi).collect()
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi 32..=255.
fn helvetica_widths(bold: bool) -> Vec<f32> {
    (FIRST_CHAR..=255u8)
        .map(|b| {
            let w = match b {
                32 => 278.0,
                33..=47 => 333.0,
                48..=57 => 556.0,
                58..=64 => 333.0,
                73 | 74 => 278.0,
                77 => 833.0,
                65..=90 => 667.0,
                91..=96 => 333.0,
                102 | 105 | 106 | 108 | 116 => 278.0,
                109 | 119 => 833.0,
                0x95 => 350.0,
                _ => 556.0,
            };
            if bold { w * 1.05 } else { w }
        })
        .collect()
}

fn helvetica_variant(bold: bool, italic: bool) -> &'static [u8] {
    match (bold, italic) {
        (true, true) => b"Helvetica-BoldOblique",
        (true, false) => b"Helvetica-Bold",
        (false, true) => b"Helvetica-Oblique",
        (false, false) => b"Helvetica",
    }
}

struct Metrics {
    widths: Vec<f32>,
    line_height_ratio: f32,
    ascender_ratio: f32,
}

/// Embed a TrueType/OpenType face as a simple WinAnsi font.
fn embed_truetype(
    pdf: &mut Pdf,
    refs: &mut RefAlloc,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    face_index: u32,
) -> Option<Metrics> {
    let face = Face::parse(font_data, face_index).ok()?;
    let data_len = i32::try_from(font_data.len()).ok()?;
    let descriptor_ref = refs.bump();
    let data_ref = refs.bump();

    let units = face.units_per_em() as f32;
    let scale = |v: f32| v / units * 1000.0;
    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        scale(bb.x_min as f32),
        scale(bb.y_min as f32),
        scale(bb.x_max as f32),
        scale(bb.y_max as f32),
    );

    let widths: Vec<f32> = (FIRST_CHAR..=255u8)
        .map(|byte| {
            face.glyph_index(winansi_to_char(byte))
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|adv| scale(adv as f32))
                .unwrap_or(0.0)
        })
        .collect();

    pdf.stream(data_ref, font_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font_name.replace(' ', "");
    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(if face.is_italic() { -12.0 } else { 0.0 })
        .ascent(scale(face.ascender() as f32))
        .descent(scale(face.descender() as f32))
        .cap_height(face.capital_height().map_or(700.0, |h| scale(h as f32)))
        .stem_v(if face.is_bold() { 120.0 } else { 80.0 })
        .font_file2(data_ref);

    {
        let mut d = pdf.indirect(font_ref).dict();
        d.pair(Name(b"Type"), Name(b"Font"));
        d.pair(Name(b"Subtype"), Name(b"TrueType"));
        d.pair(Name(b"BaseFont"), Name(ps_name.as_bytes()));
        d.pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));
        d.pair(Name(b"FirstChar"), i32::from(FIRST_CHAR));
        d.pair(Name(b"LastChar"), 255i32);
        d.pair(Name(b"FontDescriptor"), descriptor_ref);
        d.insert(Name(b"Widths"))
            .array()
            .items(widths.iter().copied());
    }

    let ascender = face.ascender() as f32;
    let descender = face.descender() as f32;
    Some(Metrics {
        widths,
        line_height_ratio: (ascender - descender + face.line_gap() as f32) / units,
        ascender_ratio: ascender / units,
    })
}

fn register_font(
    pdf: &mut Pdf,
    refs: &mut RefAlloc,
    font_name: &str,
    bold: bool,
    italic: bool,
    resource: String,
) -> FontEntry {
    let font_ref = refs.bump();

    let embedded = find_font_file(font_name, bold, italic).and_then(|(path, face_index)| {
        let data = std::fs::read(&path).ok()?;
        log::debug!("embedding {font_name} from {}", path.display());
        embed_truetype(pdf, refs, font_ref, font_name, &data, face_index)
    });

    let metrics = embedded.unwrap_or_else(|| {
        log::warn!("font not found: {font_name} bold={bold} italic={italic}, using Helvetica");
        pdf.type1_font(font_ref)
            .base_font(Name(helvetica_variant(bold, italic)))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        Metrics {
            widths: helvetica_widths(bold),
            line_height_ratio: HELVETICA_LINE_HEIGHT,
            ascender_ratio: HELVETICA_ASCENDER,
        }
    });

    FontEntry {
        resource,
        font_ref,
        widths: metrics.widths,
        line_height_ratio: metrics.line_height_ratio,
        ascender_ratio: metrics.ascender_ratio,
    }
}
