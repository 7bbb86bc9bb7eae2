use std::collections::{BTreeMap, HashMap};

use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use crate::assemble::DocumentBuilder;
use crate::error::Error;
use crate::fonts::{FontBook, RefAlloc, to_winansi_bytes};
use crate::model::{
    Alignment, LayoutDefinition, NORMAL_STYLE, PagePosition, Segment, StyleDefinition, StyleSet,
    fill_page_fields, heading_level, inches_to_points,
};

const LINK_COLOR: [u8; 3] = [0x05, 0x63, 0xC1];
const LIST_INDENT: f32 = 18.0; // 0.25in
const TOC_INDENT: f32 = 18.0;
const TOC_MAX_LEVEL: u8 = 3;
const INDEX_TITLE: &str = "Index";
const INDEX_TITLE_STYLE: &str = "heading1";

/// Buffered document content, laid out in `to_bytes`.
enum Block {
    Paragraph {
        segments: Vec<Segment>,
        bookmark: Option<String>,
        /// Position in the table of contents, for level 1-3 headings.
        toc_slot: Option<usize>,
    },
    ListItem {
        ordered: bool,
        level: usize,
        segments: Vec<Segment>,
    },
    PageBreak,
    TableOfContents,
    IndexEntry(String),
    Bookmark(String),
}

struct TocEntry {
    level: u8,
    title: String,
    bookmark: Option<String>,
}

/// Resolved drawing attributes of one piece of text.
#[derive(Clone, Copy)]
struct Ink {
    font: usize,
    size: f32,
    color: [u8; 3],
    underline: bool,
}

enum DrawOp {
    Text {
        x: f32,
        y: f32,
        ink: Ink,
        text: String,
    },
    Underline {
        x1: f32,
        x2: f32,
        y: f32,
        color: [u8; 3],
        width: f32,
    },
    /// Right-aligned page number of a table-of-contents entry, known only
    /// once the whole document is laid out.
    TocPageNumber {
        right: f32,
        y: f32,
        ink: Ink,
        slot: usize,
    },
}

struct LinkArea {
    rect: Rect,
    anchor: String,
}

#[derive(Default)]
struct PageLayout {
    ops: Vec<DrawOp>,
    links: Vec<LinkArea>,
}

/// A non-breaking run of text: no whitespace, single style.
struct Piece {
    text: String,
    ink: Ink,
    width: f32,
    link: Option<String>,
}

/// Pieces separated by whitespace. `gap` is the width of the whitespace
/// preceding the word.
struct Word {
    pieces: Vec<Piece>,
    gap: f32,
    width: f32,
}

struct Line {
    words: Vec<Word>,
    height: f32,
    ascent: f32,
}

impl Line {
    fn natural_width(&self) -> f32 {
        self.words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.width } else { w.gap + w.width })
            .sum()
    }
}

/// Geometry of the text box, in points from the bottom-left corner.
#[derive(Clone, Copy)]
struct Frame {
    page_width: f32,
    page_height: f32,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl Frame {
    fn from_layout(layout: &LayoutDefinition) -> Self {
        let page_width = inches_to_points(layout.page_width);
        let page_height = inches_to_points(layout.page_height);
        Self {
            page_width,
            page_height,
            left: inches_to_points(layout.margin_left),
            right: page_width - inches_to_points(layout.margin_right),
            top: page_height - inches_to_points(layout.margin_top),
            bottom: inches_to_points(layout.margin_bottom),
        }
    }

    fn width(&self) -> f32 {
        (self.right - self.left).max(1.0)
    }
}

/// Renders the document directly to PDF with `pdf-writer`.
pub struct PdfBuilder {
    styles: StyleSet,
    layout: LayoutDefinition,
    blocks: Vec<Block>,
    toc: Vec<TocEntry>,
    running: bool,
}

impl PdfBuilder {
    pub fn new(styles: StyleSet, layout: LayoutDefinition) -> Self {
        Self {
            styles,
            layout,
            blocks: Vec::new(),
            toc: Vec::new(),
            running: false,
        }
    }
}

impl DocumentBuilder for PdfBuilder {
    fn add_paragraph(
        &mut self,
        segments: &[Segment],
        auto_bookmark: Option<&str>,
    ) -> Result<(), Error> {
        let toc_slot = segments
            .first()
            .and_then(|first| heading_level(&first.style))
            .filter(|level| (1..=TOC_MAX_LEVEL).contains(level))
            .map(|level| {
                self.toc.push(TocEntry {
                    level,
                    title: segments.iter().map(|s| s.text.as_str()).collect(),
                    bookmark: auto_bookmark.map(str::to_string),
                });
                self.toc.len() - 1
            });
        self.blocks.push(Block::Paragraph {
            segments: segments.to_vec(),
            bookmark: auto_bookmark.map(str::to_string),
            toc_slot,
        });
        Ok(())
    }

    fn add_page_break(&mut self) -> Result<(), Error> {
        self.blocks.push(Block::PageBreak);
        Ok(())
    }

    fn add_table_of_contents(&mut self) -> Result<(), Error> {
        self.blocks.push(Block::TableOfContents);
        Ok(())
    }

    fn add_index_entry(&mut self, term: &str) -> Result<(), Error> {
        self.blocks.push(Block::IndexEntry(term.to_string()));
        Ok(())
    }

    fn add_bookmark(&mut self, name: &str) -> Result<(), Error> {
        self.blocks.push(Block::Bookmark(name.to_string()));
        Ok(())
    }

    fn add_list_item(
        &mut self,
        ordered: bool,
        level: usize,
        segments: &[Segment],
    ) -> Result<(), Error> {
        self.blocks.push(Block::ListItem {
            ordered,
            level: level.max(1),
            segments: segments.to_vec(),
        });
        Ok(())
    }

    fn apply_header_footer(&mut self) -> Result<(), Error> {
        self.running = self.layout.has_running_content();
        Ok(())
    }

    fn to_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let frame = Frame::from_layout(&self.layout);
        if frame.right <= frame.left || frame.top <= frame.bottom {
            return Err(Error::Pdf(format!(
                "margins leave no room for text on a {}x{} in page",
                self.layout.page_width, self.layout.page_height
            )));
        }

        let mut pdf = Pdf::new();
        let mut refs = RefAlloc::new();
        let catalog_id = refs.bump();
        let pages_id = refs.bump();

        let mut typesetter = Typesetter {
            styles: &self.styles,
            frame,
            pdf: &mut pdf,
            refs: &mut refs,
            fonts: FontBook::new(),
            pages: vec![PageLayout::default()],
            cursor_y: frame.top,
            destinations: HashMap::new(),
            toc_pages: vec![None; self.toc.len()],
            index: BTreeMap::new(),
            list_counters: Vec::new(),
        };
        for block in &self.blocks {
            typesetter.place_block(block, &self.toc);
        }
        typesetter.place_index();
        if self.running {
            typesetter.place_running_content(&self.layout);
        }

        let Typesetter {
            fonts,
            pages,
            destinations,
            toc_pages,
            ..
        } = typesetter;

        let page_ids: Vec<Ref> = pages.iter().map(|_| refs.bump()).collect();
        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        for (page_idx, page) in pages.iter().enumerate() {
            let content_id = refs.bump();
            let mut content = Content::new();
            for op in &page.ops {
                draw_op(&mut content, op, &fonts, &toc_pages);
            }
            pdf.stream(content_id, &content.finish());

            let mut annotation_ids = Vec::new();
            for link in &page.links {
                let Some(&(dest_page, dest_y)) = destinations.get(&link.anchor) else {
                    log::warn!("link to unknown bookmark '{}'", link.anchor);
                    continue;
                };
                let annot_id = refs.bump();
                let mut annot = pdf.annotation(annot_id);
                annot
                    .subtype(AnnotationType::Link)
                    .rect(link.rect)
                    .border(0.0, 0.0, 0.0, None);
                annot
                    .action()
                    .action_type(ActionType::GoTo)
                    .destination()
                    .page(page_ids[dest_page])
                    .xyz(frame.left, dest_y, None);
                annotation_ids.push(annot_id);
            }

            let mut page_writer = pdf.page(page_ids[page_idx]);
            page_writer
                .media_box(Rect::new(0.0, 0.0, frame.page_width, frame.page_height))
                .parent(pages_id)
                .contents(content_id);
            if !annotation_ids.is_empty() {
                page_writer.annotations(annotation_ids.iter().copied());
            }
            let mut resources = page_writer.resources();
            let mut font_dict = resources.fonts();
            for font in fonts.entries() {
                font_dict.pair(Name(font.resource.as_bytes()), font.font_ref);
            }
        }

        log::debug!("laid out {} pages", pages.len());
        Ok(pdf.finish())
    }
}

fn draw_op(content: &mut Content, op: &DrawOp, fonts: &FontBook, toc_pages: &[Option<usize>]) {
    match op {
        DrawOp::Text { x, y, ink, text } => show_text(content, *x, *y, ink, text, fonts),
        DrawOp::Underline {
            x1,
            x2,
            y,
            color,
            width,
        } => {
            let [r, g, b] = rgb(*color);
            content
                .set_stroke_rgb(r, g, b)
                .set_line_width(*width)
                .move_to(*x1, *y)
                .line_to(*x2, *y)
                .stroke();
        }
        DrawOp::TocPageNumber {
            right,
            y,
            ink,
            slot,
        } => {
            let Some(page) = toc_pages.get(*slot).copied().flatten() else {
                return;
            };
            let text = (page + 1).to_string();
            let width = fonts.entry(ink.font).text_width(&text, ink.size);
            show_text(content, right - width, *y, ink, &text, fonts);
        }
    }
}

fn show_text(content: &mut Content, x: f32, y: f32, ink: &Ink, text: &str, fonts: &FontBook) {
    let font = fonts.entry(ink.font);
    let [r, g, b] = rgb(ink.color);
    content
        .set_fill_rgb(r, g, b)
        .begin_text()
        .set_font(Name(font.resource.as_bytes()), ink.size)
        .next_line(x, y)
        .show(Str(&to_winansi_bytes(text)))
        .end_text();
}

fn rgb(color: [u8; 3]) -> [f32; 3] {
    color.map(|c| f32::from(c) / 255.0)
}

/// Mutable layout state while blocks are placed onto pages.
struct Typesetter<'a> {
    styles: &'a StyleSet,
    frame: Frame,
    pdf: &'a mut Pdf,
    refs: &'a mut RefAlloc,
    fonts: FontBook,
    pages: Vec<PageLayout>,
    cursor_y: f32,
    /// Bookmark name → (page index, y). First definition wins.
    destinations: HashMap<String, (usize, f32)>,
    toc_pages: Vec<Option<usize>>,
    /// Lowercased term → (display term, pages).
    index: BTreeMap<String, (String, Vec<usize>)>,
    list_counters: Vec<usize>,
}

impl Typesetter<'_> {
    fn current_page(&self) -> usize {
        self.pages.len() - 1
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.cursor_y = self.frame.top;
    }

    fn at_page_top(&self) -> bool {
        self.cursor_y >= self.frame.top
    }

    /// Move to a fresh page when `height` does not fit, unless the current
    /// page is still empty.
    fn ensure_space(&mut self, height: f32) {
        if self.cursor_y - height < self.frame.bottom && !self.at_page_top() {
            self.new_page();
        }
    }

    fn add_destination(&mut self, name: &str) {
        let here = (self.current_page(), self.cursor_y);
        self.destinations.entry(name.to_string()).or_insert(here);
    }

    fn ink(&mut self, style: &StyleDefinition, link: bool) -> Ink {
        let font = self.fonts.get_or_register(
            self.pdf,
            self.refs,
            &style.font_name,
            style.bold,
            style.italic,
        );
        Ink {
            font,
            size: style.font_size,
            color: if link {
                LINK_COLOR
            } else {
                style.color.unwrap_or([0, 0, 0])
            },
            underline: link || style.underline,
        }
    }

    fn place_block(&mut self, block: &Block, toc: &[TocEntry]) {
        if !matches!(
            block,
            Block::ListItem { .. } | Block::IndexEntry(_) | Block::Bookmark(_)
        ) {
            self.list_counters.clear();
        }

        match block {
            Block::Paragraph {
                segments,
                bookmark,
                toc_slot,
            } => {
                if segments.is_empty() {
                    self.place_blank_line();
                    return;
                }
                let style = self.styles.get(&segments[0].style).clone();
                let page = self.place_paragraph(segments, &style, 0.0, None, bookmark.as_deref());
                if let Some(slot) = toc_slot {
                    self.toc_pages[*slot] = Some(page);
                }
            }
            Block::ListItem {
                ordered,
                level,
                segments,
            } => {
                self.list_counters.resize(*level, 0);
                let counter = &mut self.list_counters[*level - 1];
                let label = if *ordered {
                    *counter += 1;
                    format!("{counter}.")
                } else {
                    *counter = 0;
                    "\u{2022}".to_string()
                };
                let style = match segments.first() {
                    Some(first) => self.styles.get(&first.style).clone(),
                    None => self.styles.normal().clone(),
                };
                let indent = LIST_INDENT * *level as f32;
                self.place_paragraph(segments, &style, indent, Some(&label), None);
            }
            Block::PageBreak => self.new_page(),
            Block::TableOfContents => self.place_toc(toc),
            Block::IndexEntry(term) => {
                let page = self.current_page();
                let entry = self
                    .index
                    .entry(term.to_lowercase())
                    .or_insert_with(|| (term.clone(), Vec::new()));
                if entry.1.last() != Some(&page) {
                    entry.1.push(page);
                }
            }
            Block::Bookmark(name) => self.add_destination(name),
        }
    }

    fn place_blank_line(&mut self) {
        let normal = self.styles.normal().clone();
        let ink = self.ink(&normal, false);
        let height = self.fonts.entry(ink.font).line_height(ink.size);
        self.ensure_space(height);
        self.cursor_y -= height;
    }

    /// Wrap and place one paragraph; returns the page its first line is on.
    fn place_paragraph(
        &mut self,
        segments: &[Segment],
        style: &StyleDefinition,
        indent: f32,
        label: Option<&str>,
        bookmark: Option<&str>,
    ) -> usize {
        if !self.at_page_top() {
            self.cursor_y -= style.space_before;
        }
        let left = self.frame.left + indent;
        let width = (self.frame.right - left).max(1.0);
        let words = self.words(segments);
        let lines = self.break_lines(words, width, style);

        let mut first_page = None;
        let line_count = lines.len();
        for (i, line) in lines.into_iter().enumerate() {
            self.ensure_space(line.height);
            if i == 0 {
                first_page = Some(self.current_page());
                if let Some(name) = bookmark {
                    self.add_destination(name);
                }
            }
            let baseline = self.cursor_y - line.ascent;
            if i == 0
                && let Some(label) = label
            {
                let normal = self.styles.normal().clone();
                let ink = self.ink(&normal, false);
                let x = left - LIST_INDENT;
                self.push_op(DrawOp::Text {
                    x,
                    y: baseline,
                    ink: Ink { size: style.font_size, ..ink },
                    text: label.to_string(),
                });
            }
            let last = i + 1 == line_count;
            self.place_line(line, left, width, baseline, style.alignment, last);
        }
        self.cursor_y -= style.space_after;
        first_page.unwrap_or_else(|| self.current_page())
    }

    fn push_op(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Split segments into words of styled pieces. Leading whitespace of the
    /// paragraph is dropped.
    fn words(&mut self, segments: &[Segment]) -> Vec<Word> {
        let mut words: Vec<Word> = Vec::new();
        let mut pending_gap = 0.0;
        let mut in_word = false;

        for segment in segments {
            let style = self.styles.get(&segment.style).clone();
            let ink = self.ink(&style, segment.is_link());
            for chunk in split_whitespace_runs(&segment.text) {
                let font = self.fonts.entry(ink.font);
                if chunk.starts_with(char::is_whitespace) {
                    let spaces = chunk.replace(|c: char| c.is_whitespace(), " ");
                    pending_gap += font.text_width(&spaces, ink.size);
                    in_word = false;
                    continue;
                }
                let piece = Piece {
                    text: chunk.to_string(),
                    ink,
                    width: font.text_width(chunk, ink.size),
                    link: segment.link_target.clone(),
                };
                match words.last_mut() {
                    Some(word) if in_word => {
                        word.width += piece.width;
                        word.pieces.push(piece);
                    }
                    _ => {
                        words.push(Word {
                            gap: if words.is_empty() { 0.0 } else { pending_gap },
                            width: piece.width,
                            pieces: vec![piece],
                        });
                        pending_gap = 0.0;
                    }
                }
                in_word = true;
            }
        }
        words
    }

    fn break_lines(&mut self, words: Vec<Word>, width: f32, style: &StyleDefinition) -> Vec<Line> {
        let mut lines: Vec<Line> = Vec::new();
        let mut current: Vec<Word> = Vec::new();
        let mut current_width = 0.0;

        for word in words {
            let added = if current.is_empty() {
                word.width
            } else {
                word.gap + word.width
            };
            if !current.is_empty() && current_width + added > width {
                lines.push(self.finish_line(std::mem::take(&mut current), style));
                current_width = word.width;
            } else {
                current_width += added;
            }
            current.push(word);
        }
        if !current.is_empty() || lines.is_empty() {
            lines.push(self.finish_line(current, style));
        }
        lines
    }

    fn finish_line(&mut self, words: Vec<Word>, style: &StyleDefinition) -> Line {
        let (mut height, mut ascent) = (0.0f32, 0.0f32);
        for piece in words.iter().flat_map(|w| &w.pieces) {
            let font = self.fonts.entry(piece.ink.font);
            height = height.max(font.line_height(piece.ink.size));
            ascent = ascent.max(font.ascent(piece.ink.size));
        }
        if height == 0.0 {
            let ink = self.ink(style, false);
            let font = self.fonts.entry(ink.font);
            height = font.line_height(ink.size);
            ascent = font.ascent(ink.size);
        }
        Line {
            words,
            height,
            ascent,
        }
    }

    fn place_line(
        &mut self,
        line: Line,
        left: f32,
        width: f32,
        baseline: f32,
        alignment: Alignment,
        last: bool,
    ) {
        let natural = line.natural_width();
        let slack = (width - natural).max(0.0);
        let gaps = line.words.len().saturating_sub(1);
        let (mut x, extra_gap) = match alignment {
            Alignment::Left => (left, 0.0),
            Alignment::Center => (left + slack / 2.0, 0.0),
            Alignment::Right => (left + slack, 0.0),
            Alignment::Justify if !last && gaps > 0 => (left, slack / gaps as f32),
            Alignment::Justify => (left, 0.0),
        };

        let page = self.current_page();
        let height = line.height;
        for (i, word) in line.words.into_iter().enumerate() {
            if i > 0 {
                x += word.gap + extra_gap;
            }
            for piece in word.pieces {
                let font = self.fonts.entry(piece.ink.font);
                if piece.ink.underline {
                    let y = baseline - piece.ink.size * 0.12;
                    self.pages[page].ops.push(DrawOp::Underline {
                        x1: x,
                        x2: x + piece.width,
                        y,
                        color: piece.ink.color,
                        width: (piece.ink.size / 18.0).max(0.5),
                    });
                }
                if let Some(anchor) = piece.link {
                    let descent = font.line_height(piece.ink.size) - font.ascent(piece.ink.size);
                    self.pages[page].links.push(LinkArea {
                        rect: Rect::new(
                            x,
                            baseline - descent,
                            x + piece.width,
                            baseline + font.ascent(piece.ink.size).min(height),
                        ),
                        anchor,
                    });
                }
                self.pages[page].ops.push(DrawOp::Text {
                    x,
                    y: baseline,
                    ink: piece.ink,
                    text: piece.text,
                });
                x += piece.width;
            }
        }
        self.cursor_y -= height;
    }

    /// One line per level 1-3 heading, linked to it, with its page number
    /// right-aligned.
    fn place_toc(&mut self, toc: &[TocEntry]) {
        let style = self.styles.normal().clone();
        let number_ink = self.ink(&style, false);
        for (slot, entry) in toc.iter().enumerate() {
            let indent = TOC_INDENT * f32::from(entry.level - 1);
            let segment = match &entry.bookmark {
                Some(anchor) => Segment::link(entry.title.clone(), anchor.clone()),
                None => Segment::plain(entry.title.clone()),
            };
            let words = self.words(std::slice::from_ref(&segment));
            let mut lines = self.break_lines(words, self.frame.width() - indent, &style);
            // Titles too long for one line are kept to their first line.
            lines.truncate(1);
            let Some(line) = lines.pop() else { continue };
            self.ensure_space(line.height);
            let baseline = self.cursor_y - line.ascent;
            self.push_op(DrawOp::TocPageNumber {
                right: self.frame.right,
                y: baseline,
                ink: number_ink,
                slot,
            });
            let left = self.frame.left + indent;
            self.place_line(line, left, self.frame.width() - indent, baseline, Alignment::Left, true);
        }
    }

    /// Append the collected index terms on a new page.
    fn place_index(&mut self) {
        if self.index.is_empty() {
            return;
        }
        self.list_counters.clear();
        self.new_page();
        let title_style = self.styles.get(INDEX_TITLE_STYLE).clone();
        self.place_paragraph(
            &[Segment::styled(INDEX_TITLE, INDEX_TITLE_STYLE)],
            &title_style,
            0.0,
            None,
            None,
        );

        let style = self.styles.get(NORMAL_STYLE).clone();
        let entries: Vec<String> = self
            .index
            .values()
            .map(|(term, pages)| {
                let pages: Vec<String> = pages.iter().map(|p| (p + 1).to_string()).collect();
                format!("{term}, {}", pages.join(", "))
            })
            .collect();
        for entry in entries {
            self.place_paragraph(&[Segment::plain(entry)], &style, 0.0, None, None);
        }
    }

    /// Header, footer and page number lines on every page, except the first
    /// unless the layout asks for it.
    fn place_running_content(&mut self, layout: &LayoutDefinition) {
        let total = self.pages.len();
        let skip = usize::from(!layout.first_page_header_footer);
        let header_y = self.frame.page_height - (self.frame.page_height - self.frame.top) / 2.0;
        let footer_y = self.frame.bottom / 2.0;

        let mut lines: Vec<(PagePosition, String, String, Alignment)> = Vec::new();
        for (position, text, style_name) in [
            (PagePosition::Header, &layout.header_text, &layout.header_style),
            (PagePosition::Footer, &layout.footer_text, &layout.footer_style),
        ] {
            let alignment = self.styles.get(style_name).alignment;
            if let Some(text) = text {
                lines.push((position, text.clone(), style_name.clone(), alignment));
            }
            if let Some(numbering) = layout.page_numbering_at(position) {
                lines.push((
                    position,
                    numbering.format.clone(),
                    style_name.clone(),
                    numbering.alignment,
                ));
            }
        }

        for page in skip..total {
            let mut offsets: HashMap<PagePosition, f32> = HashMap::new();
            for (position, text, style_name, alignment) in &lines {
                let style = self.styles.get(style_name).clone();
                let ink = self.ink(&style, false);
                let font = self.fonts.entry(ink.font);
                let text = fill_page_fields(text, page + 1, total);
                let width = font.text_width(&text, ink.size);
                let height = font.line_height(ink.size);
                let x = match alignment {
                    Alignment::Left | Alignment::Justify => self.frame.left,
                    Alignment::Center => self.frame.left + (self.frame.width() - width) / 2.0,
                    Alignment::Right => self.frame.right - width,
                };
                let offset = offsets.entry(*position).or_insert(0.0);
                let y = match position {
                    PagePosition::Header => header_y - *offset,
                    PagePosition::Footer => footer_y + *offset,
                };
                *offset += height;
                self.pages[page].ops.push(DrawOp::Text { x, y, ink, text });
            }
        }
    }
}

/// Split text into alternating whitespace and non-whitespace runs.
fn split_whitespace_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut prev_ws: Option<bool> = None;
    for (i, c) in text.char_indices() {
        let ws = c.is_whitespace();
        if prev_ws.is_some_and(|p| p != ws) {
            runs.push(&text[start..i]);
            start = i;
        }
        prev_ws = Some(ws);
    }
    if start < text.len() {
        runs.push(&text[start..]);
    }
    runs
}
