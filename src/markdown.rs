//! Line classifier and inline tokenizer for the annotated Markdown dialect.
//!
//! Every input line maps to exactly one [`Line`]. Directive lines
//! (`<<<pagebreak>>>`, `<<<toc>>>`, `<<<index:TERM>>>`, `<<<bookmark:NAME>>>`)
//! are matched first on the trimmed line; headings and list items next; all
//! remaining non-blank lines are content.
//!
//! Content is tokenized in two passes. The bracket-delimited spans
//! `{text}[style]` and `[label](#anchor)` are resolved first. The literal
//! runs between them, and the text of spans styled `normal`, are then
//! scanned for the standard `**strong**`, `__strong__`, `*emphasis*` and
//! `_emphasis_` markers. Links and other custom styles are left as is.

use crate::model::{EMPHASIS_STYLE, NORMAL_STYLE, STRONG_STYLE, Segment};

const PAGE_BREAK: &str = "<<<pagebreak>>>";
const TABLE_OF_CONTENTS: &str = "<<<toc>>>";
const INDEX_PREFIX: &str = "<<<index:";
const BOOKMARK_PREFIX: &str = "<<<bookmark:";
const DIRECTIVE_SUFFIX: &str = ">>>";

/// Delimiter and resulting style, in the order candidates are considered.
const EMPHASIS_MARKERS: [(&str, &str); 4] = [
    ("**", STRONG_STYLE),
    ("__", STRONG_STYLE),
    ("*", EMPHASIS_STYLE),
    ("_", EMPHASIS_STYLE),
];

const TAB_WIDTH: usize = 4;
const SPACES_PER_LEVEL: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    PageBreak,
    TableOfContents,
    IndexEntry(String),
    Bookmark(String),
    Heading { level: u8, segments: Vec<Segment> },
    ListItem {
        ordered: bool,
        level: usize,
        segments: Vec<Segment>,
    },
    Content(Vec<Segment>),
    Blank,
}

impl Line {
    pub fn is_directive(&self) -> bool {
        matches!(
            self,
            Line::PageBreak | Line::TableOfContents | Line::IndexEntry(_) | Line::Bookmark(_)
        )
    }
}

/// A recognized list item: marker kind, nesting level and the text after
/// the marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListMarker<'a> {
    pub ordered: bool,
    pub level: usize,
    pub text: &'a str,
}

pub fn is_page_break(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(PAGE_BREAK)
}

pub fn is_table_of_contents(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(TABLE_OF_CONTENTS)
}

/// The term of an `<<<index:TERM>>>` line, verbatim.
pub fn index_term(line: &str) -> Option<&str> {
    wrapped_directive(line, INDEX_PREFIX)
}

/// The name of a `<<<bookmark:NAME>>>` line, verbatim.
pub fn bookmark_name(line: &str) -> Option<&str> {
    wrapped_directive(line, BOOKMARK_PREFIX)
}

fn wrapped_directive<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let trimmed = line.trim();
    let head = trimmed.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let inner = trimmed[prefix.len()..].strip_suffix(DIRECTIVE_SUFFIX)?;
    (!inner.is_empty()).then_some(inner)
}

/// `## Title` → `(2, "Title")`. Seven or more `#` are not a heading.
pub fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    let text = rest.trim_start();
    if text.len() == rest.len() || text.is_empty() {
        return None;
    }
    Some((hashes as u8, text))
}

pub fn parse_list_item(line: &str) -> Option<ListMarker<'_>> {
    let indent_len = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    let (indent, body) = line.split_at(indent_len);
    let width: usize = indent
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum();

    let (ordered, after_marker) = match body.strip_prefix(['-', '*', '+']) {
        Some(rest) => (false, rest),
        None => {
            let digits = body.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return None;
            }
            (true, body[digits..].strip_prefix(['.', ')'])?)
        }
    };

    let text = after_marker.trim_start_matches([' ', '\t']);
    if text.len() == after_marker.len() || text.trim().is_empty() {
        return None;
    }
    Some(ListMarker {
        ordered,
        level: width / SPACES_PER_LEVEL + 1,
        text,
    })
}

/// Classify one input line (without its line terminator).
pub fn classify(line: &str) -> Line {
    if is_page_break(line) {
        return Line::PageBreak;
    }
    if is_table_of_contents(line) {
        return Line::TableOfContents;
    }
    if let Some(term) = index_term(line) {
        return Line::IndexEntry(term.to_string());
    }
    if let Some(name) = bookmark_name(line) {
        return Line::Bookmark(name.to_string());
    }
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some((level, text)) = parse_heading(line) {
        return Line::Heading {
            level,
            segments: vec![heading_segment(level, text)],
        };
    }
    if let Some(item) = parse_list_item(line) {
        return Line::ListItem {
            ordered: item.ordered,
            level: item.level,
            segments: parse_inline(item.text),
        };
    }
    Line::Content(parse_inline(line))
}

/// Segments for a content line. A heading line yields a single
/// `heading<N>` segment and is not scanned for inline markup.
pub fn parse_line(line: &str) -> Vec<Segment> {
    match parse_heading(line) {
        Some((level, text)) => vec![heading_segment(level, text)],
        None => parse_inline(line),
    }
}

fn heading_segment(level: u8, text: &str) -> Segment {
    Segment::styled(text, format!("heading{level}"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpanKind {
    Styled,
    Link,
}

/// A bracket-delimited match. `text` is the visible text, `target` the
/// style name or link anchor.
#[derive(Clone, Copy, Debug)]
struct Span<'a> {
    kind: SpanKind,
    start: usize,
    end: usize,
    text: &'a str,
    target: &'a str,
}

/// Inline scan only: custom styles, internal links and emphasis. Never
/// recognizes headings, list markers or directives.
pub fn parse_inline(text: &str) -> Vec<Segment> {
    let mut spans = find_spans(text, '{', styled_span_at);
    spans.extend(find_spans(text, '[', link_span_at));
    // Stable: on equal starts the longer span comes first.
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut segments = Vec::new();
    let mut cursor = 0;
    for span in spans {
        if span.start < cursor {
            log::trace!("skipping span at {} overlapping previous match", span.start);
            continue;
        }
        if span.start > cursor {
            fold_emphasis(&text[cursor..span.start], &mut segments);
        }
        match span.kind {
            // Only `normal` spans are emphasis-folded; other styles are opaque.
            SpanKind::Styled if span.target == NORMAL_STYLE => {
                fold_emphasis(span.text, &mut segments)
            }
            SpanKind::Styled => segments.push(Segment::styled(span.text, span.target)),
            SpanKind::Link => segments.push(Segment::link(span.text, span.target)),
        }
        cursor = span.end;
    }
    if cursor < text.len() {
        fold_emphasis(&text[cursor..], &mut segments);
    }
    segments
}

fn find_spans<'a>(
    text: &'a str,
    open: char,
    span_at: fn(&'a str, usize) -> Option<Span<'a>>,
) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut from = 0;
    while let Some(offset) = text[from..].find(open) {
        let start = from + offset;
        match span_at(text, start) {
            Some(span) => {
                from = span.end;
                spans.push(span);
            }
            None => from = start + open.len_utf8(),
        }
    }
    spans
}

/// `text[start..]` begins with `open`: returns `(inner_end, after_close)`
/// for a non-empty run up to the first `close`.
fn bracketed(text: &str, start: usize, open: char, close: char) -> Option<(usize, usize)> {
    let rest = text.get(start..)?.strip_prefix(open)?;
    let inner_len = rest.find(close)?;
    if inner_len == 0 {
        return None;
    }
    let inner_end = start + open.len_utf8() + inner_len;
    Some((inner_end, inner_end + close.len_utf8()))
}

// {inner}[style]
fn styled_span_at(text: &str, start: usize) -> Option<Span<'_>> {
    let (inner_end, after_inner) = bracketed(text, start, '{', '}')?;
    let (style_end, end) = bracketed(text, after_inner, '[', ']')?;
    Some(Span {
        kind: SpanKind::Styled,
        start,
        end,
        text: &text[start + 1..inner_end],
        target: &text[after_inner + 1..style_end],
    })
}

// [label](#anchor)
fn link_span_at(text: &str, start: usize) -> Option<Span<'_>> {
    let (label_end, after_label) = bracketed(text, start, '[', ']')?;
    let rest = text[after_label..].strip_prefix("(#")?;
    let anchor_len = rest.find(')')?;
    if anchor_len == 0 {
        return None;
    }
    let anchor_start = after_label + 2;
    let anchor_end = anchor_start + anchor_len;
    Some(Span {
        kind: SpanKind::Link,
        start,
        end: anchor_end + 1,
        text: &text[start + 1..label_end],
        target: &text[anchor_start..anchor_end],
    })
}

#[derive(Clone, Copy, Debug)]
struct Delimited {
    start: usize,
    inner_start: usize,
    inner_end: usize,
    end: usize,
}

/// Split a literal run into `normal`, `strong` and `emphasis` segments.
/// Leftmost match wins; on equal starts the longest match wins.
fn fold_emphasis(text: &str, out: &mut Vec<Segment>) {
    let mut pos = 0;
    while pos < text.len() {
        let mut best: Option<(Delimited, &str)> = None;
        for (delimiter, style) in EMPHASIS_MARKERS {
            let Some(candidate) = find_delimited(text, pos, delimiter) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((current, _)) => {
                    candidate.start < current.start
                        || (candidate.start == current.start && candidate.end > current.end)
                }
            };
            if better {
                best = Some((candidate, style));
            }
        }

        let Some((found, style)) = best else {
            out.push(Segment::plain(&text[pos..]));
            return;
        };
        if found.start > pos {
            out.push(Segment::plain(&text[pos..found.start]));
        }
        out.push(Segment::styled(
            &text[found.inner_start..found.inner_end],
            style,
        ));
        pos = found.end;
    }
}

/// Leftmost `delimiter inner delimiter` at or after `from`, where `inner`
/// is the shortest run that starts and ends with a non-whitespace character.
fn find_delimited(text: &str, from: usize, delimiter: &str) -> Option<Delimited> {
    let mut search = from;
    while let Some(offset) = text[search..].find(delimiter) {
        let start = search + offset;
        let inner_start = start + delimiter.len();
        if let Some(inner_end) = shortest_inner(text, inner_start, delimiter) {
            return Some(Delimited {
                start,
                inner_start,
                inner_end,
                end: inner_end + delimiter.len(),
            });
        }
        // Delimiters are ASCII, so the next byte is a char boundary.
        search = start + 1;
    }
    None
}

fn shortest_inner(text: &str, inner_start: usize, delimiter: &str) -> Option<usize> {
    let inner = &text[inner_start..];
    if inner.chars().next()?.is_whitespace() {
        return None;
    }
    for (idx, ch) in inner.char_indices() {
        if ch == '\n' {
            return None;
        }
        let end = inner_start + idx + ch.len_utf8();
        if !ch.is_whitespace() && text[end..].starts_with(delimiter) {
            return Some(end);
        }
    }
    None
}
