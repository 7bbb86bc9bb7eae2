//! Drives a [`DocumentBuilder`] from the classified line stream.

use std::path::Path;

use crate::bookmarks::sanitize_bookmark_name;
use crate::error::Error;
use crate::markdown::{self, Line};
use crate::model::Segment;

/// The operations both back ends implement. Calls arrive in document order,
/// one per input line, followed by a single `apply_header_footer` and then
/// `save`.
pub trait DocumentBuilder {
    fn add_paragraph(&mut self, segments: &[Segment], auto_bookmark: Option<&str>)
    -> Result<(), Error>;
    fn add_page_break(&mut self) -> Result<(), Error>;
    fn add_table_of_contents(&mut self) -> Result<(), Error>;
    fn add_index_entry(&mut self, term: &str) -> Result<(), Error>;
    fn add_bookmark(&mut self, name: &str) -> Result<(), Error>;
    fn add_list_item(&mut self, ordered: bool, level: usize, segments: &[Segment])
    -> Result<(), Error>;
    fn apply_header_footer(&mut self) -> Result<(), Error>;

    /// Serialize the finished document.
    fn to_bytes(&mut self) -> Result<Vec<u8>, Error>;

    /// Serialize in memory, then write the file in one step so a failed
    /// conversion never leaves a partial output behind.
    fn save(&mut self, output: &Path) -> Result<(), Error> {
        let bytes = self.to_bytes()?;
        std::fs::write(output, bytes)?;
        log::info!("document saved to {}", output.display());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Start,
    InDocument,
    Done,
}

pub struct Assembler<B> {
    builder: B,
    state: State,
    lines: usize,
}

impl<B: DocumentBuilder> Assembler<B> {
    pub fn new(builder: B) -> Self {
        Self {
            builder,
            state: State::Start,
            lines: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Classify one line and dispatch it to the builder.
    pub fn feed_line(&mut self, line: &str) -> Result<(), Error> {
        if self.state == State::Done {
            return Err(Error::Builder(
                "cannot add content after the document was finished".into(),
            ));
        }
        self.state = State::InDocument;
        self.lines += 1;

        match markdown::classify(line) {
            Line::PageBreak => {
                log::debug!("line {}: page break", self.lines);
                self.builder.add_page_break()
            }
            Line::TableOfContents => {
                log::debug!("line {}: table of contents", self.lines);
                self.builder.add_table_of_contents()
            }
            Line::IndexEntry(term) => {
                log::debug!("line {}: index entry '{term}'", self.lines);
                self.builder.add_index_entry(&term)
            }
            Line::Bookmark(name) => {
                log::debug!("line {}: bookmark '{name}'", self.lines);
                self.builder.add_bookmark(&name)
            }
            Line::ListItem {
                ordered,
                level,
                segments,
            } => self.builder.add_list_item(ordered, level, &segments),
            Line::Heading { segments, .. } | Line::Content(segments) => {
                let auto_bookmark = auto_bookmark(&segments);
                self.builder
                    .add_paragraph(&segments, auto_bookmark.as_deref())
            }
            Line::Blank => self.builder.add_paragraph(&[], None),
        }
    }

    pub fn feed(&mut self, markdown: &str) -> Result<(), Error> {
        for line in markdown.lines() {
            self.feed_line(line)?;
        }
        Ok(())
    }

    fn finish_body(&mut self) -> Result<(), Error> {
        if self.state == State::Done {
            return Err(Error::Builder("document already finished".into()));
        }
        self.builder.apply_header_footer()?;
        self.state = State::Done;
        log::debug!("assembled {} lines", self.lines);
        Ok(())
    }

    /// Apply running headers/footers and serialize the document.
    pub fn finish_to_bytes(mut self) -> Result<Vec<u8>, Error> {
        self.finish_body()?;
        self.builder.to_bytes()
    }

    /// Apply running headers/footers and write the document to `output`.
    pub fn finish(mut self, output: &Path) -> Result<(), Error> {
        self.finish_body()?;
        self.builder.save(output)
    }
}

/// Bookmark for paragraphs whose first segment carries a `heading*` style.
fn auto_bookmark(segments: &[Segment]) -> Option<String> {
    segments
        .first()
        .filter(|first| first.style.starts_with("heading"))
        .map(|first| sanitize_bookmark_name(&first.text))
}
