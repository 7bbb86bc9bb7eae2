pub mod assemble;
pub mod bookmarks;
pub mod config;
mod docx;
mod error;
mod fonts;
pub mod markdown;
pub mod model;
mod pdf;

pub use docx::DocxBuilder;
pub use error::Error;
pub use pdf::PdfBuilder;

use std::path::Path;

use assemble::{Assembler, DocumentBuilder};
use model::{LayoutDefinition, StyleSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Docx,
    Pdf,
}

impl OutputFormat {
    /// Pick the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "docx" => Ok(OutputFormat::Docx),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(Error::UnsupportedFormat(format!(".{ext}"))),
        }
    }
}

fn assemble<B: DocumentBuilder>(builder: B, markdown: &str) -> Result<Vec<u8>, Error> {
    let mut assembler = Assembler::new(builder);
    assembler.feed(markdown)?;
    assembler.finish_to_bytes()
}

/// Convert Markdown source to document bytes in memory.
pub fn render(
    markdown: &str,
    styles: StyleSet,
    layout: LayoutDefinition,
    format: OutputFormat,
) -> Result<Vec<u8>, Error> {
    match format {
        OutputFormat::Docx => assemble(DocxBuilder::new(styles, layout), markdown),
        OutputFormat::Pdf => assemble(PdfBuilder::new(styles, layout), markdown),
    }
}

/// Load the configuration files, convert and write `output`. The output
/// format is checked before anything is read.
pub fn convert(
    markdown: &Path,
    styles: &Path,
    layout: &Path,
    output: &Path,
) -> Result<(), Error> {
    let format = OutputFormat::from_path(output)?;
    let styles = config::load_styles(styles)?;
    let layout = config::load_layout(layout)?;
    let source = std::fs::read_to_string(markdown)?;
    log::debug!(
        "converting {} ({} styles) to {format:?}",
        markdown.display(),
        styles.len()
    );

    match format {
        OutputFormat::Docx => write_document(DocxBuilder::new(styles, layout), &source, output),
        OutputFormat::Pdf => write_document(PdfBuilder::new(styles, layout), &source, output),
    }
}

fn write_document<B: DocumentBuilder>(
    builder: B,
    markdown: &str,
    output: &Path,
) -> Result<(), Error> {
    let mut assembler = Assembler::new(builder);
    assembler.feed(markdown)?;
    assembler.finish(output)
}
