use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "kdp-builder",
    about = "Build DOCX or PDF documents from annotated Markdown"
)]
struct Args {
    /// Markdown source file
    #[arg(short, long)]
    markdown: PathBuf,
    /// Styles YAML file
    #[arg(short, long)]
    styles: PathBuf,
    /// Layout YAML file
    #[arg(short, long)]
    layout: PathBuf,
    /// Output file; the extension (.docx or .pdf) selects the format
    #[arg(short, long)]
    output: PathBuf,
}

fn require_file(kind: &str, path: &Path) {
    if !path.is_file() {
        eprintln!("Error: {kind} file not found: {}", path.display());
        std::process::exit(1);
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    require_file("Markdown", &args.markdown);
    require_file("Styles", &args.styles);
    require_file("Layout", &args.layout);

    if let Err(e) = kdp_builder::convert(&args.markdown, &args.styles, &args.layout, &args.output)
    {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    println!("Document saved to: {}", args.output.display());
}
