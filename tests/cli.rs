use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const STYLES: &str = "styles:\n  normal:\n    font_size: 11\n";
const LAYOUT: &str = "layout:\n  unit: mm\n  page_width: 152.4\n  page_height: 228.6\n";
const MARKDOWN: &str = "# Chapter One\n\nSome *text*.\n<<<pagebreak>>>\n- item\n";

fn write_inputs(dir: &Path) {
    fs::write(dir.join("book.md"), MARKDOWN).unwrap();
    fs::write(dir.join("styles.yaml"), STYLES).unwrap();
    fs::write(dir.join("layout.yaml"), LAYOUT).unwrap();
}

fn run(dir: &Path, output: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kdp-builder"))
        .current_dir(dir)
        .args([
            "-m",
            "book.md",
            "-s",
            "styles.yaml",
            "-l",
            "layout.yaml",
            "-o",
            output,
        ])
        .output()
        .unwrap()
}

#[test]
fn builds_docx_and_pdf() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    for output in ["book.docx", "book.PDF"] {
        let result = run(dir.path(), output);
        assert!(result.status.success(), "{output}: {result:?}");
        let stdout = String::from_utf8_lossy(&result.stdout);
        assert!(stdout.contains(&format!("Document saved to: {output}")));
        assert!(dir.path().join(output).is_file());
    }

    let pdf = fs::read(dir.path().join("book.PDF")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    let docx = fs::read(dir.path().join("book.docx")).unwrap();
    assert!(docx.starts_with(b"PK"));
}

#[test]
fn missing_markdown_file() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    fs::remove_file(dir.path().join("book.md")).unwrap();

    let result = run(dir.path(), "book.docx");
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Error: Markdown file not found: book.md"), "{stderr}");
}

#[test]
fn missing_layout_file() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    fs::remove_file(dir.path().join("layout.yaml")).unwrap();

    let result = run(dir.path(), "book.pdf");
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Error: Layout file not found: layout.yaml"), "{stderr}");
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let result = run(dir.path(), "book.odt");
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("unsupported output format '.odt'"), "{stderr}");
    assert!(!dir.path().join("book.odt").exists());
}

#[test]
fn invalid_configuration_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    fs::write(dir.path().join("layout.yaml"), "layout:\n  margin_top: -1\n").unwrap();

    let result = run(dir.path(), "book.docx");
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Error: invalid configuration"), "{stderr}");
    assert!(!dir.path().join("book.docx").exists());
}

#[test]
fn all_options_are_required() {
    let output = Command::new(env!("CARGO_BIN_EXE_kdp-builder"))
        .args(["-m", "book.md"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
