use std::io::Write;

use owo_colors::OwoColorize;
use papersite_core::StructuredDocument;

/// References listed before the remainder is summarised.
const REFERENCE_PREVIEW: usize = 5;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// File size in kilobytes with one decimal, e.g. `1536` → `"1.5"`.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0)
}

fn heading(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", text.bold())
    } else {
        writeln!(w, "{}", text)
    }
}

fn body(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", text.dimmed())
    } else {
        writeln!(w, "{}", text)
    }
}

/// "Not found" sentinels are set in italics so they don't read as content.
fn placeholder(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", text.italic())
    } else {
        writeln!(w, "{}", text)
    }
}

/// Render a parsed document as a human-readable card: title, file line,
/// abstract, every section, then a short reference preview.
pub fn print_document(
    w: &mut dyn Write,
    doc: &StructuredDocument,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", doc.title.bold().cyan())?;
    } else {
        writeln!(w, "{}", doc.title)?;
    }
    let file_line = format!(
        "{} \u{2022} {} KB",
        doc.metadata.file_name,
        format_kb(doc.metadata.file_size)
    );
    body(w, &file_line, color)?;
    writeln!(w)?;

    heading(w, "Abstract", color)?;
    if doc.has_abstract() {
        body(w, &doc.abstract_text, color)?;
    } else {
        placeholder(w, &doc.abstract_text, color)?;
    }
    writeln!(w)?;

    for section in &doc.sections {
        heading(w, &section.heading, color)?;
        if !section.content.is_empty() {
            body(w, &section.content, color)?;
        }
        writeln!(w)?;
    }

    print_references(w, doc, color)
}

fn print_references(w: &mut dyn Write, doc: &StructuredDocument, color: ColorMode) -> std::io::Result<()> {
    let references = &doc.references;
    if references.is_empty() {
        return Ok(());
    }
    if !doc.has_references() {
        heading(w, "References", color)?;
        return placeholder(w, &references[0], color);
    }
    heading(w, &format!("References ({})", references.len()), color)?;
    for reference in references.iter().take(REFERENCE_PREVIEW) {
        writeln!(w, "  \u{2022} {}", reference)?;
    }
    if references.len() > REFERENCE_PREVIEW {
        let more = format!("  ... and {} more", references.len() - REFERENCE_PREVIEW);
        if color.enabled() {
            writeln!(w, "{}", more.italic())?;
        } else {
            writeln!(w, "{}", more)?;
        }
    }
    Ok(())
}

/// One-line verdict for `validate`.
pub fn print_valid(
    w: &mut dyn Write,
    file_name: &str,
    mime_type: &str,
    size: u64,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} ({}, {} KB)",
            "OK".green().bold(),
            file_name,
            mime_type,
            format_kb(size)
        )
    } else {
        writeln!(w, "OK {} ({}, {} KB)", file_name, mime_type, format_kb(size))
    }
}
