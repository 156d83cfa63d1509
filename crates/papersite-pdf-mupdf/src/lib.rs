use std::path::Path;

use mupdf::{Document, TextPageFlags};

use papersite_core::{BackendError, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency so
/// that DOCX and plain-text ingestion do not transitively depend on it.
///
/// Text is emitted block by block, one output line per MuPDF text line, and
/// pages are separated by a blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

fn extraction_error(e: impl std::fmt::Display) -> BackendError {
    BackendError::ExtractionError(e.to_string())
}

impl PdfBackend for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document.pages().map_err(extraction_error)? {
            let page = page_result.map_err(extraction_error)?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(extraction_error)?;

            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    page_text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        tracing::debug!(path = %path.display(), pages = pages_text.len(), "decoded PDF");

        Ok(join_pages(&pages_text))
    }
}

/// Join per-page text with a blank line between pages and expand ligatures.
fn join_pages(pages: &[String]) -> String {
    expand_ligatures(&pages.join("\n"))
}

/// Expand typographic ligatures that PDF text layers often carry, so that
/// "ﬁgure" reads as "figure" to the line heuristics.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ligatures_are_expanded() {
        assert_eq!(expand_ligatures("\u{FB01}gure e\u{FB03}cient"), "figure efficient");
        assert_eq!(expand_ligatures("plain text"), "plain text");
    }

    #[test]
    fn pages_are_separated_by_a_blank_line() {
        let pages = vec![
            "Deep Widgets\nAbstract\n".to_string(),
            "1. Introduction\nE\u{FB00}ort.\n".to_string(),
        ];
        assert_eq!(
            join_pages(&pages),
            "Deep Widgets\nAbstract\n\n1. Introduction\nEffort.\n"
        );
        assert_eq!(join_pages(&[]), "");
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = MupdfBackend::new()
            .extract_text(Path::new("/nonexistent/papersite/missing.pdf"))
            .unwrap_err();
        assert!(matches!(err, BackendError::OpenError(_)));
    }
}
