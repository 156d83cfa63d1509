use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;
pub mod defaults;
pub mod format;

pub use backend::{BackendError, PdfBackend};
pub use format::DocumentFormat;

/// A titled block of body text.
///
/// `content` is the space-joined run of body lines between this heading and
/// the next one; original line breaks are not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub content: String,
}

impl Section {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            content: String::new(),
        }
    }

    /// Append a body line, separated from existing content by one space.
    pub fn push_line(&mut self, line: &str) {
        if !self.content.is_empty() {
            self.content.push(' ');
        }
        self.content.push_str(line);
    }
}

/// File-level facts about the source of a [`StructuredDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub file_name: String,
    pub file_size: u64,
    /// MIME type of the source as supplied by the caller.
    pub file_type: String,
    /// ISO-8601 UTC timestamp set when extraction completed.
    pub parsed_at: String,
}

/// The result of structure extraction over one document.
///
/// Always complete: `sections` and `references` are never empty, and every
/// field that could not be found holds its placeholder from [`defaults`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub sections: Vec<Section>,
    pub references: Vec<String>,
    pub metadata: DocumentMetadata,
}

impl StructuredDocument {
    /// Copy of this document with `parsed_at` cleared, for comparing two
    /// extractions of the same text.
    pub fn without_timestamp(&self) -> Self {
        let mut doc = self.clone();
        doc.metadata.parsed_at.clear();
        doc
    }

    /// True when the abstract is the "not found" placeholder.
    pub fn has_abstract(&self) -> bool {
        self.abstract_text != defaults::NO_ABSTRACT
    }

    /// True when `references` holds real entries rather than the sentinel.
    pub fn has_references(&self) -> bool {
        !(self.references.len() == 1 && self.references[0] == defaults::NO_REFERENCES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StructuredDocument {
        StructuredDocument {
            title: "A Study".to_string(),
            abstract_text: "We study things.".to_string(),
            sections: vec![Section {
                heading: "1. Introduction".to_string(),
                content: "Text.".to_string(),
            }],
            references: vec![defaults::NO_REFERENCES.to_string()],
            metadata: DocumentMetadata {
                file_name: "paper.txt".to_string(),
                file_size: 42,
                file_type: "text/plain".to_string(),
                parsed_at: "2024-01-01T00:00:00.000Z".to_string(),
            },
        }
    }

    #[test]
    fn push_line_joins_with_single_space() {
        let mut section = Section::new("Methods");
        section.push_line("first");
        section.push_line("second");
        assert_eq!(section.content, "first second");
    }

    #[test]
    fn json_uses_external_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["abstract"], "We study things.");
        assert_eq!(json["metadata"]["fileName"], "paper.txt");
        assert_eq!(json["metadata"]["fileSize"], 42);
        assert_eq!(json["metadata"]["fileType"], "text/plain");
        assert_eq!(json["metadata"]["parsedAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(json["sections"][0]["heading"], "1. Introduction");
    }

    #[test]
    fn without_timestamp_clears_only_parsed_at() {
        let doc = sample();
        let stripped = doc.without_timestamp();
        assert!(stripped.metadata.parsed_at.is_empty());
        assert_eq!(stripped.title, doc.title);
        assert_eq!(stripped.metadata.file_name, doc.metadata.file_name);
    }

    #[test]
    fn sentinel_detection() {
        let mut doc = sample();
        assert!(doc.has_abstract());
        assert!(!doc.has_references());
        doc.references = vec!["[1] A. Author. A long enough reference.".to_string()];
        assert!(doc.has_references());
        doc.abstract_text = defaults::NO_ABSTRACT.to_string();
        assert!(!doc.has_abstract());
    }
}
