use chrono::{SecondsFormat, Utc};

use papersite_core::defaults::{NO_ABSTRACT, NO_REFERENCES};
use papersite_core::{DocumentMetadata, StructuredDocument};

use crate::config::ExtractorConfig;
use crate::front_matter::{detect_abstract_with_config, detect_title};
use crate::heading::LineMarkers;
use crate::normalize::normalize_lines;
use crate::references::extract_references_with_config;
use crate::section::{fallback_section, segment_sections};

/// Turns decoded plain text into a [`StructuredDocument`].
///
/// Holds only configuration, so one instance can be shared across threads
/// and reused for any number of documents.
#[derive(Debug, Clone, Default)]
pub struct StructureExtractor {
    config: ExtractorConfig,
}

impl StructureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract title, abstract, sections, and references from `text`.
    ///
    /// Never fails: each missing part is replaced by its placeholder, and a
    /// document without any recognisable heading gets a single "Content"
    /// section. `parsed_at` is stamped once, after everything else is built.
    pub fn extract(
        &self,
        text: &str,
        file_name: &str,
        file_size: u64,
        file_type: &str,
    ) -> StructuredDocument {
        let lines = normalize_lines(text);

        let title = detect_title(&lines);
        let abstract_block = detect_abstract_with_config(&lines, &self.config);
        let markers = LineMarkers {
            title_index: if lines.is_empty() { None } else { Some(0) },
        };

        let mut sections = segment_sections(&lines, &markers, &self.config);
        let used_fallback = sections.is_empty();
        if used_fallback {
            sections.push(fallback_section(text, &self.config));
        }

        let mut references = extract_references_with_config(&lines, &self.config);
        if references.is_empty() {
            references.push(NO_REFERENCES.to_string());
        }

        let abstract_text = abstract_block
            .map(|b| b.text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_ABSTRACT.to_string());

        tracing::debug!(
            file_name,
            lines = lines.len(),
            sections = sections.len(),
            references = references.len(),
            used_fallback,
            "structure extracted"
        );

        StructuredDocument {
            title,
            abstract_text,
            sections,
            references,
            metadata: DocumentMetadata {
                file_name: file_name.to_string(),
                file_size,
                file_type: file_type.to_string(),
                parsed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}
