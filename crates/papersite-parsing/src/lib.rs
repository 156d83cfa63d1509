pub mod config;
pub mod extractor;
pub mod front_matter;
pub mod heading;
pub mod normalize;
pub mod references;
pub mod section;

pub use config::{ConfigError, ExtractorConfig, ExtractorConfigBuilder, ListOverride};
pub use extractor::StructureExtractor;
pub use front_matter::{AbstractBlock, detect_abstract, detect_title};
pub use heading::{LineMarkers, LineRole, classify_line, is_heading};
pub use normalize::normalize_lines;
pub use references::{extract_references, find_references_marker};
pub use section::{fallback_section, segment_sections};
// Re-export domain types from core (canonical definitions live there)
pub use papersite_core::{DocumentMetadata, Section, StructuredDocument};

/// Extract a structured document from decoded plain text.
///
/// Pipeline:
/// 1. Split into trimmed, non-empty lines
/// 2. Take the first line as the title
/// 3. Locate the "Abstract" label and collect the block after it
/// 4. Walk the lines, opening a section at each heading
/// 5. Collect reference-like lines after a "References" marker
/// 6. Fill every missing part with its placeholder and stamp `parsed_at`
///
/// Pure apart from the timestamp; safe to call concurrently.
pub fn extract_structure(
    text: &str,
    file_name: &str,
    file_size: u64,
    file_type: &str,
) -> StructuredDocument {
    StructureExtractor::new().extract(text, file_name, file_size, file_type)
}
