use crate::config::ExtractorConfig;
use crate::heading::{is_citation_lead_in, is_reference_marker};
use crate::normalize::char_len;

/// Index of the first whole-line "References" marker.
pub fn find_references_marker(lines: &[&str]) -> Option<usize> {
    lines.iter().position(|line| is_reference_marker(line))
}

/// Collect reference-like lines after the marker, with default thresholds.
pub fn extract_references(lines: &[&str]) -> Vec<String> {
    extract_references_with_config(lines, &ExtractorConfig::default())
}

/// Config-aware version of [`extract_references`].
///
/// Every line after the marker is kept if it opens with a citation number
/// (`[1] `, `(2) `, `3. `) or is longer than `min_reference_len` characters.
/// Short stray lines (page numbers, running headers) fall through. Returns
/// an empty vector when there is no marker.
pub fn extract_references_with_config(lines: &[&str], config: &ExtractorConfig) -> Vec<String> {
    let Some(marker) = find_references_marker(lines) else {
        return Vec::new();
    };

    lines[marker + 1..]
        .iter()
        .filter(|line| is_citation_lead_in(line) || char_len(line) > config.min_reference_len)
        .map(|line| line.to_string())
        .collect()
}
