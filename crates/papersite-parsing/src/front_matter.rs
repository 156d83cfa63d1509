use papersite_core::defaults::UNTITLED_TITLE;

use crate::config::ExtractorConfig;
use crate::heading::{
    is_all_caps, is_numbered_heading, mentions_abstract, starts_with_canonical_section_with_config,
};

/// An "Abstract" label and the text collected after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractBlock {
    /// Index of the label line in the normalized line sequence.
    pub marker_index: usize,
    /// Collected lines joined with single spaces. May be empty when the
    /// label is the last line or is immediately followed by a heading.
    pub text: String,
}

/// First line of the document, or the untitled placeholder.
pub fn detect_title(lines: &[&str]) -> String {
    lines
        .first()
        .map(|line| line.to_string())
        .unwrap_or_else(|| UNTITLED_TITLE.to_string())
}

/// Locate the abstract with default configuration.
pub fn detect_abstract(lines: &[&str]) -> Option<AbstractBlock> {
    detect_abstract_with_config(lines, &ExtractorConfig::default())
}

/// Config-aware version of [`detect_abstract`].
///
/// The label is the first line containing "abstract" (any case, anywhere in
/// the line). Collection stops at the first all-caps line, numbered heading,
/// or line starting with a canonical section name.
pub fn detect_abstract_with_config(
    lines: &[&str],
    config: &ExtractorConfig,
) -> Option<AbstractBlock> {
    let marker_index = lines.iter().position(|line| mentions_abstract(line))?;

    let collected: Vec<&str> = lines[marker_index + 1..]
        .iter()
        .copied()
        .take_while(|line| !ends_abstract(line, config))
        .collect();

    Some(AbstractBlock {
        marker_index,
        text: collected.join(" "),
    })
}

fn ends_abstract(line: &str, config: &ExtractorConfig) -> bool {
    is_all_caps(line)
        || is_numbered_heading(line)
        || starts_with_canonical_section_with_config(line, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfigBuilder;

    #[test]
    fn title_is_first_line() {
        assert_eq!(detect_title(&["My Paper", "Abstract"]), "My Paper");
        assert_eq!(detect_title(&[]), UNTITLED_TITLE);
    }

    #[test]
    fn abstract_stops_at_numbered_heading() {
        let lines = [
            "TITLE",
            "Abstract",
            "This is the abstract.",
            "More abstract text.",
            "1. INTRODUCTION",
            "Body.",
        ];
        let block = detect_abstract(&lines).unwrap();
        assert_eq!(block.marker_index, 1);
        assert_eq!(block.text, "This is the abstract. More abstract text.");
    }

    #[test]
    fn abstract_stops_at_all_caps_line() {
        let lines = ["Title", "ABSTRACT", "We do things.", "KEYWORDS", "x"];
        let block = detect_abstract(&lines).unwrap();
        assert_eq!(block.text, "We do things.");
    }

    #[test]
    fn abstract_stops_at_canonical_section_prefix() {
        let lines = [
            "Title",
            "Abstract",
            "We do things.",
            "Introduction and motivation",
            "More.",
        ];
        let block = detect_abstract(&lines).unwrap();
        assert_eq!(block.text, "We do things.");
    }

    #[test]
    fn label_match_is_substring() {
        let lines = ["Title", "Abstract— We study parsing.", "It works well.", "2 Methods"];
        let block = detect_abstract(&lines).unwrap();
        assert_eq!(block.marker_index, 1);
        assert_eq!(block.text, "It works well.");
    }

    #[test]
    fn label_on_last_line_gives_empty_text() {
        let block = detect_abstract(&["Title", "Abstract"]).unwrap();
        assert_eq!(block.marker_index, 1);
        assert!(block.text.is_empty());
    }

    #[test]
    fn no_label_means_no_block() {
        assert!(detect_abstract(&["Title", "Body text"]).is_none());
        assert!(detect_abstract(&[]).is_none());
    }

    #[test]
    fn custom_canonical_sections_end_abstract() {
        let config = ExtractorConfigBuilder::new()
            .add_canonical_section("keywords".to_string())
            .build()
            .unwrap();
        let lines = ["Title", "Abstract", "We do things.", "Keywords: parsing", "x"];
        let block = detect_abstract_with_config(&lines, &config).unwrap();
        assert_eq!(block.text, "We do things.");

        let default_block = detect_abstract(&lines).unwrap();
        assert_eq!(default_block.text, "We do things. Keywords: parsing x");
    }
}
