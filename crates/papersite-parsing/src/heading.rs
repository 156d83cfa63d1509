//! Single-line predicates and the per-line role decision table.
//!
//! Every check here looks at one trimmed line in isolation. The only
//! positional input is the [`LineMarkers`] pair computed up front, so a
//! line's role is derived on demand rather than stored.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{CanonicalMatcher, ExtractorConfig};
use crate::normalize::char_len;

/// "2. Introduction", "3 RESULTS": digits, optional period, whitespace,
/// then an upper-case letter.
static NUMBERED_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.?\s+[A-Z]").unwrap());

/// One or more capitalised words and nothing else: "Related Work".
static TITLE_CASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*$").unwrap());

static CANONICAL_SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:introduction|background|methods|results|conclusion|references)").unwrap()
});

/// Whole-line "Reference" / "References", optionally ending in `.` or `:`.
static REFERENCE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^references?[.:]?$").unwrap());

/// "[12] ", "(3) ", "4. ", "5 ".
static CITATION_LEAD_IN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\[(]?[0-9]+[\])]?\.?\s").unwrap());

/// Role of a line within the section walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// Opens a new section.
    Heading,
    /// Appended to the open section, if any.
    Body,
    /// The title line; consumed by front-matter detection.
    Marker,
}

/// Positions of the lines claimed by front-matter detection.
///
/// Only the title is claimed. The abstract label stays in the walk: it can
/// never be a heading, so it is body text of whatever section is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineMarkers {
    pub title_index: Option<usize>,
}

impl LineMarkers {
    pub fn contains(&self, index: usize) -> bool {
        self.title_index == Some(index)
    }
}

/// The line equals its own upper-cased form. Lines without letters
/// ("2024", "***") pass too.
pub fn is_all_caps(line: &str) -> bool {
    line.to_uppercase() == line
}

pub fn is_numbered_heading(line: &str) -> bool {
    NUMBERED_HEADING_RE.is_match(line)
}

pub fn is_title_case(line: &str) -> bool {
    TITLE_CASE_RE.is_match(line)
}

/// Case-insensitive check for a line starting with one of the default
/// canonical section names.
pub fn starts_with_canonical_section(line: &str) -> bool {
    CANONICAL_SECTION_RE.is_match(line)
}

pub(crate) fn starts_with_canonical_section_with_config(
    line: &str,
    config: &ExtractorConfig,
) -> bool {
    match &config.canonical_sections {
        CanonicalMatcher::Builtin => starts_with_canonical_section(line),
        CanonicalMatcher::Custom(re) => re.is_match(line),
        CanonicalMatcher::Disabled => false,
    }
}

pub fn is_reference_marker(line: &str) -> bool {
    REFERENCE_MARKER_RE.is_match(line.trim())
}

pub fn is_citation_lead_in(line: &str) -> bool {
    CITATION_LEAD_IN_RE.is_match(line)
}

pub fn mentions_abstract(line: &str) -> bool {
    line.to_lowercase().contains("abstract")
}

/// Heading predicate with default thresholds.
pub fn is_heading(line: &str) -> bool {
    is_heading_with_config(line, &ExtractorConfig::default())
}

/// Config-aware version of [`is_heading`].
///
/// Checks run in a fixed order: short all-caps, numbered, Title-Case. Lines
/// mentioning "abstract" are never headings.
pub fn is_heading_with_config(line: &str, config: &ExtractorConfig) -> bool {
    let looks_like_heading = (is_all_caps(line) && char_len(line) < config.max_heading_len)
        || is_numbered_heading(line)
        || is_title_case(line);

    looks_like_heading && !mentions_abstract(line)
}

/// Classify the line at `index` for the section walk.
pub fn classify_line(
    index: usize,
    line: &str,
    markers: &LineMarkers,
    config: &ExtractorConfig,
) -> LineRole {
    if markers.contains(index) {
        LineRole::Marker
    } else if is_heading_with_config(line, config) {
        LineRole::Heading
    } else {
        LineRole::Body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfigBuilder;

    #[test]
    fn all_caps_detection() {
        assert!(is_all_caps("RELATED WORK"));
        assert!(is_all_caps("2024"));
        assert!(!is_all_caps("Related Work"));
    }

    #[test]
    fn numbered_heading_patterns() {
        assert!(is_numbered_heading("2. Introduction"));
        assert!(is_numbered_heading("3 RESULTS"));
        assert!(is_numbered_heading("10.  Future Work"));
        assert!(!is_numbered_heading("2. introduction"));
        assert!(!is_numbered_heading("2.Introduction"));
        assert!(!is_numbered_heading("Section 2"));
    }

    #[test]
    fn title_case_patterns() {
        assert!(is_title_case("Methods"));
        assert!(is_title_case("Related Work"));
        assert!(!is_title_case("Related work"));
        assert!(!is_title_case("Related Work."));
        assert!(!is_title_case("A Study"));
        assert!(!is_title_case("Results and Discussion"));
    }

    #[test]
    fn canonical_section_prefix_is_case_insensitive() {
        assert!(starts_with_canonical_section("INTRODUCTION"));
        assert!(starts_with_canonical_section("Results show that"));
        assert!(starts_with_canonical_section("conclusions"));
        assert!(!starts_with_canonical_section("Our methods"));
    }

    #[test]
    fn reference_marker_is_whole_line() {
        assert!(is_reference_marker("References"));
        assert!(is_reference_marker("REFERENCE"));
        assert!(is_reference_marker("references:"));
        assert!(is_reference_marker("  References.  "));
        assert!(!is_reference_marker("References and notes"));
        assert!(!is_reference_marker("7. References"));
    }

    #[test]
    fn citation_lead_in_patterns() {
        assert!(is_citation_lead_in("[1] Smith"));
        assert!(is_citation_lead_in("(12) Jones"));
        assert!(is_citation_lead_in("3. Lee"));
        assert!(is_citation_lead_in("4 Kim"));
        assert!(!is_citation_lead_in("[1]Smith"));
        assert!(!is_citation_lead_in("Smith [1]"));
    }

    #[test]
    fn long_all_caps_line_is_not_a_heading() {
        let long = "A".repeat(100);
        assert!(!is_heading(&long));
        let short = "A".repeat(99);
        assert!(is_heading(&short));
    }

    #[test]
    fn numbered_and_title_case_ignore_length_cap() {
        let config = ExtractorConfigBuilder::new()
            .max_heading_len(5)
            .build()
            .unwrap();
        assert!(!is_heading_with_config("RELATED WORK", &config));
        assert!(is_heading_with_config("Related Work", &config));
        assert!(is_heading_with_config("2. Related Work", &config));
    }

    #[test]
    fn abstract_label_never_a_heading() {
        assert!(!is_heading("ABSTRACT"));
        assert!(!is_heading("Abstract"));
        assert!(!is_heading("1. Abstract"));
    }

    #[test]
    fn prose_is_body() {
        assert!(!is_heading("This paper studies extraction."));
        assert!(!is_heading("we propose a method"));
    }

    #[test]
    fn classify_respects_markers() {
        let config = ExtractorConfig::default();
        let markers = LineMarkers {
            title_index: Some(0),
        };
        assert_eq!(classify_line(0, "TITLE", &markers, &config), LineRole::Marker);
        assert_eq!(classify_line(1, "Abstract", &markers, &config), LineRole::Body);
        assert_eq!(
            classify_line(2, "1. INTRODUCTION", &markers, &config),
            LineRole::Heading
        );
        assert_eq!(
            classify_line(3, "Body text here.", &markers, &config),
            LineRole::Body
        );
        assert_eq!(
            classify_line(4, "ABSTRACT SYNTAX TREES", &markers, &config),
            LineRole::Body
        );
    }

    #[test]
    fn disabled_canonical_sections_match_nothing() {
        let config = ExtractorConfigBuilder::new()
            .set_canonical_sections(Vec::new())
            .build()
            .unwrap();
        assert!(!starts_with_canonical_section_with_config(
            "Introduction",
            &config
        ));
    }
}
