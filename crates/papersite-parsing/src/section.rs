use papersite_core::Section;
use papersite_core::defaults::FALLBACK_HEADING;

use crate::config::ExtractorConfig;
use crate::heading::{LineMarkers, LineRole, classify_line};

/// Split the line sequence into sections at heading lines.
///
/// Body lines are appended to the open section. Body lines that appear
/// before the first heading have no section to join and are dropped; the
/// document's lead-in is covered by title and abstract detection instead.
/// Marker lines (title, abstract label) are skipped entirely.
///
/// Returns an empty vector when no heading is found; see [`fallback_section`].
pub fn segment_sections(
    lines: &[&str],
    markers: &LineMarkers,
    config: &ExtractorConfig,
) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for (index, line) in lines.iter().enumerate() {
        match classify_line(index, line, markers, config) {
            LineRole::Heading => {
                if let Some(done) = current.take() {
                    sections.push(done);
                }
                current = Some(Section::new(*line));
            }
            LineRole::Body => {
                if let Some(section) = current.as_mut() {
                    section.push_line(line);
                }
            }
            LineRole::Marker => {}
        }
    }

    if let Some(done) = current {
        sections.push(done);
    }

    sections
}

/// The single section used when no heading was recognised.
///
/// Holds a prefix of the original, unsplit text (not the normalized lines),
/// with the configured ellipsis appended when the text was cut. Text with no
/// non-blank line yields empty content.
pub fn fallback_section(text: &str, config: &ExtractorConfig) -> Section {
    let mut section = Section::new(FALLBACK_HEADING);

    if text.trim().is_empty() {
        return section;
    }

    let limit = config.fallback_prefix_chars;
    match text.char_indices().nth(limit) {
        Some((cut, _)) => {
            section.content.push_str(&text[..cut]);
            section.content.push_str(&config.fallback_ellipsis);
        }
        None => section.content.push_str(text),
    }

    section
}
