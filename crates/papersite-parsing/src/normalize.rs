/// Split raw text into trimmed, non-empty lines, preserving order.
///
/// Accepts `\n`, `\r\n`, and bare `\r` line endings. Whitespace-only lines
/// are dropped, so downstream heuristics never see a blank line.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Length in characters, the unit every length threshold is measured in.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
