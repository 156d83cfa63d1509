//! Placeholder strings substituted when extraction finds nothing.

/// Title used when the document has no non-empty line.
pub const UNTITLED_TITLE: &str = "Untitled Paper";

/// Abstract used when no abstract block is located.
pub const NO_ABSTRACT: &str = "No abstract found";

/// Sole entry of the reference list when no references are detected.
pub const NO_REFERENCES: &str = "No references found";

/// Heading of the synthetic section produced when no heading is recognised.
pub const FALLBACK_HEADING: &str = "Content";
