use regex::Regex;
use thiserror::Error;

use papersite_core::config_file::ExtractionConfig;

/// Section names that end an abstract when a line starts with them.
pub const DEFAULT_CANONICAL_SECTIONS: &[&str] = &[
    "introduction",
    "background",
    "methods",
    "results",
    "conclusion",
    "references",
];

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("max_heading_len must be greater than zero")]
    ZeroHeadingLen,
    #[error("fallback_prefix_chars must be greater than zero")]
    ZeroFallbackPrefix,
    #[error("canonical section names must not be empty")]
    EmptySectionName,
    #[error("invalid canonical section pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// How the "starts with a canonical section name" check is answered.
#[derive(Debug, Clone)]
pub(crate) enum CanonicalMatcher {
    /// Built-in names, via the static regex in `heading.rs`.
    Builtin,
    Custom(Regex),
    /// The resolved list was empty; nothing matches.
    Disabled,
}

/// Configuration for the structure extractor.
///
/// Defaults reproduce the fixed thresholds of the heuristics: headings under
/// 100 characters, references over 20 characters, a 1000-character fallback
/// prefix. Use [`ExtractorConfigBuilder`] to change them.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// All-caps lines must be shorter than this (in characters) to be headings.
    pub(crate) max_heading_len: usize,
    /// Lines after the references marker longer than this are references.
    pub(crate) min_reference_len: usize,
    /// Characters of the original text kept in the fallback section.
    pub(crate) fallback_prefix_chars: usize,
    /// Appended to the fallback content when the text was truncated.
    pub(crate) fallback_ellipsis: String,
    pub(crate) canonical_sections: CanonicalMatcher,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_heading_len: 100,
            min_reference_len: 20,
            fallback_prefix_chars: 1000,
            fallback_ellipsis: "...".to_string(),
            canonical_sections: CanonicalMatcher::Builtin,
        }
    }
}

impl ExtractorConfig {
    pub fn max_heading_len(&self) -> usize {
        self.max_heading_len
    }

    pub fn min_reference_len(&self) -> usize {
        self.min_reference_len
    }

    pub fn fallback_prefix_chars(&self) -> usize {
        self.fallback_prefix_chars
    }

    /// Build from the `[extraction]` table of a config file; unset keys keep
    /// their defaults.
    pub fn from_file_config(file: &ExtractionConfig) -> Result<Self, ConfigError> {
        let mut builder = ExtractorConfigBuilder::new();
        if let Some(n) = file.max_heading_len {
            builder = builder.max_heading_len(n);
        }
        if let Some(n) = file.min_reference_len {
            builder = builder.min_reference_len(n);
        }
        if let Some(n) = file.fallback_prefix_chars {
            builder = builder.fallback_prefix_chars(n);
        }
        if let Some(names) = &file.canonical_sections {
            builder = builder.set_canonical_sections(names.clone());
        }
        for name in file.extra_canonical_sections.iter().flatten() {
            builder = builder.add_canonical_section(name.clone());
        }
        builder.build()
    }
}

/// Builder for [`ExtractorConfig`].
///
/// Canonical section names are compiled into a single case-insensitive
/// prefix regex in [`build()`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfigBuilder {
    max_heading_len: Option<usize>,
    min_reference_len: Option<usize>,
    fallback_prefix_chars: Option<usize>,
    fallback_ellipsis: Option<String>,
    canonical_sections: ListOverride<String>,
}

impl ExtractorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_heading_len(mut self, len: usize) -> Self {
        self.max_heading_len = Some(len);
        self
    }

    pub fn min_reference_len(mut self, len: usize) -> Self {
        self.min_reference_len = Some(len);
        self
    }

    pub fn fallback_prefix_chars(mut self, chars: usize) -> Self {
        self.fallback_prefix_chars = Some(chars);
        self
    }

    pub fn fallback_ellipsis(mut self, ellipsis: &str) -> Self {
        self.fallback_ellipsis = Some(ellipsis.to_string());
        self
    }

    // ── Canonical section names ──

    pub fn set_canonical_sections(mut self, names: Vec<String>) -> Self {
        self.canonical_sections = ListOverride::Replace(names);
        self
    }

    pub fn add_canonical_section(mut self, name: String) -> Self {
        match &mut self.canonical_sections {
            ListOverride::Default => self.canonical_sections = ListOverride::Extend(vec![name]),
            ListOverride::Replace(v) | ListOverride::Extend(v) => v.push(name),
        }
        self
    }

    pub fn build(self) -> Result<ExtractorConfig, ConfigError> {
        let defaults = ExtractorConfig::default();

        let max_heading_len = self.max_heading_len.unwrap_or(defaults.max_heading_len);
        if max_heading_len == 0 {
            return Err(ConfigError::ZeroHeadingLen);
        }
        let fallback_prefix_chars = self
            .fallback_prefix_chars
            .unwrap_or(defaults.fallback_prefix_chars);
        if fallback_prefix_chars == 0 {
            return Err(ConfigError::ZeroFallbackPrefix);
        }

        let canonical_sections = match &self.canonical_sections {
            ListOverride::Default => CanonicalMatcher::Builtin,
            other => {
                let builtin: Vec<String> = DEFAULT_CANONICAL_SECTIONS
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                let names = other.resolve(&builtin);
                compile_canonical(&names)?
            }
        };

        Ok(ExtractorConfig {
            max_heading_len,
            min_reference_len: self
                .min_reference_len
                .unwrap_or(defaults.min_reference_len),
            fallback_prefix_chars,
            fallback_ellipsis: self.fallback_ellipsis.unwrap_or(defaults.fallback_ellipsis),
            canonical_sections,
        })
    }
}

fn compile_canonical(names: &[String]) -> Result<CanonicalMatcher, ConfigError> {
    if names.is_empty() {
        return Ok(CanonicalMatcher::Disabled);
    }
    let mut alternatives = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptySectionName);
        }
        alternatives.push(regex::escape(name));
    }
    let re = Regex::new(&format!("(?i)^(?:{})", alternatives.join("|")))?;
    Ok(CanonicalMatcher::Custom(re))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_heuristic_constants() {
        let config = ExtractorConfig::default();
        assert_eq!(config.max_heading_len(), 100);
        assert_eq!(config.min_reference_len(), 20);
        assert_eq!(config.fallback_prefix_chars(), 1000);
        assert!(matches!(config.canonical_sections, CanonicalMatcher::Builtin));
    }

    #[test]
    fn zero_heading_len_rejected() {
        let err = ExtractorConfigBuilder::new()
            .max_heading_len(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroHeadingLen));
    }

    #[test]
    fn zero_fallback_prefix_rejected() {
        let err = ExtractorConfigBuilder::new()
            .fallback_prefix_chars(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroFallbackPrefix));
    }

    #[test]
    fn blank_section_name_rejected() {
        let err = ExtractorConfigBuilder::new()
            .add_canonical_section("  ".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptySectionName));
    }

    #[test]
    fn extend_keeps_builtin_names() {
        let config = ExtractorConfigBuilder::new()
            .add_canonical_section("discussion".to_string())
            .build()
            .unwrap();
        match &config.canonical_sections {
            CanonicalMatcher::Custom(re) => {
                assert!(re.is_match("Discussion of results"));
                assert!(re.is_match("INTRODUCTION"));
            }
            other => panic!("expected custom matcher, got {:?}", other),
        }
    }

    #[test]
    fn replace_with_empty_disables() {
        let config = ExtractorConfigBuilder::new()
            .set_canonical_sections(Vec::new())
            .build()
            .unwrap();
        assert!(matches!(config.canonical_sections, CanonicalMatcher::Disabled));
    }

    #[test]
    fn section_names_are_escaped() {
        let config = ExtractorConfigBuilder::new()
            .set_canonical_sections(vec!["q&a (part 1)".to_string()])
            .build()
            .unwrap();
        match &config.canonical_sections {
            CanonicalMatcher::Custom(re) => {
                assert!(re.is_match("Q&A (Part 1) follows"));
                assert!(!re.is_match("q&a part 1"));
            }
            other => panic!("expected custom matcher, got {:?}", other),
        }
    }

    #[test]
    fn from_file_config_applies_overrides() {
        let file = ExtractionConfig {
            max_heading_len: Some(60),
            min_reference_len: Some(30),
            fallback_prefix_chars: None,
            canonical_sections: None,
            extra_canonical_sections: Some(vec!["related work".to_string()]),
        };
        let config = ExtractorConfig::from_file_config(&file).unwrap();
        assert_eq!(config.max_heading_len(), 60);
        assert_eq!(config.min_reference_len(), 30);
        assert_eq!(config.fallback_prefix_chars(), 1000);
        assert!(matches!(config.canonical_sections, CanonicalMatcher::Custom(_)));
    }
}
