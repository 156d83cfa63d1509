use thiserror::Error;

use papersite_core::DocumentFormat;
use papersite_core::config_file::LimitsConfig;

const MIB: u64 = 1024 * 1024;

/// Default upload ceiling: 50 MiB.
pub const MAX_FILE_SIZE: u64 = 50 * MIB;

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: [&str; 4] = [
    papersite_core::format::MIME_PDF,
    papersite_core::format::MIME_DOCX,
    papersite_core::format::MIME_DOC,
    papersite_core::format::MIME_TXT,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid file type. Please upload PDF, DOC, DOCX, or TXT files only.")]
    InvalidType { mime_type: String },
    #[error("File too large. Maximum size is {max_mb}MB.")]
    TooLarge { size: u64, max_mb: u64 },
}

/// Size limits applied before any decoding happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_size: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl UploadLimits {
    pub fn from_megabytes(mb: u64) -> Self {
        Self {
            max_file_size: mb.saturating_mul(MIB),
        }
    }

    pub fn from_file_config(config: &LimitsConfig) -> Self {
        config
            .max_file_size_mb
            .map(Self::from_megabytes)
            .unwrap_or_default()
    }

    pub fn max_megabytes(&self) -> u64 {
        self.max_file_size / MIB
    }
}

/// Reject files whose MIME type is not allowed or whose size exceeds the limit.
///
/// The type check runs first, so an oversized file of the wrong type reports
/// the type error.
pub fn validate_file(mime_type: &str, size: u64, limits: &UploadLimits) -> Result<(), ValidationError> {
    if DocumentFormat::from_mime(mime_type).is_none() {
        return Err(ValidationError::InvalidType {
            mime_type: mime_type.to_string(),
        });
    }

    if size > limits.max_file_size {
        return Err(ValidationError::TooLarge {
            size,
            max_mb: limits.max_megabytes(),
        });
    }

    Ok(())
}

/// Lowercased extension including the dot (`"paper.PDF"` → `".pdf"`).
/// Names without a dot yield an empty string.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rfind('.')
        .map(|i| file_name[i..].to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_types_pass() {
        let limits = UploadLimits::default();
        for mime in ALLOWED_MIME_TYPES {
            assert!(validate_file(mime, 10, &limits).is_ok(), "{}", mime);
        }
    }

    #[test]
    fn disallowed_type_message() {
        let err = validate_file("image/png", 10, &UploadLimits::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file type. Please upload PDF, DOC, DOCX, or TXT files only."
        );
    }

    #[test]
    fn oversized_file_message() {
        let err = validate_file("application/pdf", MAX_FILE_SIZE + 1, &UploadLimits::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "File too large. Maximum size is 50MB.");
    }

    #[test]
    fn exactly_at_limit_is_allowed() {
        assert!(validate_file("text/plain", MAX_FILE_SIZE, &UploadLimits::default()).is_ok());
    }

    #[test]
    fn type_error_takes_precedence() {
        let err = validate_file("application/zip", u64::MAX, &UploadLimits::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));
    }

    #[test]
    fn configured_limit_in_message() {
        let limits = UploadLimits::from_file_config(&LimitsConfig {
            max_file_size_mb: Some(5),
        });
        let err = validate_file("text/plain", 6 * MIB, &limits).unwrap_err();
        assert_eq!(err.to_string(), "File too large. Maximum size is 5MB.");
        assert_eq!(
            UploadLimits::from_file_config(&LimitsConfig::default()),
            UploadLimits::default()
        );
    }

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(file_extension("Paper.PDF"), ".pdf");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("README"), "");
    }
}
