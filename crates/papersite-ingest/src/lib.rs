use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

pub mod detect;
pub mod docx;
pub mod txt;
pub mod validation;

pub use detect::{resolve_format, sniff_format};
pub use docx::{DocxError, decode_docx};
pub use txt::decode_txt;
pub use validation::{
    ALLOWED_MIME_TYPES, MAX_FILE_SIZE, UploadLimits, ValidationError, file_extension,
    validate_file,
};

// Re-export domain types for convenience
pub use papersite_core::{BackendError, DocumentFormat, PdfBackend, StructuredDocument};
use papersite_parsing::StructureExtractor;

/// Shown to users whenever a file passed validation but could not be turned
/// into text.
pub const PARSE_FAILURE_MESSAGE: &str =
    "Failed to parse file. The file may be corrupted or in an unsupported format.";

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unsupported file extension {0:?}")]
    UnsupportedType(String),
    #[error("failed to decode {format} file: {message}")]
    Decode {
        format: DocumentFormat,
        message: String,
    },
    #[error("PDF backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF support not available (enable the `pdf` feature of papersite-ingest)")]
    NoPdfSupport,
}

impl IngestError {
    /// The message shown to an end user. Validation failures keep their own
    /// wording; everything after validation collapses to one generic message.
    pub fn user_message(&self) -> String {
        match self {
            IngestError::Validation(e) => e.to_string(),
            _ => PARSE_FAILURE_MESSAGE.to_string(),
        }
    }

    /// True when the request itself was at fault (wrong type, too large).
    pub fn is_client_error(&self) -> bool {
        matches!(self, IngestError::Validation(_))
    }
}

/// Validates uploads, decodes them to plain text, and runs structure
/// extraction.
///
/// PDF decoding goes through a [`PdfBackend`]; with the `pdf` feature the
/// MuPDF backend is installed by default.
#[derive(Clone)]
pub struct Ingestor {
    extractor: StructureExtractor,
    limits: UploadLimits,
    pdf_backend: Option<Arc<dyn PdfBackend>>,
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("extractor", &self.extractor)
            .field("limits", &self.limits)
            .field("pdf_backend", &self.pdf_backend.is_some())
            .finish()
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "pdf")]
fn default_pdf_backend() -> Option<Arc<dyn PdfBackend>> {
    Some(Arc::new(papersite_pdf_mupdf::MupdfBackend::default()))
}

#[cfg(not(feature = "pdf"))]
fn default_pdf_backend() -> Option<Arc<dyn PdfBackend>> {
    None
}

impl Ingestor {
    pub fn new() -> Self {
        Self {
            extractor: StructureExtractor::default(),
            limits: UploadLimits::default(),
            pdf_backend: default_pdf_backend(),
        }
    }

    pub fn with_extractor(mut self, extractor: StructureExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_pdf_backend(mut self, backend: Arc<dyn PdfBackend>) -> Self {
        self.pdf_backend = Some(backend);
        self
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    pub fn extractor(&self) -> &StructureExtractor {
        &self.extractor
    }

    /// Decode a PDF held in memory and extract its structure.
    ///
    /// The backend reads from a path, so the bytes are spooled to a
    /// temporary file that is removed when this returns.
    pub fn parse_pdf(&self, data: &[u8], file_name: &str) -> Result<StructuredDocument, IngestError> {
        let backend = self
            .pdf_backend
            .as_deref()
            .ok_or(IngestError::NoPdfSupport)?;

        let mut spool = tempfile::Builder::new()
            .prefix("papersite-")
            .suffix(".pdf")
            .tempfile()?;
        spool.write_all(data)?;
        spool.flush()?;

        let text = backend.extract_text(spool.path())?;
        Ok(self.extract(&text, file_name, data, DocumentFormat::Pdf))
    }

    /// Decode a DOCX file and extract its structure. Legacy `.doc` bytes are
    /// rejected with a decode error.
    pub fn parse_docx(&self, data: &[u8], file_name: &str) -> Result<StructuredDocument, IngestError> {
        let text = decode_docx(data).map_err(|e| IngestError::Decode {
            format: DocumentFormat::Docx,
            message: e.to_string(),
        })?;
        Ok(self.extract(&text, file_name, data, DocumentFormat::Docx))
    }

    pub fn parse_txt(&self, data: &[u8], file_name: &str) -> Result<StructuredDocument, IngestError> {
        let text = decode_txt(data);
        Ok(self.extract(&text, file_name, data, DocumentFormat::Txt))
    }

    /// Validate an upload and dispatch it to the matching decoder.
    ///
    /// The MIME type used for validation is the declared one when given,
    /// otherwise the one implied by the file name (or, without an extension,
    /// by the content). Dispatch follows the file name's extension.
    pub fn parse_bytes(
        &self,
        data: &[u8],
        file_name: &str,
        declared_mime: Option<&str>,
    ) -> Result<StructuredDocument, IngestError> {
        let resolved = resolve_format(file_name, data);

        let mime_type = match declared_mime.map(str::trim).filter(|m| !m.is_empty()) {
            Some(mime) => mime.to_string(),
            None => match &resolved {
                Ok(Some(format)) => format.mime_type().to_string(),
                _ => String::new(),
            },
        };

        if let Err(e) = validate_file(&mime_type, data.len() as u64, &self.limits) {
            tracing::warn!(file_name, mime_type = %mime_type, size = data.len(), error = %e, "upload rejected");
            return Err(e.into());
        }

        let format = match resolved {
            Ok(Some(format)) => format,
            // No extension and unrecognisable content: trust the validated MIME type.
            Ok(None) => DocumentFormat::from_mime(&mime_type)
                .ok_or_else(|| IngestError::UnsupportedType(String::new()))?,
            Err(ext) => return Err(IngestError::UnsupportedType(ext)),
        };

        tracing::debug!(file_name, %format, size = data.len(), "decoding upload");

        let result = match format {
            DocumentFormat::Pdf => self.parse_pdf(data, file_name),
            DocumentFormat::Docx | DocumentFormat::Doc => self.parse_docx(data, file_name),
            DocumentFormat::Txt => self.parse_txt(data, file_name),
        };
        if let Err(e) = &result {
            tracing::warn!(file_name, %format, error = %e, "decode failed");
        }
        result
    }

    /// Read a file from disk and run it through [`Ingestor::parse_bytes`].
    pub fn parse_file(&self, path: &Path) -> Result<StructuredDocument, IngestError> {
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.parse_bytes(&data, &file_name, None)
    }

    fn extract(
        &self,
        text: &str,
        file_name: &str,
        data: &[u8],
        format: DocumentFormat,
    ) -> StructuredDocument {
        self.extractor
            .extract(text, file_name, data.len() as u64, format.mime_type())
    }
}

/// Decode a PDF with the default backend and extract its structure.
pub fn parse_pdf(data: &[u8], file_name: &str) -> Result<StructuredDocument, IngestError> {
    Ingestor::new().parse_pdf(data, file_name)
}

pub fn parse_docx(data: &[u8], file_name: &str) -> Result<StructuredDocument, IngestError> {
    Ingestor::new().parse_docx(data, file_name)
}

pub fn parse_txt(data: &[u8], file_name: &str) -> Result<StructuredDocument, IngestError> {
    Ingestor::new().parse_txt(data, file_name)
}

/// Validate and parse an in-memory upload under the given limits.
pub fn parse_bytes(
    data: &[u8],
    file_name: &str,
    mime_hint: Option<&str>,
    limits: &UploadLimits,
) -> Result<StructuredDocument, IngestError> {
    Ingestor::new()
        .with_limits(*limits)
        .parse_bytes(data, file_name, mime_hint)
}

/// Validate and parse a file on disk under the given limits.
pub fn parse_file(path: &Path, limits: &UploadLimits) -> Result<StructuredDocument, IngestError> {
    Ingestor::new().with_limits(*limits).parse_file(path)
}
