use std::io::Cursor;

use papersite_core::DocumentFormat;

/// Main body part of an OOXML word-processing package.
pub(crate) const DOCUMENT_PART: &str = "word/document.xml";

/// OLE compound document header used by legacy `.doc` files.
pub(crate) const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Guess the format of a file from its leading bytes.
///
/// ZIP archives only count as DOCX when they carry `word/document.xml`.
/// Anything that is valid UTF-8 is treated as plain text.
pub fn sniff_format(data: &[u8]) -> Option<DocumentFormat> {
    if data.starts_with(b"%PDF-") {
        return Some(DocumentFormat::Pdf);
    }
    if data.starts_with(b"PK") {
        return has_document_part(data).then_some(DocumentFormat::Docx);
    }
    if data.starts_with(&OLE_MAGIC) {
        return Some(DocumentFormat::Doc);
    }
    std::str::from_utf8(data).ok().map(|_| DocumentFormat::Txt)
}

fn has_document_part(data: &[u8]) -> bool {
    let Ok(archive) = zip::ZipArchive::new(Cursor::new(data)) else {
        return false;
    };
    archive.file_names().any(|name| name == DOCUMENT_PART)
}

/// The format implied by a file name, falling back to content sniffing when
/// the name carries no extension at all.
///
/// Returns `Err(extension)` for a non-empty extension that is not supported.
pub fn resolve_format(file_name: &str, data: &[u8]) -> Result<Option<DocumentFormat>, String> {
    let ext = crate::validation::file_extension(file_name);
    if ext.is_empty() {
        return Ok(sniff_format(data));
    }
    DocumentFormat::from_extension(&ext)
        .map(Some)
        .ok_or(ext)
}
