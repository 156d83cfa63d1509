//! Plain-text decoding of OOXML word-processing documents.
//!
//! Only `word/document.xml` is read. Text runs (`<w:t>`) are concatenated,
//! `<w:tab/>` becomes a tab, `<w:br/>`/`<w:cr/>` and every paragraph end
//! become a newline. Styles, numbering, headers, and footnotes are ignored.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::detect::{DOCUMENT_PART, OLE_MAGIC};

#[derive(thiserror::Error, Debug)]
pub enum DocxError {
    #[error("legacy binary .doc files are not supported; save the document as .docx")]
    LegacyDoc,
    #[error("not a DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("failed to read {DOCUMENT_PART}: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed {DOCUMENT_PART}: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Decode a DOCX file held in memory to plain text.
pub fn decode_docx(data: &[u8]) -> Result<String, DocxError> {
    if data.starts_with(&OLE_MAGIC) {
        return Err(DocxError::LegacyDoc);
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    document_xml_to_text(&xml)
}

/// Flatten the body XML of a word-processing document into lines of text.
pub fn document_xml_to_text(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::with_capacity(xml.len() / 4);
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" | b"p" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => out.push_str(&t.unescape()?),
            Event::CData(t) if in_text => out.push_str(&String::from_utf8_lossy(&t)),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}
