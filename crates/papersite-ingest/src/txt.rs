use std::borrow::Cow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode a plain-text upload.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, and a leading
/// byte-order mark is stripped so it cannot end up in the title.
pub fn decode_txt(data: &[u8]) -> String {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    match String::from_utf8_lossy(data) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => {
            tracing::warn!("plain-text upload is not valid UTF-8; replaced invalid bytes");
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        assert_eq!(decode_txt("Título\nBody".as_bytes()), "Título\nBody");
    }

    #[test]
    fn bom_is_stripped() {
        assert_eq!(decode_txt(b"\xEF\xBB\xBFTitle\n"), "Title\n");
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        assert_eq!(decode_txt(b"ok \xFF end"), "ok \u{FFFD} end");
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode_txt(b""), "");
    }
}
