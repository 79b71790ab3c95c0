//! Character encoding detection and transcoding.
//!
//! The byte entry points decode documents to UTF-8 before parsing, either
//! with a caller-supplied encoding label or by sniffing `<meta>` charset
//! declarations from the head of the document.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Match `<meta charset="...">`.
#[allow(clippy::expect_used)]
static RX_CHARSET_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("RX_CHARSET_META regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">`.
#[allow(clippy::expect_used)]
static RX_CONTENT_TYPE_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#)
        .expect("RX_CONTENT_TYPE_CHARSET regex")
});

/// How many leading bytes are examined for charset declarations.
const SNIFF_WINDOW: usize = 1024;

/// Detect the character encoding of raw HTML bytes.
///
/// Checks `<meta charset>` then `http-equiv` declarations within the first
/// kilobyte; defaults to UTF-8 when nothing is declared.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(SNIFF_WINDOW)];
    let head_str = String::from_utf8_lossy(head);

    for pattern in [&RX_CHARSET_META, &RX_CONTENT_TYPE_CHARSET] {
        if let Some(label) = pattern.captures(&head_str).and_then(|c| c.get(1)) {
            if let Some(encoding) = Encoding::for_label(label.as_str().as_bytes()) {
                return encoding;
            }
        }
    }

    UTF_8
}

/// Decode HTML bytes to a UTF-8 string.
///
/// When `label` is supplied (and recognized) it overrides detection.
/// Decoding is lossy: invalid sequences become the replacement character
/// instead of failing the parse.
#[must_use]
pub fn decode_html(html: &[u8], label: Option<&str>) -> String {
    let encoding = label
        .and_then(|l| Encoding::for_label(l.trim().as_bytes()))
        .unwrap_or_else(|| detect_encoding(html));

    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_utf8_from_meta_charset() {
        let html = br#"<html><head><meta charset="utf-8"></head><body>Test</body></html>"#;
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn detect_charset_from_content_type() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#;
        // encoding_rs maps ISO-8859-1 to windows-1252 per the WHATWG spec
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn default_to_utf8_when_undeclared() {
        assert_eq!(detect_encoding(b"<html><body>x</body></html>"), UTF_8);
    }

    #[test]
    fn decode_latin1_declared_in_meta() {
        let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
        let decoded = decode_html(html, None);
        assert!(decoded.contains("Caf\u{e9}"));
    }

    #[test]
    fn explicit_label_overrides_detection() {
        // Bytes claim UTF-8, caller knows better
        let html = b"<html><head><meta charset=\"utf-8\"></head><body>Caf\xE9</body></html>";
        let decoded = decode_html(html, Some("windows-1252"));
        assert!(decoded.contains("Caf\u{e9}"));
    }

    #[test]
    fn unknown_label_falls_back_to_detection() {
        let html = b"<html><body>plain</body></html>";
        let decoded = decode_html(html, Some("not-a-charset"));
        assert!(decoded.contains("plain"));
    }

    #[test]
    fn invalid_sequences_are_replaced_not_fatal() {
        let html = b"<html><body>Test \xFF\xFE Invalid</body></html>";
        let decoded = decode_html(html, None);
        assert!(decoded.contains("Test"));
        assert!(decoded.contains("Invalid"));
    }
}
