//! Format sniffing.
//!
//! Binary is chosen only when the first byte is an entry type byte and a NUL
//! follows within the first [`NUL_WINDOW`] bytes. Everything else, including
//! empty input, is text. Very short or NUL-sparse binary payloads are
//! therefore read as text and fail in the lexer.

use crate::ast::Format;
use crate::binary::{TYPE_OBJECT, TYPE_STRING, TYPE_UINT32};

/// Bytes peeked from a stream before choosing a decoder.
pub const PEEK_LEN: usize = 64;

/// Bytes scanned for a NUL terminator.
pub const NUL_WINDOW: usize = 50;

/// Returns true if `prefix` looks like the start of binary VDF.
pub fn looks_binary(prefix: &[u8]) -> bool {
    let Some((&first, _)) = prefix.split_first() else {
        return false;
    };
    if !matches!(first, TYPE_OBJECT | TYPE_STRING | TYPE_UINT32) {
        return false;
    }

    let window = &prefix[1..prefix.len().min(NUL_WINDOW)];
    window.contains(&0)
}

/// Classify a prefix as [`Format::Binary`] or [`Format::Text`].
pub fn detect_format(prefix: &[u8]) -> Format {
    let format = if looks_binary(prefix) {
        Format::Binary
    } else {
        Format::Text
    };
    tracing::debug!(%format, peeked = prefix.len(), "detected VDF format");
    format
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_prefixes() {
        assert_eq!(detect_format(b"\x00root\x00\x08"), Format::Binary);
        assert_eq!(detect_format(b"\x01k\x00v\x00\x08"), Format::Binary);
        assert_eq!(detect_format(b"\x02n\x00\x01\x00\x00\x00\x08"), Format::Binary);
    }

    #[test]
    fn test_text_prefixes() {
        assert_eq!(detect_format(b""), Format::Text);
        assert_eq!(detect_format(b"\"root\" { }"), Format::Text);
        assert_eq!(detect_format(b"\x08"), Format::Text);
        assert_eq!(detect_format(b"\x01"), Format::Text);
    }

    #[test]
    fn test_nul_beyond_window_is_text() {
        let mut data = vec![TYPE_OBJECT];
        data.extend(std::iter::repeat(b'k').take(NUL_WINDOW));
        data.push(0);
        assert_eq!(detect_format(&data), Format::Text);

        let mut data = vec![TYPE_OBJECT];
        data.extend(std::iter::repeat(b'k').take(NUL_WINDOW - 2));
        data.push(0);
        assert_eq!(detect_format(&data), Format::Binary);
    }
}
