//! Stream decoding front-end.
//!
//! A [`Decoder`] reads its whole input on first use, picks the text or
//! binary codec (sniffing when the format is [`Format::Auto`]), and caches
//! the outcome. Traversal events are then served from the cached document.

use std::io::{BufReader, Cursor, Read};

use crate::ast::{Document, Format};
use crate::binary::parse_binary_document;
use crate::detect::{detect_format, PEEK_LEN};
use crate::error::VdfResult;
use crate::events::{Event, EventCursor};
use crate::options::DecodeOptions;
use crate::text::parse_text_document;

/// Decodes VDF from a reader.
pub struct Decoder<R> {
    reader: R,
    opts: DecodeOptions,
    decoded: Option<VdfResult<Document>>,
    cursor: Option<EventCursor>,
}

impl<R: Read> Decoder<R> {
    /// Create a decoder. Nothing is read until the first call.
    pub fn new(reader: R, opts: DecodeOptions) -> Self {
        Self {
            reader,
            opts,
            decoded: None,
            cursor: None,
        }
    }

    /// Decode the input, or return the cached result of an earlier call.
    pub fn decode_document(&mut self) -> VdfResult<&Document> {
        let result = match self.decoded.take() {
            Some(result) => result,
            None => self.run(),
        };
        match self.decoded.insert(result) {
            Ok(doc) => Ok(&*doc),
            Err(err) => Err(err.clone()),
        }
    }

    /// Next traversal event, decoding first if needed.
    ///
    /// Returns `Ok(None)` once `DocumentEnd` has been produced.
    pub fn next_event(&mut self) -> VdfResult<Option<Event<'_>>> {
        let result = match self.decoded.take() {
            Some(result) => result,
            None => self.run(),
        };
        let doc = match self.decoded.insert(result) {
            Ok(doc) => &*doc,
            Err(err) => return Err(err.clone()),
        };
        let cursor = self.cursor.get_or_insert_with(EventCursor::new);
        Ok(cursor.next_event(doc))
    }

    /// Consume the decoder and return the decoded document.
    pub fn into_document(mut self) -> VdfResult<Document> {
        match self.decoded.take() {
            Some(result) => result,
            None => self.run(),
        }
    }

    fn run(&mut self) -> VdfResult<Document> {
        let opts = self.opts;
        let mut prefix = Vec::new();
        let format = match opts.format {
            Format::Auto => {
                self.reader
                    .by_ref()
                    .take(PEEK_LEN as u64)
                    .read_to_end(&mut prefix)?;
                detect_format(&prefix)
            }
            format => format,
        };
        tracing::debug!(%format, strict = opts.strict, "decoding VDF");

        let mut source = Cursor::new(prefix).chain(self.reader.by_ref());
        let result = match format {
            Format::Binary => parse_binary_document(&mut BufReader::new(source), opts),
            _ => {
                let mut raw = Vec::new();
                source.read_to_end(&mut raw)?;
                parse_text_document(&String::from_utf8_lossy(&raw), opts)
            }
        };

        match &result {
            Ok(doc) => tracing::debug!(%format, roots = doc.roots().len(), "decoded VDF"),
            Err(err) => tracing::debug!(%format, code = err.code(), error = %err, "decode failed"),
        }
        result
    }
}

/// Decode text VDF from a reader.
pub fn parse<R: Read>(reader: R) -> VdfResult<Document> {
    Decoder::new(reader, DecodeOptions::new(Format::Text)).into_document()
}

/// Decode text VDF from a string.
pub fn parse_str(input: &str) -> VdfResult<Document> {
    parse_text_document(input, DecodeOptions::new(Format::Text))
}

/// Decode VDF from bytes with the given options.
pub fn parse_bytes(data: &[u8], opts: DecodeOptions) -> VdfResult<Document> {
    Decoder::new(data, opts).into_document()
}

/// Decode VDF from bytes, detecting the format.
pub fn parse_auto(data: &[u8]) -> VdfResult<Document> {
    parse_bytes(data, DecodeOptions::new(Format::Auto))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::events::EventKind;

    const BINARY: &[u8] = b"\x00root\x00\x01k\x00v\x00\x08\x08";

    #[test]
    fn test_auto_detects_both_formats() {
        let doc = parse_auto(BINARY).unwrap();
        assert_eq!(doc.format, Format::Binary);

        let doc = parse_auto(b"\"root\" { \"k\" \"v\" }").unwrap();
        assert_eq!(doc.format, Format::Text);
        assert!(doc.same_structure(&parse_auto(BINARY).unwrap()));
    }

    #[test]
    fn test_auto_replays_prefix_longer_than_peek() {
        let value = "x".repeat(PEEK_LEN * 3);
        let input = format!("\"key\" \"{value}\"");
        let doc = parse_auto(input.as_bytes()).unwrap();
        assert_eq!(doc.first_root("key").unwrap().as_str(), Some(value.as_str()));
    }

    #[test]
    fn test_empty_input_is_empty_text_document() {
        let doc = parse_auto(b"").unwrap();
        assert_eq!(doc.format, Format::Text);
        assert!(doc.roots().is_empty());
    }

    #[test]
    fn test_decode_is_cached() {
        let mut decoder = Decoder::new(BINARY, DecodeOptions::default());
        let first = decoder.decode_document().unwrap().roots().len();
        let second = decoder.decode_document().unwrap().roots().len();
        assert_eq!(first, 1);
        assert_eq!(second, 1);
    }

    #[test]
    fn test_error_is_cached() {
        let mut decoder = Decoder::new(&b"\"key"[..], DecodeOptions::new(Format::Text));
        assert_eq!(decoder.decode_document().unwrap_err().code(), 201);
        assert_eq!(decoder.decode_document().unwrap_err().code(), 201);
        assert_eq!(decoder.next_event().unwrap_err().code(), 201);
    }

    #[test]
    fn test_next_event_until_exhausted() {
        let mut decoder = Decoder::new(&b"\"root\" { \"k\" \"v\" }"[..], DecodeOptions::default());
        let mut kinds = Vec::new();
        while let Some(event) = decoder.next_event().unwrap() {
            kinds.push(event.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::DocumentStart,
                EventKind::ObjectStart,
                EventKind::String,
                EventKind::ObjectEnd,
                EventKind::DocumentEnd,
            ]
        );
        assert!(decoder.next_event().unwrap().is_none());
    }

    #[test]
    fn test_invalid_utf8_text_is_lossy() {
        let doc = parse(&b"\"k\" \"a\xffb\""[..]).unwrap();
        assert_eq!(doc.first_root("k").unwrap().as_str(), Some("a\u{FFFD}b"));
    }

    #[test]
    fn test_forced_text_on_binary_input_fails_to_parse() {
        let err = parse_bytes(BINARY, DecodeOptions::new(Format::Text)).unwrap_err();
        assert!(matches!(err, ErrorCode::E302_ExpectedValueOrObject { line: 1, .. }));
    }

    #[test]
    fn test_parse_str() {
        let doc = parse_str("\"a\" \"1\"").unwrap();
        assert_eq!(doc.roots().len(), 1);
        assert_eq!(doc.first_root("a").unwrap().as_str(), Some("1"));
    }
}
