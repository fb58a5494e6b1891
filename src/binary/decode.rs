//! Binary VDF decoder.
//!
//! End of input before any root is an empty document. End of input anywhere
//! else (after a root, inside a key or value, inside a uint32, or before an
//! object's end marker) is [`ErrorCode::E102_BufferOverflow`], kept distinct
//! from [`ErrorCode::E101_UnrecognizedType`] so truncated input can be told
//! apart from corrupt input.

use std::io::{BufRead, ErrorKind};

use super::pool::PooledBuf;
use super::{TYPE_OBJECT, TYPE_OBJECT_END, TYPE_STRING, TYPE_UINT32};
use crate::ast::{Document, Format, NodeId};
use crate::error::{ErrorCode, VdfResult};
use crate::limits::{object_scope, root_scope, KeyScope, LimitTracker};
use crate::options::DecodeOptions;

struct BinaryDecoder<'r, R: BufRead> {
    reader: &'r mut R,
    strict: bool,
    limits: LimitTracker,
    doc: Document,
}

/// Decode binary VDF from a buffered reader.
pub fn parse_binary_document<R: BufRead>(reader: &mut R, opts: DecodeOptions) -> VdfResult<Document> {
    BinaryDecoder {
        reader,
        strict: opts.strict,
        limits: LimitTracker::new(&opts),
        doc: Document::with_format(Format::Binary),
    }
    .decode()
}

impl<R: BufRead> BinaryDecoder<'_, R> {
    fn decode(mut self) -> VdfResult<Document> {
        let mut roots = KeyScope::new(self.strict);
        loop {
            let type_byte = match self.read_byte()? {
                Some(b) => b,
                None if self.doc.roots().is_empty() => break,
                None => return Err(ErrorCode::E102_BufferOverflow),
            };
            if type_byte == TYPE_OBJECT_END {
                break;
            }

            let root = self.decode_entry(type_byte, 1)?;
            let key = self.key_of(root);
            roots.accept(&key, root_scope)?;
            self.doc.add_root(root);
        }

        tracing::trace!(nodes = self.limits.nodes(), "decoded binary document");
        Ok(self.doc)
    }

    fn key_of(&self, id: NodeId) -> String {
        self.doc.node(id).map(|n| n.key.clone()).unwrap_or_default()
    }

    fn decode_entry(&mut self, type_byte: u8, depth: usize) -> VdfResult<NodeId> {
        self.limits.check_depth(depth)?;
        let key = self.read_cstring()?;

        match type_byte {
            TYPE_OBJECT => self.decode_object(key, depth),
            TYPE_STRING => {
                let value = self.read_cstring()?;
                let id = self.doc.new_string(key, value);
                self.limits.count_node()?;
                Ok(id)
            }
            TYPE_UINT32 => {
                let value = self.read_u32()?;
                let id = self.doc.new_uint32(key, value);
                self.limits.count_node()?;
                Ok(id)
            }
            other => Err(ErrorCode::E101_UnrecognizedType(other)),
        }
    }

    fn decode_object(&mut self, key: String, depth: usize) -> VdfResult<NodeId> {
        let id = self.doc.new_object(key.as_str());
        self.limits.count_node()?;
        let mut children = KeyScope::new(self.strict);

        loop {
            let type_byte = self.read_byte()?.ok_or(ErrorCode::E102_BufferOverflow)?;
            if type_byte == TYPE_OBJECT_END {
                return Ok(id);
            }

            let child = self.decode_entry(type_byte, depth + 1)?;
            let child_key = self.key_of(child);
            children.accept(&child_key, || object_scope(&key))?;
            self.doc.add_child(id, child);
        }
    }

    /// Next byte, or `None` at end of input.
    fn read_byte(&mut self) -> VdfResult<Option<u8>> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            let Some(&b) = available.first() else {
                return Ok(None);
            };
            self.reader.consume(1);
            return Ok(Some(b));
        }
    }

    /// NUL-terminated string. Invalid UTF-8 is replaced with U+FFFD.
    fn read_cstring(&mut self) -> VdfResult<String> {
        let mut buf = PooledBuf::acquire();
        self.reader.read_until(0, &mut buf)?;
        if buf.pop() != Some(0) {
            return Err(ErrorCode::E102_BufferOverflow);
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn read_u32(&mut self) -> VdfResult<u32> {
        let mut raw = [0u8; 4];
        match self.reader.read_exact(&mut raw) {
            Ok(()) => Ok(u32::from_le_bytes(raw)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(ErrorCode::E102_BufferOverflow),
            Err(e) => Err(e.into()),
        }
    }
}
