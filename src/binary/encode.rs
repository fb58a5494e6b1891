//! Binary VDF encoder and output size estimate.

use std::io::Write;

use super::{TYPE_OBJECT, TYPE_OBJECT_END, TYPE_STRING, TYPE_UINT32};
use crate::ast::order::ordered;
use crate::ast::{Document, NodeId, NodeKind};
use crate::error::{ErrorCode, VdfResult};

/// Write `value` followed by a NUL, rejecting embedded NULs.
pub(crate) fn write_cstring<W: Write>(w: &mut W, value: &str) -> VdfResult<()> {
    if value.as_bytes().contains(&0) {
        return Err(ErrorCode::E103_NullInString(value.to_string()));
    }
    w.write_all(value.as_bytes())?;
    w.write_all(&[0])?;
    Ok(())
}

/// Object header: type byte and key.
pub(crate) fn write_object_start<W: Write>(w: &mut W, key: &str) -> VdfResult<()> {
    w.write_all(&[TYPE_OBJECT])?;
    write_cstring(w, key)
}

/// Object (or document) end marker.
pub(crate) fn write_object_end<W: Write>(w: &mut W) -> VdfResult<()> {
    w.write_all(&[TYPE_OBJECT_END])?;
    Ok(())
}

pub(crate) fn write_string_entry<W: Write>(w: &mut W, key: &str, value: &str) -> VdfResult<()> {
    w.write_all(&[TYPE_STRING])?;
    write_cstring(w, key)?;
    write_cstring(w, value)
}

pub(crate) fn write_uint32_entry<W: Write>(w: &mut W, key: &str, value: u32) -> VdfResult<()> {
    w.write_all(&[TYPE_UINT32])?;
    write_cstring(w, key)?;
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

/// Write a whole document as binary VDF, including the trailing end marker.
pub(crate) fn write_binary_document<W: Write>(w: &mut W, doc: &Document, deterministic: bool) -> VdfResult<()> {
    for &root in ordered(doc, doc.roots(), deterministic).iter() {
        write_binary_node(w, doc, root, deterministic)?;
    }
    write_object_end(w)
}

fn write_binary_node<W: Write>(w: &mut W, doc: &Document, id: NodeId, deterministic: bool) -> VdfResult<()> {
    let node = doc
        .node(id)
        .ok_or_else(|| ErrorCode::invalid_node("nil node"))?;

    match node.kind {
        NodeKind::Object => {
            write_object_start(w, &node.key)?;
            for &child in ordered(doc, &node.children, deterministic).iter() {
                write_binary_node(w, doc, child, deterministic)?;
            }
            write_object_end(w)
        }
        NodeKind::String => {
            let value = node.string_value.as_deref().ok_or_else(|| {
                ErrorCode::invalid_node(format!("nil string value for key {:?}", node.key))
            })?;
            write_string_entry(w, &node.key, value)
        }
        NodeKind::Uint32 => {
            let value = node.uint32_value.ok_or_else(|| {
                ErrorCode::invalid_node(format!("nil uint32 value for key {:?}", node.key))
            })?;
            write_uint32_entry(w, &node.key, value)
        }
    }
}

/// Estimated binary size of `doc` in bytes.
///
/// Exact for valid trees: one type byte plus key and NUL per node, four bytes
/// per uint32, value and NUL per string, one end marker per object, and the
/// trailing document terminator. Dangling handles contribute nothing, and a
/// node reached twice is counted once.
pub fn estimate_binary_size(doc: &Document) -> usize {
    let mut size = 1;
    doc.for_each_reachable(|node| {
        size += 1 + node.key.len() + 1;
        size += match node.kind {
            NodeKind::Object => 1,
            NodeKind::String => node.string_value.as_ref().map_or(0, |v| v.len() + 1),
            NodeKind::Uint32 => 4,
        };
    });
    size
}
