//! Node, handle and format types for the VDF tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, VdfResult};

/// Wire format of a document: the one it was decoded from or the one it
/// should be encoded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Detect on decode; on encode, use the document's own format or text.
    #[default]
    Auto,
    /// Brace-delimited text form.
    Text,
    /// Null-terminated binary form.
    Binary,
}

impl Format {
    /// Lowercase name used by the CLI and serde.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Auto => "auto",
            Format::Text => "text",
            Format::Binary => "binary",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ErrorCode;

    fn from_str(s: &str) -> VdfResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Format::Auto),
            "text" => Ok(Format::Text),
            "binary" => Ok(Format::Binary),
            _ => Err(ErrorCode::E100_InvalidFormat(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Format {
    type Error = ErrorCode;

    fn try_from(value: u8) -> VdfResult<Self> {
        match value {
            0 => Ok(Format::Auto),
            1 => Ok(Format::Text),
            2 => Ok(Format::Binary),
            other => Err(ErrorCode::E100_InvalidFormat(other.to_string())),
        }
    }
}

/// Payload shape of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Ordered children, no scalar.
    Object,
    /// Text scalar, no children.
    String,
    /// Unsigned 32-bit scalar, no children.
    Uint32,
}

/// Opaque handle to a node owned by a [`Document`](super::Document).
///
/// Handles are only meaningful for the document that issued them. A handle
/// that does not resolve in a document behaves as a null node: it is skipped
/// by traversal and rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// A handle that never resolves to a node.
    pub const NULL: NodeId = NodeId(usize::MAX);

    /// Position of the node in its document's arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A single tree element.
///
/// Fields are public so callers can inspect and repair nodes; nothing stops
/// a caller from populating fields that do not match `kind`, which is what
/// [`Document::validate`](super::Document::validate) checks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Entry key. Not required to be unique among siblings.
    pub key: String,
    /// Which payload this node carries.
    pub kind: NodeKind,
    /// Set for [`NodeKind::String`] only.
    pub string_value: Option<String>,
    /// Set for [`NodeKind::Uint32`] only.
    pub uint32_value: Option<u32>,
    /// Set for [`NodeKind::Object`] only, in source order.
    pub children: Vec<NodeId>,
}

impl Node {
    /// Empty object node.
    pub fn object(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: NodeKind::Object,
            string_value: None,
            uint32_value: None,
            children: Vec::with_capacity(4),
        }
    }

    /// String leaf.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: NodeKind::String,
            string_value: Some(value.into()),
            uint32_value: None,
            children: Vec::new(),
        }
    }

    /// Uint32 leaf.
    pub fn uint32(key: impl Into<String>, value: u32) -> Self {
        Self {
            key: key.into(),
            kind: NodeKind::Uint32,
            string_value: None,
            uint32_value: Some(value),
            children: Vec::new(),
        }
    }

    /// Returns true if this is an object node.
    pub fn is_object(&self) -> bool {
        self.kind == NodeKind::Object
    }

    /// Leaf value rendered as text: the string itself, or the decimal form
    /// of a uint32.
    pub fn text_value(&self) -> VdfResult<String> {
        match self.kind {
            NodeKind::String => self.string_value.clone().ok_or_else(|| {
                ErrorCode::invalid_node(format!("string node {:?} missing value", self.key))
            }),
            NodeKind::Uint32 => self.uint32_value.map(|v| v.to_string()).ok_or_else(|| {
                ErrorCode::invalid_node(format!("uint32 node {:?} missing value", self.key))
            }),
            NodeKind::Object => Err(ErrorCode::invalid_node(format!(
                "object {:?} cannot be formatted as a text leaf",
                self.key
            ))),
        }
    }
}
