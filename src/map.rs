//! Conversion between documents and JSON-style maps.
//!
//! Maps cannot hold duplicate keys, so conversion to a map either rejects
//! them ([`Document::to_map_strict`]) or keeps the last value
//! ([`Document::to_map_lossy`]). Uint32 leaves become JSON numbers and string
//! leaves become JSON strings.

use serde_json::{Map, Number, Value};

use crate::ast::{Document, Format, Node, NodeId, NodeKind};
use crate::error::{ErrorCode, VdfResult};
use crate::limits::{object_scope, root_scope};

impl Document {
    /// Validate, then convert to a map, failing on any duplicate sibling key
    /// (roots included).
    pub fn to_map_strict(&self) -> VdfResult<Map<String, Value>> {
        self.validate()?;

        let mut out = Map::new();
        for &root in self.roots() {
            insert_strict(self, &mut out, root, root_scope)?;
        }
        Ok(out)
    }

    /// Convert to a map without validating. Later duplicates overwrite
    /// earlier ones; dangling handles are skipped.
    pub fn to_map_lossy(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for &root in self.roots() {
            if let Some((key, value)) = lossy_entry(self, root) {
                out.insert(key, value);
            }
        }
        out
    }
}

/// Convert `id` into `map`, rejecting its key before converting its subtree
/// if a sibling already used it.
fn insert_strict(
    doc: &Document,
    map: &mut Map<String, Value>,
    id: NodeId,
    scope: impl FnOnce() -> String,
) -> VdfResult<()> {
    let node = doc
        .node(id)
        .ok_or_else(|| ErrorCode::invalid_node("nil node"))?;
    if map.contains_key(&node.key) {
        return Err(ErrorCode::E104_DuplicateKey {
            key: node.key.clone(),
            scope: scope(),
        });
    }

    let value = strict_value(doc, node)?;
    map.insert(node.key.clone(), value);
    Ok(())
}

fn strict_value(doc: &Document, node: &Node) -> VdfResult<Value> {
    Ok(match node.kind {
        NodeKind::String => Value::String(node.text_value()?),
        NodeKind::Uint32 => {
            let n = node.uint32_value.ok_or_else(|| {
                ErrorCode::invalid_node(format!("uint32 node {:?} missing value", node.key))
            })?;
            Value::Number(n.into())
        }
        NodeKind::Object => {
            let mut map = Map::new();
            for &child in &node.children {
                insert_strict(doc, &mut map, child, || object_scope(&node.key))?;
            }
            Value::Object(map)
        }
    })
}

fn lossy_entry(doc: &Document, id: NodeId) -> Option<(String, Value)> {
    let node = doc.node(id)?;
    let value = match node.kind {
        NodeKind::String => node.string_value.clone().map_or(Value::Null, Value::String),
        NodeKind::Uint32 => node
            .uint32_value
            .map_or(Value::Null, |n| Value::Number(n.into())),
        NodeKind::Object => Value::Object(
            node.children
                .iter()
                .filter_map(|&child| lossy_entry(doc, child))
                .collect(),
        ),
    };
    Some((node.key.clone(), value))
}

/// Build a document with one object root named `root_key` from a map.
///
/// Strings become string leaves, integers in `0..=u32::MAX` (or integral
/// floats in that range) become uint32 leaves, and nested maps become
/// objects. The result is validated before it is returned.
pub fn from_map(root_key: &str, map: &Map<String, Value>) -> VdfResult<Document> {
    let mut doc = Document::with_format(Format::Auto);
    let root = doc.new_object(root_key);
    add_entries(&mut doc, root, map)?;
    doc.add_root(root);
    doc.validate()?;
    Ok(doc)
}

fn add_entries(doc: &mut Document, parent: NodeId, map: &Map<String, Value>) -> VdfResult<()> {
    for (key, value) in map {
        let child = match value {
            Value::String(s) => doc.new_string(key.as_str(), s.as_str()),
            Value::Number(n) => doc.new_uint32(key.as_str(), number_to_u32(key, n)?),
            Value::Object(nested) => {
                let obj = doc.new_object(key.as_str());
                add_entries(doc, obj, nested)?;
                obj
            }
            other => {
                return Err(ErrorCode::E401_UnsupportedMapValueType {
                    key: key.clone(),
                    found: value_kind(other),
                });
            }
        };
        doc.add_child(parent, child);
    }
    Ok(())
}

fn number_to_u32(key: &str, n: &Number) -> VdfResult<u32> {
    let out_of_range = || ErrorCode::E402_IntegerOutOfRange {
        key: key.to_string(),
        value: n.to_string(),
    };

    if let Some(v) = n.as_u64() {
        return u32::try_from(v).map_err(|_| out_of_range());
    }
    if n.is_i64() {
        return Err(out_of_range());
    }

    match n.as_f64() {
        Some(f) if (0.0..=f64::from(u32::MAX)).contains(&f) && f.fract() == 0.0 => Ok(f as u32),
        _ => Err(out_of_range()),
    }
}

/// Name of a JSON value's type, as used in conversion errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
