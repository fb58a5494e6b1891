//! Document validation.
//!
//! Walks every root depth-first, checking that each node's populated fields
//! match its kind and that the tree really is a tree: a node may appear at
//! most once, and never below itself.

use std::collections::HashSet;

use super::document::Document;
use super::types::{Node, NodeId, NodeKind};
use crate::error::{ErrorCode, VdfResult};

/// Identity sets carried through the walk.
struct Walk {
    /// Nodes on the path from the current root to the current node.
    on_path: HashSet<NodeId>,
    /// Every node visited so far.
    seen: HashSet<NodeId>,
}

/// Validate that an object carries no scalar payload.
fn validate_object_payload(node: &Node) -> Result<(), String> {
    if node.string_value.is_some() || node.uint32_value.is_some() {
        return Err(format!("object {:?} has scalar payload", node.key));
    }
    Ok(())
}

/// Validate that a leaf carries exactly its own scalar and no children.
fn validate_leaf_payload(node: &Node) -> Result<(), String> {
    match node.kind {
        NodeKind::String => {
            if node.string_value.is_none() {
                return Err(format!("string node {:?} missing value", node.key));
            }
            if node.uint32_value.is_some() || !node.children.is_empty() {
                return Err(format!("string node {:?} has invalid extra data", node.key));
            }
        }
        NodeKind::Uint32 => {
            if node.uint32_value.is_none() {
                return Err(format!("uint32 node {:?} missing value", node.key));
            }
            if node.string_value.is_some() || !node.children.is_empty() {
                return Err(format!("uint32 node {:?} has invalid extra data", node.key));
            }
        }
        NodeKind::Object => {}
    }
    Ok(())
}

fn validate_node(doc: &Document, id: NodeId, walk: &mut Walk) -> Result<(), String> {
    let node = doc.node(id).ok_or_else(|| "nil node".to_string())?;

    if walk.on_path.contains(&id) {
        return Err(format!("cyclic node {:?}", node.key));
    }
    if !walk.seen.insert(id) {
        return Err(format!("node {:?} is shared by more than one parent", node.key));
    }

    match node.kind {
        NodeKind::Object => {
            validate_object_payload(node)?;
            walk.on_path.insert(id);
            for (i, &child) in node.children.iter().enumerate() {
                validate_node(doc, child, walk).map_err(|e| format!("child[{i}]: {e}"))?;
            }
            walk.on_path.remove(&id);
        }
        NodeKind::String | NodeKind::Uint32 => validate_leaf_payload(node)?,
    }
    Ok(())
}

/// Full validation of a document.
pub(crate) fn validate_document(doc: &Document) -> VdfResult<()> {
    let mut walk = Walk {
        on_path: HashSet::new(),
        seen: HashSet::with_capacity(doc.arena_len()),
    };
    for (i, &root) in doc.roots().iter().enumerate() {
        if let Err(reason) = validate_node(doc, root, &mut walk) {
            tracing::debug!(root = i, %reason, "document validation failed");
            return Err(ErrorCode::invalid_node(format!("root[{i}]: {reason}")));
        }
    }
    Ok(())
}
