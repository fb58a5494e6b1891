//! The [`Document`] arena and the borrowed [`NodeRef`] view.

use std::collections::HashSet;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use super::types::{Format, Node, NodeId, NodeKind};
use super::validation::validate_document;
use crate::error::VdfResult;

/// A complete VDF document: ordered root nodes plus a format tag.
///
/// The document owns every node it creates. Callers refer to nodes through
/// [`NodeId`] handles and mutate the tree with append-only operations.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Source format after decode, or the intended output format.
    pub format: Format,
    roots: Vec<NodeId>,
    nodes: Vec<Node>,
}

impl Document {
    /// Empty document with [`Format::Auto`].
    pub fn new() -> Self {
        Self::with_format(Format::Auto)
    }

    /// Empty document with an explicit format tag.
    pub fn with_format(format: Format) -> Self {
        Self {
            format,
            roots: Vec::with_capacity(1),
            nodes: Vec::new(),
        }
    }

    /// Move a node into the arena without attaching it anywhere.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Create a detached empty object node.
    pub fn new_object(&mut self, key: impl Into<String>) -> NodeId {
        self.insert(Node::object(key))
    }

    /// Create a detached string leaf.
    pub fn new_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> NodeId {
        self.insert(Node::string(key, value))
    }

    /// Create a detached uint32 leaf.
    pub fn new_uint32(&mut self, key: impl Into<String>, value: u32) -> NodeId {
        self.insert(Node::uint32(key, value))
    }

    /// Append `child` to `parent`.
    ///
    /// Does nothing if `parent` is not an object or either handle does not
    /// resolve.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(child) {
            return;
        }
        if let Some(node) = self.nodes.get_mut(parent.0) {
            if node.kind == NodeKind::Object {
                node.children.push(child);
            }
        }
    }

    /// Append a root node. Does nothing if the handle does not resolve.
    pub fn add_root(&mut self, node: NodeId) {
        if self.contains(node) {
            self.roots.push(node);
        }
    }

    /// Root handles in order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Mutable root list, for callers that reorder or remove roots.
    pub fn roots_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.roots
    }

    /// Returns true if the handle resolves in this document.
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Look up a node for mutation.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Borrowed view of a node.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.node(id).map(|node| NodeRef { doc: self, id, node })
    }

    /// Views of the root nodes, skipping handles that do not resolve.
    pub fn root_nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().filter_map(move |&id| self.get(id))
    }

    /// First root with the given key.
    pub fn first_root(&self, key: &str) -> Option<NodeRef<'_>> {
        self.root_nodes().find(|n| n.key() == key)
    }

    /// First child of `parent` with the given key.
    pub fn first(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        self.get(parent)?.first(key).map(|n| n.id())
    }

    /// All children of `parent` with the given key, in source order.
    pub fn all(&self, parent: NodeId, key: &str) -> Vec<NodeId> {
        match self.get(parent) {
            Some(node) => node.all(key).into_iter().map(|n| n.id()).collect(),
            None => Vec::new(),
        }
    }

    /// Number of nodes held by the arena, attached or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct nodes reachable from the roots.
    ///
    /// Terminates on cyclic or shared graphs, counting each node once.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.for_each_reachable(|_| count += 1);
        count
    }

    /// Visit every resolvable node reachable from the roots, each once.
    pub(crate) fn for_each_reachable(&self, mut visit: impl FnMut(&Node)) {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut stack: Vec<NodeId> = self.roots.clone();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            visit(node);
            if node.kind == NodeKind::Object {
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Check the kind/payload invariant for every reachable node and reject
    /// cycles and shared nodes.
    pub fn validate(&self) -> VdfResult<()> {
        validate_document(self)
    }

    /// Structural equality: same root and child order, same keys, same
    /// scalar values. Ignores the format tag and arena layout.
    pub fn same_structure(&self, other: &Document) -> bool {
        let mut ours = self.root_nodes();
        let mut theirs = other.root_nodes();
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a == b => continue,
                _ => return false,
            }
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Document", 2)?;
        state.serialize_field("format", &self.format)?;
        let roots: Vec<NodeRef<'_>> = self.root_nodes().collect();
        state.serialize_field("roots", &roots)?;
        state.end()
    }
}

/// Read-only view of a node together with the document that owns it.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    /// Handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The underlying node.
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Entry key.
    pub fn key(&self) -> &'a str {
        &self.node.key
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        self.node.kind
    }

    /// String payload, if this is a string leaf.
    pub fn as_str(&self) -> Option<&'a str> {
        match self.node.kind {
            NodeKind::String => self.node.string_value.as_deref(),
            _ => None,
        }
    }

    /// Uint32 payload, if this is a uint32 leaf.
    pub fn as_u32(&self) -> Option<u32> {
        match self.node.kind {
            NodeKind::Uint32 => self.node.uint32_value,
            _ => None,
        }
    }

    /// Children in source order. Empty for leaves.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        let node = self.node;
        let ids: &'a [NodeId] = match node.kind {
            NodeKind::Object => &node.children,
            _ => &[],
        };
        ids.iter().filter_map(move |&id| doc.get(id))
    }

    /// First child with the given key.
    pub fn first(&self, key: &str) -> Option<NodeRef<'a>> {
        self.children().find(|c| c.key() == key)
    }

    /// All children with the given key, in source order.
    pub fn all(&self, key: &str) -> Vec<NodeRef<'a>> {
        self.children().filter(|c| c.key() == key).collect()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.node, other.node);
        if a.key != b.key
            || a.kind != b.kind
            || a.string_value != b.string_value
            || a.uint32_value != b.uint32_value
        {
            return false;
        }
        self.children().eq(other.children())
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Node", 5)?;
        state.serialize_field("key", self.key())?;
        state.serialize_field("kind", &self.kind())?;
        match self.kind() {
            NodeKind::String => {
                state.serialize_field("string_value", &self.node.string_value)?;
            }
            NodeKind::Uint32 => {
                state.serialize_field("uint32_value", &self.node.uint32_value)?;
            }
            NodeKind::Object => {
                let children: Vec<NodeRef<'_>> = self.children().collect();
                state.serialize_field("children", &children)?;
            }
        }
        state.end()
    }
}
