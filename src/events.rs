//! Depth-first traversal events over a decoded document.
//!
//! The walk keeps an explicit stack with one frame per open node, so memory
//! is bounded by tree height and events are produced one at a time. A
//! sequence is single-pass: once `DocumentEnd` has been returned the cursor
//! reports exhaustion, and a second pass needs a new cursor.
//!
//! Dangling root and child handles are skipped.

use serde::Serialize;

use crate::ast::{Document, NodeId, NodeKind};

/// What a traversal step describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Before the first root
    DocumentStart,
    /// After the last root
    DocumentEnd,
    /// Object opened; its children follow
    ObjectStart,
    /// Object closed
    ObjectEnd,
    /// String leaf
    String,
    /// Uint32 leaf
    Uint32,
}

/// One traversal step. Borrows keys and string values from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event<'a> {
    /// Event kind
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Node key; absent for document boundaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'a str>,
    /// 0 for document boundaries, 1 for roots, +1 per nesting level
    pub depth: usize,
    /// Set for [`EventKind::String`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<&'a str>,
    /// Set for [`EventKind::Uint32`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uint32_value: Option<u32>,
}

impl<'a> Event<'a> {
    fn boundary(kind: EventKind) -> Self {
        Self {
            kind,
            key: None,
            depth: 0,
            string_value: None,
            uint32_value: None,
        }
    }

    fn node(kind: EventKind, key: &'a str, depth: usize) -> Self {
        Self {
            kind,
            key: Some(key),
            depth,
            string_value: None,
            uint32_value: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    id: NodeId,
    next_child: usize,
    started: bool,
}

impl Frame {
    fn new(id: NodeId) -> Self {
        Self {
            id,
            next_child: 0,
            started: false,
        }
    }
}

/// Traversal state detached from the document it walks.
///
/// Owners that hold the document themselves (such as the stream decoder)
/// keep a cursor and pass the document on every step. Always pass the same
/// document.
#[derive(Debug, Clone, Default)]
pub struct EventCursor {
    stack: Vec<Frame>,
    next_root: usize,
    started: bool,
    finished: bool,
}

impl EventCursor {
    /// Cursor positioned before `DocumentStart`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once `DocumentEnd` has been produced.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Produce the next event, or `None` after `DocumentEnd`.
    pub fn next_event<'d>(&mut self, doc: &'d Document) -> Option<Event<'d>> {
        if self.finished {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(Event::boundary(EventKind::DocumentStart));
        }

        loop {
            let Some(top) = self.stack.len().checked_sub(1) else {
                let Some(&root) = doc.roots().get(self.next_root) else {
                    self.finished = true;
                    return Some(Event::boundary(EventKind::DocumentEnd));
                };
                self.next_root += 1;
                if doc.contains(root) {
                    self.stack.push(Frame::new(root));
                }
                continue;
            };

            let depth = self.stack.len();
            let frame = &mut self.stack[top];
            let Some(node) = doc.node(frame.id) else {
                self.stack.pop();
                continue;
            };

            match node.kind {
                NodeKind::Object => {
                    if !frame.started {
                        frame.started = true;
                        return Some(Event::node(EventKind::ObjectStart, &node.key, depth));
                    }

                    let mut descend = None;
                    while let Some(&child) = node.children.get(frame.next_child) {
                        frame.next_child += 1;
                        if doc.contains(child) {
                            descend = Some(child);
                            break;
                        }
                    }

                    match descend {
                        Some(child) => self.stack.push(Frame::new(child)),
                        None => {
                            self.stack.pop();
                            return Some(Event::node(EventKind::ObjectEnd, &node.key, depth));
                        }
                    }
                }
                NodeKind::String => {
                    self.stack.pop();
                    let mut event = Event::node(EventKind::String, &node.key, depth);
                    event.string_value = node.string_value.as_deref();
                    return Some(event);
                }
                NodeKind::Uint32 => {
                    self.stack.pop();
                    let mut event = Event::node(EventKind::Uint32, &node.key, depth);
                    event.uint32_value = node.uint32_value;
                    return Some(event);
                }
            }
        }
    }
}

/// Iterator over the events of a borrowed document.
#[derive(Debug, Clone)]
pub struct Events<'a> {
    doc: &'a Document,
    cursor: EventCursor,
}

impl<'a> Iterator for Events<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        self.cursor.next_event(self.doc)
    }
}

impl std::iter::FusedIterator for Events<'_> {}

impl Document {
    /// Lazy depth-first event sequence over this document.
    pub fn events(&self) -> Events<'_> {
        Events {
            doc: self,
            cursor: EventCursor::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(doc: &Document) -> Vec<(EventKind, Option<String>, usize)> {
        doc.events()
            .map(|e| (e.kind, e.key.map(str::to_string), e.depth))
            .collect()
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        let events: Vec<_> = doc.events().map(|e| e.kind).collect();
        assert_eq!(events, vec![EventKind::DocumentStart, EventKind::DocumentEnd]);
    }

    #[test]
    fn test_nested_sequence_and_depths() {
        let mut doc = Document::new();
        let root = doc.new_object("root");
        let inner = doc.new_object("inner");
        let leaf = doc.new_uint32("n", 5);
        let s = doc.new_string("s", "v");
        doc.add_child(inner, leaf);
        doc.add_child(root, inner);
        doc.add_child(root, s);
        doc.add_root(root);
        let tail = doc.new_string("tail", "t");
        doc.add_root(tail);

        let key = |k: &str| Some(k.to_string());
        assert_eq!(
            kinds(&doc),
            vec![
                (EventKind::DocumentStart, None, 0),
                (EventKind::ObjectStart, key("root"), 1),
                (EventKind::ObjectStart, key("inner"), 2),
                (EventKind::Uint32, key("n"), 3),
                (EventKind::ObjectEnd, key("inner"), 2),
                (EventKind::String, key("s"), 2),
                (EventKind::ObjectEnd, key("root"), 1),
                (EventKind::String, key("tail"), 1),
                (EventKind::DocumentEnd, None, 0),
            ]
        );
    }

    #[test]
    fn test_dangling_handles_skipped() {
        let mut doc = Document::new();
        let root = doc.new_object("root");
        doc.node_mut(root).unwrap().children.push(NodeId::NULL);
        doc.add_root(root);
        doc.roots_mut().push(NodeId::NULL);

        let events: Vec<_> = doc.events().map(|e| e.kind).collect();
        assert_eq!(
            events,
            vec![
                EventKind::DocumentStart,
                EventKind::ObjectStart,
                EventKind::ObjectEnd,
                EventKind::DocumentEnd,
            ]
        );
    }

    #[test]
    fn test_exhausted_stays_exhausted() {
        let doc = Document::new();
        let mut cursor = EventCursor::new();
        assert!(cursor.next_event(&doc).is_some());
        assert!(cursor.next_event(&doc).is_some());
        assert!(cursor.is_finished());
        assert!(cursor.next_event(&doc).is_none());
        assert!(cursor.next_event(&doc).is_none());
    }

    #[test]
    fn test_scalar_payloads_and_json_shape() {
        let mut doc = Document::new();
        let s = doc.new_string("k", "v");
        let n = doc.new_uint32("n", 7);
        doc.add_root(s);
        doc.add_root(n);

        let events: Vec<_> = doc.events().collect();
        assert_eq!(events[1].string_value, Some("v"));
        assert_eq!(events[2].uint32_value, Some(7));

        let json = serde_json::to_string(&events[1]).unwrap();
        assert_eq!(json, r#"{"type":"string","key":"k","depth":1,"string_value":"v"}"#);
        let json = serde_json::to_string(&events[0]).unwrap();
        assert_eq!(json, r#"{"type":"document_start","depth":0}"#);
    }
}
