//! The in-memory VDF tree.
//!
//! A [`Document`] holds an ordered list of root nodes. Each [`Node`] is an
//! object (ordered children, duplicates allowed), a string leaf or a uint32
//! leaf. Nodes live in the document's arena and are addressed by [`NodeId`],
//! which lets validation detect cycles and shared nodes by identity rather
//! than by value.
//!
//! - [`types`] - `Node`, `NodeKind`, `NodeId`, `Format`
//! - [`document`] - `Document` and the borrowed `NodeRef` view

pub mod document;
pub(crate) mod order;
pub mod types;
mod validation;

pub use document::{Document, NodeRef};
pub use types::{Format, Node, NodeId, NodeKind};
