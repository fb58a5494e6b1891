//! Valve Data Format (VDF) codec.
//!
//! Reads and writes both encodings of VDF:
//!
//! - text: `"key" "value"` pairs and `"key" { ... }` objects, with `//`
//!   comments and backslash escapes
//! - binary: type-tagged, NUL-terminated entries closed by `0x08`
//!
//! Both decode into the same [`Document`] tree, which keeps sibling order
//! and duplicate keys. From a document you can re-encode in either format,
//! walk it as a lazy stream of [`Event`]s, or convert it to and from a
//! `serde_json` map.
//!
//! # Architecture
//!
//! - [`ast`] - `Document`, `Node`, `NodeId` and validation
//! - [`text`] - lexer, parser and writer for the text encoding
//! - [`binary`] - decoder, encoder and size estimate for the binary encoding
//! - [`detect`] - format sniffing
//! - [`decoder`] / [`encoder`] - stream front-ends and convenience functions
//! - [`events`] - depth-first traversal events
//! - [`map`] - strict and lossy map conversion
//! - [`fs`] - file-path wrappers
//! - [`error`] - error codes
//!
//! # Untrusted input
//!
//! Depth and node ceilings are off by default. Decode untrusted input with
//! [`DecodeOptions::hardened`] or explicit limits.
//!
//! ```
//! use vdf_codec::{parse_bytes, DecodeOptions};
//!
//! let doc = parse_bytes(b"\"app\" { \"id\" \"440\" }", DecodeOptions::hardened())?;
//! let id = doc.first_root("app").and_then(|app| app.first("id"));
//! assert_eq!(id.and_then(|n| n.as_str()), Some("440"));
//! # Ok::<(), vdf_codec::ErrorCode>(())
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod ast;
pub mod binary;
pub mod decoder;
pub mod detect;
pub mod encoder;
pub mod error;
pub mod events;
pub mod fs;
mod limits;
pub mod map;
pub mod options;
pub mod text;

pub use ast::{Document, Format, Node, NodeId, NodeKind, NodeRef};
pub use binary::estimate_binary_size;
pub use decoder::{parse, parse_auto, parse_bytes, parse_str, Decoder};
pub use detect::detect_format;
pub use encoder::{append_binary, append_text, write, write_string, Encoder};
pub use error::{ErrorCode, VdfResult};
pub use events::{Event, EventCursor, EventKind, Events};
pub use fs::{
    parse_auto_file, parse_file, parse_text_file, write_binary_file, write_file, write_text_file,
};
pub use map::from_map;
pub use options::{DecodeOptions, EncodeOptions};
