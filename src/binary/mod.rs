//! Binary VDF.
//!
//! Each entry is a type byte, a NUL-terminated key and a payload:
//!
//! | Byte | Entry | Payload |
//! |------|-------|---------|
//! | `0x00` | object start | child entries, then `0x08` |
//! | `0x01` | string | NUL-terminated bytes |
//! | `0x02` | uint32 | 4 bytes little-endian |
//! | `0x08` | object end | none, and no key |
//!
//! A document is its root entries followed by one trailing `0x08`.

pub mod decode;
pub mod encode;
pub(crate) mod pool;

pub use decode::parse_binary_document;
pub use encode::estimate_binary_size;

/// Object start marker.
pub const TYPE_OBJECT: u8 = 0x00;
/// String entry marker.
pub const TYPE_STRING: u8 = 0x01;
/// Uint32 entry marker.
pub const TYPE_UINT32: u8 = 0x02;
/// Object end (and document end) marker.
pub const TYPE_OBJECT_END: u8 = 0x08;
