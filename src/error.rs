//! Error codes for VDF decoding, encoding and tree manipulation.
//!
//! Every failure the codec can report is one variant of [`ErrorCode`]. Each
//! variant has a stable numeric code and name so callers (and the CLI) can
//! tell causes apart without matching on message text.
//!
//! # Code ranges
//!
//! - `1xx`: format selection, binary wire errors, tree state, resource limits
//! - `2xx`: text lexer
//! - `3xx`: text parser
//! - `4xx`: map conversion
//! - `9xx`: I/O from caller-supplied streams

use std::sync::Arc;

use thiserror::Error;

/// All error codes produced by the codec.
///
/// Position-bearing lexer and parser variants carry the 1-based line and the
/// 0-based column of the offending token.
#[derive(Debug, Clone, Error)]
#[allow(non_camel_case_types)]
pub enum ErrorCode {
    /// Unsupported format selector (code 100)
    #[error("invalid VDF format: {0}")]
    E100_InvalidFormat(String),

    /// Unknown binary entry type byte (code 101)
    #[error("unrecognized VDF type: 0x{0:02x}")]
    E101_UnrecognizedType(u8),

    /// Binary input ended where more bytes were expected (code 102)
    #[error("buffer overflow")]
    E102_BufferOverflow,

    /// Key or string value contains an embedded NUL byte (code 103)
    #[error("null byte found in string {0:?}")]
    E103_NullInString(String),

    /// Duplicate sibling key rejected in strict mode (code 104)
    #[error("duplicate key {key:?} in {scope}")]
    E104_DuplicateKey {
        /// The repeated key
        key: String,
        /// Where the duplicate was found ("root" or `object "name"`)
        scope: String,
    },

    /// Node fields do not match the node kind, or the tree is not a tree (code 105)
    #[error("invalid node state: {0}")]
    E105_InvalidNodeState(String),

    /// Nesting deeper than the configured maximum (code 106)
    #[error("maximum depth exceeded: depth {0} > {1}")]
    E106_DepthLimitExceeded(u64, u64),

    /// More nodes than the configured maximum (code 107)
    #[error("maximum node count exceeded: nodes {0} > {1}")]
    E107_NodeLimitExceeded(u64, u64),

    /// Quoted string not closed before end of input (code 201)
    #[error("unexpected EOF in quoted string at line {line}, col {col}")]
    E201_UnexpectedEofInQuotedString {
        /// Line of the opening quote
        line: u64,
        /// Column of the opening quote
        col: u64,
    },

    /// Backslash at end of input (code 202)
    #[error("unexpected EOF in escape sequence at line {line}, col {col}")]
    E202_UnexpectedEofInEscapeSequence {
        /// Line of the backslash
        line: u64,
        /// Column of the backslash
        col: u64,
    },

    /// Character that cannot start a token (code 203)
    #[error("unexpected character at line {line}, col {col}")]
    E203_UnexpectedCharacter {
        /// Line of the character
        line: u64,
        /// Column of the character
        col: u64,
    },

    /// Entry does not start with a string key (code 301)
    #[error("expected string key at line {line}, col {col}")]
    E301_ExpectedStringKey {
        /// Line of the offending token
        line: u64,
        /// Column of the offending token
        col: u64,
    },

    /// Key followed by neither a value nor `{` (code 302)
    #[error("expected value or '{{' at line {line}, col {col}")]
    E302_ExpectedValueOrObject {
        /// Line of the offending token
        line: u64,
        /// Column of the offending token
        col: u64,
    },

    /// Object body does not open with `{` (code 303)
    #[error("expected '{{' at line {line}, col {col}")]
    E303_ExpectedObjectStart {
        /// Line of the offending token
        line: u64,
        /// Column of the offending token
        col: u64,
    },

    /// Input ended inside an object (code 304)
    #[error("unexpected EOF, expected '}}' for object {key:?} at line {line}, col {col}")]
    E304_UnexpectedEofInObject {
        /// Key of the unclosed object
        key: String,
        /// Line where input ended
        line: u64,
        /// Column where input ended
        col: u64,
    },

    /// Map value that has no VDF representation (code 401)
    #[error("unsupported map value type for key {key:?}: {found}")]
    E401_UnsupportedMapValueType {
        /// Offending key
        key: String,
        /// Name of the value's type
        found: &'static str,
    },

    /// Number outside `0..=u32::MAX` or not integral (code 402)
    #[error("integer out of uint32 range for key {key:?}: {value}")]
    E402_IntegerOutOfRange {
        /// Offending key
        key: String,
        /// The rejected value as written
        value: String,
    },

    /// Failure reported by a caller-supplied reader or writer (code 900)
    #[error("I/O error: {0}")]
    E900_Io(#[source] Arc<std::io::Error>),
}

impl ErrorCode {
    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::E100_InvalidFormat(_) => 100,
            ErrorCode::E101_UnrecognizedType(_) => 101,
            ErrorCode::E102_BufferOverflow => 102,
            ErrorCode::E103_NullInString(_) => 103,
            ErrorCode::E104_DuplicateKey { .. } => 104,
            ErrorCode::E105_InvalidNodeState(_) => 105,
            ErrorCode::E106_DepthLimitExceeded(_, _) => 106,
            ErrorCode::E107_NodeLimitExceeded(_, _) => 107,
            ErrorCode::E201_UnexpectedEofInQuotedString { .. } => 201,
            ErrorCode::E202_UnexpectedEofInEscapeSequence { .. } => 202,
            ErrorCode::E203_UnexpectedCharacter { .. } => 203,
            ErrorCode::E301_ExpectedStringKey { .. } => 301,
            ErrorCode::E302_ExpectedValueOrObject { .. } => 302,
            ErrorCode::E303_ExpectedObjectStart { .. } => 303,
            ErrorCode::E304_UnexpectedEofInObject { .. } => 304,
            ErrorCode::E401_UnsupportedMapValueType { .. } => 401,
            ErrorCode::E402_IntegerOutOfRange { .. } => 402,
            ErrorCode::E900_Io(_) => 900,
        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::E100_InvalidFormat(_) => "E100_InvalidFormat",
            ErrorCode::E101_UnrecognizedType(_) => "E101_UnrecognizedType",
            ErrorCode::E102_BufferOverflow => "E102_BufferOverflow",
            ErrorCode::E103_NullInString(_) => "E103_NullInString",
            ErrorCode::E104_DuplicateKey { .. } => "E104_DuplicateKey",
            ErrorCode::E105_InvalidNodeState(_) => "E105_InvalidNodeState",
            ErrorCode::E106_DepthLimitExceeded(_, _) => "E106_DepthLimitExceeded",
            ErrorCode::E107_NodeLimitExceeded(_, _) => "E107_NodeLimitExceeded",
            ErrorCode::E201_UnexpectedEofInQuotedString { .. } => {
                "E201_UnexpectedEofInQuotedString"
            }
            ErrorCode::E202_UnexpectedEofInEscapeSequence { .. } => {
                "E202_UnexpectedEofInEscapeSequence"
            }
            ErrorCode::E203_UnexpectedCharacter { .. } => "E203_UnexpectedCharacter",
            ErrorCode::E301_ExpectedStringKey { .. } => "E301_ExpectedStringKey",
            ErrorCode::E302_ExpectedValueOrObject { .. } => "E302_ExpectedValueOrObject",
            ErrorCode::E303_ExpectedObjectStart { .. } => "E303_ExpectedObjectStart",
            ErrorCode::E304_UnexpectedEofInObject { .. } => "E304_UnexpectedEofInObject",
            ErrorCode::E401_UnsupportedMapValueType { .. } => "E401_UnsupportedMapValueType",
            ErrorCode::E402_IntegerOutOfRange { .. } => "E402_IntegerOutOfRange",
            ErrorCode::E900_Io(_) => "E900_Io",
        }
    }

    /// Returns true if the error means the input ended early rather than
    /// being malformed.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            ErrorCode::E102_BufferOverflow
                | ErrorCode::E201_UnexpectedEofInQuotedString { .. }
                | ErrorCode::E202_UnexpectedEofInEscapeSequence { .. }
                | ErrorCode::E304_UnexpectedEofInObject { .. }
        )
    }

    /// Returns the `(line, col)` position for lexer and parser errors.
    pub fn position(&self) -> Option<(u64, u64)> {
        match self {
            ErrorCode::E201_UnexpectedEofInQuotedString { line, col }
            | ErrorCode::E202_UnexpectedEofInEscapeSequence { line, col }
            | ErrorCode::E203_UnexpectedCharacter { line, col }
            | ErrorCode::E301_ExpectedStringKey { line, col }
            | ErrorCode::E302_ExpectedValueOrObject { line, col }
            | ErrorCode::E303_ExpectedObjectStart { line, col }
            | ErrorCode::E304_UnexpectedEofInObject { line, col, .. } => Some((*line, *col)),
            _ => None,
        }
    }

    pub(crate) fn invalid_node(reason: impl Into<String>) -> Self {
        ErrorCode::E105_InvalidNodeState(reason.into())
    }
}

impl From<std::io::Error> for ErrorCode {
    fn from(err: std::io::Error) -> Self {
        ErrorCode::E900_Io(Arc::new(err))
    }
}

/// Result type for codec operations.
pub type VdfResult<T> = Result<T, ErrorCode>;
