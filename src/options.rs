//! Decode and encode options.
//!
//! Resource limits are cooperative: zero means unlimited, and a caller
//! decoding untrusted input is expected to set them (or start from
//! [`DecodeOptions::hardened`]).

use serde::{Deserialize, Serialize};

use crate::ast::Format;

/// Default indentation unit for pretty text output.
pub const DEFAULT_INDENT: &str = "\t";

/// Depth ceiling used by [`DecodeOptions::hardened`].
pub const HARDENED_MAX_DEPTH: usize = 64;

/// Node ceiling used by [`DecodeOptions::hardened`].
pub const HARDENED_MAX_NODES: usize = 1_000_000;

/// Options controlling decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Expected input format; `Auto` sniffs the first bytes.
    pub format: Format,
    /// Reject duplicate sibling keys (including duplicate roots).
    pub strict: bool,
    /// Maximum nesting depth, roots being depth 1 (0 = unlimited).
    pub max_depth: usize,
    /// Maximum total node count (0 = unlimited).
    pub max_nodes: usize,
}

impl DecodeOptions {
    /// Defaults with the given format.
    pub fn new(format: Format) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Strict mode with finite depth and node ceilings, for untrusted input.
    pub const fn hardened() -> Self {
        Self {
            format: Format::Auto,
            strict: true,
            max_depth: HARDENED_MAX_DEPTH,
            max_nodes: HARDENED_MAX_NODES,
        }
    }

    /// Set the input format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable strict duplicate-key rejection.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the depth ceiling.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the node ceiling.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }
}

/// Options controlling encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Output format; `Auto` uses the document's own format, else text.
    pub format: Format,
    /// One indentation level for pretty text output.
    pub indent: String,
    /// Single-line text output.
    pub compact: bool,
    /// Stable key-sorted sibling order at every level.
    pub deterministic: bool,
    /// Run full validation before writing anything.
    pub validate: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            format: Format::Auto,
            indent: DEFAULT_INDENT.to_string(),
            compact: false,
            deterministic: false,
            validate: false,
        }
    }
}

impl EncodeOptions {
    /// Defaults with the given format.
    pub fn new(format: Format) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Set the output format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the indentation unit.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Enable or disable compact text output.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Enable or disable key-sorted output.
    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Enable or disable validation before encode.
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Fill in defaults left empty by the caller.
    pub(crate) fn normalized(mut self) -> Self {
        if self.indent.is_empty() {
            self.indent = DEFAULT_INDENT.to_string();
        }
        self
    }
}
