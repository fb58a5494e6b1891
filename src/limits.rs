//! Resource-limit and strict-mode bookkeeping shared by both decoders.
//!
//! Depth counts roots as 1. The node counter increments once per node,
//! objects included, and is checked on every increment so wide and deep
//! inputs are bounded alike.

use std::collections::HashSet;

use crate::error::{ErrorCode, VdfResult};
use crate::options::DecodeOptions;

/// Depth and node-count ceilings for one decode.
#[derive(Debug)]
pub(crate) struct LimitTracker {
    max_depth: usize,
    max_nodes: usize,
    nodes: usize,
}

impl LimitTracker {
    pub(crate) fn new(opts: &DecodeOptions) -> Self {
        Self {
            max_depth: opts.max_depth,
            max_nodes: opts.max_nodes,
            nodes: 0,
        }
    }

    /// Fail if `depth` exceeds a non-zero ceiling.
    pub(crate) fn check_depth(&self, depth: usize) -> VdfResult<()> {
        if self.max_depth > 0 && depth > self.max_depth {
            return Err(ErrorCode::E106_DepthLimitExceeded(
                depth as u64,
                self.max_depth as u64,
            ));
        }
        Ok(())
    }

    /// Count one node, failing past a non-zero ceiling.
    pub(crate) fn count_node(&mut self) -> VdfResult<()> {
        self.nodes += 1;
        if self.max_nodes > 0 && self.nodes > self.max_nodes {
            return Err(ErrorCode::E107_NodeLimitExceeded(
                self.nodes as u64,
                self.max_nodes as u64,
            ));
        }
        Ok(())
    }

    pub(crate) fn nodes(&self) -> usize {
        self.nodes
    }
}

/// Keys already accepted in one scope. Inert unless strict.
#[derive(Debug)]
pub(crate) struct KeyScope {
    keys: Option<HashSet<String>>,
}

impl KeyScope {
    pub(crate) fn new(strict: bool) -> Self {
        Self {
            keys: strict.then(HashSet::new),
        }
    }

    /// Record `key`. `scope` names the container for the error message and
    /// is only evaluated on a duplicate.
    pub(crate) fn accept(&mut self, key: &str, scope: impl FnOnce() -> String) -> VdfResult<()> {
        if let Some(keys) = self.keys.as_mut() {
            if !keys.insert(key.to_string()) {
                return Err(ErrorCode::E104_DuplicateKey {
                    key: key.to_string(),
                    scope: scope(),
                });
            }
        }
        Ok(())
    }
}

/// Scope label for children of the object `key`.
pub(crate) fn object_scope(key: &str) -> String {
    format!("object {key:?}")
}

/// Scope label for the root list.
pub(crate) fn root_scope() -> String {
    "root".to_string()
}
