//! Sibling ordering for encoders.

use std::borrow::Cow;

use super::document::Document;
use super::types::NodeId;

/// Return `ids` in source order, or stably sorted by key when
/// `deterministic` is set.
///
/// Equal keys keep their relative order, so duplicate-key sequences survive.
/// Handles that do not resolve sort last.
pub(crate) fn ordered<'a>(doc: &Document, ids: &'a [NodeId], deterministic: bool) -> Cow<'a, [NodeId]> {
    if !deterministic {
        return Cow::Borrowed(ids);
    }

    let mut out = ids.to_vec();
    out.sort_by(|&a, &b| match (doc.node(a), doc.node(b)) {
        (Some(a), Some(b)) => a.key.as_bytes().cmp(b.key.as_bytes()),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    Cow::Owned(out)
}
