//! Document-wide anchor assignment.
//!
//! The set of anchors in use is never stored: it is recomputed from the
//! committed document on every assignment, so a node can only collide with
//! anchors that actually exist at that moment.

use std::collections::HashSet;

use tessera_content::Document;

use crate::{AnchorError, generate};

/// Outcome of regenerating one node's anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnchorChange {
    /// The stored anchor already matches the title.
    Unchanged,
    /// A new anchor id was stored.
    Assigned(String),
    /// The title is empty, so the stored anchor was removed.
    Cleared,
}

/// Every anchor id in `document`, except the one held by `exclude_key`.
///
/// Keys are unique document-wide, so at most one node is excluded. An
/// empty `exclude_key` excludes nothing.
#[must_use]
pub fn existing_anchors(document: &Document, exclude_key: &str) -> HashSet<String> {
    document
        .iter()
        .filter(|node| exclude_key.is_empty() || node.key() != exclude_key)
        .filter_map(|node| node.anchor_id())
        .filter(|anchor| !anchor.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Recompute the anchor of the node `key` from its current title.
///
/// An empty title clears the anchor. When the title normalizes to nothing
/// the previous anchor is kept and the error is returned. Nodes without a
/// key cannot be addressed and report [`AnchorError::NotFound`].
pub fn regenerate(document: &mut Document, key: &str) -> Result<AnchorChange, AnchorError> {
    let node = document
        .find(key)
        .filter(|_| !key.is_empty())
        .ok_or_else(|| AnchorError::NotFound(key.to_owned()))?;
    if !node.has_title_field() {
        return Err(AnchorError::NoTitle(key.to_owned()));
    }
    let title = node.title().map(str::to_owned);
    let current = node.anchor_id().map(str::to_owned);

    let change = match title {
        None if current.is_none() => AnchorChange::Unchanged,
        None => AnchorChange::Cleared,
        Some(title) => {
            let anchor = generate(&title, &existing_anchors(document, key))?;
            if current.as_deref() == Some(anchor.as_str()) {
                AnchorChange::Unchanged
            } else {
                AnchorChange::Assigned(anchor)
            }
        }
    };

    let new_anchor = match &change {
        AnchorChange::Unchanged => return Ok(change),
        AnchorChange::Assigned(anchor) => Some(anchor.clone()),
        AnchorChange::Cleared => None,
    };
    if let Some(node) = document.find_mut(key) {
        node.set_anchor_id(new_anchor);
    }
    tracing::debug!(key, change = ?change, "Regenerated anchor");
    Ok(change)
}

/// Assign anchors to every titled node that lacks one, in document order.
///
/// Returns the `(key, anchor)` pairs assigned. Nodes whose title cannot
/// produce an anchor, and nodes without a key, are skipped with a warning.
pub fn assign_missing(document: &mut Document) -> Vec<(String, String)> {
    let pending: Vec<String> = document
        .iter()
        .filter(|node| node.title().is_some() && node.anchor_id().is_none_or(str::is_empty))
        .filter(|node| {
            if node.key().is_empty() {
                tracing::warn!(type_name = node.type_name(), "Titled node without _key gets no anchor");
            }
            !node.key().is_empty()
        })
        .map(|node| node.key().to_owned())
        .collect();

    let mut assigned = Vec::new();
    for key in pending {
        match regenerate(document, &key) {
            Ok(AnchorChange::Assigned(anchor)) => assigned.push((key, anchor)),
            Ok(_) => {}
            Err(e) => tracing::warn!(key = %key, error = %e, "Cannot assign anchor"),
        }
    }
    assigned
}
