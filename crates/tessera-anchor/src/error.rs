//! Anchor error types.

use std::time::Duration;

/// Error assigning an anchor to a node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnchorError {
    /// The title contains nothing usable in an anchor id.
    #[error("title `{title}` does not produce a valid anchor id")]
    EmptyAnchor { title: String },

    /// No node with this key.
    #[error("node not found: {0}")]
    NotFound(String),

    /// The node's type does not carry a title.
    #[error("node `{0}` has no title field")]
    NoTitle(String),

    /// The safety ceiling would fire before the debounced regeneration.
    #[error(
        "safety ceiling ({safety_ceiling:?}) must be longer than the debounce ({debounce:?})"
    )]
    InvalidTiming {
        debounce: Duration,
        safety_ceiling: Duration,
    },
}

/// Save-time anchor validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnchorViolation {
    /// Anchor id does not match `^[a-z0-9]+(-[a-z0-9]+)*$`.
    #[error("node `{key}`: anchor id `{anchor}` must be lowercase letters, digits and single hyphens")]
    InvalidFormat { key: String, anchor: String },

    /// Several nodes share one anchor id.
    #[error("anchor id `{anchor}` is used by {} nodes: {}", keys.len(), keys.join(", "))]
    Duplicate { anchor: String, keys: Vec<String> },
}
