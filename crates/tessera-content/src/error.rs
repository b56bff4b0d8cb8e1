//! Content model error types.

/// Error returned by document loading and authoring operations.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// I/O error reading or writing a document file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Top-level value is neither a node array nor an object with `content`.
    #[error("Document must be an array of nodes or an object with a `content` array")]
    Shape,
    /// No node with the given key.
    #[error("Node not found: {0}")]
    NotFound(String),
    /// Target node does not own a children list.
    #[error("Node {0} cannot hold children")]
    NotContainer(String),
    /// Sibling list already contains the key.
    #[error("Duplicate node key: {0}")]
    DuplicateKey(String),
    /// Node type has no title field.
    #[error("Node {0} has no title field")]
    NoTitle(String),
}
