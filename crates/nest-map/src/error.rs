//! Error types for the nested map crate.

use crate::node::NodeKind;
use crate::path::KeyPath;

/// Errors produced by tree queries and path operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// A container has no child under the given key.
    #[error("key not found: {0}")]
    NotFound(String),

    /// Nothing exists at the requested path.
    #[error("path not found: {0}")]
    PathNotFound(KeyPath),

    /// The path tries to descend below a leaf.
    #[error("path {path} descends through the leaf at {leaf}")]
    PathThroughLeaf { path: KeyPath, leaf: KeyPath },

    /// A create collided with existing content.
    #[error("path already exists: {0}")]
    AlreadyExists(KeyPath),

    /// A leaf was used where a container is required, or the reverse.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: NodeKind, found: NodeKind },

    /// Creating an empty container would leave an empty node in the tree.
    #[error("refusing to create an empty container at {0}")]
    EmptyValue(KeyPath),
}

/// Convenience alias for map results.
pub type MapResult<T> = Result<T, MapError>;
