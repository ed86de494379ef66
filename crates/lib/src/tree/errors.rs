//! Error types for tree operations.
//!
//! Address failures (a path that does not resolve against its root) are the
//! common case. The remaining variants report misuse of the linkage layer that
//! would otherwise corrupt parent links or sibling caches.

use thiserror::Error;

use super::NodeId;
use crate::path::{Key, PathBuf};

/// Structured error types for tree operations.
///
/// Boundaries are never errors: running off either end of a traversal or
/// asking for the sibling of an edge node yields `None`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A name key is not present in the addressed container
    #[error("Key '{key}' not found at {path}")]
    KeyNotFound { path: PathBuf, key: Key },

    /// An index key is past the end of the addressed sequence
    #[error("Index {index} out of bounds at {path} (length {len})")]
    IndexOutOfBounds {
        path: PathBuf,
        index: usize,
        len: usize,
    },

    /// A key was applied to a value that has no children
    #[error("Cannot descend into {found} at {path}")]
    NotAContainer { path: PathBuf, found: &'static str },

    /// An operation that targets an entry was given the empty path
    #[error("Operation requires a non-empty path")]
    EmptyPath,

    /// A node id does not belong to this tree
    #[error("Unknown node {id}")]
    UnknownNode { id: NodeId },

    /// Lateral stepping needed to expand a value that is not a container.
    ///
    /// Internal guard: path arithmetic only steps laterally through levels
    /// it has already descended through, so this is never returned.
    #[error("Unsupported shape at {path}: {found} is not a sequence, mapping or node")]
    UnsupportedShape { path: PathBuf, found: &'static str },

    /// A declared node field cannot be removed
    #[error("Cannot erase field '{field}' of {kind}: node fields are fixed")]
    FixedField { kind: &'static str, field: String },

    /// A node was built with the wrong number of field values
    #[error("{kind} expects {expected} fields, got {actual}")]
    ArityMismatch {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The node is not attached to a parent
    #[error("Node {id} has no parent")]
    Detached { id: NodeId },

    /// A replacement node is already owned by another parent
    #[error("Node {id} is already attached to a parent")]
    AlreadyAttached { id: NodeId },

    /// A node cannot replace itself
    #[error("A node cannot replace itself")]
    SelfReplacement,

    /// A replacement node is an ancestor of the node it would replace
    #[error("Node {id} is an ancestor of the node it would replace")]
    CyclicReplacement { id: NodeId },

    /// The arena cannot hold more nodes
    #[error("Tree cannot hold more than {max} nodes")]
    ArenaFull { max: usize },
}

impl TreeError {
    /// Check if this error means a path did not resolve against its root
    pub fn is_address_error(&self) -> bool {
        matches!(
            self,
            TreeError::KeyNotFound { .. }
                | TreeError::IndexOutOfBounds { .. }
                | TreeError::NotAContainer { .. }
                | TreeError::EmptyPath
                | TreeError::UnknownNode { .. }
        )
    }

    /// Check if this error reports a tree shape the algorithms cannot step through
    pub fn is_shape_error(&self) -> bool {
        matches!(self, TreeError::UnsupportedShape { .. })
    }

    /// Check if this error reports misuse of node linkage
    pub fn is_linkage_error(&self) -> bool {
        matches!(
            self,
            TreeError::FixedField { .. }
                | TreeError::Detached { .. }
                | TreeError::AlreadyAttached { .. }
                | TreeError::SelfReplacement
                | TreeError::CyclicReplacement { .. }
        )
    }

    /// Check if this error is related to node construction
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            TreeError::ArityMismatch { .. } | TreeError::ArenaFull { .. }
        )
    }

    /// Get the path if this is a path-related error
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            TreeError::KeyNotFound { path, .. }
            | TreeError::IndexOutOfBounds { path, .. }
            | TreeError::NotAContainer { path, .. }
            | TreeError::UnsupportedShape { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Get the node id if this error concerns a specific node
    pub fn node(&self) -> Option<NodeId> {
        match self {
            TreeError::UnknownNode { id }
            | TreeError::Detached { id }
            | TreeError::AlreadyAttached { id }
            | TreeError::CyclicReplacement { id } => Some(*id),
            _ => None,
        }
    }
}

// Conversion from TreeError to the main Error type
impl From<TreeError> for crate::Error {
    fn from(err: TreeError) -> Self {
        crate::Error::Tree(err)
    }
}
