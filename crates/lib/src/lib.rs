//!
//! Arbor: generic addressing and linkage for heterogeneous trees.
//! This library provides the structural backbone for building and editing
//! tree-shaped intermediate representations such as syntax trees, expression
//! trees and nested records.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: Everything stored in a tree. Leaves are primitives; branches are
//!   ordered sequences and insertion-ordered mappings (`map::Map`); `Value::Node` holds a node.
//! * **Paths (`path::Path`, `path::PathBuf`)**: Sequences of keys (`path::Key`), each an index into
//!   a sequence or a name into a mapping or a node's fields.
//! * **Trees (`tree::Tree`)**: An arena owning every node. Nodes are records of a statically
//!   declared kind (see `node_kinds!`) and are addressed by `tree::NodeId`.
//! * **Path arithmetic**: `Tree::increment` and `Tree::decrement` step a path to the next or
//!   previous position in pre-order over any nesting of sequences, mappings and nodes.
//! * **Linkage**: Parent links and lazily cached sibling links, kept consistent by
//!   `Tree::remove` and `Tree::replace_with`.

pub mod map;
pub mod path;
pub mod tree;
pub mod value;

/// Re-export the core types for easier access.
pub use map::Map;
pub use path::{Key, Path, PathBuf};
pub use tree::{NodeId, NodeKind, Tree};
pub use value::{Value, ValueRef};

/// Result type used throughout the Arbor library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Arbor library.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured path parsing errors from the path module
    #[error(transparent)]
    Path(path::PathError),

    /// Structured tree errors from the tree module
    #[error(transparent)]
    Tree(tree::TreeError),

    /// Value conversion errors from the value module
    #[error(transparent)]
    Type(value::TypeMismatch),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Path(_) => "path",
            Error::Tree(_) => "tree",
            Error::Type(_) => "value",
        }
    }

    /// Check if this error means a path did not resolve against its root.
    pub fn is_address_error(&self) -> bool {
        match self {
            Error::Tree(tree_err) => tree_err.is_address_error(),
            _ => false,
        }
    }

    /// Check if this error reports misuse of node linkage.
    pub fn is_linkage_error(&self) -> bool {
        match self {
            Error::Tree(tree_err) => tree_err.is_linkage_error(),
            _ => false,
        }
    }

    /// Check if this error came from parsing a textual path.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Path(_))
    }

    /// Check if this error is type-related.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Error::Type(_))
    }
}

impl From<path::PathError> for Error {
    fn from(err: path::PathError) -> Self {
        Error::Path(err)
    }
}

impl From<value::TypeMismatch> for Error {
    fn from(err: value::TypeMismatch) -> Self {
        Error::Type(err)
    }
}
