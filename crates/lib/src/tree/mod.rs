//! Arena-backed heterogeneous trees.
//!
//! A [`Tree`] owns every node in a flat arena and hands out [`NodeId`]s as
//! stable handles. A node is a record of a statically declared [`NodeKind`]
//! whose fields hold [`Value`]s; a field may hold primitives, nested sequences
//! and mappings, or further nodes via [`Value::Node`].
//!
//! On top of the arena this module provides:
//!
//! - [`container`] - uniform `(key, child)` access to sequences, mappings and
//!   node fields, with unrestricted or node-boundary expansion
//! - position resolution ([`Tree::resolve`], [`Tree::assign`], [`Tree::erase`])
//! - path arithmetic ([`Tree::increment`], [`Tree::decrement`]), a
//!   generalized pre-order iterator over arbitrary nesting
//! - node linkage (parent links, cached sibling links, removal and
//!   replacement that keep both consistent)
//! - [`traversal`] iterators
//!
//! # Example
//!
//! ```
//! use arbor::{node_kinds, path, Tree, Value};
//!
//! node_kinds! {
//!     pub enum Calc {
//!         Add { left, right },
//!         Lit { value },
//!     }
//! }
//!
//! let mut tree = Tree::new();
//! let one = tree.add_node(Calc::Lit, vec![Value::Int(1)])?;
//! let two = tree.add_node(Calc::Lit, vec![Value::Int(2)])?;
//! let add = tree.add_node(Calc::Add, vec![one.into(), two.into()])?;
//! tree.stamp_parent_links(add)?;
//!
//! assert_eq!(tree.next_sibling(one)?, Some(two));
//! assert_eq!(tree.full_path(two)?, path!["right"]);
//! # Ok::<(), arbor::Error>(())
//! ```

use std::{cell::Cell, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    map::Map,
    path::{Key, Path, PathBuf},
    value::{Value, ValueRef},
};

mod arithmetic;
pub mod container;
mod errors;
mod linkage;
mod position;
pub mod traversal;

pub use arithmetic::is_first;
pub use container::{Container, Expansion};
pub use errors::TreeError;
pub use position::RootMut;

/// Stable handle to a node inside a [`Tree`].
///
/// Ids are never reused: removed and replaced nodes stay in the arena,
/// detached from their former parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }

    /// Returns the arena slot of this node
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The alphabet of node kinds a tree is built from.
///
/// Each kind has a name and a fixed, ordered list of field names. Field values
/// are stored positionally in the same order. Implement this with the
/// [`node_kinds!`](crate::node_kinds) macro rather than by hand.
pub trait NodeKind: Copy + Eq + fmt::Debug {
    /// Name of the kind, e.g. `"Add"`
    fn name(&self) -> &'static str;

    /// Field names in declaration order
    fn field_names(&self) -> &'static [&'static str];
}

/// Kind for trees that only hold plain values and never allocate nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoKind {}

impl NodeKind for NoKind {
    fn name(&self) -> &'static str {
        match *self {}
    }

    fn field_names(&self) -> &'static [&'static str] {
        match *self {}
    }
}

/// Declares a node-kind enum and its [`NodeKind`] implementation.
///
/// Each variant lists its field names in braces; variants without fields may
/// omit the braces.
///
/// ```
/// use arbor::{node_kinds, tree::NodeKind};
///
/// node_kinds! {
///     /// Statements of a tiny language
///     pub enum Stmt {
///         Assign { target, value },
///         Block { body },
///         Pass,
///     }
/// }
///
/// assert_eq!(Stmt::Assign.name(), "Assign");
/// assert_eq!(Stmt::Assign.field_names(), &["target", "value"]);
/// assert!(Stmt::Pass.field_names().is_empty());
/// ```
#[macro_export]
macro_rules! node_kinds {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident $({ $($field:ident),* $(,)? })?),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),*
        }

        impl $crate::tree::NodeKind for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn field_names(&self) -> &'static [&'static str] {
                match self {
                    $(Self::$variant => &[$($(stringify!($field)),*)?]),*
                }
            }
        }
    };
}

/// Cached state of one sibling slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Link {
    /// Not computed yet
    #[default]
    Unknown,
    /// Computed, and there is no sibling on this side
    Absent,
    /// Computed sibling
    To(NodeId),
}

impl Link {
    /// Returns the cached answer, or `None` if the slot was never computed
    pub fn known(self) -> Option<Option<NodeId>> {
        match self {
            Link::Unknown => None,
            Link::Absent => Some(None),
            Link::To(id) => Some(Some(id)),
        }
    }
}

impl From<Option<NodeId>> for Link {
    fn from(sibling: Option<NodeId>) -> Self {
        sibling.map_or(Link::Absent, Link::To)
    }
}

/// One node in the arena: its kind, its field values and its linkage.
#[derive(Debug)]
pub struct NodeData<K> {
    kind: K,
    fields: Vec<Value>,
    parent: Option<NodeId>,
    parent_path: Option<PathBuf>,
    prev: Cell<Link>,
    next: Cell<Link>,
}

impl<K: NodeKind> NodeData<K> {
    fn new(kind: K, fields: Vec<Value>) -> Self {
        Self {
            kind,
            fields,
            parent: None,
            parent_path: None,
            prev: Cell::new(Link::Unknown),
            next: Cell::new(Link::Unknown),
        }
    }

    /// Kind of this node
    pub fn kind(&self) -> K {
        self.kind
    }

    /// Field values in declaration order
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Iterates over `(field name, value)` pairs in declaration order
    pub fn named_fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.kind
            .field_names()
            .iter()
            .copied()
            .zip(self.fields.iter())
    }

    /// Owning node, `None` for a root or a detached node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Location of this node inside its parent's fields
    pub fn parent_path(&self) -> Option<&Path> {
        self.parent_path.as_deref()
    }

    /// Cached previous-sibling slot
    pub fn prev_link(&self) -> Link {
        self.prev.get()
    }

    /// Cached next-sibling slot
    pub fn next_link(&self) -> Link {
        self.next.get()
    }

    fn field_position(&self, key: &Key) -> Option<usize> {
        let name = key.as_name()?;
        self.kind.field_names().iter().position(|field| *field == name)
    }

    fn detach(&mut self) {
        self.parent = None;
        self.parent_path = None;
        self.reset_links();
    }

    fn reset_links(&self) {
        self.prev.set(Link::Unknown);
        self.next.set(Link::Unknown);
    }
}

/// An arena of nodes of kind `K`.
///
/// The tree does not designate a root: any node can be the root of a
/// linkage pass, and plain [`Value`]s outside the arena can serve as roots for
/// resolution and path arithmetic.
///
/// Sibling caches use interior mutability, so sibling queries take `&self`.
/// A tree is not `Sync`; confine it to one thread or guard it with a lock.
#[derive(Debug)]
pub struct Tree<K: NodeKind = NoKind> {
    nodes: Vec<NodeData<K>>,
}

impl<K: NodeKind> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKind> Tree<K> {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes ever allocated in this tree, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node was ever allocated
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if `id` belongs to this tree
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Allocates a new, unlinked node.
    ///
    /// `fields` must hold one value per declared field of `kind`, in
    /// declaration order.
    pub fn add_node(&mut self, kind: K, fields: Vec<Value>) -> Result<NodeId> {
        let expected = kind.field_names().len();
        if fields.len() != expected {
            return Err(TreeError::ArityMismatch {
                kind: kind.name(),
                expected,
                actual: fields.len(),
            }
            .into());
        }
        let index = self.nodes.len();
        if index >= u32::MAX as usize {
            return Err(TreeError::ArenaFull {
                max: u32::MAX as usize,
            }
            .into());
        }
        self.nodes.push(NodeData::new(kind, fields));
        Ok(NodeId::from_index(index))
    }

    /// Gets a node by id
    pub fn get(&self, id: NodeId) -> Result<&NodeData<K>> {
        self.node(id).map_err(Into::into)
    }

    /// Kind of a node
    pub fn kind(&self, id: NodeId) -> Result<K> {
        Ok(self.node(id)?.kind)
    }

    /// Field values of a node in declaration order
    pub fn fields(&self, id: NodeId) -> Result<&[Value]> {
        Ok(&self.node(id)?.fields)
    }

    /// Value of one named field
    pub fn field(&self, id: NodeId, name: &str) -> Result<&Value> {
        let node = self.node(id)?;
        let key = Key::from(name);
        node.field_position(&key)
            .and_then(|position| node.fields.get(position))
            .ok_or_else(|| {
                TreeError::KeyNotFound {
                    path: PathBuf::new(),
                    key,
                }
                .into()
            })
    }

    /// Mutable access to one named field.
    ///
    /// Edits made here bypass linkage; moving nodes in or out of the field
    /// requires a fresh [`stamp_parent_links`](Tree::stamp_parent_links).
    pub fn field_mut(&mut self, id: NodeId, name: &str) -> Result<&mut Value> {
        let node = self.node_mut(id)?;
        let key = Key::from(name);
        match node.field_position(&key) {
            Some(position) => Ok(&mut node.fields[position]),
            None => Err(TreeError::KeyNotFound {
                path: PathBuf::new(),
                key,
            }
            .into()),
        }
    }

    /// Owning node of `id`
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Location of `id` inside its parent's fields
    pub fn parent_path(&self, id: NodeId) -> Result<Option<&Path>> {
        Ok(self.node(id)?.parent_path())
    }

    /// Walks parent links up to the topmost ancestor of `id`
    pub fn root_of(&self, id: NodeId) -> Result<NodeId> {
        let mut current = id;
        while let Some(parent) = self.node(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Every node strictly below `id`, in pre-order.
    ///
    /// Unlike [`child_nodes`](Tree::child_nodes) this crosses node
    /// boundaries, so grandchildren are included.
    pub fn descendants(&self, id: NodeId) -> Result<impl Iterator<Item = NodeId> + '_> {
        self.node(id)?;
        Ok(self
            .preorder(id, Expansion::Unrestricted)
            .skip(1)
            .filter_map(|value| value.as_node()))
    }

    /// Deep-copies the subtree rooted at `id` into fresh arena slots.
    ///
    /// The copy is unlinked: call
    /// [`stamp_parent_links`](Tree::stamp_parent_links) on it, or attach it
    /// with [`replace_with`](Tree::replace_with), before asking for siblings.
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId> {
        let (kind, fields) = {
            let node = self.node(id)?;
            (node.kind, node.fields.clone())
        };
        let fields = fields
            .into_iter()
            .map(|value| self.clone_value(value))
            .collect::<Result<Vec<_>>>()?;
        self.add_node(kind, fields)
    }

    fn clone_value(&mut self, value: Value) -> Result<Value> {
        Ok(match value {
            Value::Node(id) => Value::Node(self.clone_subtree(id)?),
            Value::List(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| self.clone_value(item))
                    .collect::<Result<_>>()?,
            ),
            Value::Map(map) => {
                let mut cloned = Map::new();
                for (name, item) in map {
                    cloned.insert(name, self.clone_value(item)?);
                }
                Value::Map(cloned)
            }
            leaf => leaf,
        })
    }

    /// Structural equality: nodes compare by kind and field values, not by id.
    pub fn deep_eq<'a>(&'a self, a: impl Into<ValueRef<'a>>, b: impl Into<ValueRef<'a>>) -> bool {
        self.refs_deep_eq(a.into(), b.into())
    }

    fn refs_deep_eq(&self, a: ValueRef<'_>, b: ValueRef<'_>) -> bool {
        match (a, b) {
            (ValueRef::Node(x), ValueRef::Node(y)) => {
                if x == y {
                    return true;
                }
                match (self.node(x), self.node(y)) {
                    (Ok(x), Ok(y)) => {
                        x.kind == y.kind
                            && x.fields.len() == y.fields.len()
                            && x.fields
                                .iter()
                                .zip(&y.fields)
                                .all(|(a, b)| self.refs_deep_eq(a.into(), b.into()))
                    }
                    _ => false,
                }
            }
            (ValueRef::Value(Value::List(xs)), ValueRef::Value(Value::List(ys))) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys)
                        .all(|(a, b)| self.refs_deep_eq(a.into(), b.into()))
            }
            (ValueRef::Value(Value::Map(xs)), ValueRef::Value(Value::Map(ys))) => {
                xs.len() == ys.len()
                    && xs.iter().zip(ys.iter()).all(|((ka, a), (kb, b))| {
                        ka == kb && self.refs_deep_eq(a.into(), b.into())
                    })
            }
            (ValueRef::Value(x), ValueRef::Value(y)) => x == y,
            _ => false,
        }
    }

    fn node(&self, id: NodeId) -> std::result::Result<&NodeData<K>, TreeError> {
        self.nodes
            .get(id.index())
            .ok_or(TreeError::UnknownNode { id })
    }

    fn node_mut(&mut self, id: NodeId) -> std::result::Result<&mut NodeData<K>, TreeError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(TreeError::UnknownNode { id })
    }
}
