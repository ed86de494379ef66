//! Reading, writing and removing the value at a path.
//!
//! Roots are either nodes in the arena or plain values outside it. Paths may
//! cross any number of node boundaries.

use std::mem;

use super::{
    NodeData, NodeId, NodeKind, Tree, TreeError,
    container::{self, Container, Children, Expansion},
};
use crate::{
    Result,
    path::{Key, Path},
    value::{Value, ValueRef},
};

/// Mutable root for [`Tree::assign`] and [`Tree::erase`].
#[derive(Debug)]
pub enum RootMut<'a> {
    /// A node in the tree being edited
    Node(NodeId),
    /// A value outside the arena; nodes it refers to live in the tree
    Value(&'a mut Value),
}

impl From<NodeId> for RootMut<'_> {
    fn from(id: NodeId) -> Self {
        RootMut::Node(id)
    }
}

impl<'a> From<&'a mut Value> for RootMut<'a> {
    fn from(value: &'a mut Value) -> Self {
        RootMut::Value(value)
    }
}

/// A mutable container reached by a path.
enum Place<'v, K> {
    Node(&'v mut NodeData<K>),
    Value(&'v mut Value),
}

impl<K: NodeKind> Tree<K> {
    /// Returns the value at `path` below `root`.
    ///
    /// A single [`Key`] is accepted as a one-element path.
    ///
    /// # Errors
    ///
    /// Returns an address error if any key does not exist in the container it
    /// is applied to, or if a key is applied to a leaf.
    pub fn resolve<'a>(
        &'a self,
        root: impl Into<ValueRef<'a>>,
        path: impl AsRef<Path>,
    ) -> Result<ValueRef<'a>> {
        let path = path.as_ref();
        let mut current = root.into();
        for depth in 0..path.len() {
            current = self.child_of(current, path.prefix(depth), &path.keys()[depth])?;
        }
        Ok(current)
    }

    /// Writes `value` at `path`, returning the value it replaced.
    ///
    /// Node fields and sequence slots must already exist. Assigning to a
    /// missing mapping name appends it and returns `None`.
    pub fn assign<'r>(
        &mut self,
        root: impl Into<RootMut<'r>>,
        path: impl AsRef<Path>,
        value: Value,
    ) -> Result<Option<Value>> {
        let path = path.as_ref();
        let (last, parent) = path.split_last().ok_or(TreeError::EmptyPath)?;
        match self.place_mut(root.into(), parent)? {
            Place::Node(node) => {
                let slot = field_slot(node, parent, last)?;
                Ok(Some(mem::replace(slot, value)))
            }
            Place::Value(Value::List(items)) => {
                let len = items.len();
                let slot = last
                    .as_index()
                    .and_then(|index| items.get_mut(index))
                    .ok_or_else(|| missing(parent, last, len))?;
                Ok(Some(mem::replace(slot, value)))
            }
            Place::Value(Value::Map(map)) => match last {
                Key::Name(name) => Ok(map.insert(name.to_string(), value)),
                Key::Index(_) => Err(missing(parent, last, map.len()).into()),
            },
            Place::Value(other) => Err(TreeError::NotAContainer {
                path: parent.to_path_buf(),
                found: other.type_name(),
            }
            .into()),
        }
    }

    /// Removes the entry at `path` and returns it.
    ///
    /// Sequence entries shift later entries down by one; mapping entries keep
    /// the order of the remaining names. Node fields are fixed and cannot be
    /// erased.
    pub fn erase<'r>(&mut self, root: impl Into<RootMut<'r>>, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let (last, parent) = path.split_last().ok_or(TreeError::EmptyPath)?;
        match self.place_mut(root.into(), parent)? {
            Place::Node(node) => Err(TreeError::FixedField {
                kind: node.kind.name(),
                field: last.to_string(),
            }
            .into()),
            Place::Value(Value::List(items)) => match last.as_index() {
                Some(index) if index < items.len() => Ok(items.remove(index)),
                _ => Err(missing(parent, last, items.len()).into()),
            },
            Place::Value(Value::Map(map)) => {
                let len = map.len();
                last.as_name()
                    .and_then(|name| map.remove(name))
                    .ok_or_else(|| missing(parent, last, len).into())
            }
            Place::Value(other) => Err(TreeError::NotAContainer {
                path: parent.to_path_buf(),
                found: other.type_name(),
            }
            .into()),
        }
    }

    /// Steps from `parent`, reached at `at`, to its child under `key`.
    pub(super) fn child_of<'a>(
        &'a self,
        parent: ValueRef<'a>,
        at: &Path,
        key: &Key,
    ) -> Result<ValueRef<'a>> {
        let Some(children) = container::expand(self, parent, Expansion::Unrestricted) else {
            return Err(match parent {
                ValueRef::Node(id) => TreeError::UnknownNode { id },
                ValueRef::Value(value) => TreeError::NotAContainer {
                    path: at.to_path_buf(),
                    found: value.type_name(),
                },
            }
            .into());
        };
        children
            .child(key)
            .map(ValueRef::from)
            .ok_or_else(|| lookup_error(&children, at, key).into())
    }

    /// Values along `path`: the root first, then the value at each prefix.
    pub(super) fn lineage<'a>(&'a self, root: ValueRef<'a>, path: &Path) -> Result<Vec<ValueRef<'a>>> {
        let mut values = Vec::with_capacity(path.len() + 1);
        let mut current = root;
        values.push(current);
        for depth in 0..path.len() {
            current = self.child_of(current, path.prefix(depth), &path.keys()[depth])?;
            values.push(current);
        }
        Ok(values)
    }

    /// Resolves `path` to a mutable container.
    ///
    /// The path is validated with a shared walk that also records the last
    /// node it crosses. The mutable descent then starts from that node's field,
    /// so it only ever steps through sequences and mappings.
    fn place_mut<'v>(&'v mut self, root: RootMut<'v>, path: &Path) -> Result<Place<'v, K>> {
        let anchor = {
            let start = match &root {
                RootMut::Node(id) => ValueRef::Node(*id),
                RootMut::Value(value) => ValueRef::from(&**value),
            };
            let lineage = self.lineage(start, path)?;
            lineage
                .iter()
                .enumerate()
                .rev()
                .find_map(|(depth, value)| value.as_node().map(|id| (id, depth)))
        };

        let (id, consumed) = match (anchor, root) {
            (Some(anchor), _) => anchor,
            (None, RootMut::Node(id)) => (id, 0),
            (None, RootMut::Value(value)) => {
                return descend_mut(value, path, 0).map(Place::Value);
            }
        };

        let node = self.node_mut(id)?;
        let Some((field, rest)) = path.keys()[consumed..].split_first() else {
            return Ok(Place::Node(node));
        };
        let at = path.prefix(consumed);
        let slot = field_slot(node, at, field)?;
        if rest.is_empty() {
            return Ok(Place::Value(slot));
        }
        descend_mut(slot, path, consumed + 1).map(Place::Value)
    }
}

fn field_slot<'v, K: NodeKind>(
    node: &'v mut NodeData<K>,
    at: &Path,
    key: &Key,
) -> Result<&'v mut Value> {
    match node.field_position(key) {
        Some(position) if position < node.fields.len() => Ok(&mut node.fields[position]),
        _ => Err(TreeError::KeyNotFound {
            path: at.to_path_buf(),
            key: key.clone(),
        }
        .into()),
    }
}

/// Follows `path.keys()[from..]` through sequences and mappings only.
fn descend_mut<'v>(value: &'v mut Value, path: &Path, from: usize) -> Result<&'v mut Value> {
    let mut current = value;
    for depth in from..path.len() {
        let key = &path.keys()[depth];
        let next = match (current, key) {
            (Value::List(items), Key::Index(index)) => items.get_mut(*index),
            (Value::Map(map), Key::Name(name)) => map.get_mut(name),
            _ => None,
        };
        current = next.ok_or_else(|| TreeError::KeyNotFound {
            path: path.prefix(depth).to_path_buf(),
            key: key.clone(),
        })?;
    }
    Ok(current)
}

fn lookup_error(children: &Children<'_>, at: &Path, key: &Key) -> TreeError {
    match (children, key) {
        (Children::Sequence(_), Key::Index(index)) => TreeError::IndexOutOfBounds {
            path: at.to_path_buf(),
            index: *index,
            len: children.len(),
        },
        _ => TreeError::KeyNotFound {
            path: at.to_path_buf(),
            key: key.clone(),
        },
    }
}

fn missing(at: &Path, key: &Key, len: usize) -> TreeError {
    match key {
        Key::Index(index) => TreeError::IndexOutOfBounds {
            path: at.to_path_buf(),
            index: *index,
            len,
        },
        Key::Name(_) => TreeError::KeyNotFound {
            path: at.to_path_buf(),
            key: key.clone(),
        },
    }
}
