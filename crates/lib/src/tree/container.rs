//! Uniform keyed access to sequences, mappings and node fields.
//!
//! Every algorithm in this crate sees the three container shapes through the
//! [`Container`] trait: a container has a length, and maps between iteration
//! positions, [`Key`]s and child values. Leaves are not containers.

use super::{NodeKind, Tree};
use crate::{
    map::Map,
    path::Key,
    value::{Value, ValueRef},
};

/// How far expansion descends when it meets a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Expansion {
    /// Nodes expand into their fields like any other container
    #[default]
    Unrestricted,
    /// Nodes are opaque; their children start a fresh address space
    NodeBoundary,
}

/// Keyed, ordered access to the children of one container.
///
/// Implementors provide the positional primitives; key stepping and lookup
/// are derived from them. Stepping to the next or previous key is O(1) once
/// the current key's position is known.
pub trait Container<'a> {
    /// Number of children
    fn len(&self) -> usize;

    /// Key of the child at iteration position `position`
    fn key_at(&self, position: usize) -> Option<Key>;

    /// Iteration position of `key`
    fn position_of(&self, key: &Key) -> Option<usize>;

    /// Child at iteration position `position`
    fn value_at(&self, position: usize) -> Option<&'a Value>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Child stored under `key`
    fn child(&self, key: &Key) -> Option<&'a Value> {
        self.position_of(key)
            .and_then(|position| self.value_at(position))
    }

    fn first_key(&self) -> Option<Key> {
        self.key_at(0)
    }

    fn last_key(&self) -> Option<Key> {
        self.len()
            .checked_sub(1)
            .and_then(|position| self.key_at(position))
    }

    /// Key following `key` in iteration order
    fn next_key(&self, key: &Key) -> Option<Key> {
        self.position_of(key)
            .and_then(|position| self.key_at(position + 1))
    }

    /// Key preceding `key` in iteration order
    fn prev_key(&self, key: &Key) -> Option<Key> {
        self.position_of(key)?
            .checked_sub(1)
            .and_then(|position| self.key_at(position))
    }

    /// All `(key, child)` pairs in iteration order
    fn entries(&self) -> Vec<(Key, &'a Value)> {
        (0..self.len())
            .filter_map(|position| Some((self.key_at(position)?, self.value_at(position)?)))
            .collect()
    }
}

impl<'a> Container<'a> for &'a [Value] {
    fn len(&self) -> usize {
        <[Value]>::len(self)
    }

    fn key_at(&self, position: usize) -> Option<Key> {
        (position < <[Value]>::len(self)).then_some(Key::Index(position))
    }

    fn position_of(&self, key: &Key) -> Option<usize> {
        key.as_index()
            .filter(|index| *index < <[Value]>::len(self))
    }

    fn value_at(&self, position: usize) -> Option<&'a Value> {
        let items: &'a [Value] = *self;
        items.get(position)
    }
}

impl<'a> Container<'a> for &'a Map {
    fn len(&self) -> usize {
        Map::len(self)
    }

    fn key_at(&self, position: usize) -> Option<Key> {
        self.get_index(position).map(|(name, _)| Key::from(name))
    }

    fn position_of(&self, key: &Key) -> Option<usize> {
        key.as_name().and_then(|name| self.position(name))
    }

    fn value_at(&self, position: usize) -> Option<&'a Value> {
        let map: &'a Map = *self;
        map.get_index(position).map(|(_, value)| value)
    }
}

/// The field space of a node: declared names paired with stored values.
#[derive(Debug, Clone, Copy)]
pub struct FieldsView<'a> {
    names: &'static [&'static str],
    values: &'a [Value],
}

impl<'a> FieldsView<'a> {
    pub fn new(names: &'static [&'static str], values: &'a [Value]) -> Self {
        Self { names, values }
    }
}

impl<'a> Container<'a> for FieldsView<'a> {
    fn len(&self) -> usize {
        self.names.len().min(self.values.len())
    }

    fn key_at(&self, position: usize) -> Option<Key> {
        if position >= self.len() {
            return None;
        }
        self.names.get(position).copied().map(Key::field)
    }

    fn position_of(&self, key: &Key) -> Option<usize> {
        let name = key.as_name()?;
        self.names
            .iter()
            .position(|field| *field == name)
            .filter(|position| *position < self.values.len())
    }

    fn value_at(&self, position: usize) -> Option<&'a Value> {
        self.values.get(position)
    }
}

/// The children of any expandable value.
#[derive(Debug, Clone, Copy)]
pub enum Children<'a> {
    Sequence(&'a [Value]),
    Mapping(&'a Map),
    Fields(FieldsView<'a>),
}

impl Children<'_> {
    /// Short name of the container shape
    pub fn shape(&self) -> &'static str {
        match self {
            Children::Sequence(_) => "list",
            Children::Mapping(_) => "map",
            Children::Fields(_) => "node",
        }
    }
}

impl<'a> Container<'a> for Children<'a> {
    fn len(&self) -> usize {
        match self {
            Children::Sequence(items) => items.len(),
            Children::Mapping(map) => map.len(),
            Children::Fields(fields) => fields.len(),
        }
    }

    fn key_at(&self, position: usize) -> Option<Key> {
        match self {
            Children::Sequence(items) => items.key_at(position),
            Children::Mapping(map) => map.key_at(position),
            Children::Fields(fields) => fields.key_at(position),
        }
    }

    fn position_of(&self, key: &Key) -> Option<usize> {
        match self {
            Children::Sequence(items) => items.position_of(key),
            Children::Mapping(map) => map.position_of(key),
            Children::Fields(fields) => fields.position_of(key),
        }
    }

    fn value_at(&self, position: usize) -> Option<&'a Value> {
        match self {
            Children::Sequence(items) => items.value_at(position),
            Children::Mapping(map) => map.value_at(position),
            Children::Fields(fields) => fields.value_at(position),
        }
    }
}

/// Classifies `value` and returns its children, or `None` for a leaf.
///
/// Under [`Expansion::NodeBoundary`] every node is treated as a leaf. A node id
/// that does not belong to `tree` is also a leaf; resolution reports it as
/// unknown when a path tries to step through it.
pub fn expand<'a, K: NodeKind>(
    tree: &'a Tree<K>,
    value: ValueRef<'a>,
    mode: Expansion,
) -> Option<Children<'a>> {
    match value {
        ValueRef::Value(Value::List(items)) => Some(Children::Sequence(items)),
        ValueRef::Value(Value::Map(map)) => Some(Children::Mapping(map)),
        ValueRef::Value(_) => None,
        ValueRef::Node(_) if mode == Expansion::NodeBoundary => None,
        ValueRef::Node(id) => tree.node(id).ok().map(|node| {
            Children::Fields(FieldsView::new(node.kind.field_names(), &node.fields))
        }),
    }
}

/// `(key, child)` pairs of `value`, empty for a leaf.
pub fn entries<'a, K: NodeKind>(
    tree: &'a Tree<K>,
    value: ValueRef<'a>,
    mode: Expansion,
) -> Vec<(Key, ValueRef<'a>)> {
    expand(tree, value, mode)
        .map(|children| {
            children
                .entries()
                .into_iter()
                .map(|(key, child)| (key, ValueRef::from(child)))
                .collect()
        })
        .unwrap_or_default()
}
