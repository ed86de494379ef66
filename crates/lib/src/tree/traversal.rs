//! Whole-tree traversals.
//!
//! All traversals visit children in container order: sequence indices
//! ascending, mapping names in insertion order, node fields in declaration
//! order. Each takes an [`Expansion`] mode deciding whether nodes below the
//! start are entered.

use std::collections::VecDeque;

use super::{
    NodeId, NodeKind, Tree,
    container::{self, Expansion},
};
use crate::{
    Result,
    path::{Key, PathBuf},
    value::ValueRef,
};

/// Pre-order traversal: every value before its descendants.
#[derive(Debug)]
pub struct Preorder<'a, K: NodeKind> {
    tree: &'a Tree<K>,
    mode: Expansion,
    stack: Vec<ValueRef<'a>>,
}

impl<'a, K: NodeKind> Preorder<'a, K> {
    fn new(tree: &'a Tree<K>, roots: Vec<ValueRef<'a>>, mode: Expansion) -> Self {
        let mut stack = roots;
        stack.reverse();
        Self { tree, mode, stack }
    }
}

impl<'a, K: NodeKind> Iterator for Preorder<'a, K> {
    type Item = ValueRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let children = container::entries(self.tree, current, self.mode);
        self.stack
            .extend(children.into_iter().rev().map(|(_, child)| child));
        Some(current)
    }
}

/// Pre-order traversal that also yields each value's path from the start.
#[derive(Debug)]
pub struct PreorderWithPaths<'a, K: NodeKind> {
    tree: &'a Tree<K>,
    mode: Expansion,
    stack: Vec<(PathBuf, ValueRef<'a>)>,
}

impl<'a, K: NodeKind> PreorderWithPaths<'a, K> {
    fn new(tree: &'a Tree<K>, roots: Vec<(PathBuf, ValueRef<'a>)>, mode: Expansion) -> Self {
        let mut stack = roots;
        stack.reverse();
        Self { tree, mode, stack }
    }
}

impl<'a, K: NodeKind> Iterator for PreorderWithPaths<'a, K> {
    type Item = (PathBuf, ValueRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, current) = self.stack.pop()?;
        let children = container::entries(self.tree, current, self.mode);
        self.stack.extend(
            children
                .into_iter()
                .rev()
                .map(|(key, child)| (path.join_key(key), child)),
        );
        Some((path, current))
    }
}

/// Post-order traversal: every value after its descendants.
#[derive(Debug)]
pub struct Postorder<'a, K: NodeKind> {
    tree: &'a Tree<K>,
    mode: Expansion,
    stack: Vec<(ValueRef<'a>, std::vec::IntoIter<ValueRef<'a>>)>,
}

impl<'a, K: NodeKind> Postorder<'a, K> {
    fn children(&self, value: ValueRef<'a>) -> std::vec::IntoIter<ValueRef<'a>> {
        container::entries(self.tree, value, self.mode)
            .into_iter()
            .map(|(_, child)| child)
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<'a, K: NodeKind> Iterator for Postorder<'a, K> {
    type Item = ValueRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pending = self.stack.last_mut()?.1.next();
            match pending {
                Some(child) => {
                    let grandchildren = self.children(child);
                    self.stack.push((child, grandchildren));
                }
                None => return self.stack.pop().map(|(value, _)| value),
            }
        }
    }
}

/// Breadth-first traversal: level by level, each level in container order.
#[derive(Debug)]
pub struct BreadthFirst<'a, K: NodeKind> {
    tree: &'a Tree<K>,
    mode: Expansion,
    queue: VecDeque<ValueRef<'a>>,
}

impl<'a, K: NodeKind> Iterator for BreadthFirst<'a, K> {
    type Item = ValueRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        let children = container::entries(self.tree, current, self.mode);
        self.queue
            .extend(children.into_iter().map(|(_, child)| child));
        Some(current)
    }
}

impl<K: NodeKind> Tree<K> {
    /// Visits `start` and everything below it in pre-order.
    ///
    /// This is the same sequence of positions that repeated
    /// [`increment`](Tree::increment) produces from the empty path.
    pub fn preorder<'a>(&'a self, start: impl Into<ValueRef<'a>>, mode: Expansion) -> Preorder<'a, K> {
        Preorder::new(self, vec![start.into()], mode)
    }

    /// Like [`preorder`](Tree::preorder), paired with paths relative to `start`.
    pub fn preorder_with_paths<'a>(
        &'a self,
        start: impl Into<ValueRef<'a>>,
        mode: Expansion,
    ) -> PreorderWithPaths<'a, K> {
        PreorderWithPaths::new(self, vec![(PathBuf::new(), start.into())], mode)
    }

    /// Visits everything below `start` and then `start`, in post-order.
    pub fn postorder<'a>(&'a self, start: impl Into<ValueRef<'a>>, mode: Expansion) -> Postorder<'a, K> {
        let start = start.into();
        let mut traversal = Postorder {
            tree: self,
            mode,
            stack: Vec::new(),
        };
        let children = traversal.children(start);
        traversal.stack.push((start, children));
        traversal
    }

    /// Visits `start` and everything below it, shallowest first.
    pub fn breadth_first<'a>(
        &'a self,
        start: impl Into<ValueRef<'a>>,
        mode: Expansion,
    ) -> BreadthFirst<'a, K> {
        BreadthFirst {
            tree: self,
            mode,
            queue: VecDeque::from([start.into()]),
        }
    }

    /// Node-boundary pre-order over the fields of `id`, with field-prefixed paths.
    pub(super) fn field_walk(&self, id: NodeId) -> Result<PreorderWithPaths<'_, K>> {
        let node = self.node(id)?;
        let roots = node
            .named_fields()
            .map(|(name, value)| (PathBuf::from(Key::field(name)), ValueRef::from(value)))
            .collect();
        Ok(PreorderWithPaths::new(self, roots, Expansion::NodeBoundary))
    }
}
