//! Parent links, sibling caches, removal and replacement.
//!
//! Every attached node records its parent and the path from the parent to
//! itself. Siblings are computed on demand by stepping that path with
//! node-boundary expansion, and cached on both sides: when `a` finds `b` as
//! its next sibling, `b` learns `a` as its previous sibling in the same step.
//!
//! [`Tree::remove`] and [`Tree::replace_with`] keep the caches and the
//! recorded paths of later siblings consistent without rescanning the parent.

use std::cell::Cell;

use tracing::{debug, trace};

use super::{Expansion, Link, NodeData, NodeId, NodeKind, Tree, TreeError};
use crate::{
    Result,
    path::{Key, PathBuf},
    value::{Value, ValueRef},
};

impl<K: NodeKind> Tree<K> {
    /// Stamps parent links on every node below `root`.
    ///
    /// Every node reachable through node-boundary walks gets its parent and
    /// parent-relative path overwritten, and all sibling caches in the subtree
    /// are reset. Returns the number of nodes stamped below `root`.
    ///
    /// Run this once after building a tree, and again from the top after any
    /// bulk edit made outside [`remove`](Tree::remove) and
    /// [`replace_with`](Tree::replace_with).
    ///
    /// # Errors
    ///
    /// `UnknownNode` if `root` is not in this tree, and `AlreadyAttached` if
    /// `root` has a parent. Nothing is changed in either case.
    pub fn stamp_parent_links(&mut self, root: NodeId) -> Result<usize> {
        if self.node(root)?.parent.is_some() {
            return Err(TreeError::AlreadyAttached { id: root }.into());
        }
        self.node_mut(root)?.detach();
        let stamped = self.stamp_descendants(root)?;
        debug!(root = %root, nodes = stamped, "Stamped parent links");
        Ok(stamped)
    }

    fn stamp_descendants(&mut self, root: NodeId) -> Result<usize> {
        let mut stamped = 0;
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            let children = self.child_nodes_with_paths(parent)?;
            for (path, child) in children {
                let node = self.node_mut(child)?;
                node.parent = Some(parent);
                node.parent_path = Some(path);
                node.reset_links();
                stamped += 1;
                stack.push(child);
            }
        }
        Ok(stamped)
    }

    /// Nodes directly owned by `id`, with their paths from `id`.
    pub fn child_nodes_with_paths(&self, id: NodeId) -> Result<Vec<(PathBuf, NodeId)>> {
        Ok(self
            .field_walk(id)?
            .filter_map(|(path, value)| value.as_node().map(|child| (path, child)))
            .collect())
    }

    /// Nodes directly owned by `id`, in pre-order of its fields.
    ///
    /// Nodes nested in sequences and mappings inside a field are included;
    /// nodes inside those nodes are not. The result is derived from the
    /// current fields on every call.
    pub fn child_nodes(&self, id: NodeId) -> Result<impl Iterator<Item = NodeId> + '_> {
        Ok(self
            .field_walk(id)?
            .filter_map(|(_, value)| value.as_node()))
    }

    /// First node directly owned by `id`
    pub fn first_child(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.child_nodes(id)?.next())
    }

    /// Last node directly owned by `id`
    pub fn last_child(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.child_nodes(id)?.last())
    }

    /// The node preceding `id` among its parent's child nodes.
    ///
    /// Computed on first request and cached on both `id` and the sibling
    /// found. Returns `None` for the first child and for unattached nodes.
    pub fn prev_sibling(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.sibling(id, Side::Prev)
    }

    /// The node following `id` among its parent's child nodes.
    ///
    /// Computed on first request and cached on both `id` and the sibling
    /// found. Returns `None` for the last child and for unattached nodes.
    pub fn next_sibling(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.sibling(id, Side::Next)
    }

    fn sibling(&self, id: NodeId, side: Side) -> Result<Option<NodeId>> {
        let node = self.node(id)?;
        if let Some(known) = side.slot(node).get().known() {
            return Ok(known);
        }
        let (Some(parent), Some(parent_path)) = (node.parent, node.parent_path.as_deref()) else {
            return Ok(None);
        };

        let mut path = parent_path.to_path_buf();
        let found = loop {
            let step = match side {
                Side::Prev => self.decrement(parent, &path, Expansion::NodeBoundary)?,
                Side::Next => self.increment(parent, &path, Expansion::NodeBoundary)?,
            };
            match step {
                Some(next) if !next.is_empty() => {
                    if let ValueRef::Node(sibling) = self.resolve(parent, &next)? {
                        break Some(sibling);
                    }
                    path = next;
                }
                _ => break None,
            }
        };

        side.slot(node).set(Link::from(found));
        if let Some(sibling) = found {
            side.opposite().slot(self.node(sibling)?).set(Link::To(id));
        }
        trace!(node = %id, ?side, sibling = ?found, "Cached sibling link");
        Ok(found)
    }

    /// Detaches `id` from its parent.
    ///
    /// The entry at the node's parent path is erased. When that entry sits in
    /// a sequence, the recorded paths of nodes under later entries are shifted
    /// down by one index at that level. Cached neighbor links are joined
    /// directly; neighbors whose links were never computed stay uncomputed.
    ///
    /// The removed node keeps its own subtree and can be re-attached with
    /// [`replace_with`](Tree::replace_with).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Detached`] if `id` has no parent, and
    /// [`TreeError::FixedField`] if `id` is held directly by a node field.
    /// Neither case changes the tree.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        let (Some(parent), Some(parent_path)) = (node.parent, node.parent_path.clone()) else {
            return Err(TreeError::Detached { id }.into());
        };
        let (last, container_path) = parent_path.split_last().ok_or(TreeError::EmptyPath)?;

        let depth = container_path.len();
        let shifted = match (self.resolve(parent, container_path)?, last) {
            (ValueRef::Value(Value::List(items)), Key::Index(index)) => {
                let mut shifted = Vec::new();
                for (position, item) in items.iter().enumerate().skip(index + 1) {
                    shifted.extend(
                        self.preorder(item, Expansion::NodeBoundary)
                            .filter_map(ValueRef::as_node)
                            .map(|sibling| (sibling, position - 1)),
                    );
                }
                shifted
            }
            _ => Vec::new(),
        };

        self.erase(parent, &parent_path)?;

        for (sibling, index) in &shifted {
            if let Some(key) = self
                .node_mut(*sibling)?
                .parent_path
                .as_mut()
                .and_then(|path| path.keys_mut().get_mut(depth))
            {
                *key = Key::Index(*index);
            }
        }

        let node = self.node(id)?;
        let (prev, next) = (node.prev.get(), node.next.get());
        if let Link::To(prev_id) = prev {
            self.node(prev_id)?.next.set(next);
        }
        if let Link::To(next_id) = next {
            self.node(next_id)?.prev.set(prev);
        }
        self.node_mut(id)?.detach();

        debug!(
            node = %id,
            parent = %parent,
            path = %parent_path,
            renumbered = shifted.len(),
            "Removed node"
        );
        Ok(())
    }

    /// Puts `new` in the place of `old`.
    ///
    /// `new` takes over `old`'s parent, parent path and cached neighbor
    /// links, and neighbors that had cached `old` now point at `new`. The
    /// subtree below `new` is stamped relative to it. `old` ends up detached
    /// with its own subtree intact.
    ///
    /// # Errors
    ///
    /// `new` must be unattached and must not be `old` or one of its
    /// ancestors; `old` must be attached. No error changes the tree.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        if old == new {
            return Err(TreeError::SelfReplacement.into());
        }
        if self.node(new)?.parent.is_some() {
            return Err(TreeError::AlreadyAttached { id: new }.into());
        }
        let node = self.node(old)?;
        let (Some(parent), Some(parent_path)) = (node.parent, node.parent_path.clone()) else {
            return Err(TreeError::Detached { id: old }.into());
        };
        let (prev, next) = (node.prev.get(), node.next.get());
        if self.root_of(old)? == new {
            return Err(TreeError::CyclicReplacement { id: new }.into());
        }

        self.assign(parent, &parent_path, Value::Node(new))?;

        let replacement = self.node_mut(new)?;
        replacement.parent = Some(parent);
        replacement.parent_path = Some(parent_path.clone());
        replacement.prev.set(prev);
        replacement.next.set(next);
        if let Link::To(prev_id) = prev {
            self.node(prev_id)?.next.set(Link::To(new));
        }
        if let Link::To(next_id) = next {
            self.node(next_id)?.prev.set(Link::To(new));
        }
        let stamped = self.stamp_descendants(new)?;
        self.node_mut(old)?.detach();

        debug!(
            old = %old,
            new = %new,
            parent = %parent,
            path = %parent_path,
            stamped,
            "Replaced node"
        );
        Ok(())
    }

    /// Root-relative path of `id`, joining every parent path up to the root.
    ///
    /// Roots and unattached nodes have the empty path.
    pub fn full_path(&self, id: NodeId) -> Result<PathBuf> {
        let mut segments = Vec::new();
        let mut current = self.node(id)?;
        while let (Some(parent), Some(path)) = (current.parent, current.parent_path.as_deref()) {
            segments.push(path);
            current = self.node(parent)?;
        }
        Ok(segments
            .into_iter()
            .rev()
            .fold(PathBuf::new(), |full, segment| full.join(segment)))
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Prev,
    Next,
}

impl Side {
    fn slot<K>(self, node: &NodeData<K>) -> &Cell<Link> {
        match self {
            Side::Prev => &node.prev,
            Side::Next => &node.next,
        }
    }

    fn opposite(self) -> Side {
        match self {
            Side::Prev => Side::Next,
            Side::Next => Side::Prev,
        }
    }
}
