//! Stepping a path to the next or previous position in pre-order.
//!
//! [`Tree::increment`] and [`Tree::decrement`] together form a generalized
//! iterator over arbitrarily nested values: repeated increments from the empty
//! path visit every position in pre-order, and decrement walks the same
//! sequence backwards.
//!
//! The expansion mode only governs descent ("go deeper first" and the
//! rightmost-descendant walk). Lateral steps between keys of one container
//! always see the container as it is.

use super::{
    NodeKind, Tree, TreeError,
    container::{self, Container, Expansion},
};
use crate::{
    Result,
    path::{Path, PathBuf},
    value::ValueRef,
};

/// Returns true if `path` is the first position of any tree: the root itself.
pub fn is_first(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_empty()
}

impl<K: NodeKind> Tree<K> {
    /// Returns the position following `path` in pre-order, or `None` if
    /// `path` is the last position.
    ///
    /// Descending takes priority: if the value at `path` has children, the
    /// result is its first child. Otherwise the deepest ancestor level that
    /// has a following key is advanced.
    ///
    /// ```
    /// use arbor::{path, Tree, Value, tree::Expansion};
    ///
    /// let tree: Tree = Tree::new();
    /// let root = Value::from(vec![Value::Int(1), Value::from(vec![Value::Int(2)])]);
    ///
    /// let next = tree.increment(&root, path![0_usize], Expansion::Unrestricted)?;
    /// assert_eq!(next, Some(path![1_usize]));
    /// let next = tree.increment(&root, path![1_usize], Expansion::Unrestricted)?;
    /// assert_eq!(next, Some(path![1_usize, 0_usize]));
    /// assert_eq!(tree.increment(&root, path![1_usize, 0_usize], Expansion::Unrestricted)?, None);
    /// # Ok::<(), arbor::Error>(())
    /// ```
    pub fn increment<'a>(
        &'a self,
        root: impl Into<ValueRef<'a>>,
        path: impl AsRef<Path>,
        mode: Expansion,
    ) -> Result<Option<PathBuf>> {
        let path = path.as_ref();
        let lineage = self.lineage(root.into(), path)?;

        let current = lineage[path.len()];
        if let Some(first) =
            container::expand(self, current, mode).and_then(|children| children.first_key())
        {
            return Ok(Some(path.join_key(first)));
        }

        for depth in (0..path.len()).rev() {
            let children = self.lateral(lineage[depth], path.prefix(depth))?;
            if let Some(next) = children.next_key(&path.keys()[depth]) {
                return Ok(Some(path.prefix(depth).join_key(next)));
            }
        }

        Ok(None)
    }

    /// Returns the position preceding `path` in pre-order, or `None` for the
    /// empty path.
    ///
    /// If the current level has a previous key, the result is the rightmost
    /// descendant of that sibling. Otherwise it is the parent position.
    pub fn decrement<'a>(
        &'a self,
        root: impl Into<ValueRef<'a>>,
        path: impl AsRef<Path>,
        mode: Expansion,
    ) -> Result<Option<PathBuf>> {
        let path = path.as_ref();
        let Some((last, parent)) = path.split_last() else {
            return Ok(None);
        };
        let lineage = self.lineage(root.into(), path)?;

        let children = self.lateral(lineage[parent.len()], parent)?;
        let Some(prev) = children.prev_key(last) else {
            return Ok(Some(parent.to_path_buf()));
        };

        let mut current = self.child_of(lineage[parent.len()], parent, &prev)?;
        let mut result = parent.join_key(prev);
        while let Some(children) = container::expand(self, current, mode) {
            let Some(key) = children.last_key() else {
                break;
            };
            current = self.child_of(current, &result, &key)?;
            result.push_key(key);
        }
        Ok(Some(result))
    }

    /// Returns true if no position follows `path`.
    pub fn is_last<'a>(
        &'a self,
        root: impl Into<ValueRef<'a>>,
        path: impl AsRef<Path>,
        mode: Expansion,
    ) -> Result<bool> {
        Ok(self.increment(root, path, mode)?.is_none())
    }

    /// Unrestricted view of a level's container, for stepping between keys.
    ///
    /// Only called on lineage levels that `child_of` has already stepped
    /// through, so the expansion always exists. The error is an internal
    /// guard and no path or tree shape reaches it.
    fn lateral<'a>(&'a self, value: ValueRef<'a>, at: &Path) -> Result<container::Children<'a>> {
        let children = container::expand(self, value, Expansion::Unrestricted);
        debug_assert!(children.is_some(), "lateral step through a {} at {at}", value.type_name());
        children.ok_or_else(|| {
            TreeError::UnsupportedShape {
                path: at.to_path_buf(),
                found: value.type_name(),
            }
            .into()
        })
    }
}
