use arbor::{
    Map, PathBuf, Tree, Value, ValueRef, path,
    tree::{Expansion, NoKind, is_first},
};

use crate::helpers::*;

/// Every position reached by repeated increments from the empty path
fn forward<K: arbor::NodeKind>(tree: &Tree<K>, root: arbor::ValueRef<'_>, mode: Expansion) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::new()];
    while let Some(next) = tree.increment(root, paths.last().unwrap(), mode).unwrap() {
        paths.push(next);
    }
    paths
}

#[test]
fn test_increment_visits_every_position() {
    let tree: Tree<NoKind> = Tree::new();
    let root = nested_list();

    let paths = forward(&tree, (&root).into(), Expansion::Unrestricted);
    let expected = vec![
        path![],
        path![0_usize],
        path![1_usize],
        path![2_usize],
        path![2_usize, 0_usize],
        path![2_usize, 1_usize],
        path![2_usize, 2_usize],
        path![2_usize, 2_usize, 0_usize],
        path![3_usize],
    ];
    assert_eq!(paths, expected);

    let ints: Vec<i64> = paths
        .iter()
        .filter_map(|p| tree.resolve(&root, p).unwrap().as_value()?.as_int())
        .collect();
    assert_eq!(ints, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_inverse_law() {
    let tree: Tree<NoKind> = Tree::new();
    let root = nested_list();
    let paths = forward(&tree, (&root).into(), Expansion::Unrestricted);

    for p in &paths {
        if let Some(next) = tree.increment(&root, p, Expansion::Unrestricted).unwrap() {
            let back = tree.decrement(&root, &next, Expansion::Unrestricted).unwrap();
            assert_eq!(back.as_ref(), Some(p), "decrement(increment({p})) != {p}");
        }
        if let Some(prev) = tree.decrement(&root, p, Expansion::Unrestricted).unwrap() {
            let again = tree.increment(&root, &prev, Expansion::Unrestricted).unwrap();
            assert_eq!(again.as_ref(), Some(p), "increment(decrement({p})) != {p}");
        }
    }
}

#[test]
fn test_increment_matches_preorder() {
    let (tree, root) = calc_tree();
    for mode in [Expansion::Unrestricted, Expansion::NodeBoundary] {
        let by_increment: Vec<_> = forward(&tree, root.into(), mode)
            .iter()
            .map(|p| tree.resolve(root, p).unwrap())
            .collect();
        let by_walk: Vec<_> = tree.preorder(root, mode).collect();
        assert_eq!(by_increment, by_walk, "mismatch under {mode:?}");
    }
}

#[test]
fn test_laws_on_mixed_containers() {
    let (tree, root) = mixed_tree();

    for mode in [Expansion::Unrestricted, Expansion::NodeBoundary] {
        let paths = forward(&tree, (&root).into(), mode);

        for (i, p) in paths.iter().enumerate() {
            let prev = tree.decrement(&root, p, mode).unwrap();
            assert_eq!(
                prev.as_ref(),
                i.checked_sub(1).map(|j| &paths[j]),
                "decrement({p}) under {mode:?}"
            );
            if let Some(prev) = prev {
                let again = tree.increment(&root, &prev, mode).unwrap();
                assert_eq!(again.as_ref(), Some(p), "increment(decrement({p})) under {mode:?}");
            }
        }
        assert!(tree.is_last(&root, paths.last().unwrap(), mode).unwrap());

        let walked: Vec<(PathBuf, ValueRef)> = tree.preorder_with_paths(&root, mode).collect();
        let walked_paths: Vec<&PathBuf> = walked.iter().map(|(path, _)| path).collect();
        assert_eq!(walked_paths, paths.iter().collect::<Vec<_>>(), "paths under {mode:?}");

        let by_increment: Vec<ValueRef> = paths
            .iter()
            .map(|p| tree.resolve(&root, p).unwrap())
            .collect();
        let by_walk: Vec<ValueRef> = tree.preorder(&root, mode).collect();
        assert_eq!(by_increment, by_walk, "values under {mode:?}");
    }
}

#[test]
fn test_node_boundary_over_mixed_containers() {
    let (tree, root) = mixed_tree();

    let paths = forward(&tree, (&root).into(), Expansion::NodeBoundary);
    assert_eq!(
        paths,
        vec![
            path![],
            path![0_usize],
            path![0_usize, "rows"],
            path![0_usize, "rows", 0_usize],
            path![0_usize, "rows", 1_usize],
            path![0_usize, "rows", 2_usize],
            path![0_usize, "empty"],
            path![0_usize, "n"],
            path![1_usize],
            path![1_usize, 0_usize],
            path![1_usize, 0_usize, 0_usize],
            path![1_usize, 0_usize, 1_usize],
            path![1_usize, 1_usize],
            path![2_usize],
            path![3_usize],
        ]
    );

    // Node interiors add twelve positions
    let unrestricted = forward(&tree, (&root).into(), Expansion::Unrestricted);
    assert_eq!(unrestricted.len(), 27);
    assert!(unrestricted.contains(&path![0_usize, "rows", 0_usize, "children", 1_usize, "value"]));

    // Stepping back out of an empty container lands on the node before it
    assert_eq!(
        tree.decrement(&root, path![0_usize, "rows", 1_usize], Expansion::NodeBoundary)
            .unwrap(),
        Some(path![0_usize, "rows", 0_usize])
    );
    assert_eq!(
        tree.decrement(&root, path![0_usize, "rows", 1_usize], Expansion::Unrestricted)
            .unwrap(),
        Some(path![0_usize, "rows", 0_usize, "children", 1_usize, "value"])
    );
}

#[test]
fn test_increment_through_nodes() {
    let (tree, root) = calc_tree();
    let paths = forward(&tree, root.into(), Expansion::Unrestricted);
    assert_eq!(
        paths,
        vec![
            path![],
            path!["left"],
            path!["left", "left"],
            path!["left", "left", "value"],
            path!["left", "right"],
            path!["left", "right", "value"],
            path!["right"],
            path!["right", "name"],
        ]
    );
}

#[test]
fn test_mapping_steps_follow_insertion_order() {
    let tree: Tree<NoKind> = Tree::new();
    let inner: Map = [("zz", 1), ("aa", 2)].into_iter().collect();
    let root: Map = [("b", Value::Map(inner)), ("a", Value::Int(3))]
        .into_iter()
        .collect();
    let root = Value::Map(root);

    let paths = forward(&tree, (&root).into(), Expansion::Unrestricted);
    assert_eq!(
        paths,
        vec![
            path![],
            path!["b"],
            path!["b", "zz"],
            path!["b", "aa"],
            path!["a"],
        ]
    );
    assert_eq!(
        tree.decrement(&root, path!["a"], Expansion::Unrestricted)
            .unwrap(),
        Some(path!["b", "aa"])
    );
}

#[test]
fn test_empty_containers_are_positions() {
    let tree: Tree<NoKind> = Tree::new();
    let root = Value::from(vec![Value::List(vec![]), Value::Int(1)]);
    let paths = forward(&tree, (&root).into(), Expansion::Unrestricted);
    assert_eq!(paths, vec![path![], path![0_usize], path![1_usize]]);
    assert_eq!(
        tree.decrement(&root, path![1_usize], Expansion::Unrestricted)
            .unwrap(),
        Some(path![0_usize])
    );
}

#[test]
fn test_boundary_predicates() {
    let tree: Tree<NoKind> = Tree::new();
    let root = nested_list();
    assert!(is_first(path![]));
    assert!(!is_first(path![2_usize, 0_usize]));
    assert!(
        tree.is_last(&root, path![3_usize], Expansion::Unrestricted)
            .unwrap()
    );
    assert!(
        !tree
            .is_last(&root, path![2_usize, 2_usize, 0_usize], Expansion::Unrestricted)
            .unwrap()
    );
    assert_eq!(
        tree.decrement(&root, path![], Expansion::Unrestricted)
            .unwrap(),
        None
    );
}

#[test]
fn test_stale_paths_are_address_errors() {
    let tree: Tree<NoKind> = Tree::new();
    let root = nested_list();
    let err = tree
        .decrement(&root, path![2_usize, 7_usize], Expansion::Unrestricted)
        .unwrap_err();
    assert!(err.is_address_error());

    let err = tree
        .increment(&root, path![0_usize, 0_usize], Expansion::Unrestricted)
        .unwrap_err();
    assert!(err.is_address_error());
}
