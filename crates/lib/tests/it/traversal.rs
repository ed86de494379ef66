use arbor::{NodeId, PathBuf, Tree, Value, ValueRef, path, tree::Expansion};

use crate::helpers::*;

/// Node ids of `Sub(Add(Lit 1, Lit 2), Var x)` in pre-order
fn calc_ids(tree: &Tree<Calc>, root: NodeId) -> [NodeId; 5] {
    let node = |p: PathBuf| tree.resolve(root, p).unwrap().as_node().unwrap();
    [
        root,
        node(path!["left"]),
        node(path!["left", "left"]),
        node(path!["left", "right"]),
        node(path!["right"]),
    ]
}

#[test]
fn test_orders_over_nodes() {
    let (tree, root) = calc_tree();
    let [sub, add, one, two, x] = calc_ids(&tree, root);
    let (int1, int2, name) = (Value::Int(1), Value::Int(2), Value::from("x"));

    let pre: Vec<ValueRef> = tree.preorder(root, Expansion::Unrestricted).collect();
    assert_eq!(
        pre,
        vec![
            ValueRef::Node(sub),
            ValueRef::Node(add),
            ValueRef::Node(one),
            ValueRef::Value(&int1),
            ValueRef::Node(two),
            ValueRef::Value(&int2),
            ValueRef::Node(x),
            ValueRef::Value(&name),
        ]
    );

    let post: Vec<ValueRef> = tree.postorder(root, Expansion::Unrestricted).collect();
    assert_eq!(
        post,
        vec![
            ValueRef::Value(&int1),
            ValueRef::Node(one),
            ValueRef::Value(&int2),
            ValueRef::Node(two),
            ValueRef::Node(add),
            ValueRef::Value(&name),
            ValueRef::Node(x),
            ValueRef::Node(sub),
        ]
    );

    let bfs: Vec<ValueRef> = tree.breadth_first(root, Expansion::Unrestricted).collect();
    assert_eq!(
        bfs,
        vec![
            ValueRef::Node(sub),
            ValueRef::Node(add),
            ValueRef::Node(x),
            ValueRef::Node(one),
            ValueRef::Node(two),
            ValueRef::Value(&name),
            ValueRef::Value(&int1),
            ValueRef::Value(&int2),
        ]
    );
}

#[test]
fn test_node_boundary_stops_at_nodes() {
    let (tree, root) = calc_tree();
    let [_, add, ..] = calc_ids(&tree, root);

    let only_root: Vec<ValueRef> = tree.preorder(root, Expansion::NodeBoundary).collect();
    assert_eq!(only_root, vec![ValueRef::Node(root)]);

    let list = Value::from(vec![Value::Node(add), Value::Int(3)]);
    let visited: Vec<ValueRef> = tree.preorder(&list, Expansion::NodeBoundary).collect();
    assert_eq!(
        visited,
        vec![
            ValueRef::from(&list),
            ValueRef::Node(add),
            ValueRef::Value(&Value::Int(3)),
        ]
    );
    assert_eq!(tree.postorder(&list, Expansion::NodeBoundary).count(), 3);
    assert_eq!(tree.breadth_first(&list, Expansion::NodeBoundary).count(), 3);
}

#[test]
fn test_paths_resolve_to_visited_values() {
    let (tree, root) = calc_tree();
    let walked: Vec<(PathBuf, ValueRef)> = tree
        .preorder_with_paths(root, Expansion::Unrestricted)
        .collect();
    assert_eq!(walked.len(), 8);
    assert_eq!(walked[0].0, path![]);
    for (path, value) in &walked {
        assert_eq!(tree.resolve(root, path).unwrap(), *value, "at {path}");
    }
}

#[test]
fn test_paths_agree_with_increment() {
    let tree: Tree<Shape> = Tree::new();
    let root = nested_list();

    let mut stepped = vec![PathBuf::new()];
    while let Some(next) = tree
        .increment(&root, stepped.last().unwrap(), Expansion::Unrestricted)
        .unwrap()
    {
        stepped.push(next);
    }
    let walked: Vec<PathBuf> = tree
        .preorder_with_paths(&root, Expansion::Unrestricted)
        .map(|(path, _)| path)
        .collect();
    assert_eq!(stepped, walked);
}

#[test]
fn test_unknown_nodes_are_leaves() {
    let (tree, _) = calc_tree();
    // Ids are plain integers on the wire, so one can point past the arena
    let dangling: NodeId = serde_json::from_str(&tree.len().to_string()).unwrap();

    assert_eq!(tree.preorder(dangling, Expansion::Unrestricted).count(), 1);
    assert!(
        tree.resolve(dangling, path!["left"])
            .unwrap_err()
            .is_address_error()
    );
}
