use arbor::{Error, Key, Map, Tree, Value, ValueRef, path, tree::TreeError};

use crate::helpers::*;

#[test]
fn test_resolve_across_nodes_and_containers() {
    let mut tree = Tree::new();
    let a = leaf(&mut tree, "a");
    let b = leaf(&mut tree, "b");
    let attrs: Map = [("first", Value::Node(a)), ("rest", Value::from(vec![Value::Node(b)]))]
        .into_iter()
        .collect();
    let record = tree.add_node(Shape::Record, vec![Value::Map(attrs)]).unwrap();

    assert_eq!(
        tree.resolve(record, path!["attrs", "first"]).unwrap(),
        ValueRef::Node(a)
    );
    assert_eq!(
        tree.resolve(record, path!["attrs", "rest", 0_usize, "value"])
            .unwrap(),
        ValueRef::Value(&Value::from("b"))
    );
    // A single key is shorthand for a one-element path
    assert!(matches!(
        tree.resolve(record, Key::field("attrs")).unwrap(),
        ValueRef::Value(Value::Map(_))
    ));
}

#[test]
fn test_resolve_error_context() {
    let mut tree = Tree::new();
    let a = leaf(&mut tree, 1);
    let root = nary(&mut tree, &[a]);

    match tree.resolve(root, path!["children", 3_usize]).unwrap_err() {
        Error::Tree(TreeError::IndexOutOfBounds { path, index, len }) => {
            assert_eq!(path, path!["children"]);
            assert_eq!(index, 3);
            assert_eq!(len, 1);
        }
        other => panic!("Expected IndexOutOfBounds, got: {other:?}"),
    }

    match tree.resolve(root, path!["kids"]).unwrap_err() {
        Error::Tree(TreeError::KeyNotFound { key, .. }) => assert_eq!(key, "kids"),
        other => panic!("Expected KeyNotFound, got: {other:?}"),
    }

    match tree
        .resolve(root, path!["children", 0_usize, "value", 0_usize])
        .unwrap_err()
    {
        Error::Tree(TreeError::NotAContainer { path, found }) => {
            assert_eq!(path, path!["children", 0_usize, "value"]);
            assert_eq!(found, "int");
        }
        other => panic!("Expected NotAContainer, got: {other:?}"),
    }
}

#[test]
fn test_assign_through_nested_nodes() {
    let mut tree = Tree::new();
    let a = leaf(&mut tree, 1);
    let inner = nary(&mut tree, &[a]);
    let root = nary(&mut tree, &[inner]);

    let old = tree
        .assign(
            root,
            path!["children", 0_usize, "children", 0_usize, "value"],
            Value::Int(42),
        )
        .unwrap();
    assert_eq!(old, Some(Value::Int(1)));
    assert_eq!(tree.field(a, "value").unwrap(), &Value::Int(42));
}

#[test]
fn test_assign_into_external_root() {
    let mut tree = Tree::new();
    let a = leaf(&mut tree, 1);
    let mut root = Value::from(vec![Value::Node(a), Value::Null]);

    tree.assign(&mut root, path![1_usize], Value::from("filled"))
        .unwrap();
    tree.assign(&mut root, path![0_usize, "value"], Value::Int(2))
        .unwrap();

    assert_eq!(root.as_list().unwrap()[1], "filled");
    assert_eq!(tree.field(a, "value").unwrap(), &Value::Int(2));
}

#[test]
fn test_erase_shifts_sequence_entries() {
    let mut tree: Tree<Shape> = Tree::new();
    let mut root = Value::from(vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
    let removed = tree.erase(&mut root, path![0_usize]).unwrap();
    assert_eq!(removed, Value::Int(0));
    assert_eq!(
        tree.resolve(&root, path![0_usize]).unwrap(),
        ValueRef::Value(&Value::Int(1))
    );
    assert!(tree.erase(&mut root, path![2_usize]).unwrap_err().is_address_error());
}

#[test]
fn test_erase_keeps_mapping_order() {
    let mut tree: Tree<Shape> = Tree::new();
    let map: Map = [("c", 1), ("a", 2), ("b", 3)].into_iter().collect();
    let mut root = Value::Map(map);

    tree.erase(&mut root, path!["a"]).unwrap();
    let keys: Vec<&str> = root.as_map().unwrap().keys().collect();
    assert_eq!(keys, vec!["c", "b"]);

    assert!(tree.erase(&mut root, path!["a"]).unwrap_err().is_address_error());
}

#[test]
fn test_erase_rejects_node_fields() {
    let mut tree = Tree::new();
    let a = leaf(&mut tree, 1);
    let err = tree.erase(a, path!["value"]).unwrap_err();
    assert!(matches!(err, Error::Tree(TreeError::FixedField { .. })));
    assert!(err.is_linkage_error());
    assert_eq!(tree.field(a, "value").unwrap(), &Value::Int(1));
}
