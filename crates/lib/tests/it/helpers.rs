use arbor::{Map, NodeId, PathBuf, Tree, Value, ValueRef, node_kinds, tree::NodeKind};

node_kinds! {
    /// Generic shapes used across the linkage tests
    pub enum Shape {
        NAry { children },
        Leaf { value },
        Matrix { elements },
        Record { attrs },
    }
}

node_kinds! {
    /// A small arithmetic language
    pub enum Calc {
        Add { left, right },
        Sub { left, right },
        Lit { value },
        Var { name },
    }
}

// ==========================
// BUILDERS
// ==========================

/// Creates an unlinked leaf holding `value`
pub fn leaf(tree: &mut Tree<Shape>, value: impl Into<Value>) -> NodeId {
    tree.add_node(Shape::Leaf, vec![value.into()])
        .expect("Failed to create leaf")
}

/// Creates an unlinked n-ary node owning `children` in order
pub fn nary(tree: &mut Tree<Shape>, children: &[NodeId]) -> NodeId {
    let children = Value::List(children.iter().copied().map(Value::Node).collect());
    tree.add_node(Shape::NAry, vec![children])
        .expect("Failed to create n-ary node")
}

/// Creates an unlinked matrix node from rows of nodes
pub fn matrix(tree: &mut Tree<Shape>, rows: &[&[NodeId]]) -> NodeId {
    let rows = rows
        .iter()
        .map(|row| Value::List(row.iter().copied().map(Value::Node).collect()))
        .collect();
    tree.add_node(Shape::Matrix, vec![Value::List(rows)])
        .expect("Failed to create matrix")
}

/// The four-child tree used throughout: `root = NAry([n0 = NAry([n00]), n1, n2, n3])`
pub struct FourChildren {
    pub tree: Tree<Shape>,
    pub root: NodeId,
    pub n0: NodeId,
    pub n00: NodeId,
    pub n1: NodeId,
    pub n2: NodeId,
    pub n3: NodeId,
}

/// Builds and links the [`FourChildren`] tree
pub fn four_children() -> FourChildren {
    let mut tree = Tree::new();
    let n00 = leaf(&mut tree, 0);
    let n0 = nary(&mut tree, &[n00]);
    let n1 = leaf(&mut tree, 1);
    let n2 = leaf(&mut tree, 2);
    let n3 = leaf(&mut tree, 3);
    let root = nary(&mut tree, &[n0, n1, n2, n3]);
    tree.stamp_parent_links(root)
        .expect("Failed to stamp parent links");
    FourChildren {
        tree,
        root,
        n0,
        n00,
        n1,
        n2,
        n3,
    }
}

/// Builds `Sub(Add(Lit 1, Lit 2), Var x)` and returns the tree and its root
pub fn calc_tree() -> (Tree<Calc>, NodeId) {
    let mut tree = Tree::new();
    let one = tree.add_node(Calc::Lit, vec![Value::Int(1)]).unwrap();
    let two = tree.add_node(Calc::Lit, vec![Value::Int(2)]).unwrap();
    let add = tree
        .add_node(Calc::Add, vec![one.into(), two.into()])
        .unwrap();
    let x = tree.add_node(Calc::Var, vec![Value::from("x")]).unwrap();
    let sub = tree.add_node(Calc::Sub, vec![add.into(), x.into()]).unwrap();
    tree.stamp_parent_links(sub).unwrap();
    (tree, sub)
}

/// The list `[1, 2, [3, 4, [5]], 6]`
pub fn nested_list() -> Value {
    Value::from(vec![
        Value::Int(1),
        Value::Int(2),
        Value::from(vec![
            Value::Int(3),
            Value::Int(4),
            Value::from(vec![Value::Int(5)]),
        ]),
        Value::Int(6),
    ])
}

/// A plain list mixing every container shape with nodes inside:
/// `[{rows: [NAry(a, b), [], c], empty: {}, n: 7}, [[d, 1], []], [], Record{items: [e], tag: "t"}]`
///
/// The nodes are not stamped.
pub fn mixed_tree() -> (Tree<Shape>, Value) {
    let mut tree = Tree::new();
    let [a, b, c, d, e] = ["a", "b", "c", "d", "e"].map(|name| leaf(&mut tree, name));
    let pair = nary(&mut tree, &[a, b]);

    let rows = Value::List(vec![pair.into(), Value::List(vec![]), c.into()]);
    let head: Map = [
        ("rows", rows),
        ("empty", Value::Map(Map::new())),
        ("n", Value::Int(7)),
    ]
    .into_iter()
    .collect();

    let attrs: Map = [("items", Value::List(vec![e.into()])), ("tag", Value::from("t"))]
        .into_iter()
        .collect();
    let record = tree
        .add_node(Shape::Record, vec![Value::Map(attrs)])
        .expect("Failed to create record");

    let root = Value::List(vec![
        Value::Map(head),
        Value::List(vec![
            Value::List(vec![d.into(), Value::Int(1)]),
            Value::List(vec![]),
        ]),
        Value::List(vec![]),
        record.into(),
    ]);
    (tree, root)
}

// ==========================
// ASSERTIONS
// ==========================

/// Returns the field values of a node as a list of node ids
pub fn node_list(tree: &Tree<Shape>, id: NodeId, field: &str) -> Vec<NodeId> {
    match tree.field(id, field).unwrap() {
        Value::List(items) => items.iter().filter_map(Value::as_node).collect(),
        other => panic!("Expected list in field '{field}', got: {other:?}"),
    }
}

/// Asserts every linkage invariant for the subtree rooted at `root`.
///
/// - each child node's parent and parent path match where it actually sits
/// - resolving a node's parent path against its parent yields the node
/// - resolving a node's full path against `root` yields the node
/// - cached and computed sibling links agree in both directions
pub fn assert_invariants<K: NodeKind>(tree: &Tree<K>, root: NodeId) {
    let mut stack = vec![root];
    while let Some(parent) = stack.pop() {
        let children = tree.child_nodes_with_paths(parent).unwrap();
        for (path, child) in &children {
            assert_eq!(
                tree.parent(*child).unwrap(),
                Some(parent),
                "Wrong parent for {child}"
            );
            assert_eq!(
                tree.parent_path(*child).unwrap().map(|p| p.to_path_buf()),
                Some(path.clone()),
                "Wrong parent path for {child}"
            );
            assert_eq!(tree.resolve(parent, path).unwrap(), ValueRef::Node(*child));

            let full: PathBuf = tree.full_path(*child).unwrap();
            assert_eq!(tree.resolve(root, &full).unwrap(), ValueRef::Node(*child));

            if let Some(next) = tree.next_sibling(*child).unwrap() {
                assert_eq!(tree.prev_sibling(next).unwrap(), Some(*child));
            }
            if let Some(prev) = tree.prev_sibling(*child).unwrap() {
                assert_eq!(tree.next_sibling(prev).unwrap(), Some(*child));
            }
            stack.push(*child);
        }

        let ids: Vec<NodeId> = children.iter().map(|(_, id)| *id).collect();
        for pair in ids.windows(2) {
            assert_eq!(tree.next_sibling(pair[0]).unwrap(), Some(pair[1]));
            assert_eq!(tree.prev_sibling(pair[1]).unwrap(), Some(pair[0]));
        }
        if let (Some(first), Some(last)) = (ids.first(), ids.last()) {
            assert_eq!(tree.prev_sibling(*first).unwrap(), None);
            assert_eq!(tree.next_sibling(*last).unwrap(), None);
        }
    }
}
