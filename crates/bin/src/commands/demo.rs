//! Demo command - builds an expression tree and shows its linkage around edits.

use arbor::{NodeId, NodeKind, Tree, Value, node_kinds};

use crate::output::{OutputFormat, print_table, to_json};

node_kinds! {
    /// Expression language used by the demo
    enum Expr {
        Call { func, args },
        Add { left, right },
        Lit { value },
        Var { name },
    }
}

/// Run the demo command
pub fn run(format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut tree = Tree::new();
    let func = tree.add_node(Expr::Var, vec![Value::from("f")])?;
    let one = tree.add_node(Expr::Lit, vec![Value::Int(1)])?;
    let x = tree.add_node(Expr::Var, vec![Value::from("x")])?;
    let two = tree.add_node(Expr::Lit, vec![Value::Int(2)])?;
    let add = tree.add_node(Expr::Add, vec![x.into(), two.into()])?;
    let y = tree.add_node(Expr::Var, vec![Value::from("y")])?;
    let args = Value::List(vec![one.into(), add.into(), y.into()]);
    let root = tree.add_node(Expr::Call, vec![func.into(), args])?;
    tree.stamp_parent_links(root)?;

    show(&tree, root, "f(1, x + 2, y)", format)?;

    tree.remove(one)?;
    show(&tree, root, "after removing the first argument", format)?;

    let three = tree.add_node(Expr::Lit, vec![Value::Int(3)])?;
    tree.replace_with(add, three)?;
    show(&tree, root, "after replacing x + 2 with 3", format)?;

    Ok(())
}

/// Prints every node under `root` with its path and sibling links
fn show(
    tree: &Tree<Expr>,
    root: NodeId,
    title: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut nodes = vec![root];
    nodes.extend(tree.descendants(root)?);

    let label = |link: Option<NodeId>| link.map_or_else(|| "-".to_string(), |other| other.to_string());
    let mut rows = Vec::with_capacity(nodes.len());
    for id in nodes {
        rows.push(vec![
            id.to_string(),
            tree.kind(id)?.name().to_string(),
            tree.full_path(id)?.to_string(),
            label(tree.prev_sibling(id)?),
            label(tree.next_sibling(id)?),
        ]);
    }

    match format {
        OutputFormat::Human => {
            println!("== {title}");
            print_table(&["NODE", "KIND", "PATH", "PREV", "NEXT"], &rows);
            println!();
        }
        OutputFormat::Json => {
            let line = serde_json::json!({
                "stage": title,
                "tree": to_json(tree, root.into()),
                "nodes": rows,
            });
            println!("{}", serde_json::to_string(&line)?);
        }
    }
    Ok(())
}
