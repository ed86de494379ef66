//! Output formatting and JSON conversion helpers.

use arbor::{Map, NodeKind, Path, Tree, Value, ValueRef};
use serde_json::Value as Json;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let render = |cells: Vec<&str>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", render(headers.to_vec()));
    for row in rows {
        println!(
            "{}",
            render(row.iter().take(col_count).map(String::as_str).collect())
        );
    }
}

/// Short single-cell rendering: leaves in full, containers by size.
pub fn summary(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Node(id) => id.to_string(),
        ValueRef::Value(Value::List(items)) => format!("[{} items]", items.len()),
        ValueRef::Value(Value::Map(map)) => format!("{{{} entries}}", map.len()),
        ValueRef::Value(leaf) => leaf.to_string(),
    }
}

/// Dotted form of a path that parses back to the same path; the root is `""`.
pub fn dotted(path: &Path) -> String {
    if path.is_empty() {
        String::new()
    } else {
        path.to_string()
    }
}

/// Renders a position as JSON, expanding nodes into `{"kind": .., <fields>..}`.
pub fn to_json<K: NodeKind>(tree: &Tree<K>, value: ValueRef<'_>) -> Json {
    match value {
        ValueRef::Node(id) => match tree.get(id) {
            Ok(node) => {
                let mut object = serde_json::Map::new();
                object.insert("kind".to_string(), node.kind().name().into());
                for (name, field) in node.named_fields() {
                    object.insert(name.to_string(), to_json(tree, field.into()));
                }
                Json::Object(object)
            }
            Err(_) => serde_json::json!({ "node": id.index() }),
        },
        ValueRef::Value(value) => match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Text(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(|item| to_json(tree, item.into()))
                    .collect(),
            ),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(name, item)| (name.to_string(), to_json(tree, item.into())))
                    .collect(),
            ),
            Value::Node(id) => to_json(tree, ValueRef::Node(*id)),
        },
    }
}

/// Converts a parsed JSON document into a plain value tree.
///
/// Object key order is kept. Numbers must be integers that fit in an `i64`.
pub fn from_json(json: Json) -> Result<Value, String> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => Value::Int(
            n.as_i64()
                .ok_or_else(|| format!("Unsupported number {n}: only 64-bit integers are allowed"))?,
        ),
        Json::String(s) => Value::Text(s),
        Json::Array(items) => Value::List(
            items
                .into_iter()
                .map(from_json)
                .collect::<Result<_, _>>()?,
        ),
        Json::Object(object) => {
            let mut map = Map::new();
            for (name, item) in object {
                map.insert(name, from_json(item)?);
            }
            Value::Map(map)
        }
    })
}
