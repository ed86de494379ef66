//! Walk command - lists positions by stepping a path with increment or decrement.

use std::str::FromStr;

use arbor::{
    PathBuf, Tree,
    tree::{Expansion, NoKind},
};

use crate::cli::WalkArgs;
use crate::commands::load_document;
use crate::output::{OutputFormat, dotted, print_table, summary, to_json};

/// Run the walk command
pub fn run(args: &WalkArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let root = load_document(&args.input)?;
    let tree: Tree<NoKind> = Tree::new();
    let mode = Expansion::from(args.mode);
    let limit = args.limit.unwrap_or(usize::MAX);

    let mut path = match &args.from {
        Some(text) => PathBuf::from_str(text)?,
        None => PathBuf::new(),
    };

    let mut visited = Vec::new();
    while visited.len() < limit {
        let value = tree.resolve(&root, &path)?;
        let step = if args.back {
            tree.decrement(&root, &path, mode)?
        } else {
            tree.increment(&root, &path, mode)?
        };
        visited.push((path, value));
        match step {
            Some(next) => path = next,
            None => break,
        }
    }
    tracing::debug!(positions = visited.len(), back = args.back, ?mode, "Walk finished");

    match format {
        OutputFormat::Human => {
            let rows: Vec<Vec<String>> = visited
                .iter()
                .map(|(path, value)| {
                    vec![
                        path.to_string(),
                        value.type_name().to_string(),
                        summary(*value),
                    ]
                })
                .collect();
            print_table(&["PATH", "TYPE", "VALUE"], &rows);
        }
        OutputFormat::Json => {
            for (path, value) in &visited {
                let line = serde_json::json!({
                    "path": dotted(path),
                    "type": value.type_name(),
                    "value": to_json(&tree, *value),
                });
                println!("{}", serde_json::to_string(&line)?);
            }
        }
    }

    Ok(())
}
