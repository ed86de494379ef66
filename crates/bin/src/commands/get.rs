//! Get command - resolves one dotted path against a document.

use std::str::FromStr;

use arbor::{PathBuf, Tree, tree::NoKind};

use crate::cli::GetArgs;
use crate::commands::load_document;
use crate::output::{OutputFormat, to_json};

/// Run the get command
pub fn run(args: &GetArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let root = load_document(&args.input)?;
    let tree: Tree<NoKind> = Tree::new();
    let path = PathBuf::from_str(&args.path)?;
    let value = tree.resolve(&root, &path)?;
    let json = to_json(&tree, value);

    match format {
        OutputFormat::Human => println!("{}", serde_json::to_string_pretty(&json)?),
        OutputFormat::Json => println!("{}", serde_json::to_string(&json)?),
    }

    Ok(())
}
