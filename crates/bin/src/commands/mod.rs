//! Subcommand implementations.

pub mod demo;
pub mod get;
pub mod walk;

use std::{fs, io::Read, path::Path};

use arbor::Value;

use crate::output::from_json;

/// Reads a JSON document from a file, or from stdin when `input` is `-`.
pub fn load_document(input: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(input)?
    };
    let json: serde_json::Value = serde_json::from_str(&text)?;
    let value = from_json(json)?;
    tracing::debug!(input = %input.display(), kind = value.type_name(), "Loaded document");
    Ok(value)
}
