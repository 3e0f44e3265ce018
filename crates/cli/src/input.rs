//! Reading submissions from a file or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use serde_json::{Map, Value};

/// Read the whole input. `None` or `-` reads stdin.
pub fn read_source(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Parse a single JSON object or an array of objects.
pub fn parse_submissions(text: &str) -> anyhow::Result<Vec<Map<String, Value>>> {
    let value: Value = serde_json::from_str(text).context("input is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(vec![map]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(map),
                _ => bail!("record {} is not a JSON object", index + 1),
            })
            .collect(),
        _ => bail!("input must be a JSON object or an array of objects"),
    }
}
