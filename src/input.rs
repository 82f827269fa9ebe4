use std::path::Path;

use anyhow::Context;
use dims_bus::Identifier;

/// Reads one identifier per line. Surrounding whitespace is trimmed and blank lines
/// are skipped.
pub async fn read_identifiers(path: &Path) -> anyhow::Result<Vec<Identifier>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_identifiers(&text))
}

pub fn parse_identifiers(text: &str) -> Vec<Identifier> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
