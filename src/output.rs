use std::{
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use dims_bus::{ResultMap, report};
use tempfile::NamedTempFile;

/// Writes the report next to `path` and renames it into place, so a crash mid-write
/// leaves any previous file untouched.
pub fn write_report(path: &Path, results: &ResultMap) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        report::write_records(results, &mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
