//! CSV and JSON persistence for pipeline outputs.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

/// Writes serializable records to a CSV file with a header row, creating
/// parent directories as needed. Overwrites any existing file.
pub fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!(rows = records.len(), path = %path.display(), "CSV written");
    Ok(())
}

/// Writes a value as pretty-printed JSON, creating parent directories as
/// needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;

    debug!(path = %path.display(), "JSON written");
    Ok(())
}
