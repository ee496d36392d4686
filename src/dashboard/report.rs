//! Atomic export of the report payload.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tempfile::NamedTempFile;
use tracing::info;

use super::types::SkillReport;

/// Write a report to disk atomically.
///
/// Uses a temporary file in the same directory as `target_path`, writes
/// the pretty-printed JSON, then atomically renames the temp file to the
/// target. An interrupted write never leaves a partial document behind.
pub fn write_report(report: &SkillReport, target_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    let parent = target_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Target path has no parent directory: {:?}", target_path))?;

    std::fs::create_dir_all(parent)?;

    // Temp file in the same directory keeps the rename on one filesystem.
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(json.as_bytes())?;
    temp.flush()?;

    temp.persist(target_path)?;

    info!("Wrote report to {:?}", target_path);
    Ok(())
}
