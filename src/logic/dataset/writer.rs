//! Dataset Writer
//!
//! Persists the output table. Files are written to a temporary sibling and
//! renamed into place, so a failed write never leaves a partial dataset.

use std::fs;
use std::path::{Path, PathBuf};

use crate::logic::error::PipelineResult;
use crate::logic::report::ReportRecord;

/// Header of the output table, in column order
pub const OUTPUT_COLUMNS: [&str; 16] = [
    "timestamp",
    "energy",
    "hour",
    "day_of_week",
    "is_weekend",
    "is_overnight",
    "rolling_mean",
    "rolling_std",
    "is_anomaly",
    "z_score",
    "baseline",
    "excess_energy",
    "excess_cost",
    "cause",
    "priority",
    "recommended_action",
];

/// Write the output table to `path`
pub fn write_table(path: impl AsRef<Path>, records: &[ReportRecord]) -> PipelineResult<()> {
    let path = path.as_ref();
    write_atomic(path, |tmp| {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(tmp)?;
        writer.write_record(OUTPUT_COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    })?;
    log::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Reload a table written by `write_table`
pub fn read_table(path: impl AsRef<Path>) -> PipelineResult<Vec<ReportRecord>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let records = reader.deserialize().collect::<Result<Vec<ReportRecord>, csv::Error>>()?;
    log::debug!("Read {} rows from {}", records.len(), path.as_ref().display());
    Ok(records)
}

/// Hidden sibling used while writing `path`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Run `write` against a temp file, then rename it over `path`
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> PipelineResult<()>
where
    F: FnOnce(&Path) -> PipelineResult<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    if let Err(e) = write(&tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
