use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::writer::write_atomic;
use crate::logic::error::PipelineResult;
use crate::logic::report::RunSummary;

/// Export the run summary as pretty-printed JSON
pub fn write_summary(path: impl AsRef<Path>, summary: &RunSummary) -> PipelineResult<()> {
    let path = path.as_ref();
    write_atomic(path, |tmp| {
        let mut out = BufWriter::new(File::create(tmp)?);
        serde_json::to_writer_pretty(&mut out, summary)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    })?;
    log::info!("Exported run summary {} to {}", summary.run_id, path.display());
    Ok(())
}

pub fn read_summary(path: impl AsRef<Path>) -> PipelineResult<RunSummary> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
