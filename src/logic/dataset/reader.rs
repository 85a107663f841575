//! Dataset Reader
//!
//! Loads one meter column out of a wide CSV of hourly readings.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};

use crate::constants::TIMESTAMP_COLUMN;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::Reading;

/// Accepted timestamp layouts, tried in order before RFC 3339
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Read `energy_column` from the CSV at `path`
pub fn load_readings(path: impl AsRef<Path>, energy_column: &str) -> PipelineResult<Vec<Reading>> {
    let path = path.as_ref();
    let readings = read_readings(File::open(path)?, energy_column)?;
    log::info!(
        "Loaded {} readings of {:?} from {}",
        readings.len(),
        energy_column,
        path.display()
    );
    Ok(readings)
}

/// Same as `load_readings`, from any reader
pub fn read_readings<R: Read>(source: R, energy_column: &str) -> PipelineResult<Vec<Reading>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    };
    let ts_idx = column(TIMESTAMP_COLUMN)?;
    let energy_idx = column(energy_column)?;

    let mut readings = Vec::new();
    let mut unparsable = 0usize;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let raw_ts = record.get(ts_idx).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| PipelineError::InvalidTimestamp {
            line,
            value: raw_ts.to_string(),
        })?;

        let raw_energy = record.get(energy_idx).unwrap_or("");
        let energy = parse_energy(raw_energy);
        if energy.is_none() && !is_blank(raw_energy) {
            unparsable += 1;
        }
        readings.push(Reading { timestamp, energy });
    }

    if unparsable > 0 {
        log::debug!("{} energy cells could not be parsed, treated as missing", unparsable);
    }
    Ok(readings)
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

/// Empty, NaN and non-numeric cells are missing
fn parse_energy(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_blank(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("na")
}
