//! Dataset Module - CSV boundary
//!
//! Reads hourly meter readings and persists the explained table plus the
//! JSON run summary. All file I/O of the pipeline happens here.

pub mod export;
pub mod reader;
pub mod writer;


pub use export::{read_summary, write_summary};
pub use reader::{load_readings, parse_timestamp, read_readings};
pub use writer::{read_table, write_table, OUTPUT_COLUMNS};
