//! Energy Anomaly Detector
//!
//! Hourly meter readings in, explained and costed anomalies out.

pub mod constants;
pub mod logic;
