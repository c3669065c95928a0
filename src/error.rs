//! Error taxonomy of a run.
//!
//! `PipelineError` halts the run. `LineError` only drops one input line and
//! never leaves the ingestion boundary.

use failure::Fail;

use crate::filter::Cutoff;

#[derive(Debug, Fail)]
pub enum PipelineError {
    #[fail(display = "missing header line in {}", path)]
    MissingHeader { path: String },

    #[fail(display = "no valid records dated {} or later", cutoff)]
    NoRecords { cutoff: Cutoff },

    #[fail(display = "failed to spawn worker {}", worker)]
    WorkerSpawn { worker: usize },

    #[fail(display = "worker {} panicked before finishing its slice", worker)]
    WorkerPanicked { worker: usize },

    #[fail(display = "invalid value {:?} for {}", value, name)]
    InvalidConfig { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Fail)]
pub enum LineError {
    #[fail(display = "expected at least {} fields, found {}", expected, found)]
    MissingField { expected: usize, found: usize },

    #[fail(display = "invalid date {:?}", _0)]
    InvalidDate(String),

    #[fail(display = "sensor {} has invalid reading {:?}", sensor, value)]
    InvalidReading { sensor: usize, value: String },
}
