//! Monthly statistics of device sensor readings.
//!
//! Reads a `|` delimited table of readings, keeps the records dated 2024-03
//! or later, and computes min, max and mean per (device, year-month, sensor).
//! The records are split into contiguous slices folded in parallel into
//! private maps, which are merged into one global map after every worker
//! has joined.

use failure::Error;
use log;

pub mod aggregate_map;
pub mod config;
pub mod csv_parser;
pub mod entry;
pub mod error;
pub mod filter;
pub mod fold;
pub mod partition;
pub mod pipeline;
pub mod reduce;
pub mod report;

pub use crate::aggregate_map::KeyedAggregateMap;
pub use crate::config::Config;
pub use crate::entry::{Aggregate, Key, Record, Sensor};
pub use crate::error::PipelineError;
pub use crate::filter::Cutoff;
pub use crate::fold::Pool;
pub use crate::pipeline::Summary;

/// Main entry function: load, filter, aggregate and write the summary table.
pub fn summarize(config: &Config) -> Result<Summary, Error> {
    log::info!(
        "Summarize {} into {}",
        config.input.display(),
        config.output.display()
    );

    pipeline::Pipeline::new(config).run()
}

/// Aggregate already loaded records on `pool`.
pub fn aggregate(records: &[Record], pool: &Pool) -> Result<KeyedAggregateMap, Error> {
    let partials = pool.run(records)?;
    Ok(reduce::Reducer::merge_all(partials))
}
