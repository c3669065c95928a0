//! Orchestration of one batch run.
//!
//! A run only moves forward through its stages:
//!
//! ```text
//! Loaded -> Filtered -> Partitioned -> Running -> Joined -> Merged -> Emitted -> Terminated
//! ```
//!
//! Any failed precondition halts the run; nothing is emitted in that case.

use std::fmt::{self, Display};

use failure::Error;
use log;

use crate::aggregate_map::KeyedAggregateMap;
use crate::config::Config;
use crate::csv_parser;
use crate::entry::Record;
use crate::error::PipelineError;
use crate::fold::Pool;
use crate::reduce::Reducer;
use crate::report;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum Stage {
    Loaded,
    Filtered,
    Partitioned,
    Running,
    Joined,
    Merged,
    Emitted,
    Terminated,
}

impl Stage {
    /// The only stage a run may move to from `self`.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Loaded => Some(Stage::Filtered),
            Stage::Filtered => Some(Stage::Partitioned),
            Stage::Partitioned => Some(Stage::Running),
            Stage::Running => Some(Stage::Joined),
            Stage::Joined => Some(Stage::Merged),
            Stage::Merged => Some(Stage::Emitted),
            Stage::Emitted => Some(Stage::Terminated),
            Stage::Terminated => None,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt::Debug::fmt(self, f)
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct Summary {
    pub map: KeyedAggregateMap,
    pub records: usize,
    pub workers: usize,
    pub rows: usize,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    pool: Pool,
    stage: Option<Stage>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Pipeline<'a> {
        let pool = match config.workers {
            Some(size) => Pool::with_size(size),
            None => Pool::detect(),
        };

        Pipeline {
            config,
            pool,
            stage: None,
        }
    }

    #[inline]
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn run(mut self) -> Result<Summary, Error> {
        let records = csv_parser::load(&self.config.input)?;
        self.advance(Stage::Loaded);

        let records = self.config.cutoff.retain(records);
        self.advance(Stage::Filtered);

        if records.is_empty() {
            return Err(PipelineError::NoRecords {
                cutoff: self.config.cutoff,
            }
            .into());
        }

        let map = self.aggregate(&records)?;

        let rows = report::emit(&map, &self.config.output, self.config.echo)?;
        self.advance(Stage::Emitted);

        self.advance(Stage::Terminated);

        Ok(Summary {
            map,
            records: records.len(),
            workers: self.pool.size(),
            rows,
        })
    }

    /// Partition, fold in parallel, join and merge.
    fn aggregate(&mut self, records: &[Record]) -> Result<KeyedAggregateMap, Error> {
        log::info!(
            "Aggregate {} records on {} workers.",
            records.len(),
            self.pool.size()
        );
        self.advance(Stage::Partitioned);

        self.advance(Stage::Running);
        let partials = self.pool.run(records)?;
        self.advance(Stage::Joined);

        let map = Reducer::merge_all(partials);
        self.advance(Stage::Merged);

        Ok(map)
    }

    fn advance(&mut self, next: Stage) {
        debug_assert_eq!(
            self.stage.map_or(Some(Stage::Loaded), Stage::next),
            Some(next),
            "stage transitions only move forward"
        );

        log::debug!("Pipeline stage {}.", next);

        self.stage = Some(next);
    }
}
