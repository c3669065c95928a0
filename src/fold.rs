//! Fork-join fold of the record buffer.
//!
//! The workflow is illustrated as following:
//!
//! The main thread splits the records into contiguous slices, one per worker.
//! Each worker folds its slice into a private map and hands the map back
//! through its join handle, so no state is shared while the workers run.

use std::num::NonZeroUsize;
use std::thread;

use failure::Error;
use log;

use crate::aggregate_map::KeyedAggregateMap;
use crate::entry::Record;
use crate::error::PipelineError;
use crate::partition;

pub mod worker;

/// Upper bound of the detected pool size.
pub const MAX_WORKERS: usize = 64;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Pool {
    size: usize,
}

impl Pool {
    /// Size the pool to the hardware parallelism, or 1 when it is unknown.
    pub fn detect() -> Pool {
        let size = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
            .min(MAX_WORKERS);

        log::debug!("Detected parallelism of {} workers.", size);

        Pool { size }
    }

    pub fn with_size(size: usize) -> Pool {
        Pool { size: size.max(1) }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Fold `records` on every worker and return the partial maps in worker order.
    pub fn run(&self, records: &[Record]) -> Result<Vec<KeyedAggregateMap>, Error> {
        let ranges = partition::partition(records.len(), self.size);

        thread::scope(|scope| -> Result<Vec<KeyedAggregateMap>, Error> {
            let mut handles = Vec::with_capacity(ranges.len());

            for (index, range) in ranges.into_iter().enumerate() {
                let slice = &records[range.clone()];

                log::debug!(
                    "Spawn worker {} for records {}..{}.",
                    index,
                    range.start,
                    range.end
                );

                let handle = thread::Builder::new()
                    .name(format!("fold-worker-{}", index))
                    .spawn_scoped(scope, move || worker::fold_slice(slice))
                    .map_err(|_| PipelineError::WorkerSpawn { worker: index })?;

                handles.push(handle);
            }

            // Join barrier: every worker is joined before any result is inspected.
            let joined: Vec<_> = handles.into_iter().map(|handle| handle.join()).collect();

            let mut partials = Vec::with_capacity(joined.len());

            for (index, result) in joined.into_iter().enumerate() {
                let local_map =
                    result.map_err(|_| PipelineError::WorkerPanicked { worker: index })?;

                log::debug!("Worker {} produced {} keys.", index, local_map.len());

                partials.push(local_map);
            }

            Ok(partials)
        })
    }
}
