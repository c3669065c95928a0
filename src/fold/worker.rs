//! Internal implementation of one worker.

use log;

use crate::aggregate_map::KeyedAggregateMap;
use crate::entry::Record;

/// Fold every reading of `records` into a private map.
///
/// One upsert per (record, sensor) pair. Reads only its own slice and shares
/// nothing with other workers.
pub fn fold_slice(records: &[Record]) -> KeyedAggregateMap {
    let mut local_map = KeyedAggregateMap::new();

    for record in records {
        log::trace!(
            "Fold record of {} dated {:04}-{:02}",
            record.device,
            record.year,
            record.month
        );

        for (sensor, value) in record.readings() {
            local_map.upsert(record.key(sensor), value);
        }
    }

    local_map
}
