//! Static partitioning of the record buffer.

use std::ops::Range;

/// Split `n_records` into `n_workers` contiguous half-open ranges.
///
/// Every range but the last holds `n_records / n_workers` records, the last
/// one absorbs the remainder. The ranges are disjoint and cover `0..n_records`.
pub fn partition(n_records: usize, n_workers: usize) -> Vec<Range<usize>> {
    let n_workers = n_workers.max(1);
    let chunk = n_records / n_workers;

    (0..n_workers)
        .map(|worker| {
            let start = worker * chunk;
            let end = if worker == n_workers - 1 {
                n_records
            } else {
                start + chunk
            };
            start..end
        })
        .collect()
}
