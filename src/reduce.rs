//! Reducer

use log;

use crate::aggregate_map::KeyedAggregateMap;

pub struct Reducer {
    global: KeyedAggregateMap,
}

impl Reducer {
    /// Fold the partial maps into one global map, in worker order.
    ///
    /// The order does not change the result, it only keeps runs reproducible.
    pub fn merge_all(partials: Vec<KeyedAggregateMap>) -> KeyedAggregateMap {
        log::info!("Start reducing {} partial maps.", partials.len());

        let mut reducer = Reducer {
            global: KeyedAggregateMap::new(),
        };

        for (worker, local_map) in partials.into_iter().enumerate() {
            reducer.absorb(worker, local_map);
        }

        reducer.global
    }

    fn absorb(&mut self, worker: usize, local_map: KeyedAggregateMap) {
        log::debug!(
            "Merge {} keys of worker {} into {} global keys.",
            local_map.len(),
            worker,
            self.global.len()
        );

        self.global.merge(&local_map);
    }
}
