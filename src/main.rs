//! Monthly statistics of device sensor readings.
//!
//! Reads `devices.csv` and writes `resumo.csv`; see `sensor_stats::config`
//! for the environment overrides.

use std::process;

use env_logger;
use log;
use sensor_stats;

fn main() {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");

    env_logger::init_from_env(env);

    let outcome =
        sensor_stats::Config::from_env().and_then(|config| sensor_stats::summarize(&config));

    match outcome {
        Ok(summary) => log::info!(
            "Summarized {} records into {} rows on {} workers.",
            summary.records,
            summary.rows,
            summary.workers
        ),
        Err(error) => {
            let causes: Vec<_> = error.iter_chain().map(|cause| cause.to_string()).collect();
            log::error!("Failed to summarize readings, cause: {}", causes.join(": "));
            process::exit(1);
        }
    }
}
