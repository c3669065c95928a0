//! Run configuration.
//!
//! Defaults match the fixed file names of the batch job. Each field can be
//! overridden from the environment:
//!
//! | Variable               | Meaning                                  |
//! |------------------------|------------------------------------------|
//! | `SENSOR_STATS_INPUT`   | input table, `devices.csv`               |
//! | `SENSOR_STATS_OUTPUT`  | summary table, `resumo.csv`              |
//! | `SENSOR_STATS_WORKERS` | worker count, detected parallelism       |
//! | `SENSOR_STATS_ECHO`    | `0`/`false` stops mirroring to stdout    |

use std::env;
use std::path::PathBuf;

use failure::Error;

use crate::error::PipelineError;
use crate::filter::Cutoff;

pub const DEFAULT_INPUT: &str = "devices.csv";
pub const DEFAULT_OUTPUT: &str = "resumo.csv";

const ENV_INPUT: &str = "SENSOR_STATS_INPUT";
const ENV_OUTPUT: &str = "SENSOR_STATS_OUTPUT";
const ENV_WORKERS: &str = "SENSOR_STATS_WORKERS";
const ENV_ECHO: &str = "SENSOR_STATS_ECHO";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `None` sizes the pool to the detected hardware parallelism.
    pub workers: Option<usize>,
    pub cutoff: Cutoff,
    /// Mirror the summary table to stdout.
    pub echo: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            workers: None,
            cutoff: Cutoff::default(),
            echo: true,
        }
    }
}

impl Config {
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input: I, output: O) -> Config {
        Config {
            input: input.into(),
            output: output.into(),
            ..Config::default()
        }
    }

    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(input) = lookup(ENV_INPUT) {
            config.input = PathBuf::from(input);
        }

        if let Some(output) = lookup(ENV_OUTPUT) {
            config.output = PathBuf::from(output);
        }

        if let Some(workers) = lookup(ENV_WORKERS) {
            config.workers = Some(parse_workers(&workers)?);
        }

        if let Some(echo) = lookup(ENV_ECHO) {
            config.echo = parse_flag(ENV_ECHO, &echo)?;
        }

        Ok(config)
    }

    pub fn with_workers(mut self, workers: usize) -> Config {
        self.workers = Some(workers);
        self
    }

    pub fn with_cutoff(mut self, cutoff: Cutoff) -> Config {
        self.cutoff = cutoff;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Config {
        self.echo = echo;
        self
    }
}

fn parse_workers(value: &str) -> Result<usize, PipelineError> {
    match value.trim().parse::<usize>() {
        Ok(workers) if workers > 0 => Ok(workers),
        _ => Err(PipelineError::InvalidConfig {
            name: ENV_WORKERS,
            value: value.to_string(),
        }),
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, PipelineError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PipelineError::InvalidConfig {
            name,
            value: value.to_string(),
        }),
    }
}
