//! Entry module consists of basic abstractions of the aggregation.
//!
//! Including to: `Record`, `Sensor`, `Key` and `Aggregate`.

use std::fmt::{self, Display};
use std::sync::Arc;

pub const N_SENSORS: usize = 6;

/// The six sensors every device reports, in column order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Sensor {
    Temperatura,
    Umidade,
    Luminosidade,
    Ruido,
    Eco2,
    Etvoc,
}

impl Sensor {
    pub const ALL: [Sensor; N_SENSORS] = [
        Sensor::Temperatura,
        Sensor::Umidade,
        Sensor::Luminosidade,
        Sensor::Ruido,
        Sensor::Eco2,
        Sensor::Etvoc,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Sensor::Temperatura => "temperatura",
            Sensor::Umidade => "umidade",
            Sensor::Luminosidade => "luminosidade",
            Sensor::Ruido => "ruido",
            Sensor::Eco2 => "eco2",
            Sensor::Etvoc => "etvoc",
        }
    }
}

impl Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(self.name())
    }
}

/// One validated reading event. Shared read-only by all workers.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub device: Arc<str>,
    pub year: i32,
    pub month: u32,
    pub readings: [f64; N_SENSORS],
}

impl Record {
    pub fn new(device: &str, year: i32, month: u32, readings: [f64; N_SENSORS]) -> Record {
        Record {
            device: Arc::from(device),
            year,
            month,
            readings,
        }
    }

    pub fn key(&self, sensor: Sensor) -> Key {
        Key {
            device: Arc::clone(&self.device),
            year: self.year,
            month: self.month,
            sensor,
        }
    }

    /// Every (sensor, reading) pair of this record.
    pub fn readings(&self) -> impl Iterator<Item = (Sensor, f64)> + '_ {
        self.readings
            .iter()
            .enumerate()
            .map(|(index, value)| (Sensor::ALL[index], *value))
    }
}

/// Composite (device, year, month, sensor) key of one aggregate row.
///
/// The derived ordering is only used to give reports a stable row order.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Key {
    pub device: Arc<str>,
    pub year: i32,
    pub month: u32,
    pub sensor: Sensor,
}

impl Key {
    pub fn new(device: &str, year: i32, month: u32, sensor: Sensor) -> Key {
        Key {
            device: Arc::from(device),
            year,
            month,
            sensor,
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{}/{:04}-{:02}/{}",
            self.device, self.year, self.month, self.sensor
        )
    }
}

/// Running statistics of one key.
///
/// An `Aggregate` only exists once a value was seen, so `count >= 1` and
/// `min <= mean <= max` always hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl Aggregate {
    pub fn new(value: f64) -> Aggregate {
        Aggregate {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    pub fn merge(&self, other: &Aggregate) -> Aggregate {
        Aggregate {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}
