//! Read the device table into memory.
//!
//! The table is `|` delimited with one header line. Data lines carry
//! `[id, device, count, date, sensor0..sensor5]`; the id and count columns
//! are not used. Malformed lines are reported and skipped, the caller only
//! ever sees well-formed records.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use failure::{Error, ResultExt};
use log;

use crate::entry::{Record, N_SENSORS};
use crate::error::{LineError, PipelineError};

const DEFAULT_BUFFER_SIZE: u64 = 64 * 1024;

const MAX_BUFFER_SIZE: u64 = 8 * 1024 * 1024;

const BUFFER_FACTOR: f64 = 1.0 / 8.0;

/// Device ids are bounded; longer ones are cut at a char boundary.
pub const MAX_DEVICE_LEN: usize = 63;

const FIELD_DEVICE: usize = 1;
const FIELD_DATE: usize = 3;
const FIELD_FIRST_SENSOR: usize = 4;
const MIN_FIELDS: usize = FIELD_FIRST_SENSOR + N_SENSORS;

const DATE_LEN: usize = 10;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Load every valid record of the table at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, Error> {
    let path = path.as_ref();

    log::info!("Load device table {}", path.display());

    let buff_reader = create_buffer_reader(path)
        .with_context(|_| format!("Missing source csv file {}", path.display()))?;

    parse(buff_reader, &path.display().to_string())
}

/// Parse a table from any reader. `name` only labels diagnostics.
pub fn parse<R: Read>(source: R, name: &str) -> Result<Vec<Record>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(source);

    let header_len = reader
        .headers()
        .with_context(|_| format!("Failed to read header of {}", name))?
        .len();

    if header_len == 0 {
        return Err(PipelineError::MissingHeader {
            path: name.to_string(),
        }
        .into());
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut row = csv::StringRecord::new();

    loop {
        match reader.read_record(&mut row) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                if err.is_io_error() {
                    return Err(Error::from(err)
                        .context(format!("Failed to read {}", name))
                        .into());
                }
                log::warn!("{}: {}, skipping record", name, err);
                skipped += 1;
                continue;
            }
        }

        match parse_line(&row) {
            Ok(record) => records.push(record),
            Err(err) => {
                let line = row.position().map_or(0, |position| position.line());
                log::warn!("{} line {}: {}, skipping record", name, line, err);
                skipped += 1;
            }
        }
    }

    log::info!(
        "Loaded {} records from {}, skipped {} malformed lines.",
        records.len(),
        name,
        skipped
    );

    Ok(records)
}

fn parse_line(row: &csv::StringRecord) -> Result<Record, LineError> {
    if row.len() < MIN_FIELDS {
        return Err(LineError::MissingField {
            expected: MIN_FIELDS,
            found: row.len(),
        });
    }

    let device = bounded_device(&row[FIELD_DEVICE]);
    let (year, month) = parse_date(&row[FIELD_DATE])?;

    let mut readings = [0.0; N_SENSORS];
    for (sensor, reading) in readings.iter_mut().enumerate() {
        *reading = parse_reading(sensor, &row[FIELD_FIRST_SENSOR + sensor])?;
    }

    Ok(Record::new(device, year, month, readings))
}

/// Year and month of a `YYYY-MM-DD` prefix; anything after the first
/// ten characters (a time of day, usually) is ignored.
pub fn parse_date(field: &str) -> Result<(i32, u32), LineError> {
    let prefix = field
        .char_indices()
        .nth(DATE_LEN)
        .map_or(field, |(end, _)| &field[..end]);

    NaiveDate::parse_and_remainder(prefix, DATE_FORMAT)
        .map(|(date, _)| (date.year(), date.month()))
        .map_err(|_| LineError::InvalidDate(field.to_string()))
}

fn parse_reading(sensor: usize, field: &str) -> Result<f64, LineError> {
    match field.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LineError::InvalidReading {
            sensor,
            value: field.to_string(),
        }),
    }
}

fn bounded_device(field: &str) -> &str {
    if field.len() <= MAX_DEVICE_LEN {
        return field;
    }

    let mut end = MAX_DEVICE_LEN;
    while !field.is_char_boundary(end) {
        end -= 1;
    }

    log::trace!("Truncate device id {} to {} bytes", field, end);

    &field[..end]
}

/// Construct buffer reader to enhance read efficiency.
///
/// The buffer is 1/8 of the file, but no smaller than 64KB and no greater
/// than 8MB.
fn create_buffer_reader(path: &Path) -> io::Result<BufReader<File>> {
    let file = File::open(path)?;

    let file_size = file.metadata()?.len();

    let divided_size = (file_size as f64 * BUFFER_FACTOR) as u64;

    let buff_size = divided_size.max(DEFAULT_BUFFER_SIZE).min(MAX_BUFFER_SIZE);

    log::debug!("Read {} bytes with a {} bytes buffer.", file_size, buff_size);

    Ok(BufReader::with_capacity(buff_size as usize, file))
}
