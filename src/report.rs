//! Render the merged map as the `;` delimited summary table.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use failure::{Error, ResultExt};
use log;

use crate::aggregate_map::KeyedAggregateMap;
use crate::entry::{Aggregate, Key};

pub const HEADER: [&str; 6] = [
    "device",
    "ano-mes",
    "sensor",
    "valor_maximo",
    "valor_medio",
    "valor_minimo",
];

/// The whole table, header included, one row per key sorted by key.
pub fn render(map: &KeyedAggregateMap) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(vec![]);

    writer.write_record(&HEADER)?;

    for (key, aggregate) in map.sorted() {
        writer.write_record(&row(key, aggregate))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| err.into_error())
        .context("Failed to flush summary table")?;

    Ok(String::from_utf8(bytes)?)
}

fn row(key: &Key, aggregate: &Aggregate) -> [String; 6] {
    [
        key.device.to_string(),
        format!("{:04}-{:02}", key.year, key.month),
        key.sensor.name().to_string(),
        format!("{:.2}", aggregate.max),
        format!("{:.2}", aggregate.mean()),
        format!("{:.2}", aggregate.min),
    ]
}

/// Write the table to `path` in one shot, and to stdout when `echo` is set.
///
/// Returns the number of data rows.
pub fn emit<P: AsRef<Path>>(
    map: &KeyedAggregateMap,
    path: P,
    echo: bool,
) -> Result<usize, Error> {
    if echo {
        let stdout = io::stdout();
        let handle = stdout.lock();
        emit_to(map, path, Some(handle))
    } else {
        emit_to(map, path, None::<io::Sink>)
    }
}

/// A failed console mirror is only warned about; the file is the result.
fn emit_to<P, W>(map: &KeyedAggregateMap, path: P, console: Option<W>) -> Result<usize, Error>
where
    P: AsRef<Path>,
    W: Write,
{
    let path = path.as_ref();
    let table = render(map)?;

    fs::write(path, &table)
        .with_context(|_| format!("Failed to write summary table {}", path.display()))?;

    if let Some(mut console) = console {
        if let Err(err) = console
            .write_all(table.as_bytes())
            .and_then(|_| console.flush())
        {
            log::warn!("Failed to mirror summary table to stdout: {}", err);
        }
    }

    log::info!("{} generated with {} rows.", path.display(), map.len());

    Ok(map.len())
}
