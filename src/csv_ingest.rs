//! Reads an uploaded observation log.
//!
//! Header names are matched case-insensitively. Unknown columns are ignored and
//! `rawtime` is optional; every other column must be present.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::observation::Observation;

pub const REQUIRED_COLUMNS: [&str; 6] = ["time", "latitude", "longitude", "sats", "precision", "category"];

/// Parse a CSV byte stream into an observation set, keeping file order.
///
/// Any bad row aborts the whole read; there is no partial result.
pub fn read_observations(bytes: &[u8]) -> Result<Vec<Observation>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);

    let headers: StringRecord = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn(column.to_string()));
        }
    }
    rdr.set_headers(headers);

    let mut observations = Vec::new();
    for (idx, result) in rdr.deserialize::<Observation>().enumerate() {
        let row = idx + 1;
        let observation = result.map_err(|e| Error::MalformedRow {
            row,
            reason: e.to_string(),
        })?;
        validate(&observation, row)?;
        observations.push(observation);
    }

    debug!(rows = observations.len(), "parsed observation log");
    Ok(observations)
}

fn validate(observation: &Observation, row: usize) -> Result<()> {
    let checks = [
        ("latitude", observation.latitude),
        ("longitude", observation.longitude),
        ("precision", observation.precision),
    ];
    for (name, value) in checks {
        if !value.is_finite() {
            return Err(Error::MalformedRow {
                row,
                reason: format!("{} is not a finite number", name),
            });
        }
    }
    Ok(())
}
