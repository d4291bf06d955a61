//! Error type shared by every pipeline stage.

use thiserror::Error;

/// Errors raised while cleaning an observation log.
#[derive(Debug, Error)]
pub enum Error {
    /// A required column is absent from the uploaded header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A data row could not be read as an observation.
    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    /// A category has no entry in the palette.
    #[error("Unknown category {0}: no color assigned")]
    UnknownCategory(i64),

    /// An aggregate was requested over zero observations.
    #[error("No data: the observation set is empty")]
    NoData,

    #[error("Invalid distance range: minimum {min} m is greater than maximum {max} m")]
    DegenerateRange { min: u32, max: u32 },

    #[error("Invalid marker size {0}: must be at least 2")]
    InvalidMarkerSize(u32),

    #[error("Palette error: {0}")]
    Palette(String),

    /// Raised only when rows are ordered by time.
    #[error("Row {row}: cannot parse time {value:?}")]
    UnparseableTime { row: usize, value: String },

    /// Zoned, local and clock-only times can't be ordered against each other.
    #[error("Row {row}: time {value:?} is written in a different form than the first row")]
    MixedTimeForms { row: usize, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
