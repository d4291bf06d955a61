//! Cleaning pipeline for uploaded GPS observation logs.
//!
//! Duplicate fixes are dropped, distances between consecutive fixes are
//! attached, implausible jumps are filtered out and the result is summarized
//! for a map/chart front end. See [`pipeline::run`].

pub mod category_aggregator;
pub mod colorizer;
pub mod config;
pub mod csv_export;
pub mod csv_ingest;
pub mod deduplicator;
pub mod distance_annotator;
pub mod error;
pub mod geodesic;
pub mod map_center;
pub mod observation;
pub mod pipeline;
pub mod plausibility_filter;
pub mod time_order;

pub use config::{CategoryPalette, PipelineConfig, PlausibilityRange};
pub use error::{Error, Result};
pub use pipeline::{run, run_csv, PipelineReport, Visualization};
