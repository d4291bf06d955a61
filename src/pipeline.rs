//! One cleaning run: upload in, report out.

use tracing::{debug, info, warn};

use crate::category_aggregator::{count_categories, satellite_distribution, CategoryCounts, SatelliteFrequency};
use crate::colorizer::colorize;
use crate::config::{PipelineConfig, RowOrder};
use crate::csv_export::export_csv;
use crate::csv_ingest::read_observations;
use crate::deduplicator::deduplicate;
use crate::distance_annotator::annotate_distances;
use crate::error::{Error, Result};
use crate::map_center::{map_center, MapView};
use crate::observation::{AnnotatedObservation, MapPoint, Observation};
use crate::plausibility_filter::{filter_plausible, DistanceStats, FilterSummary};
use crate::time_order::sort_by_time;

/// Chart and map data; only exists when at least one row was retained.
#[derive(Debug, Clone)]
pub struct Visualization {
    pub category_counts: CategoryCounts,
    pub satellite_distribution: Vec<SatelliteFrequency>,
    pub map_points: Vec<MapPoint>,
    pub map_view: MapView,
}

/// Everything the visualization layer needs from one run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Deduplicated, annotated and filtered rows.
    pub table: Vec<AnnotatedObservation>,
    pub summary: FilterSummary,
    /// Spread of distances before filtering; `None` for an empty upload.
    pub distance_stats: Option<DistanceStats>,
    pub csv: Vec<u8>,
    visualization: Option<Visualization>,
}

impl PipelineReport {
    /// Charts and map for the retained rows, or [`Error::NoData`] when the
    /// upload was empty or the range removed every row.
    pub fn visualization(&self) -> Result<&Visualization> {
        self.visualization.as_ref().ok_or(Error::NoData)
    }
}

/// Parse an uploaded CSV and run the pipeline on it.
pub fn run_csv(bytes: &[u8], config: &PipelineConfig) -> Result<PipelineReport> {
    let observations = read_observations(bytes)?;
    run(observations, config)
}

/// Dedup, annotate, filter, then aggregate and locate in parallel.
///
/// The summary, table and CSV are always produced. Chart and map data are
/// skipped when nothing survives filtering; an unknown category still fails
/// the whole run.
pub fn run(observations: Vec<Observation>, config: &PipelineConfig) -> Result<PipelineReport> {
    let uploaded = observations.len();
    let ordered = match config.order {
        RowOrder::AsUploaded => observations,
        RowOrder::ByTime => sort_by_time(observations)?,
    };

    let unique = deduplicate(&ordered);
    let annotated = annotate_distances(unique);
    let distance_stats = DistanceStats::observe(&annotated);

    let outcome = filter_plausible(&annotated, config.range);
    let retained = outcome.retained;

    let visualization = if retained.is_empty() {
        warn!(uploaded, unique = annotated.len(), "no rows left after filtering");
        None
    } else {
        Some(visualize(&retained, config)?)
    };

    let csv = export_csv(&retained)?;

    info!(
        uploaded,
        unique = annotated.len(),
        retained = retained.len(),
        "pipeline run complete"
    );

    Ok(PipelineReport {
        table: retained,
        summary: outcome.summary,
        distance_stats,
        csv,
        visualization,
    })
}

fn visualize(retained: &[AnnotatedObservation], config: &PipelineConfig) -> Result<Visualization> {
    let (aggregates, center) = rayon::join(
        || -> Result<_> {
            let counts = count_categories(retained, &config.palette)?;
            let sats = satellite_distribution(retained)?;
            let points = colorize(retained, &config.palette)?;
            Ok((counts, sats, points))
        },
        || map_center(retained),
    );
    let (category_counts, satellite_distribution, map_points) = aggregates?;
    let center = center?;
    debug!(lat = center.latitude, lon = center.longitude, "map center");

    Ok(Visualization {
        category_counts,
        satellite_distribution,
        map_points,
        map_view: MapView::new(center, config.map),
    })
}
