//! Distance from each observation to the one before it.

use tracing::debug;

use crate::geodesic::haversine_m;
use crate::observation::{AnnotatedObservation, Observation, Position};

/// Round to a fixed number of decimal places; exact halves go to the even digit.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Attach the haversine distance to the previous row, in meters rounded to
/// two decimals. The first row has no predecessor and gets 0.
pub fn annotate_distances(observations: Vec<Observation>) -> Vec<AnnotatedObservation> {
    let mut previous: Option<Position> = None;

    let annotated: Vec<AnnotatedObservation> = observations
        .into_iter()
        .map(|observation| {
            let position = observation.position();
            let distance = previous.map_or(0.0, |prev| round_to(haversine_m(prev, position), 2));
            previous = Some(position);
            AnnotatedObservation { observation, distance }
        })
        .collect();

    if let Some(max) = annotated.iter().map(|a| a.distance).reduce(f64::max) {
        debug!(rows = annotated.len(), max_distance_m = max, "annotated distances");
    }
    annotated
}
