//! Collapses repeated fixes at the same location.

use std::collections::HashMap;

use tracing::debug;

use crate::observation::Observation;

/// Keep only the last observation for every distinct (latitude, longitude).
///
/// Retained rows come out in ascending order of their original index.
pub fn deduplicate(observations: &[Observation]) -> Vec<Observation> {
    let mut last_seen: HashMap<(u64, u64), usize> = HashMap::with_capacity(observations.len());
    for (idx, obs) in observations.iter().enumerate() {
        last_seen.insert(coordinate_key(obs), idx);
    }

    let kept: Vec<Observation> = observations
        .iter()
        .enumerate()
        .filter(|(idx, obs)| last_seen.get(&coordinate_key(obs)) == Some(idx))
        .map(|(_, obs)| obs.clone())
        .collect();

    debug!(
        input = observations.len(),
        kept = kept.len(),
        "removed duplicate locations"
    );
    kept
}

// Exact float identity; -0.0 and 0.0 are the same place.
fn coordinate_key(obs: &Observation) -> (u64, u64) {
    let norm = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
    (norm(obs.latitude), norm(obs.longitude))
}
