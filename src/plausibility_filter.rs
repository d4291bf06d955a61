//! Plausibility filtering on inter-observation distance.
//!
//! Distances are not recomputed after filtering: a dropped row leaves a gap in
//! the chain and its successor keeps the distance to the dropped row.

use tracing::info;

use crate::config::PlausibilityRange;
use crate::distance_annotator::round_to;
use crate::observation::AnnotatedObservation;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSummary {
    pub range: PlausibilityRange,
    pub original_count: usize,
    pub filtered_count: usize,
    /// `None` when there was nothing to filter.
    pub percentage_reduction: Option<f64>,
}

impl FilterSummary {
    /// Sentence shown to the user after moving the range selector.
    pub fn message(&self) -> String {
        let reduction = match self.percentage_reduction {
            Some(p) => format!("{} %", p),
            None => "n/a (no data)".to_string(),
        };
        format!(
            "Minimum distance is {} meters and maximum distance is {} meters. \
             Your data are reduced by: {}. There are {} data rows now.",
            self.range.min_m(),
            self.range.max_m(),
            reduction,
            self.filtered_count
        )
    }
}

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub retained: Vec<AnnotatedObservation>,
    pub summary: FilterSummary,
}

/// `round(100 * (1 - filtered / original), 2)`, undefined for an empty input.
pub fn percentage_reduction(original: usize, filtered: usize) -> Option<f64> {
    if original == 0 {
        return None;
    }
    Some(round_to(100.0 * (1.0 - filtered as f64 / original as f64), 2))
}

/// Keep rows whose distance lies inside the range, bounds included.
pub fn filter_plausible(annotated: &[AnnotatedObservation], range: PlausibilityRange) -> FilterOutcome {
    let retained: Vec<AnnotatedObservation> = annotated
        .iter()
        .filter(|a| range.contains(a.distance))
        .cloned()
        .collect();

    let summary = FilterSummary {
        range,
        original_count: annotated.len(),
        filtered_count: retained.len(),
        percentage_reduction: percentage_reduction(annotated.len(), retained.len()),
    };

    info!(
        min_m = range.min_m(),
        max_m = range.max_m(),
        original = summary.original_count,
        filtered = summary.filtered_count,
        reduction_pct = ?summary.percentage_reduction,
        "plausibility filter applied"
    );

    FilterOutcome { retained, summary }
}

/// Observed distance spread before filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceStats {
    pub min_m: f64,
    pub max_m: f64,
    /// Upper end a range selector should offer.
    pub slider_upper_bound: u32,
}

impl DistanceStats {
    pub fn observe(annotated: &[AnnotatedObservation]) -> Option<Self> {
        let mut distances = annotated.iter().map(|a| a.distance);
        let first = distances.next()?;
        let (min_m, max_m) = distances.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self {
            min_m,
            max_m,
            slider_upper_bound: (max_m.floor() as u32).saturating_add(10),
        })
    }
}
