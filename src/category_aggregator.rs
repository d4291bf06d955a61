//! Frequency tables over the retained observations.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::config::CategoryPalette;
use crate::error::{Error, Result};
use crate::observation::AnnotatedObservation;

/// Observations per category, ascending by category id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCounts(BTreeMap<i64, usize>);

impl CategoryCounts {
    pub fn get(&self, category: i64) -> usize {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SatelliteFrequency {
    pub sats: u32,
    pub count: usize,
}

/// Count observations per category.
///
/// Every palette category starts at zero so absent ones still show up.
/// Categories the palette doesn't know are counted as well, which keeps the
/// total equal to the row count; colorizing is where they get rejected.
pub fn count_categories(retained: &[AnnotatedObservation], palette: &CategoryPalette) -> Result<CategoryCounts> {
    if retained.is_empty() {
        return Err(Error::NoData);
    }

    let mut counts: BTreeMap<i64, usize> = palette.categories().map(|c| (c, 0)).collect();
    for row in retained {
        *counts.entry(row.observation.category).or_insert(0) += 1;
    }

    debug!(?counts, "category usage");
    Ok(CategoryCounts(counts))
}

/// Satellite-count frequency table, most common first.
pub fn satellite_distribution(retained: &[AnnotatedObservation]) -> Result<Vec<SatelliteFrequency>> {
    if retained.is_empty() {
        return Err(Error::NoData);
    }

    let mut by_sats: HashMap<u32, usize> = HashMap::new();
    for row in retained {
        *by_sats.entry(row.observation.sats).or_insert(0) += 1;
    }

    let mut distribution: Vec<SatelliteFrequency> = by_sats
        .into_iter()
        .map(|(sats, count)| SatelliteFrequency { sats, count })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then(a.sats.cmp(&b.sats)));

    Ok(distribution)
}
