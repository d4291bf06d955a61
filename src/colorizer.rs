//! Category colors for the map layers.

use crate::config::CategoryPalette;
use crate::error::Result;
use crate::observation::{AnnotatedObservation, MapPoint};

/// Color every row by its category. A category missing from the palette is
/// an error, never a fallback color.
pub fn colorize(retained: &[AnnotatedObservation], palette: &CategoryPalette) -> Result<Vec<MapPoint>> {
    retained
        .iter()
        .map(|row| -> Result<MapPoint> {
            let obs = &row.observation;
            Ok(MapPoint {
                latitude: obs.latitude,
                longitude: obs.longitude,
                category: obs.category,
                color: palette.color(obs.category)?,
            })
        })
        .collect()
}
