//! Where to center the map view.
//!
//! Plain arithmetic mean of latitudes and longitudes. Fine for a compact
//! track, wrong for sets spanning the antimeridian or a pole.

use geo::{Centroid, MultiPoint, Point};
use serde::Serialize;

use crate::config::{MapStyle, MapViewOptions};
use crate::distance_annotator::round_to;
use crate::error::{Error, Result};
use crate::observation::AnnotatedObservation;

pub const DEFAULT_ZOOM: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub latitude: f64,
    pub longitude: f64,
}

impl MapCenter {
    pub fn rounded(&self, decimals: i32) -> Self {
        Self {
            latitude: round_to(self.latitude, decimals),
            longitude: round_to(self.longitude, decimals),
        }
    }
}

pub fn map_center(retained: &[AnnotatedObservation]) -> Result<MapCenter> {
    let points: MultiPoint = retained
        .iter()
        .map(|row| Point::from(row.position()))
        .collect::<Vec<_>>()
        .into();
    let centroid = points.centroid().ok_or(Error::NoData)?;
    Ok(MapCenter {
        latitude: centroid.y(),
        longitude: centroid.x(),
    })
}

/// Initial view state for the scatter and heatmap layers.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: MapCenter,
    pub zoom: u8,
    pub pitch: u8,
    pub style: MapStyle,
    pub marker_radius: u32,
}

impl MapView {
    pub fn new(center: MapCenter, options: MapViewOptions) -> Self {
        Self {
            center,
            zoom: DEFAULT_ZOOM,
            pitch: 0,
            style: options.style,
            marker_radius: options.marker_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::fix;

    fn at(points: &[(f64, f64)]) -> Vec<AnnotatedObservation> {
        points
            .iter()
            .map(|&(lat, lon)| AnnotatedObservation {
                observation: fix("t", lat, lon, 5, 1),
                distance: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_identical_points_center_on_themselves() {
        let center = map_center(&at(&[(53.3498, -6.2603); 4])).unwrap();
        assert!((center.latitude - 53.3498).abs() < 1e-12);
        assert!((center.longitude + 6.2603).abs() < 1e-12);
    }

    #[test]
    fn test_center_is_arithmetic_mean() {
        let center = map_center(&at(&[(46.0, 14.0), (46.2, 14.6), (46.1, 14.2)])).unwrap();
        assert!((center.latitude - 46.1).abs() < 1e-9);
        assert!((center.longitude - 14.266_666_666).abs() < 1e-6);
        assert_eq!(center.rounded(4).longitude, 14.2667);
    }

    #[test]
    fn test_empty_set_is_no_data() {
        assert!(matches!(map_center(&[]), Err(Error::NoData)));
    }

    #[test]
    fn test_view_carries_options() {
        let center = MapCenter { latitude: 1.0, longitude: 2.0 };
        let view = MapView::new(center, MapViewOptions::new(12, MapStyle::Light).unwrap());
        assert_eq!(view.zoom, 13);
        assert_eq!(view.marker_radius, 12);
        assert_eq!(view.style.url(), "mapbox://styles/mapbox/streets-v8");
    }
}
