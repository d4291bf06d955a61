//! Observation records flowing through the cleaning pipeline.

use geo::{point, Point};
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        point!(x: p.longitude, y: p.latitude)
    }
}

/// One GPS fix as uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sats: u32,
    pub precision: f64,
    pub category: i64,
    #[serde(default)]
    pub rawtime: Option<String>,
}

impl Observation {
    pub fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }
}

/// An observation with its distance to the preceding row, in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedObservation {
    pub observation: Observation,
    pub distance: f64,
}

impl AnnotatedObservation {
    pub fn position(&self) -> Position {
        self.observation.position()
    }
}

/// A colored point ready for a scatter or heatmap layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub category: i64,
    pub color: [u8; 4],
}

#[cfg(test)]
pub(crate) fn fix(time: &str, latitude: f64, longitude: f64, sats: u32, category: i64) -> Observation {
    Observation {
        time: time.to_string(),
        latitude,
        longitude,
        sats,
        precision: 1.5,
        category,
        rawtime: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_to_geo_point_swaps_axes() {
        let p: Point = Position::new(46.05, 14.5).into();
        assert_eq!(p.x(), 14.5);
        assert_eq!(p.y(), 46.05);
    }
}
