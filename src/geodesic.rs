//! Great-circle distance on a spherical Earth.
//!
//! No range validation is done: coordinates outside ±90/±180 still produce a
//! number, it just isn't meaningful.

use crate::observation::Position;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two positions, in kilometers.
pub fn haversine_km(origin: Position, destination: Position) -> f64 {
    let lat1 = origin.latitude.to_radians();
    let lat2 = destination.latitude.to_radians();
    let d_lat = (destination.latitude - origin.latitude).to_radians();
    let d_lon = (destination.longitude - origin.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Same distance expressed in meters.
pub fn haversine_m(origin: Position, destination: Position) -> f64 {
    haversine_km(origin, destination) * 1000.0
}
