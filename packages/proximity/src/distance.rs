//! Great-circle distance on a spherical Earth.

use parcel_scout_proximity_models::Coordinate;

/// Mean Earth radius used by every distance in this workspace, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two coordinates, in meters.
///
/// No validation is performed: out-of-range or `NaN` inputs produce a
/// meaningless or `NaN` result. Use [`checked_distance`] when the inputs
/// come from a catalog.
#[must_use]
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (a.latitude - b.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);

    // Rounding can push `h` a hair past 1 for antipodal points.
    2.0 * EARTH_RADIUS_METERS * h.sqrt().clamp(-1.0, 1.0).asin()
}

/// Haversine distance, or `None` if either coordinate is invalid.
#[must_use]
pub fn checked_distance(a: Coordinate, b: Coordinate) -> Option<f64> {
    if !a.is_valid() || !b.is_valid() {
        return None;
    }

    let distance = haversine_distance(a, b);
    distance.is_finite().then_some(distance)
}
