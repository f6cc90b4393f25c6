use crate::models::GeoPoint;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// Coordinates are taken in degrees and converted to radians internally.
#[inline]
pub fn haversine_distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    // Rounding can push `a` just past 1 for near-antipodal points
    let a = ((delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Snap a point onto a coarse grid
///
/// Points closer than `precision_deg` on both axes usually share a bucket,
/// which is what amenity lookup memoization keys on.
pub fn location_bucket(point: &GeoPoint, precision_deg: f64) -> (i64, i64) {
    let precision = if precision_deg > 0.0 { precision_deg } else { 0.001 };
    (
        (point.latitude / precision).floor() as i64,
        (point.longitude / precision).floor() as i64,
    )
}
