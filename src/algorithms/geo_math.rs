//! Spherical-earth geodesy for short-range AR placement
//!
//! All functions are pure. Distances use the haversine formula on a sphere of
//! mean Earth radius, and local projection uses the tangent-plane
//! approximation: a point is placed at its great-circle distance along its
//! initial bearing from the origin, in a flat frame with x east, y up and
//! z north. That is accurate to well under a percent for the tens to low
//! hundreds of meters AR content lives in; error grows with range and near
//! the poles and is not corrected.

use crate::core::{Bearing, GeoPoint, LocalVector, EARTH_MEAN_RADIUS_M};

/// Initial great-circle bearing from `source` to `dest`.
///
/// Identical positions have no defined direction; the result is then north (0°).
pub fn bearing(source: &GeoPoint, dest: &GeoPoint) -> Bearing {
    if source.same_position(dest) {
        return Bearing::NORTH;
    }

    let lat1 = source.latitude().to_radians();
    let lat2 = dest.latitude().to_radians();
    let d_lon = (dest.longitude() - source.longitude()).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    Bearing::from_radians(y.atan2(x))
}

/// Haversine great-circle distance in meters
pub fn distance(source: &GeoPoint, dest: &GeoPoint) -> f64 {
    let lat1 = source.latitude().to_radians();
    let lat2 = dest.latitude().to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (dest.longitude() - source.longitude()).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for near-antipodal points
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_MEAN_RADIUS_M * c
}

/// Offset of `point` in the tangent plane at `origin`.
///
/// The vertical component is the altitude difference when both points carry
/// an altitude, zero otherwise.
pub fn project(origin: &GeoPoint, point: &GeoPoint) -> LocalVector {
    let d = distance(origin, point);
    let b = bearing(origin, point).radians();

    let y = match (origin.altitude(), point.altitude()) {
        (Some(from), Some(to)) => to - from,
        _ => 0.0,
    };

    LocalVector::new(d * b.sin(), y, d * b.cos())
}

/// Point reached by travelling `distance_m` from `start` along the great
/// circle leaving at `heading`. Altitude is carried over unchanged.
///
/// A zero or non-finite distance leaves the point where it is.
pub fn destination(start: &GeoPoint, heading: Bearing, distance_m: f64) -> GeoPoint {
    if distance_m == 0.0 || !distance_m.is_finite() {
        return *start;
    }

    let delta = distance_m / EARTH_MEAN_RADIUS_M;
    let theta = heading.radians();
    let lat1 = start.latitude().to_radians();
    let lon1 = start.longitude().to_radians();

    let sin_lat2 = lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

    if !lat2.is_finite() || !lon2.is_finite() {
        return *start;
    }
    GeoPoint::from_computed(lat2.to_degrees(), lon2.to_degrees(), start.altitude())
}

/// Inverse of [`project`]: the geodetic point at a local offset from `origin`.
///
/// Altitude is `origin.altitude + y` when the origin has one.
pub fn unproject(origin: &GeoPoint, local: &LocalVector) -> GeoPoint {
    let heading = Bearing::from_radians(local.x.atan2(local.z));
    let point = destination(origin, heading, local.horizontal_distance());
    point.at_altitude(origin.altitude().map(|alt| alt + local.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = point(0.0, 0.0);
        assert_abs_diff_eq!(bearing(&origin, &point(1.0, 0.0)).degrees(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing(&origin, &point(0.0, 1.0)).degrees(), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing(&origin, &point(-1.0, 0.0)).degrees(), 180.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing(&origin, &point(0.0, -1.0)).degrees(), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_always_in_range() {
        let points = [
            point(51.5007, -0.1246),
            point(-33.8688, 151.2093),
            point(89.9, 179.9),
            point(-89.9, -179.9),
            point(0.0, 0.0),
        ];
        for a in &points {
            for b in &points {
                let deg = bearing(a, b).degrees();
                assert!((0.0..360.0).contains(&deg), "bearing {} out of range", deg);
            }
        }
    }

    #[test]
    fn test_degenerate_bearing_is_north() {
        let p = point(51.5007, -0.1246);
        assert_eq!(bearing(&p, &p), Bearing::NORTH);

        let high = GeoPoint::with_altitude(51.5007, -0.1246, 30.0).unwrap();
        assert_eq!(bearing(&p, &high), Bearing::NORTH);
    }

    #[test]
    fn test_distance_symmetry_and_zero() {
        let a = point(37.7749, -122.4194);
        let b = point(34.0522, -118.2437);
        assert_relative_eq!(distance(&a, &b), distance(&b, &a), max_relative = 1e-12);
        assert_eq!(distance(&a, &a), 0.0);

        // San Francisco to Los Angeles is roughly 559 km
        assert!((distance(&a, &b) - 559_000.0).abs() < 10_000.0);
    }

    #[test]
    fn test_project_origin_is_zero() {
        for origin in [point(0.0, 0.0), point(51.5007, -0.1246), point(-45.0, 170.0)] {
            let local = project(&origin, &origin);
            assert_eq!(local, LocalVector::zeros());
        }
    }

    #[test]
    fn test_project_north_round_trip() {
        let origin = point(0.0, 0.0);
        let target = point(0.001, 0.0);
        let local = project(&origin, &target);

        assert_abs_diff_eq!(local.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(local.y, 0.0);
        assert_relative_eq!(local.z, 111.0, max_relative = 0.01);
        assert_relative_eq!(local.magnitude(), distance(&origin, &target), max_relative = 1e-9);
    }

    #[test]
    fn test_westminster_example() {
        let origin = point(51.5007, -0.1246);
        let target = point(51.5014, -0.1246);

        assert_abs_diff_eq!(bearing(&origin, &target).degrees(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(distance(&origin, &target), 78.0, epsilon = 1.0);

        let local = project(&origin, &target);
        assert_abs_diff_eq!(local.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(local.z, 78.0, epsilon = 1.0);
    }

    #[test]
    fn test_project_altitude_is_optional() {
        let origin = GeoPoint::with_altitude(10.0, 10.0, 100.0).unwrap();
        let above = GeoPoint::with_altitude(10.0005, 10.0, 112.5).unwrap();
        assert_abs_diff_eq!(project(&origin, &above).y, 12.5, epsilon = 1e-9);

        let no_alt = point(10.0005, 10.0);
        assert_eq!(project(&origin, &no_alt).y, 0.0);
        assert_eq!(project(&point(10.0, 10.0), &above).y, 0.0);
    }

    #[test]
    fn test_destination_east() {
        let start = point(51.5007, -0.1246);
        let moved = destination(&start, Bearing::EAST, 6.0);
        let local = project(&start, &moved);

        assert_abs_diff_eq!(local.x, 6.0, epsilon = 1e-3);
        assert_abs_diff_eq!(local.z, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(distance(&start, &moved), 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let start = point(0.0, 179.9999);
        let moved = destination(&start, Bearing::EAST, 100.0);
        assert!(moved.longitude() < -179.0);
        assert_abs_diff_eq!(distance(&start, &moved), 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_destination_ignores_non_finite_distance() {
        let start = point(51.5007, -0.1246);
        assert_eq!(destination(&start, Bearing::EAST, f64::INFINITY), start);
        assert_eq!(destination(&start, Bearing::EAST, f64::NAN), start);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let origin = GeoPoint::with_altitude(48.8584, 2.2945, 35.0).unwrap();
        let local = LocalVector::new(-42.0, 3.0, 87.5);
        let geo = unproject(&origin, &local);
        let back = project(&origin, &geo);

        assert_abs_diff_eq!(back.x, local.x, epsilon = 1e-4);
        assert_abs_diff_eq!(back.y, local.y, epsilon = 1e-9);
        assert_abs_diff_eq!(back.z, local.z, epsilon = 1e-4);
    }
}
