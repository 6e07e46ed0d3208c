//! Great-circle distance and the office range decision.
//!
//! Everything here is pure: no I/O, no clocks, no hidden state. The same
//! inputs always produce bit-identical verdicts.

use serde::Serialize;

use crate::geo::{GeoCoordinate, LocationSample, OfficeLocation};

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two coordinates.
#[must_use]
pub fn distance_m(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let phi1 = a.latitude().to_radians();
    let phi2 = b.latitude().to_radians();
    let d_phi = (b.latitude() - a.latitude()).to_radians();
    let d_lambda = (b.longitude() - a.longitude()).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Outcome of comparing one location fix against one office.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeofenceVerdict {
    pub is_within_range: bool,
    /// Distance rounded to the nearest meter.
    pub distance_m: u32,
    pub sample: LocationSample,
}

/// Decides whether `sample` lies inside `office`'s radius.
///
/// The unrounded distance is compared against the radius (inclusive); only
/// the reported distance is rounded.
#[must_use]
pub fn evaluate(sample: LocationSample, office: &OfficeLocation) -> GeofenceVerdict {
    let raw = distance_m(sample.coordinate, office.coordinate);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = raw.round() as u32;

    GeofenceVerdict {
        is_within_range: raw <= f64::from(office.allowed_radius_m),
        distance_m: rounded,
        sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).unwrap()
    }

    fn office_at(c: GeoCoordinate, radius: u32) -> OfficeLocation {
        OfficeLocation::new("hq", "Head Office", c).with_radius(radius)
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let c = coord(31.991_356_918_750_33, 35.948_458_682_126_73);
        assert!(distance_m(c, c).abs() < f64::EPSILON);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = distance_m(coord(0.0, 0.0), coord(0.0, 1.0));
        assert!((d - 111_195.0).abs() <= 1.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (coord(31.99, 35.94), coord(32.01, 35.87)),
            (coord(-33.86, 151.21), coord(51.5, -0.12)),
            (coord(89.9, 10.0), coord(-89.9, -170.0)),
            (coord(0.0, 179.9), coord(0.0, -179.9)),
        ];
        for (a, b) in pairs {
            assert_eq!(distance_m(a, b).to_bits(), distance_m(b, a).to_bits());
        }
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = distance_m(coord(0.0, 0.0), coord(0.0, 180.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((d - half).abs() < 1.0);
    }

    #[test]
    fn sample_at_office_is_in_range() {
        let c = coord(31.991_356_918_750_33, 35.948_458_682_126_73);
        let verdict = evaluate(LocationSample::new(c, Some(12.0)), &office_at(c, 150));
        assert!(verdict.is_within_range);
        assert_eq!(verdict.distance_m, 0);
    }

    #[test]
    fn boundary_uses_unrounded_distance() {
        // 0.001 degrees of longitude at the equator is about 111.195 m.
        let office_coord = coord(0.0, 0.0);
        let sample = LocationSample::new(coord(0.0, 0.001), None);

        let inside = evaluate(sample, &office_at(office_coord, 112));
        assert!(inside.is_within_range);
        assert_eq!(inside.distance_m, 111);

        let shown_equal_but_over = evaluate(sample, &office_at(office_coord, 111));
        assert_eq!(shown_equal_but_over.distance_m, 111);
        assert!(!shown_equal_but_over.is_within_range);
    }

    #[test]
    fn distance_equal_to_radius_is_in_range() {
        let c = coord(12.5, -45.25);
        let verdict = evaluate(LocationSample::new(c, None), &office_at(c, 0));
        assert!(verdict.is_within_range);
    }

    /// A point `meters` due north of `origin`.
    fn north_of(origin: GeoCoordinate, meters: f64) -> GeoCoordinate {
        let d_lat = (meters / EARTH_RADIUS_M).to_degrees();
        coord(origin.latitude() + d_lat, origin.longitude())
    }

    #[test]
    fn fraction_of_a_meter_past_radius_is_out_of_range() {
        let office_coord = coord(31.991_356_918_750_33, 35.948_458_682_126_73);
        let office = office_at(office_coord, 150);

        let over = evaluate(LocationSample::new(north_of(office_coord, 150.4), None), &office);
        assert_eq!(over.distance_m, 150);
        assert!(!over.is_within_range);

        let under = evaluate(LocationSample::new(north_of(office_coord, 149.6), None), &office);
        assert_eq!(under.distance_m, 150);
        assert!(under.is_within_range);
    }

    #[test]
    fn far_sample_is_out_of_range() {
        let office_coord = coord(31.991_356_918_750_33, 35.948_458_682_126_73);
        // ~0.0045 degrees of latitude is roughly 500 m.
        let sample = LocationSample::new(coord(31.995_853_5, 35.948_458_682_126_73), None);
        let verdict = evaluate(sample, &office_at(office_coord, 150));
        assert!(!verdict.is_within_range);
        assert!((499..=501).contains(&verdict.distance_m));
    }

    #[test]
    fn repeated_evaluation_is_bit_identical() {
        let office = office_at(coord(31.99, 35.94), 150);
        let sample = LocationSample::new(coord(31.9905, 35.9402), Some(5.0));
        let first = evaluate(sample, &office);
        for _ in 0..10 {
            assert_eq!(evaluate(sample, &office), first);
        }
    }
}
