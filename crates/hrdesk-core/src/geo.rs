//! Geographic value types shared by the geofence check and the RPC layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GeoError;

/// Radius applied when an office record does not carry its own.
pub const DEFAULT_ALLOWED_RADIUS_M: u32 = 150;

/// A validated WGS84 position in decimal degrees.
///
/// Construction goes through [`GeoCoordinate::new`] (or `FromStr` /
/// deserialization, which call it), so every value in the system satisfies
/// `latitude ∈ [-90, 90]` and `longitude ∈ [-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for GeoCoordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl GeoCoordinate {
    /// # Errors
    ///
    /// Returns [`GeoError`] when either component is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Renders the position the way the attendance backend stores it:
    /// six decimals, comma-space separated.
    #[must_use]
    pub fn to_wire(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl FromStr for GeoCoordinate {
    type Err = GeoError;

    /// Accepts `"lat,lon"` with optional whitespace around either part.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || GeoError::Unparseable(s.to_string());
        let (lat, lon) = s.split_once(',').ok_or_else(unparseable)?;
        let latitude = lat.trim().parse::<f64>().map_err(|_| unparseable())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| unparseable())?;
        Self::new(latitude, longitude)
    }
}

/// One device position fix. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationSample {
    pub coordinate: GeoCoordinate,
    /// Reported horizontal accuracy in meters, if the provider knows it.
    /// Informational only; it never gates a decision.
    pub accuracy_m: Option<f64>,
}

impl LocationSample {
    #[must_use]
    pub fn new(coordinate: GeoCoordinate, accuracy_m: Option<f64>) -> Self {
        Self {
            coordinate,
            accuracy_m,
        }
    }
}

/// A registered office a user may check in at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeLocation {
    pub id: String,
    pub name: String,
    pub coordinate: GeoCoordinate,
    #[serde(default = "default_radius")]
    pub allowed_radius_m: u32,
}

fn default_radius() -> u32 {
    DEFAULT_ALLOWED_RADIUS_M
}

impl OfficeLocation {
    /// Builds an office with the default 150 m radius.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: GeoCoordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            allowed_radius_m: DEFAULT_ALLOWED_RADIUS_M,
        }
    }

    #[must_use]
    pub fn with_radius(mut self, allowed_radius_m: u32) -> Self {
        self.allowed_radius_m = allowed_radius_m;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_values() {
        assert!(GeoCoordinate::new(90.0, 180.0).is_ok());
        assert!(GeoCoordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            GeoCoordinate::new(90.5, 0.0),
            Err(GeoError::LatitudeOutOfRange(90.5))
        );
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            GeoCoordinate::new(0.0, -180.01),
            Err(GeoError::LongitudeOutOfRange(-180.01))
        );
    }

    #[test]
    fn rejects_nan() {
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn wire_format_uses_six_decimals_and_comma_space() {
        let c = GeoCoordinate::new(31.991_356_918_750_33, 35.948_458_682_126_73).unwrap();
        assert_eq!(c.to_wire(), "31.991357, 35.948459");
    }

    #[test]
    fn wire_format_pads_whole_degrees() {
        let c = GeoCoordinate::new(-1.0, 0.0).unwrap();
        assert_eq!(c.to_wire(), "-1.000000, 0.000000");
    }

    #[test]
    fn parses_from_str_with_and_without_space() {
        let a: GeoCoordinate = "31.5,35.25".parse().unwrap();
        let b: GeoCoordinate = " 31.5 , 35.25 ".parse().unwrap();
        assert_eq!(a, b);
        assert!((a.latitude() - 31.5).abs() < f64::EPSILON);
    }

    #[test]
    fn from_str_rejects_garbage_and_out_of_range() {
        assert!(matches!(
            "north".parse::<GeoCoordinate>(),
            Err(GeoError::Unparseable(_))
        ));
        assert!(matches!(
            "91,0".parse::<GeoCoordinate>(),
            Err(GeoError::LatitudeOutOfRange(_))
        ));
    }

    #[test]
    fn deserialize_validates_range() {
        let ok: Result<GeoCoordinate, _> =
            serde_json::from_str(r#"{"latitude": 10.0, "longitude": 20.0}"#);
        assert!(ok.is_ok());
        let bad: Result<GeoCoordinate, _> =
            serde_json::from_str(r#"{"latitude": 100.0, "longitude": 20.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn office_defaults_radius_when_missing() {
        let office: OfficeLocation = serde_json::from_str(
            r#"{"id": "hq", "name": "HQ", "coordinate": {"latitude": 1.0, "longitude": 2.0}}"#,
        )
        .unwrap();
        assert_eq!(office.allowed_radius_m, DEFAULT_ALLOWED_RADIUS_M);
    }
}
