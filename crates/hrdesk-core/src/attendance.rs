use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::geo::GeoCoordinate;
use crate::geofence::GeofenceVerdict;

/// Which attendance action the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// Value sent in the backend's `TYPE` field.
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Direction::In => "In",
            Direction::Out => "Out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            other => Err(format!("unknown direction \"{other}\"; expected in or out")),
        }
    }
}

/// The signed-in user as remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    /// Device id registered with the backend for this user, once known.
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub is_hr: bool,
}

/// A check-in/out submission.
///
/// The only constructor takes a [`GeofenceVerdict`] and refuses one that is
/// out of range, so no request for a position outside the office radius can
/// exist.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRequest {
    user_id: String,
    device_id: String,
    direction: Direction,
    at: NaiveDateTime,
    location: GeoCoordinate,
}

impl AttendanceRequest {
    /// Returns `None` unless `verdict.is_within_range`.
    #[must_use]
    pub fn from_verdict(
        verdict: &GeofenceVerdict,
        user_id: &str,
        device_id: &str,
        direction: Direction,
        at: NaiveDateTime,
    ) -> Option<Self> {
        if !verdict.is_within_range {
            return None;
        }
        Some(Self {
            user_id: user_id.to_string(),
            device_id: device_id.to_string(),
            direction,
            at,
            location: verdict.sample.coordinate,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn location(&self) -> GeoCoordinate {
        self.location
    }

    #[must_use]
    pub fn wire_date(&self) -> String {
        format_wire_date(self.at.date())
    }

    #[must_use]
    pub fn wire_time(&self) -> String {
        format_wire_time(self.at.time())
    }
}

/// `DD/MM/YYYY`, the only date format the backend accepts.
#[must_use]
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `HH:MM`, 24-hour clock.
#[must_use]
pub fn format_wire_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("IN".parse::<Direction>(), Ok(Direction::In));
        assert_eq!("out".parse::<Direction>(), Ok(Direction::Out));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn wire_date_is_day_first_and_zero_padded() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_wire_date(d), "07/03/2025");
    }

    #[test]
    fn wire_time_is_24_hour_without_seconds() {
        let t = NaiveTime::from_hms_opt(17, 5, 59).unwrap();
        assert_eq!(format_wire_time(t), "17:05");
    }

    fn verdict(within: bool) -> GeofenceVerdict {
        let coordinate = GeoCoordinate::new(31.99, 35.94).unwrap();
        GeofenceVerdict {
            is_within_range: within,
            distance_m: if within { 10 } else { 900 },
            sample: crate::LocationSample::new(coordinate, None),
        }
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 9)
            .unwrap()
            .and_hms_opt(8, 4, 30)
            .unwrap()
    }

    #[test]
    fn request_refuses_out_of_range_verdict() {
        assert!(AttendanceRequest::from_verdict(&verdict(false), "1001", "dev", Direction::In, at())
            .is_none());
    }

    #[test]
    fn request_carries_wire_fields() {
        let req =
            AttendanceRequest::from_verdict(&verdict(true), "1001", "dev-1", Direction::Out, at())
                .unwrap();
        assert_eq!(req.wire_date(), "09/01/2025");
        assert_eq!(req.wire_time(), "08:04");
        assert_eq!(req.location().to_wire(), "31.990000, 35.940000");
        assert_eq!(req.direction(), Direction::Out);
        assert_eq!(req.device_id(), "dev-1");
    }

    #[test]
    fn session_tolerates_missing_optional_fields() {
        let s: Session = serde_json::from_str(r#"{"user_id": "1001"}"#).unwrap();
        assert_eq!(s.device_id, None);
        assert!(!s.is_hr);
    }
}
