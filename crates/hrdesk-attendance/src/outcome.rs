//! What the UI shows after an attendance action.

use hrdesk_core::Direction;
use serde::Serialize;

use crate::action::ActionSuccess;
use crate::error::AttendanceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// Flattened result of one check-in/out, ready for display or JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub outcome: Outcome,
    pub direction: Direction,
    /// Stable machine-readable code: `ok` or the failure reason.
    pub reason_code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_time: Option<String>,
    pub message: String,
}

impl ActionOutcome {
    #[must_use]
    pub fn from_result(
        direction: Direction,
        result: &Result<ActionSuccess, AttendanceError>,
    ) -> Self {
        match result {
            Ok(success) => Self {
                outcome: Outcome::Succeeded,
                direction,
                reason_code: "ok",
                distance_m: Some(success.distance_m),
                server_time: Some(success.server_time.clone()),
                message: success_message(direction, &success.server_time),
            },
            Err(err) => Self {
                outcome: Outcome::Failed,
                direction,
                reason_code: reason_code(err),
                distance_m: match err {
                    AttendanceError::OutOfRange { distance_m, .. } => Some(*distance_m),
                    _ => None,
                },
                server_time: None,
                message: user_message(err),
            },
        }
    }
}

fn success_message(direction: Direction, time: &str) -> String {
    match direction {
        Direction::In => format!("Successfully checked in at {time}"),
        Direction::Out => format!("Successfully checked out at {time}"),
    }
}

#[must_use]
pub fn reason_code(err: &AttendanceError) -> &'static str {
    match err {
        AttendanceError::NoOfficeSelected => "no_office_selected",
        AttendanceError::PermissionDenied => "permission_denied",
        AttendanceError::LocationUnavailable(_) => "location_unavailable",
        AttendanceError::LocationTimeout { .. } => "location_timeout",
        AttendanceError::OutOfRange { .. } => "out_of_range",
        AttendanceError::DuplicateAction { .. } => "duplicate_action",
        AttendanceError::NotCheckedIn => "not_checked_in",
        AttendanceError::NetworkError(_) => "network_error",
        AttendanceError::ServerError { .. } => "server_error",
        AttendanceError::DeviceNotRegistered => "device_not_registered",
    }
}

/// One human-readable message per failure kind.
#[must_use]
pub fn user_message(err: &AttendanceError) -> String {
    match err {
        AttendanceError::NoOfficeSelected => {
            "No office selected. Choose an office before checking in or out.".into()
        }
        AttendanceError::PermissionDenied => {
            "Location permission is not granted. Enable it in settings and try again.".into()
        }
        AttendanceError::LocationUnavailable(_) => {
            "Your location could not be determined. Check that location services are on.".into()
        }
        AttendanceError::LocationTimeout { .. } => {
            "Timed out waiting for your location. Please try again.".into()
        }
        AttendanceError::OutOfRange {
            distance_m,
            allowed_radius_m,
        } => format!(
            "You are {distance_m}m away from the office. \
             You must be within {allowed_radius_m}m to check in or out."
        ),
        AttendanceError::DuplicateAction {
            direction: Direction::In,
        } => "You have already checked in today.".into(),
        AttendanceError::DuplicateAction {
            direction: Direction::Out,
        } => "You have already checked out today.".into(),
        AttendanceError::NotCheckedIn => {
            "You are not checked in. Please check in first before trying to check out.".into()
        }
        AttendanceError::NetworkError(_) => "Network error. Please try again.".into(),
        AttendanceError::ServerError { message: Some(m) } if !m.trim().is_empty() => m.clone(),
        AttendanceError::ServerError { .. } => {
            "Failed to process request. Please try again.".into()
        }
        AttendanceError::DeviceNotRegistered => {
            "This device is not registered for your account. Sign in again to register it.".into()
        }
    }
}
