//! Conversion from loosely typed backend replies into domain types.

use hrdesk_core::{GeoCoordinate, GroupRules, LeaveKind, LeaveType, OfficeLocation};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{
    CheckInOutReply, LoginOutcome, RawGroupDetails, RawLeaveType, RawLogin, RawOffice, RawRes,
    SubmitReply, TokenRegistration,
};

/// `holidayOrLeave` value marking a whole-day leave type.
const FULL_DAY_MARKER: &str = "اجازة";

/// Replaces Arabic-Indic digits (`٠`–`٩`) with ASCII digits.
///
/// Devices set to an Arabic locale produce these in formatted dates and
/// times; the backend only understands ASCII.
#[must_use]
pub fn normalize_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => {
                char::from_digit(u32::from(c) - 0x0660, 10).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// String form of a JSON scalar; `None` for null, empty strings and containers.
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => normalize_digits(s.trim()).parse().ok(),
        _ => None,
    }
}

pub(crate) fn value_to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => normalize_digits(s.trim()).parse().ok(),
        _ => None,
    }
}

/// Yes/no flags: `true`, `1`, `"Y"`, `"yes"`, `"true"`, `"1"`.
pub(crate) fn value_to_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "y" | "yes" | "true" | "1"
        ),
        _ => false,
    }
}

/// Loose truthiness for status fields that are sometimes booleans and
/// sometimes free text: any non-empty string other than `"false"`/`"0"`.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false")
        }
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Serde helper accepting either a JSON string or number as a `String`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_string(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected string or number, got {value}")))
}

/// Like [`string_or_number`] but maps null, missing and empty values to `None`.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

#[must_use]
pub fn normalize_login(raw: &RawLogin) -> LoginOutcome {
    LoginOutcome {
        authenticated: value_to_flag(&raw.result),
        is_hr: raw.is_hr.as_deref() == Some("Y"),
        user_dev_id: value_to_string(&raw.user_dev_id),
    }
}

/// # Errors
///
/// Returns a reason string when the id is missing or coordinates are absent
/// or out of range.
pub fn normalize_office(raw: &RawOffice) -> Result<OfficeLocation, String> {
    let id = value_to_string(&raw.id).ok_or_else(|| "office without id".to_string())?;
    let latitude =
        value_to_f64(&raw.latitude).ok_or_else(|| format!("office {id}: missing latitude"))?;
    let longitude =
        value_to_f64(&raw.longitude).ok_or_else(|| format!("office {id}: missing longitude"))?;
    let coordinate =
        GeoCoordinate::new(latitude, longitude).map_err(|e| format!("office {id}: {e}"))?;

    let name = raw.name.clone().unwrap_or_else(|| id.clone());
    let office = OfficeLocation::new(id, name, coordinate);
    Ok(match value_to_u32(&raw.radius) {
        Some(radius) if radius > 0 => office.with_radius(radius),
        _ => office,
    })
}

#[must_use]
pub fn normalize_check_in_out(raw: RawRes) -> CheckInOutReply {
    match raw.res.as_str() {
        Some("ok") => CheckInOutReply::Recorded { time: raw.time },
        Some("notCheckedIn") => CheckInOutReply::NotCheckedIn,
        Some("tokenExists") => CheckInOutReply::DeviceNotRegistered,
        other => CheckInOutReply::Rejected {
            message: raw
                .error
                .or(raw.msg)
                .or_else(|| other.filter(|s| !s.is_empty()).map(str::to_string)),
        },
    }
}

#[must_use]
pub fn normalize_token_registration(raw: &RawRes) -> TokenRegistration {
    match raw.res.as_str() {
        Some("ok") => TokenRegistration::Registered,
        Some("exists") => TokenRegistration::AlreadyClaimed,
        _ => TokenRegistration::Other(value_to_string(&raw.res).unwrap_or_default()),
    }
}

#[must_use]
pub fn normalize_submit(raw: RawRes) -> SubmitReply {
    SubmitReply {
        accepted: is_truthy(&raw.res),
        message: raw.msg.or(raw.error),
    }
}

/// # Errors
///
/// Returns a reason string when the leave type has no id.
pub fn normalize_leave_type(raw: &RawLeaveType) -> Result<LeaveType, String> {
    let id = value_to_string(&raw.id)
        .ok_or_else(|| format!("leave type \"{}\" without id", raw.desc))?;
    let kind = if raw.holiday_or_leave.as_deref().map(str::trim) == Some(FULL_DAY_MARKER) {
        LeaveKind::FullDay
    } else {
        LeaveKind::Hourly
    };
    Ok(LeaveType {
        id,
        desc: raw.desc.clone(),
        kind,
        attachment_required: value_to_flag(&raw.attachment_required),
    })
}

/// `None` when the user belongs to no group with date restrictions.
#[must_use]
pub fn normalize_group(raw: &RawGroupDetails) -> Option<GroupRules> {
    if raw.res.as_str() != Some("ok") {
        return None;
    }
    let pair = |from: &Value, to: &Value| Some((value_to_u32(from)?, value_to_u32(to)?));
    Some(GroupRules {
        exclude_early: pair(&raw.exclude_early_from, &raw.exclude_early_to),
        exclude_late: pair(&raw.exclude_late_from, &raw.exclude_late_to),
        exclude_thu_sat: value_to_flag(&raw.exclude_th_sat),
    })
}

/// `checkIsChecked` answers `{"res": "Y"}` when the action was already taken.
#[must_use]
pub fn normalize_is_checked(raw: &RawRes) -> bool {
    value_to_flag(&raw.res)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
