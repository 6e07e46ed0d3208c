//! Wire types for the HR service backend.
//!
//! The backend is a legacy form-encoded RPC endpoint whose JSON replies are
//! loosely typed: ids, coordinates and flags arrive as either strings or
//! numbers depending on the action. Raw structs here keep such fields as
//! [`serde_json::Value`]; [`crate::normalize`] turns them into domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{opt_string_or_number, string_or_number};

// ---------------------------------------------------------------------------
// checkLogin
// ---------------------------------------------------------------------------

/// `{"result": true, "isHr": "Y", "userdevId": "..."}`
#[derive(Debug, Deserialize)]
pub struct RawLogin {
    #[serde(default)]
    pub result: Value,
    #[serde(rename = "isHr", default)]
    pub is_hr: Option<String>,
    #[serde(rename = "userdevId", default)]
    pub user_dev_id: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub authenticated: bool,
    pub is_hr: bool,
    pub user_dev_id: Option<String>,
}

// ---------------------------------------------------------------------------
// getLocations
// ---------------------------------------------------------------------------

/// One office entry as returned by `getLocations`.
#[derive(Debug, Deserialize)]
pub struct RawOffice {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    pub latitude: Value,
    pub longitude: Value,
    #[serde(default)]
    pub radius: Value,
}

// ---------------------------------------------------------------------------
// Generic `{"res": ...}` envelope
// ---------------------------------------------------------------------------

/// Most actions answer `{"res": <status>, ...}` with optional detail fields.
#[derive(Debug, Default, Deserialize)]
pub struct RawRes {
    #[serde(default)]
    pub res: Value,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Reply to `checkInOut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutReply {
    /// Recorded. `time` is the server's timestamp when it sends one.
    Recorded { time: Option<String> },
    /// A check-out was attempted without a check-in today.
    NotCheckedIn,
    /// The device id is not the one registered for this user.
    DeviceNotRegistered,
    /// Any other non-ok answer, with the server's message if present.
    Rejected { message: Option<String> },
}

/// Reply to `sendUserToken`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRegistration {
    Registered,
    /// Another device already holds the registration for this user.
    AlreadyClaimed,
    Other(String),
}

/// Reply to `submitLeaveReq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitReply {
    pub accepted: bool,
    pub message: Option<String>,
}

/// Reply to `getServerCurTime`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTime {
    /// `DD/MM/YYYY`
    pub date: String,
    /// `HH:MM`
    pub time: String,
}

// ---------------------------------------------------------------------------
// Leave types and group rules
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawLeaveType {
    pub id: Value,
    pub desc: String,
    #[serde(rename = "holidayOrLeave", default)]
    pub holiday_or_leave: Option<String>,
    #[serde(rename = "attachmentRequired", default)]
    pub attachment_required: Value,
}

/// `getUserGroupDetails` reply: `{"res": "ok", "EXCLUDE_EARLY_FROM": 1, ...}`
/// or `{"res": "noGroup"}`.
#[derive(Debug, Deserialize)]
pub struct RawGroupDetails {
    #[serde(default)]
    pub res: Value,
    #[serde(rename = "EXCLUDE_EARLY_FROM", default)]
    pub exclude_early_from: Value,
    #[serde(rename = "EXCLUDE_EARLY_TO", default)]
    pub exclude_early_to: Value,
    #[serde(rename = "EXCLUDE_LATE_FROM", default)]
    pub exclude_late_from: Value,
    #[serde(rename = "EXCLUDE_LATE_TO", default)]
    pub exclude_late_to: Value,
    #[serde(rename = "EXCLUDE_TH_SAT", default)]
    pub exclude_th_sat: Value,
}

// ---------------------------------------------------------------------------
// Requests and approvals
// ---------------------------------------------------------------------------

/// A leave or permission request as listed for approvers and HR.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "reqType", default)]
    pub req_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "fromDate", default)]
    pub from_date: Option<String>,
    #[serde(rename = "toDate", default)]
    pub to_date: Option<String>,
    #[serde(rename = "fromTime", default)]
    pub from_time: Option<String>,
    #[serde(rename = "toTime", default)]
    pub to_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub attachments: Option<String>,
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    #[serde(rename = "userID", default, deserialize_with = "opt_string_or_number")]
    pub user_id: Option<String>,
}

impl RequestRecord {
    /// Whether the request still awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("pending"))
    }

    /// Attachment file names, split on the backend's `@@` separator.
    #[must_use]
    pub fn attachment_names(&self) -> Vec<&str> {
        self.attachments
            .as_deref()
            .map(|a| a.split("@@").filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }
}

/// Approver's answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Reject => "reject",
        }
    }
}

/// Filters for the HR-wide request listing. Dates are `DD/MM/YYYY`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HrRequestFilter {
    pub from_date: String,
    pub to_date: String,
    /// `None` lists every employee.
    pub employee_id: Option<String>,
    /// `None` lists every status.
    pub status: Option<String>,
}

/// One past leave entry from `getLeavesInfo`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeaveHistoryEntry {
    #[serde(rename = "type", default)]
    pub leave_type: Option<String>,
    #[serde(rename = "fromDate", default)]
    pub from_date: Option<String>,
    #[serde(rename = "toDate", default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub days: Value,
    #[serde(default)]
    pub hours: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmployeeName {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}
