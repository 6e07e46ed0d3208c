//! Leave-request rules: leave types, group date exclusions, and draft
//! validation before anything is sent to the backend.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::attendance::{format_wire_date, format_wire_time};
use crate::LeaveError;

/// Separator the backend expects between attachment file names.
pub const ATTACHMENT_SEPARATOR: &str = "@@";

/// How a leave type is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveKind {
    /// Whole days; both dates matter, times are informational.
    FullDay,
    /// Part of one day; the time range must be non-empty.
    Hourly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    pub id: String,
    pub desc: String,
    pub kind: LeaveKind,
    pub attachment_required: bool,
}

/// Per-group calendar restrictions on when leave may be requested.
///
/// Day ranges are inclusive days of the month. A late range ending on day 30
/// means "through the last day of the month", whatever its length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRules {
    pub exclude_early: Option<(u32, u32)>,
    pub exclude_late: Option<(u32, u32)>,
    pub exclude_thu_sat: bool,
}

impl GroupRules {
    /// Whether `date` is blocked for leave requests, relative to `today`.
    #[must_use]
    pub fn is_date_disabled(&self, date: NaiveDate, today: NaiveDate) -> bool {
        if date < today {
            return true;
        }

        if self.exclude_thu_sat && matches!(date.weekday(), Weekday::Thu | Weekday::Sat) {
            return true;
        }

        let day = date.day();

        if let Some((from, to)) = self.exclude_early {
            if (from..=to).contains(&day) {
                return true;
            }
        }

        if let Some((from, to)) = self.exclude_late {
            let to = if to == 30 { last_day_of_month(date) } else { to };
            if (from..=to).contains(&day) {
                return true;
            }
        }

        false
    }

    /// First allowed date at or after `start`, searching up to 31 days ahead.
    ///
    /// Crossing into the next month tries its first day before continuing.
    /// Falls back to `start` when nothing in the window is allowed.
    #[must_use]
    pub fn next_valid_date(&self, start: NaiveDate, today: NaiveDate) -> NaiveDate {
        for offset in 0..31u64 {
            let Some(candidate) = start.checked_add_days(Days::new(offset)) else {
                break;
            };

            if candidate.month() != start.month() {
                if let Some(first) = first_of_next_month(start) {
                    if !self.is_date_disabled(first, today) {
                        return first;
                    }
                }
            }

            if !self.is_date_disabled(candidate, today) {
                return candidate;
            }
        }
        start
    }
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    first_of_next_month(date)
        .and_then(|first| first.pred_opt())
        .map_or(31, |d| d.day())
}

/// What the user filled in, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveDraft {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub from_time: NaiveTime,
    pub to_time: NaiveTime,
    pub note: String,
    pub attachments: Vec<String>,
}

/// A validated leave request in backend wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveRequest {
    pub leave_type_id: String,
    pub from_date: String,
    pub to_date: String,
    pub from_time: String,
    pub to_time: String,
    pub note: String,
    pub attachments: String,
}

impl LeaveRequest {
    /// Validates `draft` against the leave type and optional group rules.
    ///
    /// # Errors
    ///
    /// Returns [`LeaveError`] for an empty date or time range, a date the
    /// group rules exclude, or a missing mandatory attachment.
    pub fn build(
        leave_type: &LeaveType,
        draft: &LeaveDraft,
        rules: Option<&GroupRules>,
        today: NaiveDate,
    ) -> Result<Self, LeaveError> {
        match leave_type.kind {
            LeaveKind::FullDay => {
                if draft.from_date > draft.to_date {
                    return Err(LeaveError::InvalidDateRange);
                }
            }
            LeaveKind::Hourly => {
                if draft.from_time >= draft.to_time {
                    return Err(LeaveError::InvalidTimeRange);
                }
            }
        }

        if let Some(rules) = rules {
            let mut checked = vec![draft.from_date];
            if leave_type.kind == LeaveKind::FullDay {
                checked.push(draft.to_date);
            }
            if let Some(blocked) = checked
                .into_iter()
                .find(|d| rules.is_date_disabled(*d, today))
            {
                return Err(LeaveError::DateNotAllowed(format_wire_date(blocked)));
            }
        }

        if leave_type.attachment_required && draft.attachments.is_empty() {
            return Err(LeaveError::AttachmentRequired(leave_type.desc.clone()));
        }

        Ok(Self {
            leave_type_id: leave_type.id.clone(),
            from_date: format_wire_date(draft.from_date),
            to_date: format_wire_date(draft.to_date),
            from_time: format_wire_time(draft.from_time),
            to_time: format_wire_time(draft.to_time),
            note: draft.note.clone(),
            attachments: draft.attachments.join(ATTACHMENT_SEPARATOR),
        })
    }
}

#[cfg(test)]
#[path = "leave_test.rs"]
mod tests;
