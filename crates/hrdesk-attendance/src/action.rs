//! The check-in/out sequence.
//!
//! ```text
//! Idle -> ResolvingLocation -> EvaluatingGeofence -> CheckingPriorState
//!      -> Submitting -> Succeeded | Failed
//! ```
//!
//! Every failure is terminal. Nothing is submitted unless the fix was inside
//! the office radius and the prior-state check passed.

use std::fmt;
use std::future::Future;

use chrono::NaiveDateTime;
use hrdesk_core::{
    evaluate, format_wire_date, format_wire_time, AttendanceRequest, Direction, OfficeLocation,
};
use hrdesk_rpc::{CheckInOutReply, RpcError};

use crate::error::AttendanceError;
use crate::probe::{LocationProbe, LocationProvider};
use crate::session::SessionStore;

/// Remote operations the sequence needs.
pub trait AttendanceBackend: Sync {
    /// Whether `user_id` already has a `direction` record on `date`
    /// (`DD/MM/YYYY`).
    fn has_checked(
        &self,
        user_id: &str,
        date: &str,
        direction: Direction,
    ) -> impl Future<Output = Result<bool, RpcError>> + Send;

    fn submit(
        &self,
        request: &AttendanceRequest,
    ) -> impl Future<Output = Result<CheckInOutReply, RpcError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    ResolvingLocation,
    EvaluatingGeofence,
    CheckingPriorState,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionState::Idle => "idle",
            ActionState::ResolvingLocation => "resolving_location",
            ActionState::EvaluatingGeofence => "evaluating_geofence",
            ActionState::CheckingPriorState => "checking_prior_state",
            ActionState::Submitting => "submitting",
            ActionState::Succeeded => "succeeded",
            ActionState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Who is acting, from which device, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    pub user_id: String,
    /// Missing until the device has been registered; sent empty.
    pub device_id: Option<String>,
    pub now: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSuccess {
    pub direction: Direction,
    pub distance_m: u32,
    /// Server-confirmed `HH:MM`, or the submitted time if none came back.
    pub server_time: String,
}

pub struct AttendanceAction<'a, P, B, S> {
    probe: &'a LocationProbe<P>,
    backend: &'a B,
    store: &'a S,
    state: ActionState,
}

impl<'a, P, B, S> AttendanceAction<'a, P, B, S>
where
    P: LocationProvider,
    B: AttendanceBackend,
    S: SessionStore,
{
    pub fn new(probe: &'a LocationProbe<P>, backend: &'a B, store: &'a S) -> Self {
        Self {
            probe,
            backend,
            store,
            state: ActionState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> ActionState {
        self.state
    }

    /// Runs the whole sequence once.
    ///
    /// # Errors
    ///
    /// Returns the [`AttendanceError`] for whichever stage failed first. On
    /// [`AttendanceError::DeviceNotRegistered`] the stored session has been
    /// cleared.
    pub async fn run(
        &mut self,
        ctx: &ActionContext,
        office: Option<&OfficeLocation>,
        direction: Direction,
    ) -> Result<ActionSuccess, AttendanceError> {
        let result = self.drive(ctx, office, direction).await;
        match &result {
            Ok(success) => {
                self.enter(ActionState::Succeeded);
                tracing::info!(
                    user = %ctx.user_id,
                    %direction,
                    distance_m = success.distance_m,
                    time = %success.server_time,
                    "attendance recorded"
                );
            }
            Err(err) => {
                self.enter(ActionState::Failed);
                tracing::warn!(
                    user = %ctx.user_id,
                    %direction,
                    error = %err,
                    "attendance action failed"
                );
            }
        }
        result
    }

    async fn drive(
        &mut self,
        ctx: &ActionContext,
        office: Option<&OfficeLocation>,
        direction: Direction,
    ) -> Result<ActionSuccess, AttendanceError> {
        let office = office.ok_or(AttendanceError::NoOfficeSelected)?;

        self.enter(ActionState::ResolvingLocation);
        let sample = self.probe.acquire().await?;

        self.enter(ActionState::EvaluatingGeofence);
        let verdict = evaluate(sample, office);
        tracing::debug!(
            office = %office.id,
            distance_m = verdict.distance_m,
            radius_m = office.allowed_radius_m,
            within = verdict.is_within_range,
            "geofence evaluated"
        );
        let device_id = ctx.device_id.as_deref().unwrap_or_default();
        let Some(request) =
            AttendanceRequest::from_verdict(&verdict, &ctx.user_id, device_id, direction, ctx.now)
        else {
            return Err(AttendanceError::OutOfRange {
                distance_m: verdict.distance_m,
                allowed_radius_m: office.allowed_radius_m,
            });
        };

        self.enter(ActionState::CheckingPriorState);
        let date = format_wire_date(ctx.now.date());
        if self.backend.has_checked(&ctx.user_id, &date, direction).await? {
            return Err(AttendanceError::DuplicateAction { direction });
        }
        if direction == Direction::Out
            && !self
                .backend
                .has_checked(&ctx.user_id, &date, Direction::In)
                .await?
        {
            return Err(AttendanceError::NotCheckedIn);
        }

        self.enter(ActionState::Submitting);
        match self.backend.submit(&request).await? {
            CheckInOutReply::Recorded { time } => Ok(ActionSuccess {
                direction,
                distance_m: verdict.distance_m,
                server_time: time.unwrap_or_else(|| format_wire_time(ctx.now.time())),
            }),
            CheckInOutReply::NotCheckedIn => Err(AttendanceError::NotCheckedIn),
            CheckInOutReply::DeviceNotRegistered => {
                if let Err(e) = self.store.clear() {
                    tracing::error!(error = %e, "failed to clear session after device rejection");
                }
                Err(AttendanceError::DeviceNotRegistered)
            }
            CheckInOutReply::Rejected { message } => Err(AttendanceError::ServerError { message }),
        }
    }

    fn enter(&mut self, next: ActionState) {
        tracing::trace!(from = %self.state, to = %next, "attendance state");
        self.state = next;
    }
}

#[cfg(test)]
#[path = "action_test.rs"]
mod tests;
