//! HTTP client for the HR service's form-encoded RPC endpoint.
//!
//! Every call is a `POST` to the single service URL with an
//! `application/x-www-form-urlencoded` body whose `action` field selects the
//! operation. The signed-in user rides along as a `currentuser` query
//! parameter. Replies are JSON with no common envelope.

use std::time::Duration;

use hrdesk_core::{
    AttendanceRequest, Direction, GroupRules, LeaveRequest, LeaveType, OfficeLocation,
};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::RpcError;
use crate::normalize::{
    normalize_check_in_out, normalize_digits, normalize_group, normalize_is_checked,
    normalize_leave_type, normalize_login, normalize_office, normalize_submit,
    normalize_token_registration, value_to_string,
};
use crate::types::{
    CheckInOutReply, Decision, EmployeeName, HrRequestFilter, LeaveHistoryEntry, LoginOutcome,
    RawGroupDetails, RawLeaveType, RawLogin, RawOffice, RawRes, RequestRecord, ServerTime,
    SubmitReply, TokenRegistration,
};

/// Default client-side timeout for every RPC round-trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

mod action {
    pub const CHECK_LOGIN: &str = "checkLogin";
    pub const GET_LOCATIONS: &str = "getLocations";
    pub const CHECK_IS_CHECKED: &str = "checkIsChecked";
    pub const CHECK_IN_OUT: &str = "checkInOut";
    pub const SEND_USER_TOKEN: &str = "sendUserToken";
    pub const GET_SERVER_TOKEN: &str = "getServerToken";
    pub const CLEAR_USER_DEVICE_ID: &str = "clearUserDeviceId";
    pub const GET_SERVER_CUR_TIME: &str = "getServerCurTime";
    pub const GET_LEAVE_TYPES: &str = "getLeaveTypes";
    pub const GET_USER_GROUP_DETAILS: &str = "getUserGroupDetails";
    pub const SUBMIT_LEAVE_REQ: &str = "submitLeaveReq";
    pub const GET_PENDING_REQUESTS: &str = "getPendingRequests";
    pub const GET_ALL_REQUESTS_HR: &str = "getAllRequestsHr";
    pub const RESPOND_TO_REQUEST: &str = "respondToRequest";
    pub const GET_LEAVES_INFO: &str = "getLeavesInfo";
    pub const GET_NAMES_LIST: &str = "getNamesList";
    pub const SEND_APP_NOTES: &str = "sendAppNotes";
}

/// Client for the HR service backend.
///
/// Use [`HrClient::new`] with the configured service URL; tests point it at a
/// wiremock server the same way.
pub struct HrClient {
    client: Client,
    endpoint: Url,
}

impl HrClient {
    /// # Errors
    ///
    /// Returns [`RpcError::InvalidServerUrl`] if `server_url` does not parse,
    /// or [`RpcError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(server_url: &str, timeout_secs: u64) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("hrdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let endpoint = Url::parse(server_url).map_err(|e| RpcError::InvalidServerUrl {
            url: server_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, endpoint })
    }

    /// Verifies credentials. A rejected login is `Ok` with
    /// `authenticated == false`; only transport and decoding problems are errors.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn check_login(
        &self,
        user: &str,
        password: &str,
        app_version: &str,
    ) -> Result<LoginOutcome, RpcError> {
        let raw: RawLogin = self
            .call_as(
                action::CHECK_LOGIN,
                Some(user),
                &[("USER", user), ("PASSWORD", password), ("APP.VERSION", app_version)],
            )
            .await?;
        Ok(normalize_login(&raw))
    }

    /// Offices the user may check in at.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::InvalidResponse`] when any entry has a missing or
    /// out-of-range coordinate, plus the usual transport errors.
    pub async fn get_locations(&self, user: &str) -> Result<Vec<OfficeLocation>, RpcError> {
        let raw: Vec<RawOffice> = self
            .call_as(action::GET_LOCATIONS, Some(user), &[("USER", user)])
            .await?;
        raw.iter()
            .map(|entry| {
                normalize_office(entry).map_err(|reason| RpcError::InvalidResponse {
                    action: action::GET_LOCATIONS.to_string(),
                    reason,
                })
            })
            .collect()
    }

    /// Whether `user` already recorded `direction` on `date` (`DD/MM/YYYY`).
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn check_is_checked(
        &self,
        user: &str,
        date: &str,
        direction: Direction,
    ) -> Result<bool, RpcError> {
        let raw: RawRes = self
            .call_as(
                action::CHECK_IS_CHECKED,
                Some(user),
                &[("USER", user), ("DATE", date), ("TYPE", direction.as_wire())],
            )
            .await?;
        Ok(normalize_is_checked(&raw))
    }

    /// Submits one check-in or check-out. Never retried.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn check_in_or_out(
        &self,
        request: &AttendanceRequest,
    ) -> Result<CheckInOutReply, RpcError> {
        let date = request.wire_date();
        let time = request.wire_time();
        let location = request.location().to_wire();
        let raw: RawRes = self
            .call_as(
                action::CHECK_IN_OUT,
                Some(request.user_id()),
                &[
                    ("USER", request.user_id()),
                    ("DATE", &date),
                    ("TIME", &time),
                    ("LOCATION", &location),
                    ("TYPE", request.direction().as_wire()),
                    ("USERDEVID", request.device_id()),
                ],
            )
            .await?;
        Ok(normalize_check_in_out(raw))
    }

    /// Registers `dev_id` (with its push token) as the user's device.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn send_user_token(
        &self,
        user: &str,
        token: &str,
        dev_id: &str,
    ) -> Result<TokenRegistration, RpcError> {
        let raw: RawRes = self
            .call_as(
                action::SEND_USER_TOKEN,
                Some(user),
                &[("USER", user), ("TOKEN", token), ("DEVID", dev_id)],
            )
            .await?;
        Ok(normalize_token_registration(&raw))
    }

    /// Device id the server currently has on file for `user`; empty when none.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn get_server_token(&self, user: &str) -> Result<String, RpcError> {
        let raw: RawRes = self
            .call_as(action::GET_SERVER_TOKEN, Some(user), &[("USER", user)])
            .await?;
        Ok(value_to_string(&raw.res).unwrap_or_default())
    }

    /// Releases the device binding for `user` on the server.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure or non-2xx status.
    pub async fn clear_user_device_id(&self, user: &str) -> Result<(), RpcError> {
        self.call(action::CLEAR_USER_DEVICE_ID, Some(user), &[("USER", user)])
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn get_server_time(&self) -> Result<ServerTime, RpcError> {
        self.call_as(action::GET_SERVER_CUR_TIME, None, &[]).await
    }

    /// # Errors
    ///
    /// Returns [`RpcError::InvalidResponse`] for a leave type without an id,
    /// plus the usual transport errors.
    pub async fn get_leave_types(&self) -> Result<Vec<LeaveType>, RpcError> {
        let raw: Vec<RawLeaveType> = self.call_as(action::GET_LEAVE_TYPES, None, &[]).await?;
        raw.iter()
            .map(|entry| {
                normalize_leave_type(entry).map_err(|reason| RpcError::InvalidResponse {
                    action: action::GET_LEAVE_TYPES.to_string(),
                    reason,
                })
            })
            .collect()
    }

    /// Date restrictions for the user's group, `None` when ungrouped.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn get_user_group_details(
        &self,
        user: &str,
    ) -> Result<Option<GroupRules>, RpcError> {
        let raw: RawGroupDetails = self
            .call_as(action::GET_USER_GROUP_DETAILS, Some(user), &[("USER", user)])
            .await?;
        Ok(normalize_group(&raw))
    }

    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn submit_leave_request(
        &self,
        user: &str,
        request: &LeaveRequest,
    ) -> Result<SubmitReply, RpcError> {
        let raw: RawRes = self
            .call_as(
                action::SUBMIT_LEAVE_REQ,
                Some(user),
                &[
                    ("LEAVE.TYPE", &request.leave_type_id),
                    ("FROM.DATE", &request.from_date),
                    ("TO.DATE", &request.to_date),
                    ("FROM.TIME", &request.from_time),
                    ("TO.TIME", &request.to_time),
                    ("NOTE", &request.note),
                    ("ATTACHMENTS", &request.attachments),
                    ("USER", user),
                ],
            )
            .await?;
        Ok(normalize_submit(raw))
    }

    /// Requests awaiting `user`'s approval.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn get_pending_requests(&self, user: &str) -> Result<Vec<RequestRecord>, RpcError> {
        self.call_as(action::GET_PENDING_REQUESTS, Some(user), &[("USER", user)])
            .await
    }

    /// HR-wide listing. An absent employee filter is sent empty and an absent
    /// status as `All`.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn get_all_requests_hr(
        &self,
        user: &str,
        filter: &HrRequestFilter,
    ) -> Result<Vec<RequestRecord>, RpcError> {
        self.call_as(
            action::GET_ALL_REQUESTS_HR,
            Some(user),
            &[
                ("FROM.DATE", &filter.from_date),
                ("TO.DATE", &filter.to_date),
                ("EMP.ID", filter.employee_id.as_deref().unwrap_or("")),
                ("STATUS", filter.status.as_deref().unwrap_or("All")),
            ],
        )
        .await
    }

    /// Accepts or rejects a pending request.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure or non-2xx status.
    pub async fn respond_to_request(
        &self,
        user: &str,
        request_id: &str,
        decision: Decision,
        notes: Option<&str>,
    ) -> Result<serde_json::Value, RpcError> {
        self.call(
            action::RESPOND_TO_REQUEST,
            Some(user),
            &[
                ("REQUEST.ID", request_id),
                ("RESPONSE", decision.as_wire()),
                ("NOTES", notes.unwrap_or("")),
                ("USER", user),
            ],
        )
        .await
    }

    /// Past leave taken by `employee`.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn get_leaves_info(
        &self,
        user: &str,
        employee: &str,
    ) -> Result<Vec<LeaveHistoryEntry>, RpcError> {
        self.call_as(action::GET_LEAVES_INFO, Some(user), &[("USER", employee)])
            .await
    }

    /// Employee directory used for HR filters.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure, non-2xx status or a malformed body.
    pub async fn get_names_list(&self, user: &str) -> Result<Vec<EmployeeName>, RpcError> {
        self.call_as(action::GET_NAMES_LIST, Some(user), &[]).await
    }

    /// # Errors
    ///
    /// Returns [`RpcError`] on network failure or non-2xx status.
    pub async fn send_app_notes(
        &self,
        user: &str,
        date: &str,
        note: &str,
    ) -> Result<serde_json::Value, RpcError> {
        self.call(
            action::SEND_APP_NOTES,
            Some(user),
            &[("USER", user), ("DATE", date), ("NOTE", note)],
        )
        .await
    }

    /// Reachability probe: posts an empty action and expects HTTP 200.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Http`] on network failure or
    /// [`RpcError::UnexpectedStatus`] for anything but 200.
    pub async fn ping(&self) -> Result<(), RpcError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("action", "")])
            .send()
            .await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(RpcError::UnexpectedStatus {
                status: response.status().as_u16(),
                action: "ping".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the request URL: the service endpoint plus `currentuser`.
    fn request_url(&self, current_user: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        if let Some(user) = current_user {
            url.query_pairs_mut()
                .append_pair("currentuser", &normalize_digits(user));
        }
        url
    }

    /// Form body for `action` with every value's digits normalised.
    fn form_body(action: &str, params: &[(&str, &str)]) -> Vec<(String, String)> {
        std::iter::once(("action".to_string(), action.to_string()))
            .chain(
                params
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), normalize_digits(v))),
            )
            .collect()
    }

    /// Posts one action and parses the reply as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Http`] on network failure,
    /// [`RpcError::UnexpectedStatus`] on a non-2xx status and
    /// [`RpcError::Deserialize`] if the body is not JSON.
    async fn call(
        &self,
        action: &str,
        current_user: Option<&str>,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, RpcError> {
        let url = self.request_url(current_user);
        let body = Self::form_body(action, params);

        tracing::debug!(action, "sending HR service request");
        let response = self.client.post(url).form(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(action, status = status.as_u16(), "HR service returned error status");
            return Err(RpcError::UnexpectedStatus {
                status: status.as_u16(),
                action: action.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| RpcError::Deserialize {
            context: action.to_string(),
            source: e,
        })
    }

    async fn call_as<T: DeserializeOwned>(
        &self,
        action: &str,
        current_user: Option<&str>,
        params: &[(&str, &str)],
    ) -> Result<T, RpcError> {
        let value = self.call(action, current_user, params).await?;
        serde_json::from_value(value).map_err(|e| RpcError::Deserialize {
            context: action.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
