//! Binds the attendance traits to the HTTP client.

use hrdesk_core::{AttendanceRequest, Direction};
use hrdesk_rpc::{CheckInOutReply, HrClient, RpcError, TokenRegistration};

use crate::action::AttendanceBackend;
use crate::device::DeviceBackend;

impl AttendanceBackend for HrClient {
    async fn has_checked(
        &self,
        user_id: &str,
        date: &str,
        direction: Direction,
    ) -> Result<bool, RpcError> {
        self.check_is_checked(user_id, date, direction).await
    }

    async fn submit(&self, request: &AttendanceRequest) -> Result<CheckInOutReply, RpcError> {
        self.check_in_or_out(request).await
    }
}

impl DeviceBackend for HrClient {
    async fn server_device_id(&self, user_id: &str) -> Result<String, RpcError> {
        self.get_server_token(user_id).await
    }

    async fn claim_device(
        &self,
        user_id: &str,
        push_token: &str,
        device_id: &str,
    ) -> Result<TokenRegistration, RpcError> {
        self.send_user_token(user_id, push_token, device_id).await
    }
}
