pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::HrClient;
pub use error::RpcError;
pub use normalize::normalize_digits;
pub use types::{
    CheckInOutReply, Decision, EmployeeName, HrRequestFilter, LeaveHistoryEntry, LoginOutcome,
    RequestRecord, ServerTime, SubmitReply, TokenRegistration,
};
