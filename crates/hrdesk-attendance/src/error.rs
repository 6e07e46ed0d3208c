use hrdesk_core::Direction;
use hrdesk_rpc::RpcError;
use thiserror::Error;

/// Failure reported by a location provider for a single fix request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Device location services are switched off.
    #[error("location services are disabled")]
    ServicesDisabled,

    /// The provider gave up waiting on its own.
    #[error("location provider timed out")]
    Timeout,

    #[error("location provider failure: {0}")]
    Other(String),
}

/// Terminal outcome of a [`crate::LocationProbe`] run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("location permission not granted")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(ProviderError),

    #[error("no location fix after {attempts} attempts")]
    Timeout { attempts: u32 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session store is corrupt: {0}")]
    Corrupt(String),
}

/// Every way a check-in/out can fail. Each maps to one user-facing message
/// via [`crate::ActionOutcome`].
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("no office selected")]
    NoOfficeSelected,

    #[error("location permission not granted")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    LocationUnavailable(ProviderError),

    #[error("location timed out after {attempts} attempts")]
    LocationTimeout { attempts: u32 },

    #[error("{distance_m} m from office, allowed radius is {allowed_radius_m} m")]
    OutOfRange {
        distance_m: u32,
        allowed_radius_m: u32,
    },

    #[error("already checked {direction} today")]
    DuplicateAction { direction: Direction },

    #[error("not checked in today")]
    NotCheckedIn,

    #[error("network error: {0}")]
    NetworkError(#[source] RpcError),

    #[error("server error: {}", message.as_deref().unwrap_or("no details"))]
    ServerError { message: Option<String> },

    #[error("device is not registered for this user")]
    DeviceNotRegistered,
}

impl From<ProbeError> for AttendanceError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::PermissionDenied => AttendanceError::PermissionDenied,
            ProbeError::Unavailable(e) => AttendanceError::LocationUnavailable(e),
            ProbeError::Timeout { attempts } => AttendanceError::LocationTimeout { attempts },
        }
    }
}

impl From<RpcError> for AttendanceError {
    fn from(err: RpcError) -> Self {
        if err.is_network() {
            return AttendanceError::NetworkError(err);
        }
        let message = match &err {
            RpcError::UnexpectedStatus { status, .. } => format!("HTTP {status}"),
            other => other.to_string(),
        };
        AttendanceError::ServerError {
            message: Some(message),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("device registration rejected: {0}")]
    Rejected(String),
}
