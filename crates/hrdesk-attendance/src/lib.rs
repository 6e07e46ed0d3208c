//! Geofenced attendance: location probing, range gating and the
//! check-in/out sequence against the HR service.

pub mod action;
pub mod backend;
pub mod device;
pub mod error;
pub mod outcome;
pub mod probe;
pub mod session;

pub use action::{
    ActionContext, ActionState, ActionSuccess, AttendanceAction, AttendanceBackend,
};
pub use device::{register_device, verify_device, DeviceBackend, DeviceStatus};
pub use error::{AttendanceError, DeviceError, ProbeError, ProviderError, StoreError};
pub use outcome::{ActionOutcome, Outcome};
pub use probe::{LocationProbe, LocationProvider, PermissionStatus, ProbePolicy};
pub use session::{MemorySessionStore, SessionStore};
