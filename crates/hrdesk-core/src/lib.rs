pub mod app_config;
pub mod attendance;
pub mod config;
pub mod error;
pub mod geo;
pub mod geofence;
pub mod leave;
pub mod offices;

pub use app_config::{AppConfig, Environment};
pub use attendance::{format_wire_date, format_wire_time, AttendanceRequest, Direction, Session};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, GeoError, LeaveError};
pub use geo::{GeoCoordinate, LocationSample, OfficeLocation, DEFAULT_ALLOWED_RADIUS_M};
pub use geofence::{distance_m, evaluate, GeofenceVerdict, EARTH_RADIUS_M};
pub use leave::{GroupRules, LeaveDraft, LeaveKind, LeaveRequest, LeaveType};
pub use offices::{load_offices, OfficesFile};
