use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read offices file {path}: {source}")]
    OfficesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse offices file: {0}")]
    OfficesFileParse(#[from] serde_yaml::Error),

    #[error("offices validation error: {0}")]
    Validation(String),
}

/// Rejected coordinate input. Coordinates are never clamped into range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("cannot parse coordinate \"{0}\"")]
    Unparseable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveError {
    #[error("from date must not be after to date")]
    InvalidDateRange,

    #[error("from time must be earlier than to time")]
    InvalidTimeRange,

    #[error("date {0} is not allowed for leave requests")]
    DateNotAllowed(String),

    #[error("leave type \"{0}\" requires at least one attachment")]
    AttachmentRequired(String),
}
