use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_url: String,
    pub env: Environment,
    pub log_level: String,
    pub app_version: String,
    pub http_timeout_secs: u64,
    pub location_max_retries: u32,
    pub session_path: PathBuf,
    pub offices_path: Option<PathBuf>,
}
