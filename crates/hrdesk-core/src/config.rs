use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let server_url = require("HRDESK_SERVER_URL")?;
    if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "HRDESK_SERVER_URL".to_string(),
            reason: format!("\"{server_url}\" is not an http(s) URL"),
        });
    }

    let env = parse_environment(&or_default("HRDESK_ENV", "development"));
    let log_level = or_default("HRDESK_LOG_LEVEL", "info");
    let app_version = or_default("HRDESK_APP_VERSION", env!("CARGO_PKG_VERSION"));

    let http_timeout_secs = parse_u64("HRDESK_HTTP_TIMEOUT_SECS", "20")?;
    if http_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HRDESK_HTTP_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let location_max_retries = parse_u32("HRDESK_LOCATION_MAX_RETRIES", "5")?;

    let session_path = PathBuf::from(or_default(
        "HRDESK_SESSION_PATH",
        "./.hrdesk/session.json",
    ));
    let offices_path = lookup("HRDESK_OFFICES_PATH").ok().map(PathBuf::from);

    Ok(AppConfig {
        server_url,
        env,
        log_level,
        app_version,
        http_timeout_secs,
        location_max_retries,
        session_path,
        offices_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;
    use std::path::Path;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("HRDESK_SERVER_URL", "https://hr.example.com/pick/HRSERVICE");
        m
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_fails_without_server_url() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "HRDESK_SERVER_URL"),
            "expected MissingEnvVar(HRDESK_SERVER_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_non_http_server_url() {
        let mut map = full_env();
        map.insert("HRDESK_SERVER_URL", "ftp://hr.example.com");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HRDESK_SERVER_URL"
            ),
            "expected InvalidEnvVar(HRDESK_SERVER_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_applies_defaults() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.app_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(cfg.http_timeout_secs, 20);
        assert_eq!(cfg.location_max_retries, 5);
        assert_eq!(cfg.session_path, Path::new("./.hrdesk/session.json"));
        assert!(cfg.offices_path.is_none());
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map = full_env();
        map.insert("HRDESK_ENV", "production");
        map.insert("HRDESK_LOCATION_MAX_RETRIES", "2");
        map.insert("HRDESK_OFFICES_PATH", "/etc/hrdesk/offices.yaml");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Production);
        assert_eq!(cfg.location_max_retries, 2);
        assert_eq!(
            cfg.offices_path.as_deref(),
            Some(Path::new("/etc/hrdesk/offices.yaml"))
        );
    }

    #[test]
    fn build_app_config_rejects_invalid_retry_count() {
        let mut map = full_env();
        map.insert("HRDESK_LOCATION_MAX_RETRIES", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidEnvVar { ref var, .. })
                    if var == "HRDESK_LOCATION_MAX_RETRIES"
            ),
            "expected InvalidEnvVar(HRDESK_LOCATION_MAX_RETRIES), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_http_timeout() {
        let mut map = full_env();
        map.insert("HRDESK_HTTP_TIMEOUT_SECS", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HRDESK_HTTP_TIMEOUT_SECS"
            ),
            "expected InvalidEnvVar(HRDESK_HTTP_TIMEOUT_SECS), got: {result:?}"
        );
    }
}
