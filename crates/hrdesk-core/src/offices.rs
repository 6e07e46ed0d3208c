use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::geo::OfficeLocation;
use crate::ConfigError;

#[derive(Debug, Deserialize)]
pub struct OfficesFile {
    pub offices: Vec<OfficeLocation>,
}

/// Load and validate an office directory from a YAML file.
///
/// Used when the backend's office list is unavailable or overridden locally.
/// Coordinates are range-checked during deserialization.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_offices(path: &Path) -> Result<OfficesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::OfficesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let offices_file: OfficesFile = serde_yaml::from_str(&content)?;

    validate_offices(&offices_file)?;

    Ok(offices_file)
}

fn validate_offices(offices_file: &OfficesFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for office in &offices_file.offices {
        if office.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "office id must be non-empty".to_string(),
            ));
        }

        if office.allowed_radius_m == 0 {
            return Err(ConfigError::Validation(format!(
                "office '{}' has a zero allowed radius",
                office.id
            )));
        }

        if !seen_ids.insert(office.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate office id: '{}'",
                office.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::DEFAULT_ALLOWED_RADIUS_M;

    fn parse(yaml: &str) -> Result<OfficesFile, ConfigError> {
        let file: OfficesFile = serde_yaml::from_str(yaml)?;
        validate_offices(&file)?;
        Ok(file)
    }

    #[test]
    fn parses_offices_with_default_radius() {
        let file = parse(
            r"
offices:
  - id: amman
    name: Amman HQ
    coordinate: { latitude: 31.99135691875033, longitude: 35.94845868212673 }
  - id: irbid
    name: Irbid Branch
    coordinate: { latitude: 32.55, longitude: 35.85 }
    allowed_radius_m: 300
",
        )
        .unwrap();
        assert_eq!(file.offices.len(), 2);
        assert_eq!(file.offices[0].allowed_radius_m, DEFAULT_ALLOWED_RADIUS_M);
        assert_eq!(file.offices[1].allowed_radius_m, 300);
    }

    #[test]
    fn rejects_out_of_range_coordinate() {
        let result = parse(
            r"
offices:
  - id: nowhere
    name: Nowhere
    coordinate: { latitude: 123.0, longitude: 0.0 }
",
        );
        assert!(matches!(result, Err(ConfigError::OfficesFileParse(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = parse(
            r"
offices:
  - id: a
    name: A
    coordinate: { latitude: 1.0, longitude: 1.0 }
  - id: a
    name: B
    coordinate: { latitude: 2.0, longitude: 2.0 }
",
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate office id"));
    }

    #[test]
    fn rejects_zero_radius() {
        let err = parse(
            r"
offices:
  - id: a
    name: A
    coordinate: { latitude: 1.0, longitude: 1.0 }
    allowed_radius_m: 0
",
        )
        .unwrap_err();
        assert!(err.to_string().contains("zero allowed radius"));
    }

    #[test]
    fn load_offices_reports_missing_file() {
        let result = load_offices(Path::new("/definitely/not/here/offices.yaml"));
        assert!(matches!(result, Err(ConfigError::OfficesFileIo { .. })));
    }

    #[test]
    fn load_offices_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("hrdesk-offices-{}.yaml", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "offices:\n  - id: hq\n    name: HQ\n    \
             coordinate: {{ latitude: 1.5, longitude: 2.5 }}"
        )
        .unwrap();
        let loaded = load_offices(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.offices[0].id, "hq");
    }
}
