//! # Configuration File Loading
//!
//! Loads configuration from YAML or TOML files, detecting the format from
//! the file extension.

use crate::config::MigratorConfig;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(String),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(String),

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String)
}

pub fn load_from_toml(path: &Path) -> Result<MigratorConfig, ConfigFileError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))?;

    toml::from_str(&contents).map_err(|e| ConfigFileError::TomlParse(e.to_string()))
}

pub fn load_from_yaml(path: &Path) -> Result<MigratorConfig, ConfigFileError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))?;

    serde_yaml::from_str(&contents).map_err(|e| ConfigFileError::YamlParse(e.to_string()))
}

/// Load configuration from file with auto-detection.
///
/// ## Supported Formats
/// - `.yaml` / `.yml`: YAML format
/// - `.toml`: TOML format
pub fn load_from_file(path: &Path) -> Result<MigratorConfig, ConfigFileError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or(ConfigFileError::NoExtension)?;

    match extension.to_lowercase().as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        other => Err(ConfigFileError::UnsupportedFormat(other.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const YAML: &str = r#"
log_level: debug
dry_run: true
uaa:
  url: https://uaa.example.com
  ca_cert_path: /etc/migrator/uaa-ca.pem
cloud_controller:
  url: https://api.example.com
  client_id: perm-migrator
  client_secret: secret
  client_scopes:
    - cloud_controller.admin_read_only
    - cloud_controller.global_auditor
perm:
  hostname: perm.example.com
  port: 6283
  ca_cert: /etc/migrator/perm-ca.pem
"#;

    #[test]
    fn test_load_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, YAML).unwrap();

        let config = load_from_yaml(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.dry_run);
        assert_eq!(config.uaa.ca_cert_path.0, "/etc/migrator/uaa-ca.pem");
        assert_eq!(config.cloud_controller.client_scopes.len(), 2);
        assert_eq!(config.perm.port, 6283);
        assert!(config.perm.ca_cert.is_some());
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[uaa]
url = "https://uaa.example.com"

[cloud_controller]
url = "https://api.example.com"
client_id = "perm-migrator"
client_secret = "secret"
client_scopes = ["cloud_controller.admin_read_only"]
request_timeout_seconds = 30

[perm]
hostname = "localhost"
port = 6283
request_timeout_seconds = 10
"#
        )
        .unwrap();

        let config = load_from_toml(&path).unwrap();
        assert_eq!(config.cloud_controller.request_timeout_seconds, 30);
        assert_eq!(config.perm.hostname, "localhost");
        assert_eq!(config.perm.request_timeout_seconds, 10);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_load_from_file_auto_detect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, YAML).unwrap();

        assert!(load_from_file(&path).is_ok());
    }

    #[test]
    fn test_load_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");

        let result = load_from_file(&path);
        assert!(matches!(result, Err(ConfigFileError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_file_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{}").unwrap();

        let result = load_from_file(&path);
        assert!(matches!(result, Err(ConfigFileError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_from_file_no_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "").unwrap();

        let result = load_from_file(&path);
        assert!(matches!(result, Err(ConfigFileError::NoExtension)));
    }

    #[test]
    fn test_load_from_yaml_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "uaa: [not, a, map").unwrap();

        let result = load_from_yaml(&path);
        assert!(matches!(result, Err(ConfigFileError::YamlParse(_))));
    }
}
