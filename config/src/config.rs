//! # Configuration Structures
//!
//! All structures deserialize with `serde` and validate with `validator`.
//! A file is expected to look like:
//!
//! ```yaml
//! log_level: info
//! dry_run: false
//! uaa:
//!   url: https://uaa.example.com
//!   ca_cert_path: /etc/migrator/uaa-ca.pem
//! cloud_controller:
//!   url: https://api.example.com
//!   client_id: perm-migrator
//!   client_secret: secret
//!   client_scopes: [cloud_controller.admin_read_only]
//! perm:
//!   hostname: perm.example.com
//!   port: 6283
//!   ca_cert: /etc/migrator/perm-ca.pem
//!   request_timeout_seconds: 5
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 5;

/// Top-level configuration of a migration run.
///
/// # M-CANONICAL-DOCS
///
/// ## Fields
/// - `log_level`: tracing filter used when `RUST_LOG` is unset (default: "info")
/// - `dry_run`: retrieve and report without touching Perm (default: false)
/// - `uaa`: token issuer used for the Cloud Controller and as the Perm
///   actor namespace
/// - `cloud_controller`: source API
/// - `perm`: destination role service
///
/// ## Validation
/// All nested configurations must pass their own validation rules.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct MigratorConfig {
    #[serde(default = "default_log_level")]
    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,

    #[serde(default)]
    pub dry_run: bool,

    #[validate(nested)]
    pub uaa: UaaConfig,

    #[validate(nested)]
    pub cloud_controller: CloudControllerConfig,

    #[validate(nested)]
    pub perm: PermConfig
}

fn default_log_level() -> String {
    "info".to_string()
}

fn validate_log_level(value: &str) -> Result<(), validator::ValidationError> {
    match value {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(validator::ValidationError::new("Invalid log level"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct UaaConfig {
    #[validate(url)]
    pub url: String,

    /// CA bundle trusted when talking to UAA, as a path or inline PEM.
    #[serde(default)]
    pub ca_cert_path: FileOrString
}

/// Source API settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Fields
/// - `url`: Cloud Controller base URL
/// - `client_id` / `client_secret`: UAA client credentials
/// - `client_scopes`: scopes requested with the token (at least one)
/// - `ca_cert_path`: optional CA bundle, path or inline PEM; empty means
///   system roots
/// - `request_timeout_seconds`: per-request timeout (default: 5, range: 1-300)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct CloudControllerConfig {
    #[validate(url)]
    pub url: String,

    #[validate(length(min = 1))]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "must request client scopes"))]
    pub client_scopes: Vec<String>,

    #[serde(default)]
    pub ca_cert_path: FileOrString,

    #[serde(default = "default_request_timeout_seconds")]
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_seconds: u64
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct PermConfig {
    #[validate(length(min = 1, max = 255))]
    pub hostname: String,

    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    /// CA bundle, path or inline PEM. Non-blank content switches the role
    /// service connection to TLS.
    #[serde(default)]
    pub ca_cert: Option<FileOrString>,

    #[serde(default = "default_request_timeout_seconds")]
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_seconds: u64
}

impl PermConfig {
    /// `tls` should reflect whether a CA was actually loaded from `ca_cert`.
    pub fn base_url(&self, tls: bool) -> String {
        let scheme = if tls { "https" } else { "http" };
        format!("{}://{}:{}/", scheme, self.hostname, self.port)
    }
}

/// A value given either as a path to a readable file or as the literal
/// contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FileOrString(pub String);

impl FileOrString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Contents of the file when the value names an existing path, the
    /// literal value otherwise.
    pub fn bytes(&self) -> Result<Vec<u8>, ConfigError> {
        let path = Path::new(&self.0);
        if !self.0.is_empty() && path.exists() {
            return std::fs::read(path).map_err(|source| ConfigError::Unreadable {
                path: self.0.clone(),
                source
            });
        }

        Ok(self.0.as_bytes().to_vec())
    }
}
