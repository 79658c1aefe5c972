//! # Configuration
//!
//! Configuration of a migration run:
//! - Configuration structures with `validator` rules
//! - File loading (YAML/TOML)
//! - Environment overrides
//! - Values given as a file path or inline contents

pub mod config;
pub mod error;
pub mod file_loader;
pub mod loader;

pub use config::{
    CloudControllerConfig, FileOrString, MigratorConfig, PermConfig, UaaConfig,
    DEFAULT_REQUEST_TIMEOUT_SECONDS,
};
pub use error::ConfigError;
pub use file_loader::{ConfigFileError, load_from_file, load_from_toml, load_from_yaml};
pub use loader::{apply_env_overrides, load};
pub use validator::Validate;
