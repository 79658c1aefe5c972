//! # Environment Overrides
//!
//! Environment variables applied on top of a loaded file:
//! - `MIGRATOR_DRY_RUN`: `true` / `false`
//! - `MIGRATOR_LOG_LEVEL`: trace/debug/info/warn/error
//! - `MIGRATOR_CC_CLIENT_SECRET`: Cloud Controller client secret
//! - `MIGRATOR_REQUEST_TIMEOUT_SECONDS`: per-request source timeout

use crate::config::MigratorConfig;
use crate::error::ConfigError;
use crate::file_loader::load_from_file;
use std::env;
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Loads `path`, applies environment overrides and validates the result.
pub fn load(path: &Path) -> Result<MigratorConfig, ConfigError> {
    let mut config = load_from_file(path)?;
    apply_env_overrides(&mut config)?;
    config.validate()?;

    debug!(path = %path.display(), dry_run = config.dry_run, "Loaded configuration");
    Ok(config)
}

pub fn apply_env_overrides(config: &mut MigratorConfig) -> Result<(), ConfigError> {
    if let Some(dry_run) = parse_env("MIGRATOR_DRY_RUN")? {
        config.dry_run = dry_run;
    }
    if let Some(log_level) = parse_env("MIGRATOR_LOG_LEVEL")? {
        config.log_level = log_level;
    }
    if let Some(secret) = parse_env("MIGRATOR_CC_CLIENT_SECRET")? {
        config.cloud_controller.client_secret = secret;
    }
    if let Some(timeout) = parse_env("MIGRATOR_REQUEST_TIMEOUT_SECONDS")? {
        config.cloud_controller.request_timeout_seconds = timeout;
    }

    Ok(())
}

fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr
{
    match env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                key: key.to_string(),
                value
            }),
        Err(_) => Ok(None)
    }
}
