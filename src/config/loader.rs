//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: &'static str, reason: String },
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build a configuration from an optional TOML file overlaid with the
/// process environment. The result is not validated yet so callers can
/// apply command-line overrides first.
pub fn load(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let base = match path {
        Some(path) => read_file(path)?,
        None => ServerConfig::default(),
    };
    apply_env(base, |key| std::env::var(key).ok())
}

fn read_file(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so this stays testable.
///
/// | Variable | Field |
/// |---|---|
/// | `APP_ENV` | `environment` |
/// | `HOST` | `listener.host` |
/// | `PORT` | `listener.port` |
/// | `SESSION_SECRET` | `session.secrets` (comma-separated, newest first) |
/// | `COOKIE_MAX_AGE` | `session.max_age_ms` |
/// | `COOKIE_SECURE` | `session.secure` |
/// | `CORS_ORIGINS` | `cors.allowed_origins` (comma-separated) |
pub fn apply_env<F>(mut config: ServerConfig, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("APP_ENV") {
        config.environment = parse_var("APP_ENV", &value)?;
    }
    if let Some(value) = lookup("HOST") {
        config.listener.host = value;
    }
    if let Some(value) = lookup("PORT") {
        config.listener.port = parse_var("PORT", &value)?;
    }
    if let Some(value) = lookup("SESSION_SECRET") {
        config.session.secrets = split_list(&value);
    }
    if let Some(value) = lookup("COOKIE_MAX_AGE") {
        config.session.max_age_ms = parse_var("COOKIE_MAX_AGE", &value)?;
    }
    if let Some(value) = lookup("COOKIE_SECURE") {
        config.session.secure = Some(parse_var("COOKIE_SECURE", &value)?);
    }
    if let Some(value) = lookup("CORS_ORIGINS") {
        config.cors.allowed_origins = split_list(&value);
    }
    Ok(config)
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvValue {
            var,
            reason: e.to_string(),
        })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
