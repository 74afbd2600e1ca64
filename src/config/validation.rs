//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port, cookie lifetime, body limits)
//! - Check CORS origins are bare `scheme://host[:port]` origins
//! - Refuse insecure session settings in production
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{ServerConfig, INSECURE_SESSION_SECRET};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.port must be non-zero")]
    ZeroPort,
    #[error("session.secrets must contain at least one non-empty secret")]
    NoSessionSecret,
    #[error("session.max_age_ms must be greater than zero")]
    ZeroMaxAge,
    #[error("session.cookie_name must not be empty")]
    EmptyCookieName,
    #[error("cors.allowed_origins entry '{0}' is not a valid origin")]
    InvalidOrigin(String),
    #[error("cors.allowed_origins must not be empty when cors is enabled")]
    NoOrigins,
    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
    #[error("production requires a session secret other than the built-in placeholder")]
    PlaceholderSecretInProduction,
    #[error("production requires the session cookie to be marked secure")]
    InsecureCookieInProduction,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    let session = &config.session;
    if session.cookie_name.trim().is_empty() {
        errors.push(ValidationError::EmptyCookieName);
    }
    if session.secrets.iter().all(|s| s.is_empty()) {
        errors.push(ValidationError::NoSessionSecret);
    }
    if session.max_age_ms == 0 {
        errors.push(ValidationError::ZeroMaxAge);
    }

    if config.cors.enabled {
        if config.cors.allowed_origins.is_empty() {
            errors.push(ValidationError::NoOrigins);
        }
        for origin in &config.cors.allowed_origins {
            if !is_bare_origin(origin) {
                errors.push(ValidationError::InvalidOrigin(origin.clone()));
            }
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.environment.is_production() {
        if session.secrets.iter().any(|s| s == INSECURE_SESSION_SECRET) {
            errors.push(ValidationError::PlaceholderSecretInProduction);
        }
        if !session.is_secure(config.environment) {
            errors.push(ValidationError::InsecureCookieInProduction);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// An origin is `http(s)://host[:port]` with nothing after the authority.
fn is_bare_origin(origin: &str) -> bool {
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    matches!(url.scheme(), "http" | "https")
        && url.host().is_some()
        && url.origin().ascii_serialization() == origin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Environment;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.port = 0;
        config.session.secrets = vec![String::new()];
        config.session.max_age_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroPort,
                ValidationError::NoSessionSecret,
                ValidationError::ZeroMaxAge,
            ]
        );
    }

    #[test]
    fn test_origin_shape() {
        assert!(is_bare_origin("http://localhost:5173"));
        assert!(is_bare_origin("https://app.example.com"));
        assert!(!is_bare_origin("http://localhost:5173/"));
        assert!(!is_bare_origin("http://localhost:5173/app"));
        assert!(!is_bare_origin("ftp://example.com"));
        assert!(!is_bare_origin("*"));
    }

    #[test]
    fn test_disabled_cors_skips_origin_checks() {
        let mut config = ServerConfig::default();
        config.cors.enabled = false;
        config.cors.allowed_origins = vec!["not an origin".into()];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_production_rejects_development_session_settings() {
        let mut config = ServerConfig::default();
        config.environment = Environment::Production;
        config.session.secure = Some(false);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::PlaceholderSecretInProduction));
        assert!(errors.contains(&ValidationError::InsecureCookieInProduction));

        config.session.secrets = vec!["a-real-secret".into()];
        config.session.secure = None;
        assert!(validate_config(&config).is_ok());
    }
}
