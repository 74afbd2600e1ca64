//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (dotenvy) + optional TOML file
//!     → loader.rs (deserialize, overlay environment variables)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc to the middleware that needs it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; handlers never read the environment
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env, load, ConfigError};
pub use schema::{
    CorsConfig, CrossOriginResourcePolicy, Environment, ListenerConfig, LogFormat,
    ObservabilityConfig, SameSitePolicy, SecurityConfig, ServerConfig, SessionConfig,
};
pub use validation::{validate_config, ValidationError};

impl ServerConfig {
    /// Run semantic validation, returning the config on success.
    pub fn validated(self) -> Result<Self, ConfigError> {
        validate_config(&self).map_err(ConfigError::Validation)?;
        Ok(self)
    }
}
