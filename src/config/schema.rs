//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! server. All types derive Serde traits for deserialization from TOML files;
//! the environment overlay lives in `loader.rs`.

use serde::{Deserialize, Serialize};

/// Placeholder secret used when `SESSION_SECRET` is not provided.
///
/// WARNING: only suitable for local development. Validation rejects it in
/// production.
pub const INSECURE_SESSION_SECRET: &str = "secret-key";

/// Root configuration for the edge server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Deployment environment (drives secure-cookie defaults).
    pub environment: Environment,

    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Cross-origin resource sharing.
    pub cors: CorsConfig,

    /// Security headers and body limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// SameSite attribute for the session cookie.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie name.
    pub cookie_name: String,

    /// Secrets used to derive cookie keys. The first one seals new cookies;
    /// the rest are only used to open cookies issued before a rotation.
    pub secrets: Vec<String>,

    /// Cookie lifetime in milliseconds.
    pub max_age_ms: u64,

    pub http_only: bool,

    pub same_site: SameSitePolicy,

    /// Explicit `Secure` flag. When unset, it follows the environment.
    pub secure: Option<bool>,
}

impl SessionConfig {
    /// Resolve the `Secure` flag for the given environment.
    pub fn is_secure(&self, environment: Environment) -> bool {
        self.secure.unwrap_or(environment.is_production())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            secrets: vec![INSECURE_SESSION_SECRET.to_string()],
            max_age_ms: 86_400_000,
            http_only: true,
            same_site: SameSitePolicy::Lax,
            secure: None,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Disable when a fronting proxy already negotiates CORS.
    pub enabled: bool,

    /// Exact origins allowed to make credentialed requests.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

/// Value of the `Cross-Origin-Resource-Policy` header.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CrossOriginResourcePolicy {
    #[default]
    SameOrigin,
    SameSite,
    CrossOrigin,
}

impl CrossOriginResourcePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CrossOriginResourcePolicy::SameOrigin => "same-origin",
            CrossOriginResourcePolicy::SameSite => "same-site",
            CrossOriginResourcePolicy::CrossOrigin => "cross-origin",
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,

    /// Override applied on top of the baseline header policy so the
    /// frontend origin can load API resources.
    pub cross_origin_resource_policy: CrossOriginResourcePolicy,

    /// Maximum JSON/form body size in bytes.
    pub max_body_size: usize,

    /// Maximum number of URL-encoded form parameters.
    pub parameter_limit: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            cross_origin_resource_policy: CrossOriginResourcePolicy::CrossOrigin,
            max_body_size: 100 * 1024, // 100KB
            parameter_limit: 1000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
