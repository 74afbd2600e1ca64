//! Session cookie attributes.

use time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::Cookie;

use crate::config::{Environment, SameSitePolicy, SessionConfig};

/// Resolved attributes applied to every issued session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub name: String,
    pub max_age_ms: u64,
    pub http_only: bool,
    pub same_site: SameSite,
    pub secure: bool,
    pub path: String,
}

impl CookieSettings {
    pub fn from_config(config: &SessionConfig, environment: Environment) -> Self {
        Self {
            name: config.cookie_name.clone(),
            max_age_ms: config.max_age_ms,
            http_only: config.http_only,
            same_site: match config.same_site {
                SameSitePolicy::Strict => SameSite::Strict,
                SameSitePolicy::Lax => SameSite::Lax,
                SameSitePolicy::None => SameSite::None,
            },
            secure: config.is_secure(environment),
            path: "/".to_string(),
        }
    }

    /// Unsealed cookie carrying `value` with all attributes set.
    pub fn build(&self, value: String) -> Cookie<'static> {
        let max_age = Duration::milliseconds(i64::try_from(self.max_age_ms).unwrap_or(i64::MAX));
        Cookie::build((self.name.clone(), value))
            .path(self.path.clone())
            .http_only(self.http_only)
            .same_site(self.same_site)
            .secure(self.secure)
            .max_age(max_age)
            .build()
    }

    /// Cookie used to clear the session on the client.
    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), ""))
            .path(self.path.clone())
            .build()
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default(), Environment::default())
    }
}
