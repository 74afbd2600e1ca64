//! The logout flow.
//!
//! Order is fixed: call the API, clear local auth state, then navigate with
//! a full page load to `/login`. A failed API call is reported but does not
//! stop the other two steps.

use std::future::Future;

use thiserror::Error;

use crate::client::navigation::UserSummary;

pub const LOGIN_PATH: &str = "/login";

/// Where the UI goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Client-side route transition; in-memory state survives.
    InApp(String),
    /// Full page load; all in-memory state is discarded.
    Hard(String),
}

impl Navigation {
    pub fn path(&self) -> &str {
        match self {
            Navigation::InApp(path) | Navigation::Hard(path) => path,
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Navigation::Hard(_))
    }
}

#[derive(Debug, Error)]
pub enum LogoutError {
    #[error("logout request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid logout URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("logout rejected with status {0}")]
    Status(u16),
}

/// The server side of logout.
pub trait AuthApi {
    fn logout(&self) -> impl Future<Output = Result<(), LogoutError>> + Send;
}

/// Client-side record of who is signed in.
pub trait AuthStore {
    fn clear(&mut self);
    fn is_authenticated(&self) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalAuthState {
    user: Option<UserSummary>,
}

impl LocalAuthState {
    pub fn signed_in(user: UserSummary) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.user.as_ref()
    }
}

impl AuthStore for LocalAuthState {
    fn clear(&mut self) {
        self.user = None;
    }

    fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Debug)]
pub struct LogoutOutcome {
    pub navigation: Navigation,
    /// Set when the server-side logout failed; the session cookie may
    /// still be valid until it expires.
    pub api_error: Option<LogoutError>,
}

pub struct LogoutFlow<A, S> {
    api: A,
    store: S,
}

impl<A: AuthApi, S: AuthStore> LogoutFlow<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self { api, store }
    }

    pub async fn run(&mut self) -> LogoutOutcome {
        let api_error = match self.api.logout().await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Logout API call failed, clearing local state anyway");
                Some(e)
            }
        };

        self.store.clear();

        LogoutOutcome {
            navigation: Navigation::Hard(LOGIN_PATH.to_string()),
            api_error,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (A, S) {
        (self.api, self.store)
    }
}
