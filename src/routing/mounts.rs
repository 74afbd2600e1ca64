//! Prefix mount table.
//!
//! # Responsibilities
//! - Name the API prefixes the edge dispatches on
//! - Hold the externally supplied router for each prefix
//! - Nest them into the edge router
//!
//! # Design Decisions
//! - Prefixes are a closed set; unmounted prefixes fall through to the 404
//! - Mounting twice replaces the earlier router
//! - Method mismatches inside a mount answer 404, same as unknown paths
//! - The prefix itself matches case-insensitively; the mounted router sees
//!   the rest of the path untouched

use axum::{
    body::Body,
    http::{uri::PathAndQuery, Request, Uri},
    Router,
};

use crate::http::handlers::not_found;
use crate::routing::matcher::PathPrefixMatcher;

/// The API prefixes the edge dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiPrefix {
    Users,
    Accounts,
    Transactions,
}

impl ApiPrefix {
    pub const ALL: [ApiPrefix; 3] = [ApiPrefix::Users, ApiPrefix::Accounts, ApiPrefix::Transactions];

    pub fn path(self) -> &'static str {
        match self {
            ApiPrefix::Users => "/api/users",
            ApiPrefix::Accounts => "/api/accounts",
            ApiPrefix::Transactions => "/api/transactions",
        }
    }

    /// Short label used in logs and metrics.
    pub fn label(self) -> &'static str {
        match self {
            ApiPrefix::Users => "users",
            ApiPrefix::Accounts => "accounts",
            ApiPrefix::Transactions => "transactions",
        }
    }

    /// The prefix a request path falls under, if any.
    pub fn of_path(path: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|prefix| PathPrefixMatcher::new(prefix.path()).matches(path))
    }
}

/// Routers mounted under each API prefix.
#[derive(Default)]
pub struct Mounts {
    routers: Vec<(ApiPrefix, Router)>,
}

impl Mounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `router` under `prefix`, replacing any earlier mount.
    pub fn mount(mut self, prefix: ApiPrefix, router: Router) -> Self {
        self.routers.retain(|(p, _)| *p != prefix);
        self.routers.push((prefix, router));
        self
    }

    pub fn is_mounted(&self, prefix: ApiPrefix) -> bool {
        self.routers.iter().any(|(p, _)| *p == prefix)
    }

    pub fn prefixes(&self) -> Vec<ApiPrefix> {
        self.routers.iter().map(|(p, _)| *p).collect()
    }

    /// Nest every mounted router into `router`.
    pub fn apply(self, router: Router) -> Router {
        self.routers
            .into_iter()
            .fold(router, |router, (prefix, mounted)| {
                tracing::debug!(prefix = prefix.path(), "Mounting router");
                router.nest(prefix.path(), mounted.method_not_allowed_fallback(not_found))
            })
    }
}

/// Respell a mount prefix in its canonical case before routing, so
/// `/API/Accounts/7` reaches the accounts router as `/api/accounts/7`.
pub async fn canonical_prefix(mut request: Request<Body>) -> Request<Body> {
    let Some(path) = ApiPrefix::ALL
        .into_iter()
        .find_map(|prefix| PathPrefixMatcher::new(prefix.path()).canonicalize(request.uri().path()))
    else {
        return request;
    };

    let path_and_query = match request.uri().query() {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };
    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = PathAndQuery::try_from(path_and_query).ok();
    match Uri::from_parts(parts) {
        Ok(uri) => *request.uri_mut() = uri,
        Err(e) => tracing::debug!(error = %e, "Keeping request path as sent"),
    }
    request
}

impl std::fmt::Debug for Mounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounts").field("prefixes", &self.prefixes()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    #[test]
    fn test_of_path() {
        assert_eq!(ApiPrefix::of_path("/api/users"), Some(ApiPrefix::Users));
        assert_eq!(ApiPrefix::of_path("/api/accounts/9"), Some(ApiPrefix::Accounts));
        assert_eq!(
            ApiPrefix::of_path("/api/transactions/import"),
            Some(ApiPrefix::Transactions)
        );
        assert_eq!(ApiPrefix::of_path("/api/userz"), None);
        assert_eq!(ApiPrefix::of_path("/"), None);
    }

    #[tokio::test]
    async fn test_canonical_prefix_keeps_rest_and_query() {
        let request = Request::builder()
            .uri("/API/Transactions/Import?dryRun=1")
            .body(Body::empty())
            .unwrap();
        let request = canonical_prefix(request).await;
        assert_eq!(request.uri(), "/api/transactions/Import?dryRun=1");

        let request = Request::builder().uri("/Other").body(Body::empty()).unwrap();
        assert_eq!(canonical_prefix(request).await.uri(), "/Other");
    }

    #[test]
    fn test_mount_replaces_existing() {
        let mounts = Mounts::new()
            .mount(ApiPrefix::Users, Router::new().route("/a", get(|| async { "a" })))
            .mount(ApiPrefix::Accounts, Router::new())
            .mount(ApiPrefix::Users, Router::new().route("/b", get(|| async { "b" })));

        assert_eq!(mounts.prefixes(), vec![ApiPrefix::Accounts, ApiPrefix::Users]);
        assert!(mounts.is_mounted(ApiPrefix::Users));
        assert!(!mounts.is_mounted(ApiPrefix::Transactions));
    }
}
