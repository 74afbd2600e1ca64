//! Security response headers.
//!
//! # Responsibilities
//! - Define the baseline header policy (the helmet set)
//! - Resolve an ordered list of policies into one header map
//! - Apply the resolved headers to every response
//!
//! # Design Decisions
//! - One ordered list instead of stacking the middleware twice: later
//!   policies override earlier ones key by key, and the merge is explicit
//! - Headers a handler already set are left alone
//! - `X-Powered-By` is always stripped

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::config::{CrossOriginResourcePolicy, SecurityConfig};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self';base-uri 'self';font-src 'self' https: data:;form-action 'self';frame-ancestors 'self';img-src 'self' data:;object-src 'none';script-src 'self';script-src-attr 'none';style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests";

const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");

/// One set of security headers. `HeaderPolicy::default()` is the baseline.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        let pairs: [(&'static str, &'static str); 12] = [
            ("content-security-policy", CONTENT_SECURITY_POLICY),
            ("cross-origin-opener-policy", "same-origin"),
            (
                "cross-origin-resource-policy",
                CrossOriginResourcePolicy::SameOrigin.as_str(),
            ),
            ("origin-agent-cluster", "?1"),
            ("referrer-policy", "no-referrer"),
            ("strict-transport-security", "max-age=15552000; includeSubDomains"),
            ("x-content-type-options", "nosniff"),
            ("x-dns-prefetch-control", "off"),
            ("x-download-options", "noopen"),
            ("x-frame-options", "SAMEORIGIN"),
            ("x-permitted-cross-domain-policies", "none"),
            ("x-xss-protection", "0"),
        ];
        Self {
            headers: pairs
                .into_iter()
                .map(|(k, v)| (HeaderName::from_static(k), HeaderValue::from_static(v)))
                .collect(),
        }
    }
}

impl HeaderPolicy {
    /// A policy with no headers, for building narrow overrides.
    pub fn empty() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Set (or replace) a header in this policy.
    pub fn with(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.retain(|(k, _)| *k != name);
        self.headers.push((name, value));
        self
    }

    pub fn cross_origin_resource_policy(self, policy: CrossOriginResourcePolicy) -> Self {
        self.with(
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static(policy.as_str()),
        )
    }

    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }
}

/// Ordered list of policies; later entries win on overlapping keys.
#[derive(Debug, Clone, Default)]
pub struct SecurityHeaders {
    policies: Vec<HeaderPolicy>,
}

impl SecurityHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, policy: HeaderPolicy) -> Self {
        self.policies.push(policy);
        self
    }

    /// Baseline policy followed by the configured resource-policy override.
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new().push(HeaderPolicy::default()).push(
            HeaderPolicy::default().cross_origin_resource_policy(config.cross_origin_resource_policy),
        )
    }

    /// Merge every policy in order into a single header map.
    pub fn resolve(&self) -> HeaderMap {
        let mut resolved = HeaderMap::new();
        for policy in &self.policies {
            for (name, value) in policy.headers() {
                resolved.insert(name.clone(), value.clone());
            }
        }
        resolved
    }
}

/// Resolved headers shared by every request.
pub type ResolvedHeaders = Arc<HeaderMap>;

pub async fn security_headers_middleware(
    State(headers): State<ResolvedHeaders>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    apply(&headers, response.headers_mut());
    response
}

fn apply(resolved: &HeaderMap, target: &mut HeaderMap) {
    target.remove(X_POWERED_BY);
    for (name, value) in resolved {
        if !target.contains_key(name) {
            target.insert(name.clone(), value.clone());
        }
    }
}
