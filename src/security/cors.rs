//! CORS negotiation.
//!
//! Credentialed requests are only honored for origins on the allow-list;
//! anything else is still processed but gets no `Access-Control-Allow-Origin`
//! so the browser withholds the response from the calling page.

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

pub const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
    Method::PATCH,
];

pub const ALLOWED_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::AUTHORIZATION,
    HeaderName::from_static("x-requested-with"),
    header::ACCEPT,
];

/// Build the CORS layer from configuration.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping unrepresentable CORS origin");
                None
            }
        })
        .collect();

    tracing::info!(allowed_origins = ?config.allowed_origins, "CORS configured with origin allowlist");

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(ALLOWED_METHODS.to_vec())
        .allow_headers(ALLOWED_HEADERS.to_vec())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&CorsConfig::default()))
    }

    #[tokio::test]
    async fn test_allowed_origin_is_reflected_with_credentials() {
        let req = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();

        assert_eq!(
            res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn test_unknown_origin_gets_no_allow_origin() {
        let req = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();

        assert!(res.status().is_success());
        assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_preflight_lists_methods_and_headers() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/anything")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();

        assert!(res.status().is_success());
        let methods = res.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS", "PATCH"] {
            assert!(methods.contains(method), "missing {method} in {methods}");
        }
        let headers = res.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(headers.contains("x-requested-with"));
        assert!(headers.contains("authorization"));
    }
}
