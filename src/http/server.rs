//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the edge's own handlers
//! - Nest the externally supplied routers by prefix
//! - Wire up middleware in the documented order
//! - Bind server to listener, shut down gracefully
//!
//! # Middleware Order (outermost first)
//! ```text
//! path normalization (trailing slash, prefix case)
//!     → body parsing → security headers → request id / trace span / access log
//!     → cookies + session → CORS → OPTIONS catch-all → routes → 404
//! ```
//!
//! Axum applies `.layer()` calls inside-out, so `build_router` adds them in
//! reverse. Path normalization has to run before routing, so it wraps the
//! whole router as a fallback service instead of being one of its layers.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    normalize_path::NormalizePathLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnFailure, TraceLayer},
};

use crate::config::ServerConfig;
use crate::http::body::{body_parser_middleware, BodyLimits};
use crate::http::handlers::{not_found, preflight_middleware, welcome};
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::access_log_middleware;
use crate::routing::{canonical_prefix, Mounts};
use crate::security::{cors_layer, security_headers_middleware, SecurityHeaders};
use crate::session::{session_middleware, CookieSettings, KeyRing, SessionError, SessionLayerState};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid session configuration: {0}")]
    Session(#[from] SessionError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The edge server: one router, one immutable configuration.
pub struct EdgeServer {
    router: Router,
    config: Arc<ServerConfig>,
}

impl EdgeServer {
    /// Build the pipeline for `config`, dispatching API prefixes to `mounts`.
    pub fn new(config: ServerConfig, mounts: Mounts) -> Result<Self, ServerError> {
        let config = Arc::new(config);
        let router = Self::build_router(&config, mounts)?;
        Ok(Self { router, config })
    }

    fn build_router(config: &ServerConfig, mounts: Mounts) -> Result<Router, ServerError> {
        let session_state = SessionLayerState::new(
            KeyRing::from_secrets(config.session.secrets.as_slice())?,
            CookieSettings::from_config(&config.session, config.environment),
        );

        let router = mounts
            .apply(Router::new().route("/", get(welcome)))
            .fallback(not_found)
            .method_not_allowed_fallback(not_found)
            .layer(middleware::from_fn(preflight_middleware));

        let router = if config.cors.enabled {
            router.layer(cors_layer(&config.cors))
        } else {
            router
        };

        let router = router
            .layer(middleware::from_fn_with_state(session_state, session_middleware))
            .layer(CookieManagerLayer::new())
            .layer(middleware::from_fn(access_log_middleware))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &axum::http::Request<_>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default();
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id
                        )
                    })
                    // The access log writes the one line per response.
                    .on_request(())
                    .on_response(())
                    .on_failure(DefaultOnFailure::new().level(tracing::Level::WARN)),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        let router = if config.security.enable_headers {
            let resolved = Arc::new(SecurityHeaders::from_config(&config.security).resolve());
            router.layer(middleware::from_fn_with_state(resolved, security_headers_middleware))
        } else {
            router
        };

        let router = router.layer(middleware::from_fn_with_state(
            BodyLimits::from_config(&config.security),
            body_parser_middleware,
        ));

        Ok(Router::new()
            .fallback_service(router)
            .layer(middleware::map_request(canonical_prefix))
            .layer(NormalizePathLayer::trim_trailing_slash()))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until Ctrl+C, SIGTERM, or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = ?self.config.environment,
            "Server running on port {}",
            addr.port()
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
