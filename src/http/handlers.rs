//! Handlers owned by the edge: the root probe, the OPTIONS catch-all and
//! the 404 fallback.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::response::ApiError;

pub const WELCOME_MESSAGE: &str = "Welcome to the Personal Finance Management API";

/// Payload of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
    pub version: String,
}

pub async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: WELCOME_MESSAGE.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Answer every OPTIONS request with `204` before routing.
///
/// With CORS enabled the CORS layer already answers preflights, so this only
/// sees OPTIONS traffic when CORS negotiation is turned off.
pub async fn preflight_middleware(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}
