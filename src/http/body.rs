//! Request body parsing.
//!
//! # Responsibilities
//! - Buffer JSON and URL-encoded bodies up to the configured limit
//! - Reject malformed bodies before any handler runs
//! - Attach the parsed value to request extensions
//! - Restore the raw bytes so downstream extractors still work
//!
//! # Design Decisions
//! - Other content types pass through untouched
//! - JSON is strict: the top level must be an object or an array
//! - Only UTF-8 bodies are accepted
//! - An empty body is not an error

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::config::SecurityConfig;
use crate::http::response::ApiError;
use crate::observability::metrics;

/// Body parsed by [`body_parser_middleware`], readable with
/// `Extension<ParsedBody>`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

impl ParsedBody {
    /// Look up a form field by name (first occurrence).
    pub fn form_value(&self, name: &str) -> Option<&str> {
        match self {
            ParsedBody::Form(pairs) => pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLimits {
    pub max_bytes: usize,
    pub parameter_limit: usize,
}

impl BodyLimits {
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self {
            max_bytes: config.max_body_size,
            parameter_limit: config.parameter_limit,
        }
    }
}

impl Default for BodyLimits {
    fn default() -> Self {
        Self::from_config(&SecurityConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
}

pub async fn body_parser_middleware(
    State(limits): State<BodyLimits>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let kind = match classify(request.headers()) {
        Ok(Some(kind)) => kind,
        Ok(None) => return next.run(request).await,
        Err(e) => return reject(e, "charset"),
    };

    if declared_length(request.headers()).is_some_and(|len| len > limits.max_bytes as u64) {
        return reject(ApiError::payload_too_large("request entity too large"), "too_large");
    }

    let (mut parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, limits.max_bytes).await {
        Ok(bytes) => bytes,
        Err(e) if is_length_limit(&e) => {
            return reject(ApiError::payload_too_large("request entity too large"), "too_large");
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read request body");
            return reject(ApiError::bad_request("request aborted"), "aborted");
        }
    };

    let parsed = match parse(kind, &bytes, limits) {
        Ok(parsed) => parsed,
        Err(e) => return reject(e, "malformed"),
    };

    parts.extensions.insert(parsed);
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn reject(error: ApiError, reason: &'static str) -> Response {
    tracing::warn!(status = %error.status, reason, message = %error.message, "Rejected request body");
    metrics::record_rejected_body(reason);
    error.into_response()
}

/// Which parser applies, if any. Errors on a non-UTF-8 charset.
fn classify(headers: &HeaderMap) -> Result<Option<BodyKind>, ApiError> {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(None);
    };

    let mut params = content_type.split(';');
    let essence = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    let kind = match essence.as_str() {
        "application/json" => BodyKind::Json,
        "application/x-www-form-urlencoded" => BodyKind::Form,
        _ => return Ok(None),
    };

    for param in params {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("charset") {
            let charset = value.trim().trim_matches('"').to_ascii_lowercase();
            if charset != "utf-8" && charset != "utf8" {
                return Err(ApiError::unsupported_charset(format!(
                    "unsupported charset \"{}\"",
                    charset.to_ascii_uppercase()
                )));
            }
        }
    }

    Ok(Some(kind))
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn is_length_limit(error: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

fn parse(kind: BodyKind, bytes: &Bytes, limits: BodyLimits) -> Result<ParsedBody, ApiError> {
    if bytes.is_empty() {
        return Ok(ParsedBody::Empty);
    }
    match kind {
        BodyKind::Json => parse_json(bytes),
        BodyKind::Form => parse_form(bytes, limits.parameter_limit),
    }
}

fn parse_json(bytes: &[u8]) -> Result<ParsedBody, ApiError> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    if !matches!(first, Some(b'{') | Some(b'[')) {
        return Err(ApiError::bad_request(
            "Malformed JSON body: top level must be an object or array",
        ));
    }
    serde_json::from_slice(bytes)
        .map(ParsedBody::Json)
        .map_err(|e| ApiError::bad_request(format!("Malformed JSON body: {}", e)))
}

fn parse_form(bytes: &[u8], parameter_limit: usize) -> Result<ParsedBody, ApiError> {
    if std::str::from_utf8(bytes).is_err() {
        return Err(ApiError::bad_request("Malformed form body: invalid UTF-8"));
    }
    let count = bytes.split(|b| *b == b'&').filter(|p| !p.is_empty()).count();
    if count > parameter_limit {
        return Err(ApiError::payload_too_large("too many parameters"));
    }
    let pairs = url::form_urlencoded::parse(bytes).into_owned().collect();
    Ok(ParsedBody::Form(pairs))
}
