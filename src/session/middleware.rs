//! Session cookie middleware.
//!
//! Runs inside `CookieManagerLayer`, which parses the `Cookie` header and
//! writes `Set-Cookie` for whatever this middleware adds or removes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use time::OffsetDateTime;
use tower_cookies::Cookies;

use crate::session::cookie::CookieSettings;
use crate::session::keys::KeyRing;
use crate::session::store::{Payload, Session};

/// State shared by every invocation of [`session_middleware`].
#[derive(Clone, Debug)]
pub struct SessionLayerState {
    pub keys: Arc<KeyRing>,
    pub cookie: Arc<CookieSettings>,
}

impl SessionLayerState {
    pub fn new(keys: KeyRing, cookie: CookieSettings) -> Self {
        Self {
            keys: Arc::new(keys),
            cookie: Arc::new(cookie),
        }
    }
}

pub async fn session_middleware(
    State(state): State<SessionLayerState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let (session, reseal) = restore(&state, &cookies);
    request.extensions_mut().insert(session.clone());

    let response = next.run(request).await;

    commit(&state, &cookies, &session, reseal);
    response
}

/// Open the incoming cookie. Anything that fails verification is treated as
/// if no cookie had been sent.
fn restore(state: &SessionLayerState, cookies: &Cookies) -> (Session, bool) {
    let Some(raw) = cookies.get(&state.cookie.name) else {
        return (Session::new(), false);
    };

    let Some(opened) = state.keys.open(&raw) else {
        tracing::debug!(cookie = %state.cookie.name, "Session cookie failed verification");
        return (Session::new(), false);
    };

    match Payload::decode(opened.cookie.value(), OffsetDateTime::now_utc()) {
        Ok(payload) => {
            if opened.needs_reseal() {
                tracing::debug!(key_index = opened.key_index, "Session opened with rotated key");
            }
            (Session::restore(payload.data), opened.needs_reseal())
        }
        Err(e) => {
            tracing::debug!(error = %e, "Discarding session payload");
            (Session::new(), false)
        }
    }
}

fn commit(state: &SessionLayerState, cookies: &Cookies, session: &Session, reseal: bool) {
    let snapshot = session.snapshot();

    if snapshot.destroyed || (snapshot.changed && snapshot.data.is_empty()) {
        if !snapshot.is_new {
            cookies.remove(state.cookie.removal());
        }
        return;
    }

    if !(snapshot.changed || reseal) || snapshot.data.is_empty() {
        return;
    }

    let payload = Payload::new(snapshot.data, OffsetDateTime::now_utc(), state.cookie.max_age_ms);
    let value = match payload.encode() {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode session payload");
            return;
        }
    };

    match state.keys.seal(state.cookie.build(value)) {
        Some(sealed) => cookies.add(sealed),
        None => tracing::error!(cookie = %state.cookie.name, "Failed to seal session cookie"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header, StatusCode},
        middleware,
        response::IntoResponse,
        routing::get,
        Router,
    };
    use tower::ServiceExt;
    use tower_cookies::{Cookie, CookieManagerLayer};

    fn app(secrets: &[&str]) -> Router {
        let state = SessionLayerState::new(
            KeyRing::from_secrets(secrets).unwrap(),
            CookieSettings::default(),
        );
        Router::new()
            .route(
                "/login",
                get(|session: Session| async move {
                    session.insert("user_id", 42).unwrap();
                    StatusCode::OK
                }),
            )
            .route(
                "/whoami",
                get(|session: Session| async move {
                    match session.get::<i32>("user_id").unwrap() {
                        Some(id) => id.to_string().into_response(),
                        None => StatusCode::UNAUTHORIZED.into_response(),
                    }
                }),
            )
            .route(
                "/logout",
                get(|session: Session| async move {
                    session.destroy();
                    StatusCode::NO_CONTENT
                }),
            )
            .layer(middleware::from_fn_with_state(state, session_middleware))
            .layer(CookieManagerLayer::new())
    }

    fn set_cookie(response: &Response) -> Option<Cookie<'static>> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Cookie::parse_encoded(v.to_string()).ok())
    }

    fn request(path: &str, cookie: Option<&Cookie<'_>>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie.stripped().encoded().to_string());
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_untouched_session_sets_no_cookie() {
        let res = app(&["k1"]).oneshot(request("/whoami", None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let app = app(&["k1"]);
        let res = app.clone().oneshot(request("/login", None)).await.unwrap();
        let cookie = set_cookie(&res).expect("login issues a cookie");
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.http_only(), Some(true));

        let res = app.oneshot(request("/whoami", Some(&cookie))).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_text(res).await, "42");
    }

    #[tokio::test]
    async fn test_rotated_cookie_is_accepted_and_resealed() {
        let res = app(&["old"]).oneshot(request("/login", None)).await.unwrap();
        let old_cookie = set_cookie(&res).unwrap();

        let rotated = app(&["new", "old"]);
        let res = rotated
            .clone()
            .oneshot(request("/whoami", Some(&old_cookie)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let resealed = set_cookie(&res).expect("rotated cookie is re-issued");

        let primary_only = KeyRing::from_secrets(&["new"]).unwrap();
        assert_eq!(primary_only.open(&resealed).unwrap().key_index, 0);

        let res = app(&["new"]).oneshot(request("/whoami", Some(&resealed))).await.unwrap();
        assert_eq!(body_text(res).await, "42");
    }

    #[tokio::test]
    async fn test_forged_cookie_is_ignored() {
        let forged = Cookie::new("session", "eyJ1c2VyX2lkIjo0Mn0=");
        let res = app(&["k1"]).oneshot(request("/whoami", Some(&forged))).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_destroy_clears_cookie() {
        let app = app(&["k1"]);
        let res = app.clone().oneshot(request("/login", None)).await.unwrap();
        let cookie = set_cookie(&res).unwrap();

        let res = app.oneshot(request("/logout", Some(&cookie))).await.unwrap();
        let cleared = set_cookie(&res).expect("logout clears the cookie");
        assert_eq!(cleared.name(), "session");
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(time::Duration::ZERO));
    }
}
