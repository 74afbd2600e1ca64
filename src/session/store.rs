//! Per-request session handle and its sealed payload format.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::session::SessionError;

/// Session data attached to a request by the session middleware.
///
/// Cloning is cheap; all clones share the same state, so handlers can take
/// it as an extractor and the middleware sees their writes on the way out.
#[derive(Clone, Debug, Default)]
pub struct Session {
    inner: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    data: Map<String, Value>,
    is_new: bool,
    changed: bool,
    destroyed: bool,
}

/// What the middleware needs to decide how to answer with the cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub data: Map<String, Value>,
    pub is_new: bool,
    pub changed: bool,
    pub destroyed: bool,
}

impl Session {
    /// A session for a request that carried no usable cookie.
    pub fn new() -> Self {
        Self::with_state(State {
            is_new: true,
            ..State::default()
        })
    }

    /// A session restored from a verified cookie.
    pub fn restore(data: Map<String, Value>) -> Self {
        Self::with_state(State {
            data,
            ..State::default()
        })
    }

    fn with_state(state: State) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        match self.lock().data.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    pub fn insert<T: Serialize>(&self, key: &str, value: T) -> Result<(), SessionError> {
        let value = serde_json::to_value(value)?;
        let mut state = self.lock();
        state.data.insert(key.to_string(), value);
        state.changed = true;
        state.destroyed = false;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut state = self.lock();
        let removed = state.data.remove(key);
        if removed.is_some() {
            state.changed = true;
        }
        removed
    }

    /// Drop all keys but keep the session (the cookie is rewritten empty or
    /// cleared, depending on whether it existed).
    pub fn clear(&self) {
        let mut state = self.lock();
        if !state.data.is_empty() {
            state.data.clear();
            state.changed = true;
        }
    }

    /// End the session; the response clears the cookie.
    pub fn destroy(&self) {
        let mut state = self.lock();
        state.data.clear();
        state.destroyed = true;
    }

    pub fn is_empty(&self) -> bool {
        self.lock().data.is_empty()
    }

    pub fn is_new(&self) -> bool {
        self.lock().is_new
    }

    pub fn is_changed(&self) -> bool {
        self.lock().changed
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            data: state.data.clone(),
            is_new: state.is_new,
            changed: state.changed,
            destroyed: state.destroyed,
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Session>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Session middleware is not installed",
        ))
    }
}

/// Plaintext carried inside the sealed cookie value.
///
/// The expiry is stored alongside the data so an old cookie replayed past its
/// max-age is refused even if the client ignored the cookie's own `Max-Age`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Unix timestamp (milliseconds) after which the payload is void.
    pub exp: i64,
    pub data: Map<String, Value>,
}

impl Payload {
    pub fn new(data: Map<String, Value>, now: OffsetDateTime, max_age_ms: u64) -> Self {
        let max_age_ms = i64::try_from(max_age_ms).unwrap_or(i64::MAX);
        Self {
            exp: unix_millis(now).saturating_add(max_age_ms),
            data,
        }
    }

    pub fn encode(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a payload, refusing it once expired.
    pub fn decode(raw: &str, now: OffsetDateTime) -> Result<Self, SessionError> {
        let payload: Payload = serde_json::from_str(raw)?;
        if payload.exp <= unix_millis(now) {
            return Err(SessionError::Expired);
        }
        Ok(payload)
    }
}

fn unix_millis(at: OffsetDateTime) -> i64 {
    i64::try_from(at.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}
