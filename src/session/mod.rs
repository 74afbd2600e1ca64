//! Session cookie subsystem.
//!
//! # Data Flow
//! ```text
//! Cookie header
//!     → CookieManagerLayer (parse, collect outgoing changes)
//!     → middleware.rs (open with key ring, decode payload, attach Session)
//!     → handlers read/write Session
//!     → middleware.rs (seal when changed or opened with an old key,
//!                      clear when destroyed)
//!     → Set-Cookie
//! ```
//!
//! # Design Decisions
//! - All state lives client-side in an encrypted, authenticated cookie
//! - First secret seals, every secret opens (rotation without logouts)
//! - Invalid or expired cookies degrade to an empty session, never an error

pub mod cookie;
pub mod keys;
pub mod middleware;
pub mod store;

use thiserror::Error;

pub use cookie::CookieSettings;
pub use keys::KeyRing;
pub use middleware::{session_middleware, SessionLayerState};
pub use store::Session;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("at least one non-empty session secret is required")]
    NoKeys,
    #[error("session payload has expired")]
    Expired,
    #[error("session serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}
