//! HTTP edge subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → body.rs (parse JSON / URL-encoded, enforce limits)
//!     → security headers, request id, access log, session, CORS
//!     → handlers.rs (OPTIONS catch-all, GET /, 404 fallback)
//!     → mounted API routers (/api/users, /api/accounts, /api/transactions)
//!     → response.rs (edge-generated error payloads)
//! ```

pub mod body;
pub mod handlers;
pub mod response;
pub mod server;

pub use body::{BodyLimits, ParsedBody};
pub use handlers::{Welcome, WELCOME_MESSAGE};
pub use response::{ApiError, ErrorBody};
pub use server::{EdgeServer, ServerError};
