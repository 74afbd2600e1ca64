//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Response path:
//!     → headers.rs (resolved helmet policy, strip X-Powered-By)
//! Request path (after session):
//!     → cors.rs (origin allow-list, credentialed CORS, preflight)
//! ```
//!
//! # Design Decisions
//! - Header policy resolved once at startup, applied per response
//! - Origins matched exactly; no wildcard with credentials

pub mod cors;
pub mod headers;

pub use cors::cors_layer;
pub use headers::{security_headers_middleware, HeaderPolicy, ResolvedHeaders, SecurityHeaders};
