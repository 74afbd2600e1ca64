//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request:
//!     → request id (x-request-id, UUID v4, echoed on the response)
//!     → TraceLayer span (method, path, request id)
//!     → access_log.rs (one dev-format line per response)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Logging has no behavioral effect on the request
//! - Metrics are cheap (no-op without an installed recorder)

pub mod access_log;
pub mod logging;
pub mod metrics;

pub use access_log::access_log_middleware;
