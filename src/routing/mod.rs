//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → mounts.rs (nested router for /api/users, /api/accounts,
//!                  /api/transactions)
//!     → external handler
//!     → no match: edge fallback (404)
//! ```
//!
//! # Design Decisions
//! - Mount table built at startup, immutable at runtime
//! - Prefix matching on segment boundaries only (matcher.rs)
//! - Deterministic: same input always matches same mount

pub mod matcher;
pub mod mounts;

pub use matcher::PathPrefixMatcher;
pub use mounts::{canonical_prefix, ApiPrefix, Mounts};
