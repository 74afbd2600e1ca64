//! Personal finance API edge server library.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod session;

pub use config::schema::ServerConfig;
pub use http::EdgeServer;
pub use lifecycle::Shutdown;
pub use routing::{ApiPrefix, Mounts};
