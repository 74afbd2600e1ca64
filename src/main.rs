//! Personal finance API edge server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ body parser ─▶ security headers ─▶ request id / trace
//!                                                            │
//!                                                            ▼
//!                     access log ─▶ cookies + session ─▶ CORS ─▶ OPTIONS
//!                                                            │
//!                                                            ▼
//!     Client Response    ┌──────────────┬──────────────────┬──────────────────┐
//!     ◀──────────────────│ GET /        │ /api/users       │ /api/accounts    │
//!                        │ 404 fallback │ /api/transactions│ (mounted routers)│
//!                        └──────────────┴──────────────────┴──────────────────┘
//! ```
//!
//! The API routers are supplied by the application embedding the library;
//! this binary serves the edge alone, so every `/api/*` path answers 404.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use finance_edge::config;
use finance_edge::observability;
use finance_edge::{EdgeServer, Mounts, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "finance-edge", version, about = "Personal finance API edge server")]
struct Cli {
    /// TOML configuration file, overlaid by environment variables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overriding PORT and the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A missing .env file is fine.
    let dotenv = dotenvy::dotenv();

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    let config = config.validated()?;

    observability::logging::init(&config.observability);

    tracing::info!("finance-edge v{} starting", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
    tracing::info!(
        environment = ?config.environment,
        bind_address = %config.listener.bind_address(),
        cookie_secure = config.session.is_secure(config.environment),
        session_keys = config.session.secrets.len(),
        cors_enabled = config.cors.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;

    let shutdown = Shutdown::new();
    let server = EdgeServer::new(config, Mounts::new())?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
