//! OS signal handling.
//!
//! Resolves once Ctrl+C, SIGTERM (unix), or an internal shutdown request
//! arrives. A failure to install a handler is logged and that source is
//! ignored instead of aborting the server.

use tokio::sync::broadcast;

pub async fn shutdown_signal(mut internal: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let requested = async {
        // A closed channel means the coordinator is gone; keep serving.
        if internal.recv().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received"),
        _ = terminate => tracing::info!("SIGTERM received"),
        _ = requested => tracing::info!("Shutdown requested"),
    }
    tracing::info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use std::time::Duration;

    #[tokio::test]
    async fn test_internal_trigger_resolves() {
        let shutdown = Shutdown::new();
        let signal = tokio::spawn(shutdown_signal(shutdown.subscribe()));
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), signal)
            .await
            .expect("signal did not resolve")
            .unwrap();
    }
}
