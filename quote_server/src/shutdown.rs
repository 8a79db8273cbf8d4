//! Graceful shutdown trigger for the HTTP server.
use std::future::Future;
use std::io;

use log::{error, info};

/// Resolves on Ctrl+C.
pub async fn ctrl_c() {
    on_signal(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` fires. If the signal cannot be listened for, the error is
/// logged and this never resolves, so the server keeps running.
pub async fn on_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received. Shutting down server..."),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn resolves_when_signal_fires() {
        let result = tokio::time::timeout(Duration::from_secs(1), on_signal(async { Ok(()) })).await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn signal_listener_failure_keeps_serving() {
        let failing = async { Err(io::Error::other("no signal driver")) };
        let result = tokio::time::timeout(Duration::from_secs(3600), on_signal(failing)).await;
        assert!(result.is_err());
    }
}
