//! Listener and graceful shutdown.

use crate::{ApiState, create_router};
use recap_error::{InternalError, RecapResult};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Bind `addr` and serve the API until Ctrl-C.
///
/// # Errors
///
/// Returns an internal error if the address cannot be bound or the server
/// stops abnormally.
pub async fn serve(addr: &str, state: ApiState) -> RecapResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| InternalError::new(format!("Failed to bind {}: {}", addr, e)))?;
    info!(addr, "Recap API listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| InternalError::new(format!("Server error: {}", e)))?;

    info!("Recap API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
