//! HTTP server startup and lifecycle management.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::{Result, ServerError, TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP, shutdown_signal};
use crate::config::ServerConfig;

/// Serves `app` until a shutdown signal arrives.
///
/// After the signal, in-flight requests get up to the configured shutdown
/// timeout to finish; connections still open after that are dropped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve_http(app: Router, server_config: ServerConfig) -> Result<()> {
    let server_addr = server_config.server_addr();

    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            addr = %server_addr,
            error = %err,
            "failed to bind to address"
        );
        ServerError::bind_error(server_addr, err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %server_addr,
        "server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "server is bound to all interfaces, ensure firewall rules are configured"
        );
    }

    let signalled = Arc::new(Notify::new());
    let graceful = {
        let signalled = Arc::clone(&signalled);
        async move {
            shutdown_signal().await;
            signalled.notify_one();
        }
    };

    let server = axum::serve(listener, app).with_graceful_shutdown(graceful);
    let server = server.into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return finish(result),
        () = signalled.notified() => {}
    }

    let shutdown_timeout = server_config.shutdown_timeout();
    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        timeout_secs = shutdown_timeout.as_secs(),
        "draining in-flight requests"
    );

    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(result) => finish(result),
        Err(_) => {
            tracing::warn!(
                target: TRACING_TARGET_SHUTDOWN,
                timeout_secs = shutdown_timeout.as_secs(),
                "shutdown timeout elapsed, dropping open connections"
            );
            Ok(())
        }
    }
}

fn finish(result: std::io::Result<()>) -> Result<()> {
    result.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %err,
            "server encountered an error"
        );
        ServerError::Runtime(err)
    })?;

    tracing::info!(target: TRACING_TARGET_SHUTDOWN, "server shut down gracefully");
    Ok(())
}
