//! Listener lifecycle: bind, serve until shutdown, release the connection.

use std::future::Future;
use std::net::SocketAddr;

use prism_db::DbPool;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::router::build_app_router;
use crate::state::AppState;

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind the configured address.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServeError> {
    let addr = SocketAddr::new(config.host, config.port);
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    config: &ServerConfig,
    shutdown: F,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app_router(state, config);

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Prism properties service is running at http://{addr}/");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServeError::Serve)?;

    tracing::info!("Server stopped accepting connections");
    Ok(())
}

/// Bind, serve until `shutdown`, then close the database connection.
///
/// The pool is closed on every path, including a failed bind.
pub async fn run<F>(config: &ServerConfig, pool: DbPool, shutdown: F) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let served = match bind(config).await {
        Ok(listener) => serve(listener, AppState { pool: pool.clone() }, config, shutdown).await,
        Err(e) => Err(e),
    };

    tracing::info!("Closing database connection");
    pool.close().await;

    served
}
