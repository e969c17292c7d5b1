//! HTTP front end for the ride dispatch simulation.
//!
//! Owns identifier generation and request parsing; every operation is forwarded
//! to one shared [`sim_core::simulation::Simulation`] behind an async mutex.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::routes::create_router;
use crate::state::AppState;

/// Binds the configured address and serves until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    let local_addr = listener.local_addr().map_err(ServerError::Serve)?;

    let app = create_router(AppState::new(config.dispatch_mode), &config.static_dir);
    info!(
        addr = %local_addr,
        dispatch_mode = %config.dispatch_mode,
        static_dir = %config.static_dir.display(),
        "ride dispatch server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("ride dispatch server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
