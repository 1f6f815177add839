//! Server bootstrap: binds a listener and serves the API router.

use std::net::SocketAddr;
use std::sync::Arc;

use taskboard::{Board, TaskStore};
use tokio::task::JoinHandle;

use crate::api;

/// Starts the HTTP server for `board` on `addr` and returns the bound
/// address and a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_board<S: TaskStore + 'static>(
    addr: &str,
    board: Arc<Board<S>>,
) -> Result<(SocketAddr, JoinHandle<()>), std::io::Error> {
    let app = api::router(board);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "taskboard server error");
        }
    });

    Ok((bound_addr, handle))
}
