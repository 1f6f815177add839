//! `Taskboard` server: a kanban board over JSON HTTP.
//!
//! Boards live in memory unless a data directory is configured, in which
//! case each owner's board is persisted as a snapshot file there.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:8080 with an in-memory store
//! cargo run --bin taskboard-server
//!
//! # Persist boards and reject out-of-range move positions
//! cargo run --bin taskboard-server -- --data-dir ./boards --position-policy strict
//!
//! # Or via environment variables
//! TASKBOARD_ADDR=127.0.0.1:3000 TASKBOARD_LOG=debug cargo run --bin taskboard-server
//! ```

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use taskboard::{Board, FileStore, MemoryStore, TaskStore};
use taskboard_server::config::{ServerCliArgs, ServerConfig};
use taskboard_server::server;
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let _guard = init_logging(&config.log_level, config.log_file.as_deref());

    match config.data_dir.clone() {
        Some(dir) => match FileStore::open(&dir) {
            Ok(store) => {
                tracing::info!(data_dir = %dir.display(), "using file store");
                run(&config, store).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to open data directory");
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("using in-memory store");
            run(&config, MemoryStore::new()).await;
        }
    }
}

/// Initializes tracing with the resolved level.
///
/// Logs go to stdout, or to `file_path` through a non-blocking writer. The
/// returned guard must be held for the lifetime of the process so buffered
/// lines are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some((log_dir, file_name)) = file_path.and_then(|path| {
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Some((dir, path.file_name()?))
    }) else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
        return None;
    };

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Serves `store` until the server task ends.
async fn run<S: TaskStore + 'static>(config: &ServerConfig, store: S) {
    tracing::info!(
        addr = %config.bind_addr,
        position_policy = %config.board.position_policy,
        "starting taskboard server"
    );
    let board = Arc::new(Board::with_config(store, config.board));

    match server::start_server_with_board(&config.bind_addr, board).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "taskboard server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "taskboard server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start taskboard server");
            std::process::exit(1);
        }
    }
}
