//! # Ventas API Server
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. ApiConfig::load  (file → env overrides → validate)                 │
//! │  2. tracing subscriber (RUST_LOG, else logging.filter)                 │
//! │  3. storage: SQLite pool + migrations, or MemoryStore                  │
//! │  4. optional demo catalog                                              │
//! │  5. axum::serve until Ctrl+C / SIGTERM                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```bash
//! cargo run -p ventas-api -- ventas.toml
//! VENTAS_STORAGE=memory VENTAS_PORT=3000 cargo run -p ventas-api
//! ```

use std::path::PathBuf;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use ventas_api::config::{ApiConfig, StorageBackend};
use ventas_api::build_app;
use ventas_db::demo::seed_demo_catalog;
use ventas_db::{Database, DbConfig, Ledger, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ApiConfig::load(config_path).context("Failed to load configuration")?;

    init_tracing(&config.logging.filter);

    match &config.source {
        Some(path) => info!(path = %path.display(), "Loaded config from file"),
        None => debug!("No config file given, using defaults"),
    }
    for ignored in &config.ignored_overrides {
        warn!(variable = %ignored, "Ignoring invalid environment override");
    }

    info!(
        bind = %config.server.bind_address(),
        storage = %config.storage.backend,
        "Starting Ventas API server..."
    );

    let (ledger, database) = open_ledger(&config).await?;

    if config.storage.seed_demo_catalog {
        seed_demo_catalog(&ledger)
            .await
            .context("Failed to seed demo catalog")?;
    }

    let bind_addr = config.server.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, build_app(ledger))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(db) = database {
        db.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(configured_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Opens the configured backend. The database handle is returned so it can
/// be closed on shutdown.
async fn open_ledger(config: &ApiConfig) -> anyhow::Result<(Ledger, Option<Database>)> {
    match config.storage.backend {
        StorageBackend::Sqlite => {
            let db_config = DbConfig::new(&config.storage.database_path)
                .max_connections(config.storage.max_connections);
            let db = Database::new(db_config)
                .await
                .context("Failed to open database")?;
            Ok((Ledger::sqlite(&db), Some(db)))
        }
        StorageBackend::Memory => Ok((Ledger::memory(MemoryStore::new()), None)),
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
