//! Go tournament registration server.
//!
//! Serves the registry's HTTP API over either PostgreSQL or an in-memory store.

use std::net::SocketAddr;

use anyhow::{Context, Error};
use go_tournament::db::{Database, MemoryStore, Repositories};
use gt_server::{
    api,
    config::{ServerConfig, StorageBackend},
    logging,
};
use pico_args::Arguments;
use tracing::{info, warn};

const HELP: &str = "\
Run the Go tournament registration server

USAGE:
  gt_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/go_tournament]
  --backend    NAME        Storage backend, postgres or memory  [default: env STORAGE_BACKEND or postgres]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  STORAGE_BACKEND          postgres or memory
  DATABASE_URL             PostgreSQL connection string
  DB_MAX_CONNECTIONS       Maximum pool size
  DB_MIN_CONNECTIONS       Minimum pool size
  RUST_LOG                 Log filter (e.g., info,go_tournament=debug)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    backend: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        backend: pargs.opt_value_from_str("--backend")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}");
    }

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url, args.backend)?;
    config.validate()?;

    info!("Starting tournament server at {} ({} backend)", config.bind, config.backend);

    let (repos, database) = match config.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database: {}", config.database.database_url);
            let db = Database::new(&config.database)
                .await
                .context("Failed to connect to database")?;
            db.migrate().await.context("Failed to apply schema")?;
            info!("Database connected successfully");
            (db.repositories(), Some(db))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; all data is lost on shutdown");
            (Repositories::in_memory(MemoryStore::new()), None)
        }
    };

    let app = api::create_router(api::AppState::new(&repos, database.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
