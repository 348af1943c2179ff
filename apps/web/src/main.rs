//! # Tally Web Server
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Web Server                               │
//! │                                                                         │
//! │  Browser ───► HTTP (4567) ───► Handlers ───► SQLite                    │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                                  Redis                                  │
//! │                              (user documents)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use tally_db::{Database, DbConfig, MemoryUserStore, RedisUserStore, UserStore};
use tally_web::auth::Authenticator;
use tally_web::{router, AppConfig, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Tally web server...");

    let config = AppConfig::load().context("loading configuration")?;
    info!(
        address = %config.bind_address(),
        database = %config.database_path.display(),
        "Configuration loaded"
    );
    if config.uses_dev_secret() {
        warn!("Using the development session secret; set TALLY_SESSION_SECRET in production");
    }

    let db_config = DbConfig::new(&config.database_path).max_connections(config.max_connections);
    let db = Database::new(db_config).await.context("opening database")?;

    let users: Arc<dyn UserStore> = match &config.redis_url {
        Some(url) => Arc::new(
            RedisUserStore::connect(url)
                .await
                .context("connecting to Redis")?,
        ),
        None => {
            warn!("No redis_url configured; accounts are kept in memory and lost on restart");
            Arc::new(MemoryUserStore::new())
        }
    };

    let auth = Authenticator::new(users)?;
    let state = AppState::new(db.clone(), auth, &config);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("binding {}", config.bind_address()))?;
    info!(address = %config.bind_address(), "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages (connection checkout, sessions)
/// - `RUST_LOG=tally_db=warn` - Hide SQL statement logging
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
