//! Contact Server
//!
//! HTTP/JSON service for creating, listing, fetching, updating and deleting
//! contacts. Records live in an embedded SQLite database.

mod error;
mod handlers;
mod settings;
mod storage;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use contact_core::ContactStore;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::ServerConfig;
use storage::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    /// Port reported by the liveness endpoint
    pub port: u16,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>, port: u16) -> Self {
        Self { store, port }
    }
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[FATAL] Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Contact Server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(config: ServerConfig) -> Result<()> {
    info!(
        "Config loaded: host={}, port={}, db={}",
        config.host, config.port, config.database_url
    );

    // The database must be reachable before we accept requests
    info!("Initializing SQLite database...");
    let db = Arc::new(
        Database::connect(&config.database_url)
            .await
            .context("Failed to initialize database")?,
    );
    let schema_version = db.schema_version().await?;
    let max_contact_id = db
        .find_max_sequential_id()
        .await
        .context("Failed to read contacts")?;
    info!(
        "Database ready: schema v{}, highest contactId {}",
        schema_version,
        max_contact_id.map_or_else(|| "none".to_string(), |id| id.to_string())
    );

    let state = AppState::new(db.clone(), config.port);

    info!("Building HTTP router...");
    let app = router(state);

    let addr = config.bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server is running {}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down, closing database");
    db.close().await;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/contact", contact_routes())
        // Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn contact_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::contacts::list).post(handlers::contacts::create),
        )
        .route(
            "/:id",
            get(handlers::contacts::get)
                .put(handlers::contacts::update)
                .delete(handlers::contacts::delete),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
