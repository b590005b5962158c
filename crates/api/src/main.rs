use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fleetwatch_core::store::{InMemoryStatusStore, StatusStore};
use fleetwatch_sheets::{SheetsClient, TelemetryFeed};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleetwatch_api::config::ServerConfig;
use fleetwatch_api::router::build_app_router;
use fleetwatch_api::state::AppState;
use fleetwatch_api::views::DashboardViews;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetwatch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Status store ---
    let store = build_status_store(&config).await;

    // --- Upstream feeds ---
    let client = SheetsClient::new(
        config.sheets_base_url.clone(),
        Duration::from_secs(config.sheets_timeout_secs),
    )
    .expect("Failed to build spreadsheet HTTP client");
    let tabs = config
        .tab_directory()
        .expect("TAB_DIRECTORY_JSON must be valid");
    let feed = TelemetryFeed::new(
        Arc::new(client),
        Arc::new(tabs),
        config.feeds.clone(),
        config.offline_filter.clone(),
    );
    tracing::info!(base_url = %config.sheets_base_url, "Spreadsheet feeds configured");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        feed: Arc::new(feed),
        views: Arc::new(DashboardViews::new()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local store.
async fn build_status_store(config: &ServerConfig) -> Arc<dyn StatusStore> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, status overrides are kept in memory");
        return Arc::new(InMemoryStatusStore::new());
    };

    let pool = fleetwatch_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    fleetwatch_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    fleetwatch_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    Arc::new(fleetwatch_db::PgStatusStore::new(pool))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
