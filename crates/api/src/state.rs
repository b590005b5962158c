use std::sync::Arc;

use fleetwatch_core::store::StatusStore;
use fleetwatch_sheets::TelemetryFeed;

use crate::config::ServerConfig;
use crate::views::DashboardViews;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Status override store, chosen at startup.
    pub store: Arc<dyn StatusStore>,
    /// Spreadsheet-backed telemetry feeds.
    pub feed: Arc<TelemetryFeed>,
    /// Latest result per dashboard view.
    pub views: Arc<DashboardViews>,
}
