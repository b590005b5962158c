//! Route definitions for the dated telemetry feeds.

use axum::routing::get;
use axum::Router;

use crate::handlers::feeds;
use crate::state::AppState;

/// ```text
/// GET /alerts -> list_alerts
/// GET /speed  -> list_speed_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(feeds::list_alerts))
        .route("/speed", get(feeds::list_speed_events))
}
