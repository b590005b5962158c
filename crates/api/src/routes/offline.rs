//! Route definitions for offline vehicles and their status overrides.

use axum::routing::get;
use axum::Router;

use crate::handlers::offline;
use crate::state::AppState;

/// ```text
/// GET /offline                        -> list_offline
/// GET /offline/status                 -> list_statuses
/// GET /offline/status/{vehicle_number} -> get_status
/// PUT /offline/status/{vehicle_number} -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/offline", get(offline::list_offline))
        .route("/offline/status", get(offline::list_statuses))
        .route(
            "/offline/status/{vehicle_number}",
            get(offline::get_status).put(offline::set_status),
        )
}
