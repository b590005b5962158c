use axum::routing::{get, post};
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// ```text
/// GET  /dates    -> list_dates
/// GET  /snapshot -> get_snapshot
/// POST /refresh  -> refresh
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dates", get(dashboard::list_dates))
        .route("/snapshot", get(dashboard::get_snapshot))
        .route("/refresh", post(dashboard::refresh))
}
