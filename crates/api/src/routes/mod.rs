pub mod dashboard;
pub mod feeds;
pub mod health;
pub mod offline;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /alerts                              AI alerts for ?date=
/// /speed                               speed events for ?date=
///
/// /offline                             offline vehicles merged with overrides
/// /offline/status                      list overrides
/// /offline/status/{vehicle_number}     one override (GET), set override (PUT)
///
/// /dates                               selectable date labels
/// /snapshot                            latest payload per view
/// /refresh                             reload every view (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(feeds::router())
        .merge(offline::router())
        .merge(dashboard::router())
}
