//! Handlers for dashboard-wide operations: date selection, snapshot, refresh.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use fleetwatch_core::tabs::{available_dates, DEFAULT_AVAILABLE_DAYS};

use crate::error::AppResult;
use crate::response::Envelope;
use crate::state::AppState;

/// GET /api/v1/dates
///
/// Date labels for today and the preceding days, newest first.
pub async fn list_dates() -> AppResult<impl IntoResponse> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(Envelope::data(available_dates(
        today,
        DEFAULT_AVAILABLE_DAYS,
    ))))
}

/// GET /api/v1/snapshot
///
/// Latest published payload for every view plus the last refresh time.
pub async fn get_snapshot(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(Envelope::data(state.views.snapshot().await)))
}

/// POST /api/v1/refresh
///
/// Reload every view for its last selected date and return the snapshot.
/// Individual feed failures leave that view empty.
pub async fn refresh(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let snapshot = state
        .views
        .refresh(&state.feed, state.store.as_ref())
        .await;
    Ok(Json(Envelope::data(snapshot)))
}
