//! Handlers for the dated telemetry feeds (AI alerts, overspeed events).

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::query::DateParams;
use crate::response::Envelope;
use crate::state::AppState;

/// GET /api/v1/alerts?date=
///
/// AI alerts for the requested date with their analytics.
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = params.label();
    let view = state.views.load_alerts(&state.feed, &date).await?;

    tracing::debug!(date = %date, count = view.data.len(), "Loaded AI alerts");
    Ok(Json(Envelope::ok(view)))
}

/// GET /api/v1/speed?date=
///
/// Overspeed events for the requested date with their analytics.
pub async fn list_speed_events(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = params.label();
    let view = state.views.load_speed(&state.feed, &date).await?;

    tracing::debug!(date = %date, count = view.data.len(), "Loaded speed events");
    Ok(Json(Envelope::ok(view)))
}
