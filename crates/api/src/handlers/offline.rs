//! Handlers for offline vehicles and their manually-set status overrides.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use fleetwatch_core::error::CoreError;
use fleetwatch_core::status::{validate_vehicle_number, UpsertStatusOverride, STATUS_AUTHOR};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::DateParams;
use crate::response::Envelope;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Offline report
// ---------------------------------------------------------------------------

/// GET /api/v1/offline?date=
///
/// Offline vehicles with any override attached. The date is echoed back but
/// does not filter the report.
pub async fn list_offline(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = params.label();
    let view = state
        .views
        .load_offline(&state.feed, state.store.as_ref(), &date)
        .await?;

    tracing::debug!(count = view.count, "Loaded offline vehicles");
    Ok(Json(Envelope::ok(view)))
}

// ---------------------------------------------------------------------------
// Status overrides
// ---------------------------------------------------------------------------

/// GET /api/v1/offline/status
///
/// All stored overrides.
pub async fn list_statuses(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let overrides = state.store.list_all().await?;
    Ok(Json(Envelope::data(overrides)))
}

/// GET /api/v1/offline/status/{vehicle_number}
pub async fn get_status(
    State(state): State<AppState>,
    Path(vehicle_number): Path<String>,
) -> AppResult<impl IntoResponse> {
    let vehicle_number = validate_vehicle_number(&vehicle_number)?;
    let found = state
        .store
        .find(&vehicle_number)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Status override",
            key: vehicle_number,
        })?;
    Ok(Json(Envelope::data(found)))
}

/// PUT /api/v1/offline/status/{vehicle_number}
///
/// Insert or replace the override for one vehicle. Returns the stored row.
pub async fn set_status(
    State(state): State<AppState>,
    Path(vehicle_number): Path<String>,
    payload: Result<Json<UpsertStatusOverride>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let vehicle_number = validate_vehicle_number(&vehicle_number)?;
    let Json(input) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    input.validate()?;

    let saved = state
        .store
        .upsert(&vehicle_number, &input, STATUS_AUTHOR)
        .await?;

    tracing::info!(
        vehicle_number = %saved.vehicle_number,
        status = %saved.current_status,
        "Vehicle status updated",
    );

    Ok(Json(Envelope::data(saved)))
}
