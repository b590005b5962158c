use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fleetwatch_core::error::CoreError;
use fleetwatch_core::store::StatusStoreError;
use fleetwatch_sheets::SheetsError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and the store/upstream errors, and
/// adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fleetwatch_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The status store failed.
    #[error("Status store error: {0}")]
    Store(#[from] StatusStoreError),

    /// A spreadsheet export could not be fetched.
    #[error("Upstream error: {0}")]
    Sheets(#[from] SheetsError),

    /// A request payload failed field validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Backends ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Status store error");
                internal()
            }
            AppError::Sheets(err) => {
                tracing::error!(error = %err, "Upstream fetch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    "Failed to fetch data".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                errors.to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
            "timestamp": chrono::Utc::now(),
        });

        (status, axum::Json(body)).into_response()
    }
}
