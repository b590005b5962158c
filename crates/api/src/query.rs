//! Shared query parameter types for API handlers.

use fleetwatch_core::tabs::DEFAULT_DATE_LABEL;
use serde::Deserialize;

/// Reporting date selector (`?date=25 August`).
#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    pub date: Option<String>,
}

impl DateParams {
    /// The requested label, trimmed, or the default label when absent or
    /// blank.
    pub fn label(&self) -> String {
        self.date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DATE_LABEL)
            .to_string()
    }
}
