//! Row model for the `offline_status` table.

use fleetwatch_core::error::CoreError;
use fleetwatch_core::status::{StatusOverride, VehicleStatus};
use fleetwatch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `offline_status` table.
///
/// `current_status` is stored as text; the table's CHECK constraint keeps it
/// within the known labels.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OfflineStatusRow {
    pub id: DbId,
    pub vehicle_number: String,
    pub current_status: String,
    pub reason: Option<String>,
    pub updated_at: Timestamp,
    pub updated_by: Option<String>,
}

impl TryFrom<OfflineStatusRow> for StatusOverride {
    type Error = CoreError;

    fn try_from(row: OfflineStatusRow) -> Result<Self, Self::Error> {
        Ok(StatusOverride {
            id: row.id,
            vehicle_number: row.vehicle_number,
            current_status: row.current_status.parse::<VehicleStatus>()?,
            reason: row.reason,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn row(status: &str) -> OfflineStatusRow {
        OfflineStatusRow {
            id: 7,
            vehicle_number: "KA01AB1234".into(),
            current_status: status.into(),
            reason: Some("in workshop".into()),
            updated_at: chrono::Utc::now(),
            updated_by: Some("Admin".into()),
        }
    }

    #[test]
    fn known_status_converts() {
        let converted = StatusOverride::try_from(row("Parking/Garage")).unwrap();
        assert_eq!(converted.current_status, VehicleStatus::ParkingGarage);
        assert_eq!(converted.id, 7);
        assert_eq!(converted.reason.as_deref(), Some("in workshop"));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_matches!(
            StatusOverride::try_from(row("Scrapped")),
            Err(CoreError::Validation(_))
        );
    }
}
