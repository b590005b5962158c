//! Manually-set vehicle status overrides and their merge into the offline
//! view.
//!
//! Overrides are keyed by vehicle number and are owned independently of the
//! spreadsheet data; the vehicle number is the only link between the two.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::records::OfflineReport;
use crate::types::{DbId, Timestamp};

/// Author tag recorded on every override written through the API.
pub const STATUS_AUTHOR: &str = "Admin";

/// Maximum accepted vehicle number length.
pub const MAX_VEHICLE_NUMBER_LEN: usize = 64;

/// Maximum accepted reason length.
pub const MAX_REASON_LEN: u64 = 500;

// ---------------------------------------------------------------------------
// Status enum
// ---------------------------------------------------------------------------

/// Operator-assigned explanation for an offline vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    Online,
    #[serde(rename = "Parking/Garage")]
    ParkingGarage,
    #[serde(rename = "Dashcam Issue")]
    DashcamIssue,
    #[serde(rename = "Technical Problem")]
    TechnicalProblem,
}

impl VehicleStatus {
    /// Every status, in display order.
    pub const ALL: [VehicleStatus; 4] = [
        VehicleStatus::Online,
        VehicleStatus::ParkingGarage,
        VehicleStatus::DashcamIssue,
        VehicleStatus::TechnicalProblem,
    ];

    /// Stored / wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::ParkingGarage => "Parking/Garage",
            Self::DashcamIssue => "Dashcam Issue",
            Self::TechnicalProblem => "Technical Problem",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown vehicle status '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Override row + DTO
// ---------------------------------------------------------------------------

/// A stored status override for one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusOverride {
    pub id: DbId,
    pub vehicle_number: String,
    pub current_status: VehicleStatus,
    pub reason: Option<String>,
    pub updated_at: Timestamp,
    pub updated_by: Option<String>,
}

/// Request payload for setting a vehicle's status.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertStatusOverride {
    pub current_status: VehicleStatus,
    #[validate(length(max = MAX_REASON_LEN))]
    pub reason: Option<String>,
}

impl UpsertStatusOverride {
    pub fn new(current_status: VehicleStatus, reason: Option<String>) -> Self {
        Self {
            current_status,
            reason,
        }
    }

    /// Reason with surrounding whitespace removed; blank becomes `None`.
    pub fn normalized_reason(&self) -> Option<String> {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
    }
}

/// Trim and validate a vehicle number taken from a request path.
pub fn validate_vehicle_number(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Vehicle number must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_VEHICLE_NUMBER_LEN {
        return Err(CoreError::Validation(format!(
            "Vehicle number must be at most {MAX_VEHICLE_NUMBER_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Overrides indexed by vehicle number.
pub type OverrideMap = HashMap<String, StatusOverride>;

/// Index override rows by vehicle number. A later row for the same vehicle
/// replaces an earlier one.
pub fn index_overrides(rows: Vec<StatusOverride>) -> OverrideMap {
    rows.into_iter()
        .map(|row| (row.vehicle_number.clone(), row))
        .collect()
}

/// An offline report with its operator override, if any.
#[derive(Debug, Clone, Serialize)]
pub struct OfflineVehicle {
    #[serde(flatten)]
    pub report: OfflineReport,
    pub status: Option<StatusOverride>,
}

/// Attach overrides to reports by vehicle number, keeping report order.
pub fn merge_overrides(reports: Vec<OfflineReport>, overrides: &OverrideMap) -> Vec<OfflineVehicle> {
    reports
        .into_iter()
        .map(|report| {
            let status = overrides.get(&report.vehicle_number).cloned();
            OfflineVehicle { report, status }
        })
        .collect()
}
