//! Fleetwatch domain logic.
//!
//! Everything here is transport-agnostic: CSV scanning, typed telemetry
//! records, analytics reducers, the vehicle status overlay and its store
//! seam, tab resolution for spreadsheet exports, and the latest-request-wins
//! slots used to hold per-view results.

pub mod analytics;
pub mod csv;
pub mod error;
pub mod loads;
pub mod records;
pub mod status;
pub mod store;
pub mod tabs;
pub mod types;
