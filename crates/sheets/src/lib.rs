//! Spreadsheet export client and the typed telemetry feeds built on it.
//!
//! The dashboard's source data lives in three published spreadsheets. This
//! crate fetches their CSV exports ([`SheetsClient`]), hides the transport
//! behind [`CsvSource`], and turns the text into typed records
//! ([`TelemetryFeed`]).

pub mod client;
pub mod feed;
pub mod source;

pub use client::{SheetsClient, SheetsError};
pub use feed::{FeedConfig, TelemetryFeed};
pub use source::{CsvSource, SheetRef};
