//! Resolution of reporting dates to spreadsheet tab identifiers.
//!
//! Each published spreadsheet carries one tab per reporting date. The
//! exports are addressed by `gid`, so a human-readable date label such as
//! `25 August` has to be mapped to a tab before anything can be fetched.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Date label used when a request does not name one.
pub const DEFAULT_DATE_LABEL: &str = "25 August";

/// The offline export has a single tab and ignores the date.
pub const OFFLINE_TAB: &str = "0";

/// Number of day labels offered by [`available_dates`] by default.
pub const DEFAULT_AVAILABLE_DAYS: usize = 30;

/// One of the three upstream exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Offline,
    Speed,
    AiAlerts,
}

impl FeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Speed => "speed",
            Self::AiAlerts => "ai_alerts",
        }
    }
}

/// A resolved tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRef {
    pub gid: String,
    /// `false` when the date label was not recognised and the feed's
    /// default tab was substituted.
    pub known: bool,
}

/// Maps `(feed, date label)` to a tab.
pub trait TabDirectory: Send + Sync {
    fn resolve(&self, feed: FeedKind, date_label: &str) -> TabRef;
}

/// Tab directory backed by a fixed table of known labels.
#[derive(Debug, Clone)]
pub struct StaticTabDirectory {
    entries: HashMap<FeedKind, HashMap<String, String>>,
    defaults: HashMap<FeedKind, String>,
}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

impl StaticTabDirectory {
    /// A directory with no known labels; every feed falls back to tab `0`.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            defaults: HashMap::new(),
        }
    }

    /// Register `label` for `feed`.
    pub fn with_entry(mut self, feed: FeedKind, label: &str, gid: &str) -> Self {
        self.entries
            .entry(feed)
            .or_default()
            .insert(normalize_label(label), gid.to_string());
        self
    }

    /// Set the tab used when a label is unknown.
    pub fn with_default(mut self, feed: FeedKind, gid: &str) -> Self {
        self.defaults.insert(feed, gid.to_string());
        self
    }

    /// Merge extra entries from JSON of the form
    /// `{"speed": {"26 August": "12345"}, "ai_alerts": {...}}`.
    pub fn extend_from_json(mut self, json: &str) -> Result<Self, CoreError> {
        let extra: HashMap<FeedKind, HashMap<String, String>> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid tab directory JSON: {e}")))?;
        for (feed, labels) in extra {
            for (label, gid) in labels {
                self = self.with_entry(feed, &label, &gid);
            }
        }
        Ok(self)
    }

    fn default_gid(&self, feed: FeedKind) -> String {
        self.defaults
            .get(&feed)
            .cloned()
            .unwrap_or_else(|| OFFLINE_TAB.to_string())
    }
}

impl Default for StaticTabDirectory {
    /// The reporting dates known when the exports were first published.
    fn default() -> Self {
        Self::empty()
            .with_default(FeedKind::Offline, OFFLINE_TAB)
            .with_default(FeedKind::Speed, "293366971")
            .with_entry(FeedKind::Speed, "25 August", "293366971")
            .with_entry(FeedKind::Speed, "24 August", "0")
            .with_entry(FeedKind::Speed, "23 August", "1")
            .with_default(FeedKind::AiAlerts, "1378822335")
            .with_entry(FeedKind::AiAlerts, "25 August", "1378822335")
            .with_entry(FeedKind::AiAlerts, "24 August", "0")
            .with_entry(FeedKind::AiAlerts, "23 August", "1")
    }
}

impl TabDirectory for StaticTabDirectory {
    fn resolve(&self, feed: FeedKind, date_label: &str) -> TabRef {
        if feed == FeedKind::Offline {
            return TabRef {
                gid: self.default_gid(feed),
                known: true,
            };
        }

        match self
            .entries
            .get(&feed)
            .and_then(|labels| labels.get(&normalize_label(date_label)))
        {
            Some(gid) => TabRef {
                gid: gid.clone(),
                known: true,
            },
            None => TabRef {
                gid: self.default_gid(feed),
                known: false,
            },
        }
    }
}

/// Format a date as a tab label, e.g. `25 August`.
pub fn date_label(date: NaiveDate) -> String {
    date.format("%-d %B").to_string()
}

/// Labels for `today` and the `days - 1` days before it, newest first.
pub fn available_dates(today: NaiveDate, days: usize) -> Vec<String> {
    (0..days)
        .filter_map(|offset| today.checked_sub_signed(Duration::days(offset as i64)))
        .map(date_label)
        .collect()
}
