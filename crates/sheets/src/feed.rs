//! Typed access to the three telemetry exports.

use std::sync::Arc;

use fleetwatch_core::csv::parse_csv;
use fleetwatch_core::records::{
    map_ai_alerts, map_offline_reports, map_speed_events, AiAlert, OfflineFilter, OfflineReport,
    SpeedEvent,
};
use fleetwatch_core::tabs::{FeedKind, TabDirectory};

use crate::client::SheetsError;
use crate::source::{CsvSource, SheetRef};

/// Spreadsheet holding the offline vehicle report.
pub const DEFAULT_OFFLINE_SHEET_ID: &str = "180CqEujgBjJPjP9eU8C--xMj-VTBSrRUrM_98-S0gjo";
/// Spreadsheet holding overspeed events.
pub const DEFAULT_SPEED_SHEET_ID: &str = "1y499rxvnlTY8JSp5eyI_ZEm_4c2rDm7hNim3VFH8PSk";
/// Spreadsheet holding AI dashcam alerts.
pub const DEFAULT_AI_ALERTS_SHEET_ID: &str = "1Et8hgNDrZDuQbAHh7jvFpi0bsebVBcPsnZELPAYMu6U";

/// Which spreadsheet backs each feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub offline_sheet_id: String,
    pub speed_sheet_id: String,
    pub ai_alerts_sheet_id: String,
}

impl FeedConfig {
    fn sheet_id(&self, feed: FeedKind) -> &str {
        match feed {
            FeedKind::Offline => &self.offline_sheet_id,
            FeedKind::Speed => &self.speed_sheet_id,
            FeedKind::AiAlerts => &self.ai_alerts_sheet_id,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            offline_sheet_id: DEFAULT_OFFLINE_SHEET_ID.to_string(),
            speed_sheet_id: DEFAULT_SPEED_SHEET_ID.to_string(),
            ai_alerts_sheet_id: DEFAULT_AI_ALERTS_SHEET_ID.to_string(),
        }
    }
}

/// Fetches, parses and maps the telemetry exports.
pub struct TelemetryFeed {
    source: Arc<dyn CsvSource>,
    tabs: Arc<dyn TabDirectory>,
    sheets: FeedConfig,
    offline_filter: OfflineFilter,
}

impl TelemetryFeed {
    pub fn new(
        source: Arc<dyn CsvSource>,
        tabs: Arc<dyn TabDirectory>,
        sheets: FeedConfig,
        offline_filter: OfflineFilter,
    ) -> Self {
        Self {
            source,
            tabs,
            sheets,
            offline_filter,
        }
    }

    /// Offline vehicles passing the configured client and duration filter.
    pub async fn offline_reports(&self) -> Result<Vec<OfflineReport>, SheetsError> {
        let rows = self.fetch_rows(FeedKind::Offline, "").await?;
        Ok(map_offline_reports(&rows, &self.offline_filter))
    }

    /// Overspeed events for a reporting date.
    pub async fn speed_events(&self, date: &str) -> Result<Vec<SpeedEvent>, SheetsError> {
        let rows = self.fetch_rows(FeedKind::Speed, date).await?;
        Ok(map_speed_events(&rows))
    }

    /// AI alerts for a reporting date.
    pub async fn ai_alerts(&self, date: &str) -> Result<Vec<AiAlert>, SheetsError> {
        let rows = self.fetch_rows(FeedKind::AiAlerts, date).await?;
        Ok(map_ai_alerts(&rows))
    }

    // ---- catch-and-log variants ----

    pub async fn offline_reports_or_empty(&self) -> Vec<OfflineReport> {
        or_empty(FeedKind::Offline, "", self.offline_reports().await)
    }

    pub async fn speed_events_or_empty(&self, date: &str) -> Vec<SpeedEvent> {
        or_empty(FeedKind::Speed, date, self.speed_events(date).await)
    }

    pub async fn ai_alerts_or_empty(&self, date: &str) -> Vec<AiAlert> {
        or_empty(FeedKind::AiAlerts, date, self.ai_alerts(date).await)
    }

    async fn fetch_rows(&self, feed: FeedKind, date: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let tab = self.tabs.resolve(feed, date);
        if !tab.known {
            tracing::warn!(
                feed = feed.as_str(),
                date,
                gid = %tab.gid,
                "Unknown date label, using default tab",
            );
        }

        let sheet = SheetRef::new(self.sheets.sheet_id(feed), tab.gid);
        let text = self.source.fetch_csv(&sheet).await?;
        let rows = parse_csv(&text);
        tracing::debug!(feed = feed.as_str(), rows = rows.len(), "Parsed export");
        Ok(rows)
    }
}

fn or_empty<T>(feed: FeedKind, date: &str, result: Result<Vec<T>, SheetsError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!(feed = feed.as_str(), date, error = %e, "Failed to load feed");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use fleetwatch_core::tabs::StaticTabDirectory;

    use super::*;

    /// Serves canned CSV per sheet id and records what was asked for.
    #[derive(Default)]
    struct FakeSource {
        csv: HashMap<String, String>,
        requests: Mutex<Vec<SheetRef>>,
    }

    impl FakeSource {
        fn with(mut self, sheet_id: &str, csv: &str) -> Self {
            self.csv.insert(sheet_id.to_string(), csv.to_string());
            self
        }

        fn requests(&self) -> Vec<SheetRef> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CsvSource for FakeSource {
        async fn fetch_csv(&self, sheet: &SheetRef) -> Result<String, SheetsError> {
            self.requests.lock().unwrap().push(sheet.clone());
            self.csv
                .get(&sheet.sheet_id)
                .cloned()
                .ok_or(SheetsError::Upstream {
                    status: 404,
                    body: "missing".into(),
                })
        }
    }

    fn feed(source: Arc<FakeSource>) -> TelemetryFeed {
        TelemetryFeed::new(
            source,
            Arc::new(StaticTabDirectory::default()),
            FeedConfig::default(),
            OfflineFilter::default(),
        )
    }

    #[tokio::test]
    async fn speed_events_use_the_dated_tab() {
        let source = Arc::new(FakeSource::default().with(
            DEFAULT_SPEED_SHEET_ID,
            "No,Plate,Company,Start,a,b,Speed\n1,KA01,Acme,07:45,,,82\n",
        ));
        let events = feed(source.clone()).speed_events("24 August").await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].plate_no, "KA01");
        assert_eq!(events[0].speed, 82.0);
        assert_eq!(
            source.requests(),
            vec![SheetRef::new(DEFAULT_SPEED_SHEET_ID, "0")]
        );
    }

    #[tokio::test]
    async fn offline_reports_are_filtered() {
        let source = Arc::new(FakeSource::default().with(
            DEFAULT_OFFLINE_SHEET_ID,
            "Client,Vehicle,Last,Hours,RN,Remarks\n\
             G4S Transport,V1,x,30,,\n\
             G4S Transport,V2,x,10,,\n\
             Other Co,V3,x,50,,\n",
        ));
        let reports = feed(source).offline_reports().await.unwrap();

        let vehicles: Vec<_> = reports.iter().map(|r| r.vehicle_number.as_str()).collect();
        assert_eq!(vehicles, vec!["V1"]);
    }

    #[tokio::test]
    async fn unknown_date_falls_back_to_default_tab() {
        let source = Arc::new(FakeSource::default().with(DEFAULT_AI_ALERTS_SHEET_ID, "header\n"));
        let alerts = feed(source.clone()).ai_alerts("9 March").await.unwrap();

        assert!(alerts.is_empty());
        assert_eq!(source.requests()[0].gid, "1378822335");
    }

    #[tokio::test]
    async fn fetch_failure_is_an_error() {
        let source = Arc::new(FakeSource::default());
        assert_matches!(
            feed(source).ai_alerts("25 August").await,
            Err(SheetsError::Upstream { status: 404, .. })
        );
    }

    #[tokio::test]
    async fn or_empty_swallows_failures() {
        let feed = feed(Arc::new(FakeSource::default()));
        assert!(feed.speed_events_or_empty("25 August").await.is_empty());
        assert!(feed.offline_reports_or_empty().await.is_empty());
    }
}
