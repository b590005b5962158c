//! Per-view results held between requests.
//!
//! Each dashboard view (alerts, speed, offline) keeps the payload of its
//! most recent *request* in a [`LatestSlot`], so a slow earlier load can
//! never overwrite a newer one. The snapshot endpoint reads these slots and
//! the refresh operation reloads all three concurrently.

use fleetwatch_core::analytics::{AlertAnalytics, OfflineAnalytics, SpeedAnalytics};
use fleetwatch_core::loads::{LatestSlot, LoadTicket};
use fleetwatch_core::records::{AiAlert, OfflineReport, SpeedEvent};
use fleetwatch_core::status::{merge_overrides, OfflineVehicle, OverrideMap};
use fleetwatch_core::store::StatusStore;
use fleetwatch_core::tabs::DEFAULT_DATE_LABEL;
use fleetwatch_core::types::Timestamp;
use fleetwatch_sheets::TelemetryFeed;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::AppResult;

// ---------------------------------------------------------------------------
// View payloads
// ---------------------------------------------------------------------------

/// AI alerts for one date.
#[derive(Debug, Clone, Serialize)]
pub struct AlertsView {
    pub data: Vec<AiAlert>,
    pub date: String,
    pub analytics: AlertAnalytics,
}

impl AlertsView {
    pub fn new(date: &str, data: Vec<AiAlert>) -> Self {
        let analytics = AlertAnalytics::compute(&data);
        Self {
            data,
            date: date.to_string(),
            analytics,
        }
    }
}

/// Speed events for one date.
#[derive(Debug, Clone, Serialize)]
pub struct SpeedView {
    pub data: Vec<SpeedEvent>,
    pub date: String,
    pub analytics: SpeedAnalytics,
}

impl SpeedView {
    pub fn new(date: &str, data: Vec<SpeedEvent>) -> Self {
        let analytics = SpeedAnalytics::compute(&data);
        Self {
            data,
            date: date.to_string(),
            analytics,
        }
    }
}

/// Offline vehicles merged with their status overrides.
///
/// The date is echoed back only; the offline export is not dated.
#[derive(Debug, Clone, Serialize)]
pub struct OfflineView {
    pub data: Vec<OfflineVehicle>,
    pub date: String,
    pub count: usize,
    pub analytics: OfflineAnalytics,
}

impl OfflineView {
    pub fn new(date: &str, reports: Vec<OfflineReport>, overrides: &OverrideMap) -> Self {
        let analytics = OfflineAnalytics::compute(&reports, overrides);
        let data = merge_overrides(reports, overrides);
        Self {
            count: data.len(),
            data,
            date: date.to_string(),
            analytics,
        }
    }
}

/// Latest published payload per view.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub alerts: Option<AlertsView>,
    pub speed: Option<SpeedView>,
    pub offline: Option<OfflineView>,
    pub refreshed_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Date most recently requested for each view.
#[derive(Debug, Clone)]
struct SelectedDates {
    alerts: String,
    speed: String,
    offline: String,
}

impl Default for SelectedDates {
    fn default() -> Self {
        Self {
            alerts: DEFAULT_DATE_LABEL.to_string(),
            speed: DEFAULT_DATE_LABEL.to_string(),
            offline: DEFAULT_DATE_LABEL.to_string(),
        }
    }
}

/// Shared per-view state. Wrap in `Arc` and hold in `AppState`.
#[derive(Default)]
pub struct DashboardViews {
    alerts: LatestSlot<AlertsView>,
    speed: LatestSlot<SpeedView>,
    offline: LatestSlot<OfflineView>,
    /// Tickets are taken while this lock is held, so a published view always
    /// matches the date recorded here.
    selected: RwLock<SelectedDates>,
    refreshed_at: RwLock<Option<Timestamp>>,
}

impl DashboardViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load AI alerts for `date` and publish them if no newer load started.
    pub async fn load_alerts(&self, feed: &TelemetryFeed, date: &str) -> AppResult<AlertsView> {
        let ticket = {
            let mut selected = self.selected.write().await;
            selected.alerts = date.to_string();
            self.alerts.begin()
        };
        let data = feed.ai_alerts(date).await?;
        Ok(publish(&self.alerts, ticket, AlertsView::new(date, data), "alerts").await)
    }

    /// Load speed events for `date` and publish them if no newer load started.
    pub async fn load_speed(&self, feed: &TelemetryFeed, date: &str) -> AppResult<SpeedView> {
        let ticket = {
            let mut selected = self.selected.write().await;
            selected.speed = date.to_string();
            self.speed.begin()
        };
        let data = feed.speed_events(date).await?;
        Ok(publish(&self.speed, ticket, SpeedView::new(date, data), "speed").await)
    }

    /// Load offline reports and overrides together and publish the merge.
    pub async fn load_offline(
        &self,
        feed: &TelemetryFeed,
        store: &dyn StatusStore,
        date: &str,
    ) -> AppResult<OfflineView> {
        let ticket = {
            let mut selected = self.selected.write().await;
            selected.offline = date.to_string();
            self.offline.begin()
        };
        let (reports, overrides) =
            tokio::join!(feed.offline_reports(), store.overrides_by_vehicle());
        let view = OfflineView::new(date, reports?, &overrides?);
        Ok(publish(&self.offline, ticket, view, "offline").await)
    }

    /// Stamp the refresh time and reload every view for its last selected
    /// date. Failures leave the affected view empty instead of failing the
    /// refresh.
    pub async fn refresh(&self, feed: &TelemetryFeed, store: &dyn StatusStore) -> DashboardSnapshot {
        *self.refreshed_at.write().await = Some(chrono::Utc::now());
        let (dates, alerts_ticket, speed_ticket, offline_ticket) = {
            let selected = self.selected.read().await;
            (
                selected.clone(),
                self.alerts.begin(),
                self.speed.begin(),
                self.offline.begin(),
            )
        };
        tracing::info!(
            alerts = %dates.alerts,
            speed = %dates.speed,
            "Refreshing dashboard views",
        );

        let alerts = async {
            let data = feed.ai_alerts_or_empty(&dates.alerts).await;
            publish(&self.alerts, alerts_ticket, AlertsView::new(&dates.alerts, data), "alerts").await;
        };
        let speed = async {
            let data = feed.speed_events_or_empty(&dates.speed).await;
            publish(&self.speed, speed_ticket, SpeedView::new(&dates.speed, data), "speed").await;
        };
        let offline = async {
            let (reports, overrides) =
                tokio::join!(feed.offline_reports_or_empty(), store.overrides_by_vehicle());
            let overrides = overrides.unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to load status overrides");
                OverrideMap::new()
            });
            let view = OfflineView::new(&dates.offline, reports, &overrides);
            publish(&self.offline, offline_ticket, view, "offline").await;
        };
        tokio::join!(alerts, speed, offline);

        self.snapshot().await
    }

    /// The latest published payload of every view.
    pub async fn snapshot(&self) -> DashboardSnapshot {
        let (alerts, speed, offline) =
            tokio::join!(self.alerts.latest(), self.speed.latest(), self.offline.latest());
        DashboardSnapshot {
            alerts: alerts.map(|c| c.value),
            speed: speed.map(|c| c.value),
            offline: offline.map(|c| c.value),
            refreshed_at: *self.refreshed_at.read().await,
        }
    }
}

async fn publish<T: Clone>(slot: &LatestSlot<T>, ticket: LoadTicket, view: T, name: &str) -> T {
    if !slot.complete(ticket, view.clone()).await {
        tracing::debug!(
            view = name,
            generation = ticket.generation(),
            "Discarding superseded load",
        );
    }
    view
}
