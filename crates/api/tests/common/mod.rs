#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fleetwatch_api::config::ServerConfig;
use fleetwatch_api::router::build_app_router;
use fleetwatch_api::state::AppState;
use fleetwatch_api::views::DashboardViews;
use fleetwatch_core::store::{InMemoryStatusStore, StatusStore};
use fleetwatch_core::tabs::StaticTabDirectory;
use fleetwatch_sheets::feed::{
    DEFAULT_AI_ALERTS_SHEET_ID, DEFAULT_OFFLINE_SHEET_ID, DEFAULT_SPEED_SHEET_ID,
};
use fleetwatch_sheets::{CsvSource, SheetRef, SheetsError, TelemetryFeed};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const ALERTS_CSV: &str = "\
No,Plate No,Company,Alarm Type,Starting Time,Location,Speed,Driver,Image Link
1,KA01AB1234,Acme Logistics,Drowsiness,2024-08-25 07:45:00,,,,http://img/1
2,KA01AB1234,Acme Logistics,Distraction,2024-08-25 07:50:00,,,,http://img/2
3,MH02CD5678,Beta Freight,Drowsiness,2024-08-25 13:05:00,,,,
";

pub const SPEED_CSV: &str = "\
No,Plate No,Company,Starting Time,Ending Time,Duration,Speed
1,KA01AB1234,Acme Logistics,07:45,07:46,60,70
2,KA01AB1234,Acme Logistics,08:10,08:12,120,80
3,MH02CD5678,Beta Freight,13:05,13:06,60,95
4,MH02CD5678,Beta Freight,13:30,13:31,60,95
";

pub const OFFLINE_CSV: &str = "\
Client,Vehicle No,Last Online,Offline Since (hrs),RN,Remarks
G4S Transport,KA01AB1234,2024-08-23 10:00,30,RN1,
G4S Transport,KA09ZZ0001,2024-08-25 01:00,10,RN2,
Other Co,MH02CD5678,2024-08-20 09:00,120,RN3,
\"G4S Cash, Services\",MH04EF4321,2024-08-22 11:00,72,RN4,\"gps, antenna\"
";

/// In-process [`CsvSource`] serving canned CSV per sheet id. Unknown sheets
/// fail with a 503.
#[derive(Default)]
pub struct FakeSource {
    csv: HashMap<String, String>,
}

impl FakeSource {
    pub fn empty() -> Self {
        Self::default()
    }

    /// All three feeds populated from the fixtures above.
    pub fn standard() -> Self {
        Self::empty()
            .with(DEFAULT_AI_ALERTS_SHEET_ID, ALERTS_CSV)
            .with(DEFAULT_SPEED_SHEET_ID, SPEED_CSV)
            .with(DEFAULT_OFFLINE_SHEET_ID, OFFLINE_CSV)
    }

    pub fn with(mut self, sheet_id: &str, csv: &str) -> Self {
        self.csv.insert(sheet_id.to_string(), csv.to_string());
        self
    }
}

#[async_trait]
impl CsvSource for FakeSource {
    async fn fetch_csv(&self, sheet: &SheetRef) -> Result<String, SheetsError> {
        self.csv
            .get(&sheet.sheet_id)
            .cloned()
            .ok_or(SheetsError::Upstream {
                status: 503,
                body: "unavailable".to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Test configuration: defaults with permissive CORS.
pub fn test_config() -> ServerConfig {
    ServerConfig::default()
}

/// Build application state around the given source and store.
pub fn test_state(source: impl CsvSource + 'static, store: Arc<dyn StatusStore>) -> AppState {
    let config = test_config();
    let feed = TelemetryFeed::new(
        Arc::new(source),
        Arc::new(StaticTabDirectory::default()),
        config.feeds.clone(),
        config.offline_filter.clone(),
    );

    AppState {
        config: Arc::new(config),
        store,
        feed: Arc::new(feed),
        views: Arc::new(DashboardViews::new()),
    }
}

/// Build the full application router with all middleware layers, using
/// the given source and a fresh in-memory status store.
pub fn build_test_app(source: FakeSource) -> Router {
    build_app_router(
        test_state(source, Arc::new(InMemoryStatusStore::new())),
        &test_config(),
    )
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, Body::empty()).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
