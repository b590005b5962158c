//! Integration tests for the offline report and status override endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, put_json, FakeSource};
use serde_json::json;

// ---------------------------------------------------------------------------
// Offline report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn offline_report_is_filtered_and_counted() {
    let app = common::build_test_app(FakeSource::standard());
    let response = get(app, "/api/v1/offline").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 2);

    let vehicles: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["vehicleNumber"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(vehicles, vec!["KA01AB1234", "MH04EF4321"]);

    // Quoted commas stay inside their field.
    assert_eq!(json["data"][1]["client"], "G4S Cash, Services");
    assert_eq!(json["data"][1]["remarks"], "gps, antenna");
    assert!(json["data"][0]["status"].is_null());
}

#[tokio::test]
async fn offline_date_is_echoed_only() {
    let app = common::build_test_app(FakeSource::standard());
    let json = body_json(get(app, "/api/v1/offline?date=23%20August").await).await;

    assert_eq!(json["date"], "23 August");
    assert_eq!(json["count"], 2);
}

#[tokio::test]
async fn offline_analytics_count_unannotated_and_regions() {
    let app = common::build_test_app(FakeSource::standard());
    let json = body_json(get(app, "/api/v1/offline").await).await;
    let analytics = &json["analytics"];

    assert_eq!(analytics["totalOffline"], 2);
    assert_eq!(analytics["unannotated"], 2);
    // 30 h and 72 h.
    assert_eq!(analytics["avgOfflineHours"], 51.0);
    assert_eq!(analytics["regionDistribution"]["KA"], 1);
    assert_eq!(analytics["regionDistribution"]["MH"], 1);
    assert_eq!(analytics["statusDistribution"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn offline_upstream_failure_returns_500() {
    let app = common::build_test_app(FakeSource::empty());
    let response = get(app, "/api/v1/offline").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["success"], false);
}

// ---------------------------------------------------------------------------
// Status overrides
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_list_starts_empty() {
    let app = common::build_test_app(FakeSource::standard());
    let json = body_json(get(app, "/api/v1/offline/status").await).await;

    assert_eq!(json["success"], true);
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn set_status_then_list_and_merge() {
    let app = common::build_test_app(FakeSource::standard());

    let response = put_json(
        app.clone(),
        "/api/v1/offline/status/KA01AB1234",
        json!({ "current_status": "Parking/Garage", "reason": "  at depot  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["data"]["vehicle_number"], "KA01AB1234");
    assert_eq!(saved["data"]["current_status"], "Parking/Garage");
    assert_eq!(saved["data"]["reason"], "at depot");
    assert_eq!(saved["data"]["updated_by"], "Admin");

    let listed = body_json(get(app.clone(), "/api/v1/offline/status").await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["vehicle_number"], "KA01AB1234");

    let offline = body_json(get(app, "/api/v1/offline").await).await;
    assert_eq!(
        offline["data"][0]["status"]["current_status"],
        "Parking/Garage"
    );
    assert_eq!(offline["analytics"]["unannotated"], 1);
}

#[tokio::test]
async fn second_put_replaces_first() {
    let app = common::build_test_app(FakeSource::standard());

    put_json(
        app.clone(),
        "/api/v1/offline/status/XYZ123",
        json!({ "current_status": "Online" }),
    )
    .await;
    put_json(
        app.clone(),
        "/api/v1/offline/status/XYZ123",
        json!({ "current_status": "Technical Problem", "reason": "wiring" }),
    )
    .await;

    let listed = body_json(get(app, "/api/v1/offline/status").await).await;
    let rows = listed["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["current_status"], "Technical Problem");
    assert_eq!(rows[0]["reason"], "wiring");
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let app = common::build_test_app(FakeSource::standard());
    let response = put_json(
        app,
        "/api/v1/offline/status/XYZ123",
        json!({ "current_status": "Stolen" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn overlong_reason_is_rejected() {
    let app = common::build_test_app(FakeSource::standard());
    let response = put_json(
        app,
        "/api/v1/offline/status/XYZ123",
        json!({ "current_status": "Online", "reason": "x".repeat(501) }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn blank_vehicle_number_is_rejected() {
    let app = common::build_test_app(FakeSource::standard());
    let response = put_json(
        app,
        "/api/v1/offline/status/%20%20",
        json!({ "current_status": "Online" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn get_status_returns_stored_override() {
    let app = common::build_test_app(FakeSource::standard());
    put_json(
        app.clone(),
        "/api/v1/offline/status/MH04EF4321",
        json!({ "current_status": "Dashcam Issue", "reason": "lens" }),
    )
    .await;

    let response = get(app, "/api/v1/offline/status/MH04EF4321").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_status"], "Dashcam Issue");
    assert_eq!(json["data"]["reason"], "lens");
}

#[tokio::test]
async fn get_status_for_unannotated_vehicle_is_404() {
    let app = common::build_test_app(FakeSource::standard());
    let response = get(app, "/api/v1/offline/status/KA01AB1234").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Status override 'KA01AB1234' not found");
}
