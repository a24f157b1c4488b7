//! Integration tests for the Chargepulse API endpoints.
//!
//! These tests verify the full request/response cycle through the HTTP API.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use chargepulse::aggregation::StatsAggregator;
use chargepulse::api::{AppState, router};
use chargepulse::clock::FixedClock;
use chargepulse::config::AppConfig;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn app() -> axum::Router {
    let state = AppState {
        aggregator: StatsAggregator::new(Arc::new(FixedClock(now()))),
        config: AppConfig::default(),
    };
    router(state)
}

fn create_test_server() -> TestServer {
    TestServer::new(app()).unwrap()
}

fn ts(age: Duration) -> String {
    (now() - age).to_rfc3339()
}

fn station(id: i64, lat: f64, lng: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Station {id}"),
        "address": "King Fahd Rd, Riyadh 12344",
        "latitude": lat,
        "longitude": lng,
        "charger_type": "CCS / Type 2",
        "power_output": 150.0,
        "hours": "24/7",
        "price": "0.75 SAR/kWh",
        "amenities": ["WiFi", "Café"],
        "status": "available",
        "created_by": 1,
        "created_at": ts(Duration::days(1)),
        "last_updated": ts(Duration::days(1))
    })
}

fn report(
    id: i64,
    station_id: i64,
    user_id: i64,
    status: &str,
    rating: u8,
    age: Duration,
) -> Value {
    json!({
        "id": id,
        "station_id": station_id,
        "user_id": user_id,
        "status": status,
        "rating": rating,
        "comment": null,
        "issues": [],
        "timestamp": ts(age)
    })
}

fn users() -> Value {
    json!([
        { "id": 1, "username": "sarah_ev", "email": "sarah@example.com", "points": 120 },
        { "id": 2, "username": "khalid_m", "email": "khalid@example.com", "points": 85 }
    ])
}

async fn stats_for(server: &TestServer, station: Value, reports: Value) -> Value {
    let response = server
        .post("/stations/stats")
        .json(&json!({
            "station": station,
            "reports": reports,
            "users": users()
        }))
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_health_endpoint_oneshot() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_station_stats_without_reports() {
    let server = create_test_server();

    let body = stats_for(&server, station(1, 24.7136, 46.6753), json!([])).await;

    assert_eq!(body["id"], 1);
    assert_eq!(body["rating"], 0.0);
    assert_eq!(body["review_count"], 0);
    assert_eq!(body["availability"], 50);
    assert_eq!(body["reliability"], 80);
    assert_eq!(body["is_favorite"], false);
    assert_eq!(body["last_reported"], "No reports yet");
    assert!(body["reports"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_station_stats_with_reports() {
    let server = create_test_server();

    let reports = json!([
        report(1, 1, 1, "available", 5, Duration::minutes(90)),
        report(2, 1, 2, "busy", 3, Duration::hours(3))
    ]);
    let body = stats_for(&server, station(1, 24.7136, 46.6753), reports).await;

    assert_eq!(body["rating"], 4.0);
    assert_eq!(body["review_count"], 2);
    assert_eq!(body["availability"], 75);
    assert_eq!(body["availability_level"], "medium");
    assert_eq!(body["reliability"], 80);
    assert_eq!(body["last_reported"], "1 hours ago");

    let recent = body["reports"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["id"], 1);
    assert_eq!(recent[0]["user"]["username"], "sarah_ev");
    assert_eq!(recent[1]["user"]["username"], "khalid_m");
    // raw status is left as supplied
    assert_eq!(body["status"], "available");
}

#[tokio::test]
async fn test_station_stats_stale_reports_and_favorite() {
    let server = create_test_server();

    let response = server
        .post("/stations/stats")
        .json(&json!({
            "station": station(3, 24.4672, 39.6151),
            "reports": [
                report(1, 3, 1, "unavailable", 2, Duration::days(2)),
                report(2, 3, 1, "unavailable", 2, Duration::days(3)),
                report(3, 3, 2, "busy", 2, Duration::days(4))
            ],
            "users": users(),
            "favorites": [{ "user_id": 1, "station_id": 3 }],
            "user_id": 1
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["availability"], 70);
    // 20 + 33.3
    assert_eq!(body["reliability"], 53);
    assert_eq!(body["reliability_level"], "good");
    assert_eq!(body["is_favorite"], true);
    assert_eq!(body["last_reported"], "2 days ago");
}

#[tokio::test]
async fn test_station_stats_rejects_unknown_status() {
    let server = create_test_server();

    let response = server
        .post("/stations/stats")
        .json(&json!({
            "station": station(1, 24.7136, 46.6753),
            "reports": [report(1, 1, 1, "exploded", 5, Duration::zero())]
        }))
        .expect_failure()
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_batch_stats() {
    let server = create_test_server();

    let response = server
        .post("/stations/stats/batch")
        .json(&json!({
            "stations": [station(1, 24.7136, 46.6753), station(2, 21.5433, 39.1728)],
            "reports": [
                report(1, 2, 1, "busy", 3, Duration::hours(1)),
                report(2, 2, 2, "busy", 4, Duration::hours(2))
            ],
            "users": users()
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let stations = body.as_array().unwrap();
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0]["id"], 1);
    assert_eq!(stations[0]["review_count"], 0);
    assert_eq!(stations[1]["id"], 2);
    assert_eq!(stations[1]["review_count"], 2);
    assert_eq!(stations[1]["rating"], 3.5);
    assert_eq!(stations[1]["availability"], 50);
}

#[tokio::test]
async fn test_recommendation_empty() {
    let server = create_test_server();

    let response = server
        .post("/recommendation")
        .json(&json!({ "stations": [] }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["recommendation"].is_null());
    assert_eq!(body["candidates"], 0);
}

#[tokio::test]
async fn test_recommendation_uses_location() {
    let server = create_test_server();

    // stats first, then rank what the service returned
    let response = server
        .post("/stations/stats/batch")
        .json(&json!({
            "stations": [station(1, 24.8136, 46.6753), station(2, 24.7200, 46.6800)],
            "reports": [
                report(1, 1, 1, "available", 5, Duration::hours(1)),
                report(2, 2, 1, "available", 5, Duration::hours(1))
            ]
        }))
        .await;
    let stations: Value = response.json();

    let response = server
        .post("/recommendation")
        .json(&json!({
            "stations": stations,
            "location": { "lat": 24.7201, "lng": 46.6801 }
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["candidates"], 2);
    assert_eq!(body["recommendation"]["station"]["id"], 2);
    // 40 + 24 + 15 + 15
    assert_eq!(body["recommendation"]["score"], 94.0);

    let response = server
        .post("/recommendation")
        .json(&json!({ "stations": stations }))
        .await;
    let body: Value = response.json();
    // tie without location: first candidate wins
    assert_eq!(body["recommendation"]["station"]["id"], 1);
    assert_eq!(body["recommendation"]["score"], 79.0);
}

#[tokio::test]
async fn test_nearby_filters_and_sorts() {
    let server = create_test_server();

    let response = server
        .post("/stations/stats/batch")
        .json(&json!({
            "stations": [
                station(1, 0.05, 0.0),
                station(2, 0.005, 0.0),
                station(3, 1.0, 0.0)
            ]
        }))
        .await;
    let stations: Value = response.json();

    let response = server
        .post("/stations/nearby")
        .json(&json!({
            "stations": stations,
            "location": { "lat": 0.0, "lng": 0.0 }
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["radius_km"], 10.0);
    let nearby = body["stations"].as_array().unwrap();
    assert_eq!(nearby.len(), 2);
    assert_eq!(nearby[0]["station"]["id"], 2);
    assert_eq!(nearby[0]["distance_text"], "556 m");
    assert_eq!(nearby[1]["station"]["id"], 1);
    assert_eq!(nearby[1]["distance_text"], "5.6 km");

    let response = server
        .post("/stations/nearby")
        .json(&json!({
            "stations": stations,
            "location": { "lat": 0.0, "lng": 0.0 },
            "radius_km": 200.0
        }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["stations"].as_array().unwrap().len(), 3);
    assert_eq!(body["stations"][2]["station"]["id"], 3);
}
