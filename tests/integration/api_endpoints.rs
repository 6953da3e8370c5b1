//! Integration tests for API endpoints
//!
//! These tests verify that:
//! - Settings can be read and replaced, and invalid settings are rejected
//! - Alert, event and statistics endpoints expose the monitor's history
//! - Event CRUD works against the flat-file store
//! - Prediction endpoints validate their inputs
//! - Analysis results are saved and reused; comment analysis needs a comment file

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use polarization_monitor::api::build_router;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use crate::helpers::*;

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint_returns_healthy() {
    let hub = spawn_test_hub(&[]).await;

    let client = reqwest::Client::new();
    let response = client.get(hub.url("/api/health")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json: Value = response.json().await.unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());

    hub.monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_settings_roundtrip() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[]).await;
    let app = build_router(state.clone(), false);

    let (status, body) = send(app.clone(), get("/api/monitor/settings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["update_interval"], 3600);
    assert_eq!(body["alert_threshold"], 0.75);
    assert_eq!(body["is_active"], true);

    let update = json!({"update_interval": 10, "alert_threshold": 0.8, "is_active": false});
    let (status, body) = send(
        app.clone(),
        with_json("POST", "/api/monitor/settings", update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert_eq!(body["settings"], update);

    let (_, body) = send(app, get("/api/monitor/settings")).await;
    assert_eq!(body, update);
    assert!(!state.settings.get().await.is_active);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_settings_rejected() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[]).await;
    let app = build_router(state.clone(), false);

    for invalid in [
        json!({"update_interval": 0, "alert_threshold": 0.5, "is_active": true}),
        json!({"update_interval": 5, "alert_threshold": 1.5, "is_active": true}),
    ] {
        let (status, body) =
            send(app.clone(), with_json("POST", "/api/monitor/settings", invalid)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    assert_eq!(state.settings.get().await, manual_settings());

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_alerts_and_statistics_reflect_ticks() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[0.70, 0.80, 0.60]).await;
    state.subscribers.add(Arc::new(Recorder::default())).await;
    let app = build_router(state, false);

    for _ in 0..3 {
        monitor.tick_now().await.unwrap();
    }

    let (status, body) = send(app.clone(), get("/api/monitor/alerts?limit=5")).await;
    assert_eq!(status, StatusCode::OK);
    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_id"], "alt_1");
    assert_eq!(alerts[0]["value"], 0.80);
    assert_eq!(alerts[0]["threshold"], 0.75);
    assert_eq!(alerts[0]["status"], "triggered");

    let (status, body) = send(app.clone(), get("/api/monitor/events")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"], json!([]));

    let (status, body) = send(app, get("/api/monitor/statistics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_value"], 0.60);
    assert_eq!(body["hourly_alerts"], 1);
    assert_eq!(body["daily_alerts"], 1);
    assert_eq!(body["total_events"], 0);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_event_listing_and_filters() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[]).await;
    let app = build_router(state, false);

    let (status, body) = send(app.clone(), get("/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(app.clone(), get("/api/events?category=health")).await;
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Vaccination controversy");
    assert_eq!(events[0]["polarizationLevel"], 9.2);

    let (_, body) = send(app.clone(), get("/api/events?keyword=INSIDER")).await;
    assert_eq!(body[0]["id"], 1);

    let (_, body) = send(app.clone(), get("/api/events?skip=1&limit=1")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 2);

    let (_, body) = send(app, get("/api/events/categories/all")).await;
    let mut categories: Vec<_> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap().to_string())
        .collect();
    categories.sort();
    assert_eq!(categories, ["health", "technology"]);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_event_crud() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[]).await;
    let app = build_router(state, false);

    let draft = json!({
        "title": "Housing reform debate",
        "category": "society",
        "date": "2025-05-01",
        "source": "reddit",
        "keywords": ["housing", "vaccine"]
    });
    let (status, created) = send(app.clone(), with_json("POST", "/api/events", draft)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], 3);
    assert_eq!(created["commentCount"], 0);

    let (status, detail) = send(app.clone(), get("/api/events/3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["title"], "Housing reform debate");
    assert_eq!(detail["comments"], json!([]));
    assert_eq!(detail["relatedEvents"], json!([]));

    let update = json!({
        "title": "Housing reform vote",
        "category": "society",
        "date": "2025-05-02",
        "source": "reddit"
    });
    let (status, updated) = send(app.clone(), with_json("PUT", "/api/events/3", update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Housing reform vote");
    assert_eq!(updated["keywords"], json!(["housing", "vaccine"]));

    let (_, body) = send(app.clone(), get("/api/events/keywords/top?limit=1")).await;
    assert_eq!(body["keywords"], json!([{"name": "vaccine", "count": 2}]));

    let delete = Request::builder()
        .method("DELETE")
        .uri("/api/events/3")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), delete).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains('3'));

    let (status, body) = send(app, get("/api/events/3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_event_update_is_404() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[]).await;
    let app = build_router(state, false);

    let update = json!({"title": "x", "category": "y", "date": "2025-01-01", "source": "z"});
    let (status, _) = send(app, with_json("PUT", "/api/events/99", update)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_prediction_endpoints() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[]).await;
    let app = build_router(state, false);

    let (status, body) = send(
        app.clone(),
        with_json(
            "POST",
            "/api/prediction/polarization-index",
            json!({"event_id": "1", "prediction_horizon": 12}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event_id"], "1");
    assert_eq!(body["predicted_values"].as_array().unwrap().len(), 13);
    let interval = body["confidence_interval"].as_array().unwrap();
    assert!(interval[0].as_f64().unwrap() <= interval[1].as_f64().unwrap());
    assert_eq!(body["confidence_level"], 0.95);

    let (status, _) = send(
        app.clone(),
        with_json(
            "POST",
            "/api/prediction/polarization-index",
            json!({"event_id": "1", "confidence_level": 1.5}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app.clone(),
        with_json(
            "POST",
            "/api/prediction/polarization-index",
            json!({"event_id": "1", "prediction_horizon": 10_000}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app, get("/api/prediction/trends/1?days=1000")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_event_analysis_is_saved_and_reused() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[]).await;
    let app = build_router(state, false);

    let (status, first) = send(app.clone(), get("/api/analysis/events/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["eventId"], 1);
    assert_eq!(first["sentimentTrend"].as_array().unwrap().len(), 7);
    assert!(data_dir.path().join("analysis/results_1.json").exists());

    let (_, second) = send(app.clone(), get("/api/analysis/events/1")).await;
    assert_eq!(second, first);

    let (_, detail) = send(app, get("/api/events/1")).await;
    assert_eq!(detail["analysisResults"], first);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_comment_analysis_requires_comments() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[]).await;
    let app = build_router(state, false);

    let (status, body) = send(app.clone(), get("/api/analysis/comments/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let comments: Vec<Value> = (0..8)
        .map(|i| json!({"id": i, "content": format!("comment {i}")}))
        .collect();
    std::fs::write(
        data_dir.path().join("events/comments_1.json"),
        Value::from(comments).to_string(),
    )
    .unwrap();

    let (status, body) = send(
        app.clone(),
        get("/api/analysis/comments/1?limit=3&sort_by=polarization"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let analyses = body.as_array().unwrap();
    assert_eq!(analyses.len(), 3);
    let contributions: Vec<f64> = analyses
        .iter()
        .map(|a| a["polarizationContribution"].as_f64().unwrap())
        .collect();
    assert!(contributions.windows(2).all(|w| w[0] >= w[1]));

    let (status, body) = send(
        app.clone(),
        get("/api/analysis/comments/1?sort_by=sentiment"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 8);

    // Query rejections come back as plain text
    let response = app
        .oneshot(get("/api/analysis/comments/1?sort_by=loudness"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_related_events_show_up_in_detail() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[]).await;
    let app = build_router(state, false);

    let (status, related) = send(app.clone(), get("/api/analysis/related/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(related["eventId"], 2);
    let ids = related["relatedEvents"].as_array().unwrap();
    assert!(!ids.contains(&json!(2)));

    let (_, again) = send(app.clone(), get("/api/analysis/related/2")).await;
    assert_eq!(again, related);

    let (_, detail) = send(app, get("/api/events/2")).await;
    assert_eq!(detail["relatedEvents"], related["relatedEvents"]);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_polarization_overview_shape() {
    let data_dir = tempfile::tempdir().unwrap();
    let (state, monitor) = create_test_state(&data_dir, &[]).await;
    let app = build_router(state, false);

    let (status, body) = send(app, get("/api/analysis/polarization/overview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categoryPolarization"].as_object().unwrap().len(), 5);
    assert_eq!(body["polarizationTrend"].as_array().unwrap().len(), 30);
    assert_eq!(body["hotPolarizedEvents"].as_array().unwrap().len(), 5);

    monitor.shutdown().await.unwrap();
}
