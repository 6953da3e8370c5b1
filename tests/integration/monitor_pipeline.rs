//! Integration tests for the monitoring pipeline
//!
//! These tests verify that:
//! - Every subscriber receives the same serialized payload per tick
//! - Failed subscribers are dropped without stopping the loop
//! - Alerts land in history and feed the hourly counter
//! - Statistics reflect the recorded history

use chrono::Utc;
use polarization_monitor::{
    StatusPayload,
    actors::monitor::MonitorHandle,
    config::MonitorConfig,
    settings::Settings,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::helpers::*;

#[tokio::test]
async fn test_all_subscribers_receive_identical_payload() {
    let ctx = create_test_context(manual_settings());
    let recorders: Vec<_> = (0..3).map(|_| Arc::new(Recorder::default())).collect();
    for recorder in &recorders {
        ctx.subscribers.add(recorder.clone()).await;
    }

    let monitor =
        MonitorHandle::spawn_with_source(quiet_config(), ctx.clone(), Scripted::boxed(&[0.42]))
            .unwrap();

    let outcome = monitor.tick_now().await.unwrap().unwrap();
    assert_eq!(outcome.delivered, 3);
    assert_eq!(outcome.dropped, 0);

    let first = recorders[0].payloads();
    assert_eq!(first.len(), 1);
    for recorder in &recorders[1..] {
        assert_eq!(recorder.payloads(), first);
    }

    let payload: StatusPayload = serde_json::from_str(&first[0]).unwrap();
    assert_eq!(payload.value, 0.42);
    assert!(!payload.is_alert);
    assert!(payload.latest_events.is_empty());
    assert_eq!(payload.alert_count, 0);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_payload_wire_format() {
    let ctx = create_test_context(manual_settings());
    let recorder = Arc::new(Recorder::default());
    ctx.subscribers.add(recorder.clone()).await;

    let config = MonitorConfig {
        event_probability: 1.0,
        ..quiet_config()
    };
    let monitor =
        MonitorHandle::spawn_with_source(config, ctx, Scripted::boxed(&[0.9])).unwrap();
    monitor.tick_now().await.unwrap();

    let json: Value = serde_json::from_str(&recorder.payloads()[0]).unwrap();
    assert!(json["timestamp"].is_string());
    assert_eq!(json["value"], 0.9);
    assert_eq!(json["is_alert"], true);
    assert_eq!(json["alert_count"], 1);

    let event = &json["latest_events"][0];
    assert_eq!(event["event_id"], "evt_1");
    assert_eq!(event["value"], 0.9);
    assert!(event["event_type"].is_string());
    assert!(event["platform"].is_string());

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_subscriber_is_pruned() {
    let ctx = create_test_context(manual_settings());
    let healthy = Arc::new(Recorder::default());
    ctx.subscribers.add(healthy.clone()).await;
    ctx.subscribers.add(Arc::new(Broken)).await;
    ctx.subscribers.add(Arc::new(Recorder::default())).await;

    let monitor =
        MonitorHandle::spawn_with_source(quiet_config(), ctx.clone(), Scripted::boxed(&[]))
            .unwrap();

    let first = monitor.tick_now().await.unwrap().unwrap();
    assert_eq!((first.delivered, first.dropped), (2, 1));
    assert_eq!(ctx.subscribers.len().await, 2);

    let second = monitor.tick_now().await.unwrap().unwrap();
    assert_eq!((second.delivered, second.dropped), (2, 0));
    assert_eq!(healthy.payloads().len(), 2);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_alert_history_and_hourly_count() {
    let ctx = create_test_context(manual_settings());
    ctx.subscribers.add(Arc::new(Recorder::default())).await;

    let monitor = MonitorHandle::spawn_with_source(
        quiet_config(),
        ctx.clone(),
        Scripted::boxed(&[0.70, 0.80, 0.90, 0.60]),
    )
    .unwrap();

    let mut counts = vec![];
    for _ in 0..4 {
        let outcome = monitor.tick_now().await.unwrap().unwrap();
        counts.push(outcome.payload.alert_count);
    }
    assert_eq!(counts, [0, 1, 2, 2]);

    let alerts = ctx.history.recent_alerts(10).await;
    let ids: Vec<_> = alerts.iter().map(|a| a.alert_id.as_str()).collect();
    assert_eq!(ids, ["alt_1", "alt_2"]);
    assert!(alerts.iter().all(|a| a.value > a.threshold));

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_statistics_follow_history() {
    let ctx = create_test_context(manual_settings());
    ctx.subscribers.add(Arc::new(Recorder::default())).await;

    let config = MonitorConfig {
        event_probability: 1.0,
        ..quiet_config()
    };
    let monitor = MonitorHandle::spawn_with_source(
        config,
        ctx.clone(),
        Scripted::boxed(&[0.2, 0.4, 0.9]),
    )
    .unwrap();
    for _ in 0..3 {
        monitor.tick_now().await.unwrap();
    }

    let stats = ctx
        .history
        .statistics(monitor.current_value(), 20, Utc::now())
        .await;

    assert_eq!(stats.current_value, 0.9);
    assert_eq!(stats.hourly_alerts, 1);
    assert_eq!(stats.daily_alerts, 1);
    assert_eq!(stats.total_events, 3);
    assert!((stats.average_value - 0.5).abs() < 1e-9);
    assert_eq!(stats.platform_distribution.values().sum::<usize>(), 3);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_deactivation_stops_ticks() {
    let ctx = create_test_context(Settings {
        update_interval: 1,
        ..Settings::default()
    });
    let recorder = Arc::new(Recorder::default());
    ctx.subscribers.add(recorder.clone()).await;

    let monitor = MonitorHandle::spawn(quiet_config(), ctx.clone()).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!recorder.payloads().is_empty());

    ctx.settings
        .replace(Settings {
            is_active: false,
            ..manual_settings()
        })
        .await
        .unwrap();
    // let any tick already in flight finish
    tokio::time::sleep(Duration::from_millis(200)).await;
    let before = recorder.payloads().len();

    assert!(monitor.tick_now().await.unwrap().is_none());
    assert_eq!(recorder.payloads().len(), before);

    monitor.shutdown().await.unwrap();
}
