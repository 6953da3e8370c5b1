pub mod actors;
pub mod analysis;
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod monitors;
pub mod prediction;
pub mod settings;
pub mod storage;
pub mod util;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anything kept in a bounded history needs a point in time to be counted against.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Kind of synthetic monitoring event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PolarizationRising,
    PolarizationFalling,
    ThresholdReached,
    SystemRestart,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::PolarizationRising,
        EventType::PolarizationFalling,
        EventType::ThresholdReached,
        EventType::SystemRestart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PolarizationRising => "polarization_rising",
            EventType::PolarizationFalling => "polarization_falling",
            EventType::ThresholdReached => "threshold_reached",
            EventType::SystemRestart => "system_restart",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform a monitoring event is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Facebook,
    Reddit,
    Weibo,
    Youtube,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Twitter,
        Platform::Facebook,
        Platform::Reddit,
        Platform::Weibo,
        Platform::Youtube,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::Reddit => "reddit",
            Platform::Weibo => "weibo",
            Platform::Youtube => "youtube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synthetic event recorded by the monitor loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringEvent {
    /// Sequential identifier (format: "evt_<n>")
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub platform: Platform,
    /// Metric value at the time the event was produced
    pub value: f64,
    pub description: String,
}

impl Timestamped for MonitoringEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Triggered,
}

/// Threshold breach recorded by the alert evaluator
///
/// `threshold` is the value that was active when the alert was evaluated, so
/// later settings changes never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Sequential identifier (format: "alt_<n>")
    pub alert_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub threshold: f64,
    pub status: AlertStatus,
    pub description: String,
}

impl Timestamped for Alert {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Payload pushed to every live subscriber once per active tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub is_alert: bool,
    pub latest_events: Vec<MonitoringEvent>,
    /// Alerts recorded during the last hour
    pub alert_count: usize,
}
