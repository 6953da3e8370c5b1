//! Live monitoring history
//!
//! Two independent rings, one for alerts and one for synthetic events. The
//! monitor loop is the only writer; API handlers read concurrently. Each ring
//! sits behind its own lock, held only for the duration of a single call.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::trace;

use crate::{Alert, MonitoringEvent, Platform};

use super::ring::BoundedHistory;

/// Response for GET /api/monitor/statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorStatistics {
    pub current_value: f64,
    pub hourly_alerts: usize,
    pub daily_alerts: usize,
    pub total_events: usize,
    /// Mean value over the most recent events (0 when there are none)
    pub average_value: f64,
    pub platform_distribution: HashMap<Platform, usize>,
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    alerts: Arc<RwLock<BoundedHistory<Alert>>>,
    events: Arc<RwLock<BoundedHistory<MonitoringEvent>>>,
}

impl HistoryStore {
    pub fn new(alert_capacity: usize, event_capacity: usize) -> Self {
        Self {
            alerts: Arc::new(RwLock::new(BoundedHistory::new(alert_capacity))),
            events: Arc::new(RwLock::new(BoundedHistory::new(event_capacity))),
        }
    }

    pub async fn append_alert(&self, alert: Alert) {
        let evicted = self.alerts.write().await.append(alert);
        if evicted > 0 {
            trace!("evicted {evicted} old alert(s)");
        }
    }

    pub async fn append_event(&self, event: MonitoringEvent) {
        let evicted = self.events.write().await.append(event);
        if evicted > 0 {
            trace!("evicted {evicted} old event(s)");
        }
    }

    pub async fn recent_alerts(&self, n: usize) -> Vec<Alert> {
        self.alerts.read().await.recent(n)
    }

    pub async fn recent_events(&self, n: usize) -> Vec<MonitoringEvent> {
        self.events.read().await.recent(n)
    }

    pub async fn alerts_since(&self, cutoff: DateTime<Utc>) -> usize {
        self.alerts.read().await.count_since(cutoff)
    }

    pub async fn alert_count(&self) -> usize {
        self.alerts.read().await.len()
    }

    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn statistics(
        &self,
        current_value: f64,
        average_window: usize,
        now: DateTime<Utc>,
    ) -> MonitorStatistics {
        let (hourly_alerts, daily_alerts) = {
            let alerts = self.alerts.read().await;
            (
                alerts.count_since(now - Duration::hours(1)),
                alerts.count_since(now - Duration::days(1)),
            )
        };

        let events = self.events.read().await;

        let mut platform_distribution = HashMap::new();
        for event in events.iter() {
            *platform_distribution.entry(event.platform).or_insert(0) += 1;
        }

        let window: Vec<f64> = events
            .iter()
            .rev()
            .take(average_window)
            .map(|event| event.value)
            .collect();
        let average_value = if window.is_empty() {
            0.0
        } else {
            window.iter().sum::<f64>() / window.len() as f64
        };

        MonitorStatistics {
            current_value,
            hourly_alerts,
            daily_alerts,
            total_events: events.len(),
            average_value,
            platform_distribution,
        }
    }
}
