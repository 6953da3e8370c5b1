use chrono::{DateTime, Utc};

use crate::{Alert, AlertStatus, settings::Settings};

/// Whether `value` breaches `threshold`
pub fn breaches(value: f64, threshold: f64) -> bool {
    value > threshold
}

/// Compares metric values against the alert threshold
///
/// The only state is the alert id sequence, so ids stay unique even after
/// old alerts have been evicted from history.
#[derive(Debug, Default)]
pub struct AlertEvaluator {
    sequence: u64,
}

impl AlertEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of alerts produced so far
    pub fn issued(&self) -> u64 {
        self.sequence
    }

    /// Returns an alert exactly when `value > settings.alert_threshold`
    pub fn evaluate(
        &mut self,
        value: f64,
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> Option<Alert> {
        let threshold = settings.alert_threshold;
        if !breaches(value, threshold) {
            return None;
        }

        self.sequence += 1;

        Some(Alert {
            alert_id: format!("alt_{}", self.sequence),
            timestamp: now,
            value,
            threshold,
            status: AlertStatus::Triggered,
            description: format!(
                "polarization index ({value:.2}) exceeded alert threshold ({threshold:.2})"
            ),
        })
    }
}
