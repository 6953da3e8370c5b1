//! Runtime monitoring settings
//!
//! A single [`Settings`] value is current at any time. It is replaced as a
//! whole by the administrative endpoint and re-read by the monitor loop on
//! every tick. Replacement goes through [`SettingsStore::replace`], which
//! validates first so an invalid value never reaches the loop.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds between two ticks
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,

    /// Values strictly above this raise an alert
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,

    /// Whether the monitor loop produces ticks at all
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_update_interval() -> u64 {
    5
}

fn default_alert_threshold() -> f64 {
    0.75
}

fn default_is_active() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            update_interval: default_update_interval(),
            alert_threshold: default_alert_threshold(),
            is_active: default_is_active(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("update interval must be at least one second, got {0}")]
    InvalidInterval(u64),

    #[error("alert threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.update_interval == 0 {
            return Err(SettingsError::InvalidInterval(self.update_interval));
        }

        if !self.alert_threshold.is_finite() || !(0.0..=1.0).contains(&self.alert_threshold) {
            return Err(SettingsError::InvalidThreshold(self.alert_threshold));
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.update_interval)
    }
}

/// Shared handle to the current settings
#[derive(Debug, Clone)]
pub struct SettingsStore {
    current: Arc<RwLock<Settings>>,
}

impl SettingsStore {
    /// Create a store holding `initial`, which must already be valid
    pub fn new(initial: Settings) -> Result<Self, SettingsError> {
        initial.validate()?;
        Ok(Self {
            current: Arc::new(RwLock::new(initial)),
        })
    }

    /// Snapshot of the current settings
    pub async fn get(&self) -> Settings {
        *self.current.read().await
    }

    /// Replace the settings wholesale
    ///
    /// On error the previous settings stay in place.
    pub async fn replace(&self, settings: Settings) -> Result<Settings, SettingsError> {
        settings.validate()?;

        let mut current = self.current.write().await;
        *current = settings;
        debug!("settings replaced: {settings:?}");

        Ok(settings)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            current: Arc::new(RwLock::new(Settings::default())),
        }
    }
}
