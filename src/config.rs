use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::trace;

use crate::monitors::synthesizer::WalkParams;
use crate::settings::Settings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,

    /// Directory holding the flat-file event store
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Settings in effect when the hub starts
    #[serde(default)]
    pub settings: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSection::default(),
            data_dir: default_data_dir(),
            monitor: MonitorConfig::default(),
            settings: Settings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            enable_cors: default_enable_cors(),
        }
    }
}

/// Tuning knobs of the monitor loop
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Metric value before the first tick
    pub initial_value: f64,
    pub value_min: f64,
    pub value_max: f64,
    pub step_min: f64,
    pub step_max: f64,
    /// Relative weight of an upward step
    pub increase_weight: u32,
    /// Relative weight of a downward step
    pub decrease_weight: u32,
    /// Chance per active tick that a monitoring event is recorded
    pub event_probability: f64,
    pub event_capacity: usize,
    pub alert_capacity: usize,
    /// Events included in each status payload
    pub latest_events: usize,
    /// Events averaged by the statistics endpoint
    pub average_window: usize,
    /// Deliveries slower than this count as failed
    pub send_timeout_ms: u64,
    /// Fixed seed for a reproducible random source
    pub seed: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            initial_value: 0.6,
            value_min: 0.1,
            value_max: 0.95,
            step_min: 0.01,
            step_max: 0.04,
            increase_weight: 2,
            decrease_weight: 1,
            event_probability: 0.2,
            event_capacity: 50,
            alert_capacity: 100,
            latest_events: 5,
            average_window: 20,
            send_timeout_ms: 5000,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("value range [{min}, {max}] is empty")]
    EmptyValueRange { min: f64, max: f64 },

    #[error("step range [{min}, {max}] must be non-negative and ordered")]
    InvalidStepRange { min: f64, max: f64 },

    #[error("at least one of increase_weight and decrease_weight must be positive")]
    ZeroWeights,

    #[error("increase_weight + decrease_weight must fit in 32 bits")]
    WeightOverflow,

    #[error("initial value {value} lies outside [{min}, {max}]")]
    InitialValueOutOfRange { value: f64, min: f64, max: f64 },

    #[error("event probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("{0} must be at least 1")]
    ZeroCapacity(&'static str),
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.value_min < self.value_max) {
            return Err(ConfigError::EmptyValueRange {
                min: self.value_min,
                max: self.value_max,
            });
        }

        if !(0.0 <= self.step_min && self.step_min <= self.step_max) {
            return Err(ConfigError::InvalidStepRange {
                min: self.step_min,
                max: self.step_max,
            });
        }

        if !(self.value_min..=self.value_max).contains(&self.initial_value) {
            return Err(ConfigError::InitialValueOutOfRange {
                value: self.initial_value,
                min: self.value_min,
                max: self.value_max,
            });
        }

        if self.increase_weight == 0 && self.decrease_weight == 0 {
            return Err(ConfigError::ZeroWeights);
        }

        if self.increase_weight.checked_add(self.decrease_weight).is_none() {
            return Err(ConfigError::WeightOverflow);
        }

        if !(0.0..=1.0).contains(&self.event_probability) {
            return Err(ConfigError::InvalidProbability(self.event_probability));
        }

        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("event_capacity"));
        }

        if self.alert_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("alert_capacity"));
        }

        Ok(())
    }

    pub fn walk_params(&self) -> WalkParams {
        WalkParams {
            min: self.value_min,
            max: self.value_max,
            step_min: self.step_min,
            step_max: self.step_max,
            increase_weight: self.increase_weight,
            decrease_weight: self.decrease_weight,
        }
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], crate::util::get_default_port()))
}

fn default_enable_cors() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&file_content)
        .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))?;

    config.monitor.validate()?;
    config.settings.validate()?;

    trace!("loaded config: {config:?}");
    Ok(config)
}
