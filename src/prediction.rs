//! Synthetic polarization forecasts
//!
//! There is no model behind these numbers: the forecast is a linear trend
//! plus uniform noise, and the trends are random within fixed bands. The
//! random source is a parameter so results can be reproduced.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const BASE_VALUE: f64 = 0.65;
const NOISE_LEVEL: f64 = 0.05;
const TREND_PER_HOUR: f64 = 0.01;
const VALUE_CAP: f64 = 0.95;

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    pub event_id: String,
    /// Hours to forecast
    #[serde(default = "default_horizon")]
    pub prediction_horizon: u32,
    /// Echoed back; the band width does not depend on it
    #[serde(default = "default_confidence")]
    pub confidence_level: f64,
}

fn default_horizon() -> u32 {
    24
}

fn default_confidence() -> f64 {
    0.95
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub event_id: String,
    /// Value of the last forecast point
    pub predicted_value: f64,
    /// `[lower, upper]` of the last forecast point
    pub confidence_interval: [f64; 2],
    pub confidence_level: f64,
    pub prediction_time: DateTime<Utc>,
    pub predicted_values: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyPoint {
    pub date: String,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarizationPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResponse {
    pub event_id: String,
    pub accuracy_trend: Vec<AccuracyPoint>,
    pub polarization_trend: Vec<PolarizationPoint>,
}

/// Hourly forecast with `horizon + 1` points starting at `now`
pub fn forecast<R: Rng>(
    rng: &mut R,
    request: &PredictionRequest,
    now: DateTime<Utc>,
) -> PredictionResponse {
    let spread = NOISE_LEVEL * 1.5;

    let predicted_values: Vec<TimeSeriesPoint> = (0..=request.prediction_horizon)
        .map(|hour| {
            let noise = rng.gen_range(-NOISE_LEVEL..=NOISE_LEVEL);
            let value = (BASE_VALUE + TREND_PER_HOUR * hour as f64 + noise).min(VALUE_CAP);

            TimeSeriesPoint {
                timestamp: now + Duration::hours(hour as i64),
                value,
                lower_bound: (value - spread).max(0.0),
                upper_bound: (value + spread).min(1.0),
            }
        })
        .collect();

    // horizon + 1 >= 1 points, so there always is a last one
    let (predicted_value, confidence_interval) = predicted_values
        .last()
        .map(|p| (p.value, [p.lower_bound, p.upper_bound]))
        .unwrap_or((BASE_VALUE, [BASE_VALUE - spread, BASE_VALUE + spread]));

    PredictionResponse {
        event_id: request.event_id.clone(),
        predicted_value,
        confidence_interval,
        confidence_level: request.confidence_level,
        prediction_time: now,
        predicted_values,
    }
}

/// Daily accuracy and polarization trend for the last `days` days (oldest first)
pub fn trends<R: Rng>(rng: &mut R, event_id: &str, days: u32, now: DateTime<Utc>) -> TrendResponse {
    let date_of = |i: u32| {
        (now - Duration::days((days - i - 1) as i64))
            .format("%Y-%m-%d")
            .to_string()
    };

    let accuracy_trend = (0..days)
        .map(|i| AccuracyPoint {
            date: date_of(i),
            accuracy: rng.gen_range(0.7..=0.9),
        })
        .collect();

    let polarization_trend = (0..days)
        .map(|i| PolarizationPoint {
            date: date_of(i),
            value: (0.5 + i as f64 * 0.03 + rng.gen_range(-0.05..=0.05)).clamp(0.1, 0.95),
        })
        .collect();

    TrendResponse {
        event_id: event_id.to_string(),
        accuracy_trend,
        polarization_trend,
    }
}
