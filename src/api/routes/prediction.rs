//! Synthetic forecast endpoints

use axum::{
    Json,
    extract::{Path, Query},
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    api::error::{ApiError, ApiResult},
    prediction::{self, PredictionRequest, PredictionResponse, TrendResponse},
};

/// Longest forecast horizon accepted (30 days)
const MAX_HORIZON_HOURS: u32 = 24 * 30;

const MAX_TREND_DAYS: u32 = 365;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    days: Option<u32>,
}

/// POST /api/prediction/polarization-index
pub async fn predict_polarization_index(
    Json(request): Json<PredictionRequest>,
) -> ApiResult<Json<PredictionResponse>> {
    if request.prediction_horizon > MAX_HORIZON_HOURS {
        return Err(ApiError::InvalidRequest(format!(
            "prediction_horizon must not exceed {MAX_HORIZON_HOURS} hours"
        )));
    }

    if !(request.confidence_level > 0.0 && request.confidence_level < 1.0) {
        return Err(ApiError::InvalidRequest(format!(
            "confidence_level must lie strictly between 0 and 1, got {}",
            request.confidence_level
        )));
    }

    let response = prediction::forecast(&mut rand::thread_rng(), &request, Utc::now());
    Ok(Json(response))
}

/// GET /api/prediction/trends/:event_id?days=N
pub async fn get_trends(
    Path(event_id): Path<String>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Json<TrendResponse>> {
    let days = query.days.unwrap_or(7);
    if days > MAX_TREND_DAYS {
        return Err(ApiError::InvalidRequest(format!(
            "days must not exceed {MAX_TREND_DAYS}"
        )));
    }

    let response = prediction::trends(&mut rand::thread_rng(), &event_id, days, Utc::now());
    Ok(Json(response))
}
