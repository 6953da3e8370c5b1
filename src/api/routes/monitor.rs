//! Monitoring endpoints: settings, history and statistics

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use tracing::info;

use crate::{
    api::{
        error::ApiResult,
        state::ApiState,
        types::{AlertsResponse, MonitoringEventsResponse, SettingsUpdateResponse},
    },
    settings::Settings,
    storage::MonitorStatistics,
};

use super::LimitQuery;

/// GET /api/monitor/settings
pub async fn get_settings(State(state): State<ApiState>) -> Json<Settings> {
    Json(state.settings.get().await)
}

/// POST /api/monitor/settings
///
/// Replaces the settings wholesale. Invalid settings are rejected with 400
/// and the previous settings stay in effect.
pub async fn update_settings(
    State(state): State<ApiState>,
    Json(settings): Json<Settings>,
) -> ApiResult<Json<SettingsUpdateResponse>> {
    let settings = state.settings.replace(settings).await?;
    info!("monitoring settings updated: {settings:?}");

    Ok(Json(SettingsUpdateResponse {
        message: "monitoring settings updated".to_string(),
        settings,
    }))
}

/// GET /api/monitor/alerts?limit=N
///
/// The N most recent alerts, oldest first
pub async fn get_alerts(
    State(state): State<ApiState>,
    Query(query): Query<LimitQuery>,
) -> Json<AlertsResponse> {
    Json(AlertsResponse {
        alerts: state.history.recent_alerts(query.limit()).await,
    })
}

/// GET /api/monitor/events?limit=N
///
/// The N most recent monitoring events, oldest first
pub async fn get_events(
    State(state): State<ApiState>,
    Query(query): Query<LimitQuery>,
) -> Json<MonitoringEventsResponse> {
    Json(MonitoringEventsResponse {
        events: state.history.recent_events(query.limit()).await,
    })
}

/// GET /api/monitor/statistics
pub async fn get_statistics(State(state): State<ApiState>) -> Json<MonitorStatistics> {
    let stats = state
        .history
        .statistics(
            state.monitor.current_value(),
            state.average_window,
            Utc::now(),
        )
        .await;

    Json(stats)
}
