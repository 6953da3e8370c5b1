//! API response types
//!
//! Typed bodies for every endpoint, shared with the integration tests so
//! both sides agree on the wire format.

use serde::{Deserialize, Serialize};

use crate::{Alert, MonitoringEvent, settings::Settings};

/// Response for GET /
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

/// Response for GET /api/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Response for POST /api/monitor/settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsUpdateResponse {
    pub message: String,
    pub settings: Settings,
}

/// Response for GET /api/monitor/alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
}

/// Response for GET /api/monitor/events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringEventsResponse {
    pub events: Vec<MonitoringEvent>,
}

/// Response for DELETE /api/events/:id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for GET /api/events/categories/all
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Response for GET /api/events/keywords/top
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<crate::storage::schema::KeywordCount>,
}
