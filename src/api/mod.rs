//! REST API and WebSocket server
//!
//! ## Architecture
//!
//! - **Axum** web framework with Tower middleware
//! - **Shared handles** to settings, history, subscribers and the monitor actor
//! - **WebSocket** live feed: every connection is a subscriber of the monitor actor
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check
//! - `GET|POST /api/monitor/settings` - Read / replace monitoring settings
//! - `GET /api/monitor/alerts?limit=N` - Recent alerts
//! - `GET /api/monitor/events?limit=N` - Recent monitoring events
//! - `GET /api/monitor/statistics` - Alert counters and event statistics
//! - `WS /api/monitor/ws` - Live status feed
//! - `/api/events/...` - Event CRUD (flat-file store)
//! - `/api/prediction/...` - Synthetic forecasts
//! - `/api/analysis/...` - Synthetic sentiment, topic and polarization analysis

pub mod error;
pub mod routes;
pub mod state;
pub mod types;
pub mod websocket;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:8000")
    pub bind_addr: SocketAddr,

    /// Enable CORS for browser dashboards
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], crate::util::get_default_port())),
            enable_cors: true,
        }
    }
}

/// Build the router with all routes
pub fn build_router(state: ApiState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(routes::health::root))
        .route("/api/health", get(routes::health::health_check))
        .route(
            "/api/monitor/settings",
            get(routes::monitor::get_settings).post(routes::monitor::update_settings),
        )
        .route("/api/monitor/alerts", get(routes::monitor::get_alerts))
        .route("/api/monitor/events", get(routes::monitor::get_events))
        .route(
            "/api/monitor/statistics",
            get(routes::monitor::get_statistics),
        )
        .route("/api/monitor/ws", get(websocket::websocket_handler))
        .route(
            "/api/events",
            get(routes::events::list_events).post(routes::events::create_event),
        )
        .route(
            "/api/events/:id",
            get(routes::events::get_event)
                .put(routes::events::update_event)
                .delete(routes::events::delete_event),
        )
        .route(
            "/api/events/categories/all",
            get(routes::events::get_categories),
        )
        .route(
            "/api/events/keywords/top",
            get(routes::events::get_top_keywords),
        )
        .route(
            "/api/prediction/polarization-index",
            post(routes::prediction::predict_polarization_index),
        )
        .route(
            "/api/prediction/trends/:event_id",
            get(routes::prediction::get_trends),
        )
        .route(
            "/api/analysis/events/:id",
            get(routes::analysis::get_event_analysis),
        )
        .route(
            "/api/analysis/comments/:id",
            get(routes::analysis::get_comments_analysis),
        )
        .route(
            "/api/analysis/related/:id",
            get(routes::analysis::get_related_events),
        )
        .route(
            "/api/analysis/polarization/overview",
            get(routes::analysis::get_polarization_overview),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);

    let app = build_router(state, config.enable_cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
