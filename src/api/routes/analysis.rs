//! Synthetic analysis endpoints
//!
//! Event analysis and related events are generated on first request and
//! saved next to the event, so later requests return the same figures.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::{
    analysis::{
        self, AnalysisResult, CommentAnalysis, CommentOrder, PolarizationOverview, RelatedEvents,
    },
    api::{
        error::{ApiError, ApiResult},
        state::ApiState,
    },
};

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    limit: Option<usize>,
    #[serde(default)]
    sort_by: CommentOrder,
}

/// GET /api/analysis/events/:id
pub async fn get_event_analysis(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AnalysisResult>> {
    if let Some(saved) = state.analysis.analysis(id).await? {
        return Ok(Json(saved));
    }

    let result = analysis::analyze_event(&mut rand::thread_rng(), id, Utc::now());
    state.analysis.save_analysis(&result).await?;
    debug!("generated analysis for event {id}");

    Ok(Json(result))
}

/// GET /api/analysis/comments/:id?limit=N&sort_by=polarization|sentiment
pub async fn get_comments_analysis(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Query(query): Query<CommentsQuery>,
) -> ApiResult<Json<Vec<CommentAnalysis>>> {
    let comments = state
        .analysis
        .comments(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No comments found for event {id}")))?;

    let analyses = analysis::analyze_comments(
        &mut rand::thread_rng(),
        &comments,
        query.limit.unwrap_or(super::LimitQuery::DEFAULT),
        query.sort_by,
    );

    Ok(Json(analyses))
}

/// GET /api/analysis/related/:id
pub async fn get_related_events(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<RelatedEvents>> {
    if let Some(saved) = state.analysis.related(id).await? {
        return Ok(Json(saved));
    }

    let related = analysis::related_events(&mut rand::thread_rng(), id);
    state.analysis.save_related(&related).await?;

    Ok(Json(related))
}

/// GET /api/analysis/polarization/overview
pub async fn get_polarization_overview() -> Json<PolarizationOverview> {
    Json(analysis::overview(&mut rand::thread_rng(), Utc::now()))
}
