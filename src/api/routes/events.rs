//! Event CRUD endpoints backed by the event store

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    api::{
        error::{ApiError, ApiResult},
        state::ApiState,
        types::{CategoriesResponse, KeywordsResponse, MessageResponse},
    },
    storage::schema::{Event, EventDetail, EventDraft, EventFilter},
};

use super::LimitQuery;

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Event with id {id} not found"))
}

/// GET /api/events
///
/// Supports `category`, `min_polarization`, `max_polarization`, `keyword`,
/// `skip` and `limit` (default 100)
pub async fn list_events(
    State(state): State<ApiState>,
    Query(filter): Query<EventFilter>,
) -> ApiResult<Json<Vec<Event>>> {
    Ok(Json(state.events.list(&filter).await?))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EventDetail>> {
    state
        .events
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<ApiState>,
    Json(draft): Json<EventDraft>,
) -> ApiResult<Json<Event>> {
    Ok(Json(state.events.create(draft).await?))
}

/// PUT /api/events/:id
pub async fn update_event(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(draft): Json<EventDraft>,
) -> ApiResult<Json<Event>> {
    state
        .events
        .update(id, draft)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.events.delete(id).await? {
        return Err(not_found(id));
    }

    Ok(Json(MessageResponse {
        message: format!("Event with id {id} successfully deleted"),
    }))
}

/// GET /api/events/categories/all
pub async fn get_categories(State(state): State<ApiState>) -> ApiResult<Json<CategoriesResponse>> {
    Ok(Json(CategoriesResponse {
        categories: state.events.categories().await?,
    }))
}

/// GET /api/events/keywords/top?limit=N
pub async fn get_top_keywords(
    State(state): State<ApiState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<KeywordsResponse>> {
    Ok(Json(KeywordsResponse {
        keywords: state.events.top_keywords(query.limit()).await?,
    }))
}
