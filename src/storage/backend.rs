//! Event store trait definition
//!
//! The monitoring core does not depend on these stores; they back the event
//! CRUD and analysis endpoints only.

use async_trait::async_trait;
use serde_json::Value;

use super::error::StorageResult;
use crate::analysis::{AnalysisResult, RelatedEvents};
use super::schema::{Event, EventDetail, EventDraft, EventFilter, KeywordCount};

/// Trait for event storage backends
///
/// Implementations must be `Send + Sync` as they are shared between
/// request handlers.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// List events matching `filter`, in storage order
    async fn list(&self, filter: &EventFilter) -> StorageResult<Vec<Event>>;

    /// Fetch a single event with its comments, related events and analysis results
    async fn get(&self, id: i64) -> StorageResult<Option<EventDetail>>;

    /// Store a new event with id = current max id + 1
    async fn create(&self, draft: EventDraft) -> StorageResult<Event>;

    /// Returns `None` when no event has this id
    async fn update(&self, id: i64, draft: EventDraft) -> StorageResult<Option<Event>>;

    /// Returns whether an event was removed
    async fn delete(&self, id: i64) -> StorageResult<bool>;

    /// Distinct categories, sorted
    async fn categories(&self) -> StorageResult<Vec<String>>;

    /// Most used keywords, highest count first
    async fn top_keywords(&self, limit: usize) -> StorageResult<Vec<KeywordCount>>;
}

/// Per-event analysis files
///
/// Generated results are saved so repeated requests for the same event see
/// the same figures.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Saved analysis; `None` when absent or unreadable
    async fn analysis(&self, event_id: i64) -> StorageResult<Option<AnalysisResult>>;

    async fn save_analysis(&self, result: &AnalysisResult) -> StorageResult<()>;

    /// Raw comments of an event; `None` when the event has no comment file
    async fn comments(&self, event_id: i64) -> StorageResult<Option<Vec<Value>>>;

    async fn related(&self, event_id: i64) -> StorageResult<Option<RelatedEvents>>;

    async fn save_related(&self, related: &RelatedEvents) -> StorageResult<()>;
}
