//! Flat-file JSON event store
//!
//! Layout below the data directory:
//!
//! ```text
//! events/events.json          all events (array)
//! events/comments_<id>.json   comments of one event (optional)
//! analysis/related_<id>.json  {"relatedEvents": [...]} (optional)
//! analysis/results_<id>.json  analysis payload (optional)
//! ```
//!
//! A missing or unreadable `events.json` reads as an empty store. Writes
//! rewrite the whole file under a lock so concurrent requests don't
//! interleave read-modify-write cycles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::backend::{AnalysisStore, EventStore};
use super::error::StorageResult;
use super::schema::{Event, EventDetail, EventDraft, EventFilter, KeywordCount};
use crate::analysis::{AnalysisResult, RelatedEvents};

pub struct JsonFileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn events_path(&self) -> PathBuf {
        self.root.join("events").join("events.json")
    }

    fn comments_path(&self, id: i64) -> PathBuf {
        self.root.join("events").join(format!("comments_{id}.json"))
    }

    fn related_path(&self, id: i64) -> PathBuf {
        self.root.join("analysis").join(format!("related_{id}.json"))
    }

    fn results_path(&self, id: i64) -> PathBuf {
        self.root.join("analysis").join(format!("results_{id}.json"))
    }

    /// Create the directory layout and write sample events if none exist yet
    pub async fn ensure_seeded(&self) -> StorageResult<()> {
        for dir in ["events", "processed", "analysis"] {
            fs::create_dir_all(self.root.join(dir)).await?;
        }

        let _guard = self.write_lock.lock().await;
        if fs::try_exists(self.events_path()).await? {
            return Ok(());
        }

        debug!("seeding sample events at {}", self.events_path().display());
        self.save(&sample_events()).await
    }

    async fn load(&self) -> Vec<Event> {
        let path = self.events_path();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("ignoring unreadable {}: {e}", path.display());
            Vec::new()
        })
    }

    async fn save(&self, events: &[Event]) -> StorageResult<()> {
        let path = self.events_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(events)?;
        fs::write(&path, content).await?;
        Ok(())
    }

    async fn read_side_file(&self, path: PathBuf) -> Option<Value> {
        let content = fs::read_to_string(&path).await.ok()?;
        serde_json::from_str(&content)
            .inspect_err(|e| warn!("ignoring unreadable {}: {e}", path.display()))
            .ok()
    }

    async fn read_typed<T: DeserializeOwned>(&self, path: PathBuf) -> Option<T> {
        let value = self.read_side_file(path.clone()).await?;
        serde_json::from_value(value)
            .inspect_err(|e| warn!("ignoring malformed {}: {e}", path.display()))
            .ok()
    }

    async fn write_side_file<T>(&self, path: &Path, value: &T) -> StorageResult<()>
    where
        T: Serialize + Sync,
    {
        let _guard = self.write_lock.lock().await;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, serde_json::to_string_pretty(value)?).await?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl EventStore for JsonFileStore {
    async fn list(&self, filter: &EventFilter) -> StorageResult<Vec<Event>> {
        Ok(filter.apply(self.load().await))
    }

    async fn get(&self, id: i64) -> StorageResult<Option<EventDetail>> {
        let Some(event) = self.load().await.into_iter().find(|e| e.id == id) else {
            return Ok(None);
        };

        let comments = self
            .read_typed::<Vec<Value>>(self.comments_path(id))
            .await
            .unwrap_or_default();

        let related_events = self
            .read_side_file(self.related_path(id))
            .await
            .and_then(|value| value.get("relatedEvents").cloned())
            .and_then(|value| serde_json::from_value::<Vec<i64>>(value).ok())
            .unwrap_or_default();

        let analysis_results = self
            .read_side_file(self.results_path(id))
            .await
            .unwrap_or_else(|| Value::Object(Default::default()));

        Ok(Some(EventDetail {
            event,
            comments,
            related_events,
            analysis_results,
        }))
    }

    async fn create(&self, draft: EventDraft) -> StorageResult<Event> {
        let _guard = self.write_lock.lock().await;
        let mut events = self.load().await;

        let id = events.iter().map(|e| e.id).max().map_or(1, |max| max + 1);
        let event = draft.into_event(id);
        events.push(event.clone());

        self.save(&events).await?;
        debug!("created event {id}");
        Ok(event)
    }

    async fn update(&self, id: i64, draft: EventDraft) -> StorageResult<Option<Event>> {
        let _guard = self.write_lock.lock().await;
        let mut events = self.load().await;

        let Some(event) = events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        draft.apply_to(event);
        let updated = event.clone();

        self.save(&events).await?;
        debug!("updated event {id}");
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut events = self.load().await;

        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Ok(false);
        }

        self.save(&events).await?;
        debug!("deleted event {id}");
        Ok(true)
    }

    async fn categories(&self) -> StorageResult<Vec<String>> {
        let mut categories: Vec<String> =
            self.load().await.into_iter().map(|e| e.category).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn top_keywords(&self, limit: usize) -> StorageResult<Vec<KeywordCount>> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for event in self.load().await {
            for keyword in event.keywords.into_iter().flatten() {
                *counts.entry(keyword).or_insert(0) += 1;
            }
        }

        let mut keywords: Vec<KeywordCount> = counts
            .into_iter()
            .map(|(name, count)| KeywordCount { name, count })
            .collect();
        keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        keywords.truncate(limit);

        Ok(keywords)
    }
}

#[async_trait]
impl AnalysisStore for JsonFileStore {
    async fn analysis(&self, event_id: i64) -> StorageResult<Option<AnalysisResult>> {
        Ok(self.read_typed(self.results_path(event_id)).await)
    }

    async fn save_analysis(&self, result: &AnalysisResult) -> StorageResult<()> {
        self.write_side_file(&self.results_path(result.event_id), result)
            .await
    }

    async fn comments(&self, event_id: i64) -> StorageResult<Option<Vec<Value>>> {
        Ok(self.read_typed(self.comments_path(event_id)).await)
    }

    async fn related(&self, event_id: i64) -> StorageResult<Option<RelatedEvents>> {
        Ok(self.read_typed(self.related_path(event_id)).await)
    }

    async fn save_related(&self, related: &RelatedEvents) -> StorageResult<()> {
        self.write_side_file(&self.related_path(related.event_id), related)
            .await
    }
}

fn sample_events() -> Vec<Event> {
    vec![
        Event {
            id: 1,
            title: "Tech CEO accused of insider trading".to_string(),
            category: "technology".to_string(),
            date: "2025-04-25".to_string(),
            source: "weibo".to_string(),
            comment_count: 25631,
            polarization_level: 8.7,
            hot_level: 9.2,
            description: Some(
                "Reports that a technology company CEO traded on insider information \
                 split the public between those who see ordinary competition and those \
                 demanding stricter regulation."
                    .to_string(),
            ),
            keywords: Some(
                ["tech company", "CEO", "insider trading", "business ethics", "regulation"]
                    .map(String::from)
                    .to_vec(),
            ),
        },
        Event {
            id: 2,
            title: "Vaccination controversy".to_string(),
            category: "health".to_string(),
            date: "2025-04-23".to_string(),
            source: "zhihu".to_string(),
            comment_count: 38752,
            polarization_level: 9.2,
            hot_level: 9.8,
            description: Some(
                "The debate about vaccine safety and efficacy keeps two strongly opposed \
                 groups apart: one stressing public health, the other individual choice."
                    .to_string(),
            ),
            keywords: Some(
                ["vaccine", "vaccination", "public health", "side effects", "personal choice"]
                    .map(String::from)
                    .to_vec(),
            ),
        },
    ]
}
