//! Event records kept in the flat-file event store
//!
//! Field names use camelCase on disk and on the wire, so existing
//! `events.json` files stay readable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tracked public-opinion event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub date: String,
    pub source: String,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub polarization_level: f64,
    #[serde(default)]
    pub hot_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

impl Event {
    /// Case-insensitive match over title, description and keywords
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();

        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || self
                .keywords
                .iter()
                .flatten()
                .any(|k| k.to_lowercase().contains(&needle))
    }
}

/// Client-supplied fields for creating or updating an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub category: String,
    pub date: String,
    pub source: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

impl EventDraft {
    /// New event with zeroed counters
    pub fn into_event(self, id: i64) -> Event {
        Event {
            id,
            title: self.title,
            category: self.category,
            date: self.date,
            source: self.source,
            comment_count: 0,
            polarization_level: 0.0,
            hot_level: 0.0,
            description: self.description,
            keywords: self.keywords,
        }
    }

    /// Overwrite the required fields and whichever optional fields are present
    pub fn apply_to(self, event: &mut Event) {
        event.title = self.title;
        event.category = self.category;
        event.date = self.date;
        event.source = self.source;

        if self.description.is_some() {
            event.description = self.description;
        }
        if self.keywords.is_some() {
            event.keywords = self.keywords;
        }
    }
}

/// An event together with its side files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub comments: Vec<Value>,
    pub related_events: Vec<i64>,
    pub analysis_results: Value,
}

/// Filter for listing events
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub category: Option<String>,
    pub min_polarization: Option<f64>,
    pub max_polarization: Option<f64>,
    pub keyword: Option<String>,
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
}

impl EventFilter {
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn matches(&self, event: &Event) -> bool {
        if self
            .category
            .as_ref()
            .is_some_and(|category| &event.category != category)
        {
            return false;
        }

        if self
            .min_polarization
            .is_some_and(|min| event.polarization_level < min)
        {
            return false;
        }

        if self
            .max_polarization
            .is_some_and(|max| event.polarization_level > max)
        {
            return false;
        }

        if let Some(keyword) = self.keyword.as_deref().filter(|k| !k.is_empty()) {
            return event.matches_keyword(keyword);
        }

        true
    }

    /// Filter, then paginate
    pub fn apply(&self, events: Vec<Event>) -> Vec<Event> {
        events
            .into_iter()
            .filter(|event| self.matches(event))
            .skip(self.skip)
            .take(self.limit.unwrap_or(Self::DEFAULT_LIMIT))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub name: String,
    pub count: usize,
}
