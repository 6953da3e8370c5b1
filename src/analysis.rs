//! Synthetic event analysis
//!
//! Sentiment, topic and polarization figures are random within fixed
//! bands; distributions are normalized to sum to one. Like the forecasts,
//! every generator takes its random source as a parameter.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rand::{
    Rng,
    seq::{IteratorRandom, SliceRandom},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TOPICS: [&str; 8] = [
    "politics",
    "economy",
    "society",
    "technology",
    "culture",
    "education",
    "health",
    "environment",
];

/// Categories of the polarization overview
const OVERVIEW_CATEGORIES: [&str; 5] = ["politics", "economy", "society", "technology", "culture"];

const TREND_DAYS: u32 = 7;
const OVERVIEW_DAYS: u32 = 30;
const HOT_EVENTS: usize = 5;

/// Ids related events are drawn from
const RELATED_ID_POOL: std::ops::RangeInclusive<i64> = 1..=20;
const RELATED_SAMPLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentShares {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentDay {
    pub day: u32,
    #[serde(flatten)]
    pub shares: SentimentShares,
}

/// Stored as `analysis/results_<id>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub event_id: i64,
    pub timestamp: DateTime<Utc>,
    pub sentiment_distribution: SentimentShares,
    pub topic_distribution: BTreeMap<String, f64>,
    pub polarization_score: f64,
    pub sentiment_trend: Vec<SentimentDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAnalysis {
    pub comment_id: String,
    pub text: String,
    pub sentiment: Sentiment,
    pub topics: Vec<String>,
    pub polarization_contribution: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentOrder {
    /// Largest polarization contribution first
    #[default]
    Polarization,
    /// Negative, then neutral, then positive
    Sentiment,
}

/// Stored as `analysis/related_<id>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEvents {
    pub event_id: i64,
    pub related_events: Vec<i64>,
    #[serde(default)]
    pub relation_strength: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewPoint {
    pub day: u32,
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotEvent {
    pub id: i64,
    pub title: String,
    pub polarization_level: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolarizationOverview {
    pub category_polarization: BTreeMap<String, f64>,
    pub polarization_trend: Vec<OverviewPoint>,
    pub hot_polarized_events: Vec<HotEvent>,
}

fn sentiment_shares<R: Rng>(rng: &mut R, polar_max: f64, neutral_max: f64) -> SentimentShares {
    let positive = rng.gen_range(0.1..polar_max);
    let neutral = rng.gen_range(0.1..neutral_max);
    let negative = rng.gen_range(0.1..polar_max);
    let total = positive + neutral + negative;

    SentimentShares {
        positive: positive / total,
        neutral: neutral / total,
        negative: negative / total,
    }
}

/// Full analysis of one event
pub fn analyze_event<R: Rng>(rng: &mut R, event_id: i64, now: DateTime<Utc>) -> AnalysisResult {
    let sentiment_distribution = sentiment_shares(rng, 0.5, 0.3);

    let weights: Vec<(String, f64)> = TOPICS
        .choose_multiple(rng, 5)
        .map(|topic| (topic.to_string(), rng.gen_range(0.01..1.0)))
        .collect();
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let topic_distribution = weights
        .into_iter()
        .map(|(topic, weight)| (topic, weight / total))
        .collect();

    let sentiment_trend = (1..=TREND_DAYS)
        .map(|day| SentimentDay {
            day,
            shares: sentiment_shares(rng, 0.6, 0.3),
        })
        .collect();

    AnalysisResult {
        event_id,
        timestamp: now,
        sentiment_distribution,
        topic_distribution,
        polarization_score: rng.gen_range(0.1..0.9),
        sentiment_trend,
    }
}

fn comment_field(comment: &Value, key: &str) -> String {
    match comment.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Analyze at most `limit` comments (drawn from the first `2 * limit`), sorted by `order`
pub fn analyze_comments<R: Rng>(
    rng: &mut R,
    comments: &[Value],
    limit: usize,
    order: CommentOrder,
) -> Vec<CommentAnalysis> {
    let mut analyses: Vec<CommentAnalysis> = comments
        .iter()
        .take(limit.saturating_mul(2))
        .map(|comment| {
            let topic_count = rng.gen_range(1..=3);
            CommentAnalysis {
                comment_id: comment_field(comment, "id"),
                text: comment_field(comment, "content"),
                sentiment: Sentiment::ALL[rng.gen_range(0..Sentiment::ALL.len())],
                topics: TOPICS
                    .choose_multiple(rng, topic_count)
                    .map(|t| t.to_string())
                    .collect(),
                polarization_contribution: rng.gen_range(0.0..1.0),
            }
        })
        .collect();

    match order {
        CommentOrder::Polarization => analyses.sort_by(|a, b| {
            b.polarization_contribution
                .total_cmp(&a.polarization_contribution)
        }),
        CommentOrder::Sentiment => analyses.sort_by_key(|a| a.sentiment),
    }

    analyses.truncate(limit);
    analyses
}

/// Up to five related events, never including `event_id` itself
pub fn related_events<R: Rng>(rng: &mut R, event_id: i64) -> RelatedEvents {
    let related: Vec<i64> = RELATED_ID_POOL
        .choose_multiple(rng, RELATED_SAMPLE)
        .into_iter()
        .filter(|id| *id != event_id)
        .collect();

    let relation_strength = related
        .iter()
        .map(|id| (id.to_string(), rng.gen_range(0.5..1.0)))
        .collect();

    RelatedEvents {
        event_id,
        related_events: related,
        relation_strength,
    }
}

/// Per-category polarization, a 30-day trend ending today and hot events
pub fn overview<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> PolarizationOverview {
    let category_polarization = OVERVIEW_CATEGORIES
        .iter()
        .map(|category| (category.to_string(), rng.gen_range(0.2..0.8)))
        .collect();

    let mut value: f64 = 0.5;
    let polarization_trend = (1..=OVERVIEW_DAYS)
        .map(|day| {
            value = (value + rng.gen_range(-0.05..=0.05)).clamp(0.1, 0.9);
            OverviewPoint {
                day,
                date: (now - Duration::days(i64::from(OVERVIEW_DAYS - day)))
                    .format("%Y-%m-%d")
                    .to_string(),
                value,
            }
        })
        .collect();

    let hot_polarized_events = (1..=HOT_EVENTS)
        .map(|i| HotEvent {
            id: rng.gen_range(RELATED_ID_POOL),
            title: format!("Hot event {i}"),
            polarization_level: rng.gen_range(0.6..0.9),
            category: OVERVIEW_CATEGORIES[rng.gen_range(0..OVERVIEW_CATEGORIES.len())].to_string(),
        })
        .collect();

    PolarizationOverview {
        category_polarization,
        polarization_trend,
        hot_polarized_events,
    }
}
