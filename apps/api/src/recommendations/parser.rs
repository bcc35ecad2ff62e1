//! Response Parser: turns raw model text into `Recommendation`s.
//!
//! Malformed output is never an error: it yields an empty list and a warning.
//! Missing optional fields get defaults (aspect=events, action_type=info,
//! priority=medium) and provenance is inferred from the trends in the prompt.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::llm_client::strip_json_fences;
use crate::models::aspect::AspectId;
use crate::models::recommendation::{
    truncate_chars, Recommendation, RecommendationSource, CONTENT_MAX_CHARS, TITLE_MAX_CHARS,
};
use crate::models::trend::TrendRecord;

/// One item as the model wrote it. Every field is optional; camelCase
/// aliases are accepted because models drift between conventions.
#[derive(Debug, Deserialize)]
struct RawRecommendation {
    aspect: Option<String>,
    title: Option<String>,
    content: Option<String>,
    #[serde(alias = "actionType")]
    action_type: Option<String>,
    priority: Option<String>,
    #[serde(alias = "actionUrl")]
    action_url: Option<String>,
    #[serde(alias = "trendContext")]
    trend_context: Option<String>,
}

pub fn parse_recommendations(
    raw: &str,
    user_id: Uuid,
    trends: &[TrendRecord],
) -> Vec<Recommendation> {
    let Some(items) = extract_items(raw) else {
        warn!(
            "Malformed generation for user {user_id}: not a JSON array or recommendations object ({} chars)",
            raw.len()
        );
        return Vec::new();
    };

    let now = Utc::now();
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let raw_item: RawRecommendation = match serde_json::from_value(item) {
                Ok(r) => r,
                Err(e) => {
                    warn!("Skipping recommendation #{index}: {e}");
                    return None;
                }
            };
            let mapped = map_item(raw_item, user_id, trends, Uuid::new_v4(), now);
            if mapped.is_none() {
                warn!("Skipping recommendation #{index}: missing title or content");
            }
            mapped
        })
        .collect()
}

fn extract_items(raw: &str) -> Option<Vec<Value>> {
    let value: Value = serde_json::from_str(strip_json_fences(raw)).ok()?;
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("recommendations") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Deterministic item mapping; `id` and `created_at` are supplied by the caller.
fn map_item(
    raw: RawRecommendation,
    user_id: Uuid,
    trends: &[TrendRecord],
    id: Uuid,
    created_at: DateTime<Utc>,
) -> Option<Recommendation> {
    let title = non_empty(raw.title)?;
    let content = non_empty(raw.content)?;
    let title = truncate_chars(&title, TITLE_MAX_CHARS);
    let content = truncate_chars(&content, CONTENT_MAX_CHARS);

    let aspect = raw
        .aspect
        .and_then(|a| a.parse::<AspectId>().ok())
        .filter(AspectId::is_trackable)
        .unwrap_or(AspectId::Events);
    let action_type = raw
        .action_type
        .and_then(|a| a.parse().ok())
        .unwrap_or_default();
    let priority = raw
        .priority
        .and_then(|p| p.parse().ok())
        .unwrap_or_default();
    let trend_context = non_empty(raw.trend_context);
    let source = infer_source(&title, &content, trend_context.as_deref(), trends);

    Some(Recommendation {
        id,
        user_id,
        aspect,
        title,
        content,
        action_type,
        priority,
        action_url: non_empty(raw.action_url),
        trend_context,
        source,
        acted_on: false,
        dismissed: false,
        created_at,
    })
}

/// `twitter_trend` when the model claimed a trend context and the title or
/// content literally mentions a trend topic, `hybrid` when it claimed a trend
/// context without mentioning one, otherwise `user_data`.
pub fn infer_source(
    title: &str,
    content: &str,
    trend_context: Option<&str>,
    trends: &[TrendRecord],
) -> RecommendationSource {
    let title = title.to_lowercase();
    let content = content.to_lowercase();
    let mentions_topic = trends
        .iter()
        .map(|t| t.topic.trim().to_lowercase())
        .filter(|topic| !topic.is_empty())
        .any(|topic| title.contains(&topic) || content.contains(&topic));

    match trend_context {
        Some(_) if mentions_topic => RecommendationSource::TwitterTrend,
        Some(_) => RecommendationSource::Hybrid,
        None => RecommendationSource::UserData,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
