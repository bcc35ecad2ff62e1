use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::aspect::AspectId;

pub const TITLE_MAX_CHARS: usize = 60;
pub const CONTENT_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    Info,
    Action,
    Reminder,
    Trending,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Info => "info",
            ActionType::Action => "action",
            ActionType::Reminder => "reminder",
            ActionType::Trending => "trending",
        }
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(ActionType::Info),
            "action" => Ok(ActionType::Action),
            "reminder" => Ok(ActionType::Reminder),
            "trending" => Ok(ActionType::Trending),
            other => Err(format!("unknown action type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Provenance of a recommendation, inferred after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    #[default]
    UserData,
    TwitterTrend,
    Hybrid,
}

impl RecommendationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationSource::UserData => "user_data",
            RecommendationSource::TwitterTrend => "twitter_trend",
            RecommendationSource::Hybrid => "hybrid",
        }
    }
}

impl FromStr for RecommendationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user_data" => Ok(RecommendationSource::UserData),
            "twitter_trend" => Ok(RecommendationSource::TwitterTrend),
            "hybrid" => Ok(RecommendationSource::Hybrid),
            other => Err(format!("unknown recommendation source '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub aspect: AspectId,
    pub title: String,
    pub content: String,
    pub action_type: ActionType,
    pub priority: Priority,
    pub action_url: Option<String>,
    pub trend_context: Option<String>,
    pub source: RecommendationSource,
    pub acted_on: bool,
    pub dismissed: bool,
    pub created_at: DateTime<Utc>,
}

/// Database shape of a recommendation; enum columns are plain text.
#[derive(Debug, Clone, FromRow)]
pub struct RecommendationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub aspect: String,
    pub title: String,
    pub content: String,
    pub action_type: String,
    pub priority: String,
    pub action_url: Option<String>,
    pub trend_context: Option<String>,
    pub source: String,
    pub acted_on: bool,
    pub dismissed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RecommendationRow> for Recommendation {
    fn from(row: RecommendationRow) -> Self {
        Recommendation {
            id: row.id,
            user_id: row.user_id,
            aspect: row.aspect.parse().unwrap_or(AspectId::Events),
            title: row.title,
            content: row.content,
            action_type: row.action_type.parse().unwrap_or_default(),
            priority: row.priority.parse().unwrap_or_default(),
            action_url: row.action_url,
            trend_context: row.trend_context,
            source: row.source.parse().unwrap_or_default(),
            acted_on: row.acted_on,
            dismissed: row.dismissed,
            created_at: row.created_at,
        }
    }
}

/// Truncates to at most `max` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_limit() {
        let long = "a".repeat(75);
        assert_eq!(truncate_chars(&long, TITLE_MAX_CHARS).chars().count(), 60);
        assert_eq!(truncate_chars("short", TITLE_MAX_CHARS), "short");
    }

    #[test]
    fn test_truncate_chars_handles_multibyte() {
        let text = "ééééé";
        assert_eq!(truncate_chars(text, 3), "ééé");
    }

    #[test]
    fn test_row_with_unknown_enum_text_falls_back_to_defaults() {
        let row = RecommendationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            aspect: "gardening".to_string(),
            title: "T".to_string(),
            content: "C".to_string(),
            action_type: "shout".to_string(),
            priority: "whenever".to_string(),
            action_url: None,
            trend_context: None,
            source: "hybrid".to_string(),
            acted_on: false,
            dismissed: true,
            created_at: Utc::now(),
        };
        let rec = Recommendation::from(row);
        assert_eq!(rec.aspect, AspectId::Events);
        assert_eq!(rec.action_type, ActionType::Info);
        assert_eq!(rec.priority, Priority::Medium);
        assert_eq!(rec.source, RecommendationSource::Hybrid);
        assert!(rec.dismissed);
    }
}
