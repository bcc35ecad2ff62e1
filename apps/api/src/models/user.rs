use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub display_name: String,
}

/// Stored preferences. `aspect_priorities` is kept as raw names and normalized
/// by the context aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPreferences {
    pub user_id: Uuid,
    pub tone_style: String,
    pub aspect_priorities: Vec<String>,
    pub llm_provider: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneStyle {
    Chill,
    Professional,
    Motivational,
    Friendly,
}

impl FromStr for ToneStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chill" => Ok(ToneStyle::Chill),
            "professional" => Ok(ToneStyle::Professional),
            "motivational" => Ok(ToneStyle::Motivational),
            "friendly" => Ok(ToneStyle::Friendly),
            other => Err(format!("unknown tone style '{other}'")),
        }
    }
}

/// Which LLM backend a user's recommendations are generated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            other => Err(format!("unknown llm provider '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutRow {
    pub user_id: Uuid,
    pub workout_type: String,
    pub duration_minutes: i32,
    pub performed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransactionRow {
    pub user_id: Uuid,
    pub category: String,
    /// Negative for spending, positive for income.
    pub amount: f64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FriendRow {
    pub user_id: Uuid,
    pub name: String,
    pub last_contact_at: Option<DateTime<Utc>>,
}
