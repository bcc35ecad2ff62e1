use serde::{Deserialize, Serialize};

use crate::models::aspect::AspectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendCategory {
    Finance,
    Health,
    Tech,
    Business,
    Lifestyle,
    Entertainment,
    Sports,
    General,
}

impl TrendCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendCategory::Finance => "finance",
            TrendCategory::Health => "health",
            TrendCategory::Tech => "tech",
            TrendCategory::Business => "business",
            TrendCategory::Lifestyle => "lifestyle",
            TrendCategory::Entertainment => "entertainment",
            TrendCategory::Sports => "sports",
            TrendCategory::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Mixed => "mixed",
        }
    }
}

/// A raw trending topic as returned by a trend source, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrend {
    pub name: String,
    pub engagement_volume: Option<i64>,
}

impl RawTrend {
    pub fn new(name: &str, engagement_volume: Option<i64>) -> Self {
        Self {
            name: name.to_string(),
            engagement_volume,
        }
    }
}

/// One classified and scored trending topic. Upserted by `topic`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    pub topic: String,
    pub category: TrendCategory,
    pub relevance_score: u32, // 0 – 100
    pub engagement_volume: Option<i64>,
    pub sentiment: Sentiment,
    pub related_aspects: Vec<AspectId>,
    pub is_emerging: bool,
}

impl TrendRecord {
    pub fn touches_any(&self, aspects: &[AspectId]) -> bool {
        self.related_aspects.iter().any(|a| aspects.contains(a))
    }
}
