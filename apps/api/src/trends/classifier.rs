//! Trend classification: keyword → category, category → life-aspects, and a
//! coarse sentiment read. Everything here is pure.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::aspect::AspectId;
use crate::models::trend::{Sentiment, TrendCategory};

/// Checked top to bottom; the first category with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(TrendCategory, &[&str])] = &[
    (
        TrendCategory::Finance,
        &[
            "bitcoin",
            "crypto",
            "ethereum",
            "stock",
            "market",
            "nasdaq",
            "s&p",
            "dow jones",
            "federal reserve",
            "fomc",
            "interest rate",
            "inflation",
            "etf",
            "invest",
            "economy",
            "recession",
            "mortgage",
            "savings",
            "dividend",
        ],
    ),
    (
        TrendCategory::Health,
        &[
            "health",
            "fitness",
            "workout",
            "cardio",
            "diet",
            "nutrition",
            "wellness",
            "sleep",
            "cold plunge",
            "gym",
            "yoga",
            "protein",
            "fasting",
            "meditation",
            "meal prep",
            "vitamin",
        ],
    ),
    (
        TrendCategory::Tech,
        &[
            "artificial intelligence",
            "openai",
            "chatgpt",
            "gpt",
            "iphone",
            "apple",
            "google",
            "android",
            "microsoft",
            "nvidia",
            "software",
            "tech",
            "robot",
            "quantum",
            "cyber",
        ],
    ),
    (
        TrendCategory::Business,
        &[
            "startup",
            "ceo",
            "layoff",
            "merger",
            "acquisition",
            "ipo",
            "earnings",
            "entrepreneur",
            "funding",
            "business",
            "remote work",
            "hiring",
        ],
    ),
    (
        TrendCategory::Lifestyle,
        &[
            "travel",
            "vacation",
            "recipe",
            "restaurant",
            "fashion",
            "family",
            "wedding",
            "holiday",
            "flight",
            "coffee",
            "food",
            "parenting",
        ],
    ),
    (
        TrendCategory::Entertainment,
        &[
            "movie",
            "film",
            "netflix",
            "oscar",
            "box office",
            "album",
            "concert",
            "trailer",
            "season finale",
            "music",
            "grammy",
            "marvel",
            "tv show",
            "premiere",
        ],
    ),
    (
        TrendCategory::Sports,
        &[
            "nfl",
            "nba",
            "mlb",
            "nhl",
            "football",
            "soccer",
            "basketball",
            "baseball",
            "tennis",
            "olympic",
            "world cup",
            "super bowl",
            "champions league",
            "premier league",
            "championship",
            "marathon",
            "playoff",
            "tournament",
            "ufc",
        ],
    ),
];

/// A 4-digit year, or an announcement-style word.
static GENERAL_RELEVANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:19|20)\d{2}\b|\b(?:new|launch\w*|announce\w*)\b")
        .expect("general relevance pattern is valid")
});

const POSITIVE_WORDS: &[&str] = &[
    "wins",
    "victory",
    "record high",
    "launch",
    "celebrat",
    "approv",
    "surge",
    "rally",
    "breakthrough",
    "success",
    "benefit",
    "love",
];

const NEGATIVE_WORDS: &[&str] = &[
    "crash",
    "layoff",
    "scandal",
    "recession",
    "dies",
    "death",
    "banned",
    "lawsuit",
    "outage",
    "decline",
    "fail",
    "hack",
];

/// Maps a trend name to exactly one category.
pub fn classify(name: &str) -> TrendCategory {
    let lower = name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(TrendCategory::General)
}

/// Whether a `general` trend is still worth keeping.
pub fn is_relevant_general(name: &str) -> bool {
    GENERAL_RELEVANCE.is_match(name)
}

/// Whether a classified trend survives the pre-scoring filter.
pub fn should_retain(name: &str, category: TrendCategory) -> bool {
    category != TrendCategory::General || is_relevant_general(name)
}

/// Life-aspects a trend category is relevant to.
pub fn related_aspects(category: TrendCategory) -> Vec<AspectId> {
    match category {
        TrendCategory::Finance => vec![AspectId::Finance, AspectId::Business],
        TrendCategory::Health => vec![AspectId::Training, AspectId::Food],
        TrendCategory::Tech => vec![AspectId::Business, AspectId::Finance],
        TrendCategory::Business => vec![AspectId::Business, AspectId::Finance],
        TrendCategory::Lifestyle => vec![
            AspectId::Travel,
            AspectId::Food,
            AspectId::Family,
            AspectId::Friends,
        ],
        TrendCategory::Entertainment => {
            vec![AspectId::Films, AspectId::Events, AspectId::Friends]
        }
        TrendCategory::Sports => vec![AspectId::Sports, AspectId::Training],
        TrendCategory::General => vec![AspectId::Events],
    }
}

pub fn detect_sentiment(name: &str) -> Sentiment {
    let lower = name.to_lowercase();
    let positive = POSITIVE_WORDS.iter().any(|w| lower.contains(w));
    let negative = NEGATIVE_WORDS.iter().any(|w| lower.contains(w));
    match (positive, negative) {
        (true, true) => Sentiment::Mixed,
        (true, false) => Sentiment::Positive,
        (false, true) => Sentiment::Negative,
        (false, false) => Sentiment::Neutral,
    }
}
