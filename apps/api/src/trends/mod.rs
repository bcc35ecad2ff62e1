// Trend pipeline: source → classify → filter → score → rank, cached by TrendService.

pub mod classifier;
pub mod handlers;
pub mod scorer;
pub mod service;
pub mod source;

use rand::Rng;

use crate::models::trend::{RawTrend, TrendRecord};

/// Turns raw trends into ranked records. Irrelevant `general` trends are
/// dropped; the rest are sorted by descending relevance (stable for ties).
pub fn build_trend_records<R: Rng>(raw: &[RawTrend], rng: &mut R) -> Vec<TrendRecord> {
    let mut records: Vec<TrendRecord> = raw
        .iter()
        .filter_map(|trend| {
            let category = classifier::classify(&trend.name);
            if !classifier::should_retain(&trend.name, category) {
                return None;
            }
            Some(TrendRecord {
                topic: trend.name.clone(),
                category,
                relevance_score: scorer::relevance_score(trend.engagement_volume, category, rng),
                engagement_volume: trend.engagement_volume,
                sentiment: classifier::detect_sentiment(&trend.name),
                related_aspects: classifier::related_aspects(category),
                is_emerging: scorer::is_emerging(trend.engagement_volume),
            })
        })
        .collect();

    rank_trends(&mut records);
    records
}

pub fn rank_trends(records: &mut [TrendRecord]) {
    records.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
}
