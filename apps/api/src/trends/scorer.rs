//! Trend relevance scoring.
//!
//! relevance = round(volume_score + category_score + jitter), jitter ∈ [0, 20]
//! - volume_score = min(volume / 10_000, 50), or 25 when the volume is unknown
//! - category_score = 30, or 10 for `general`
//!
//! The jitter makes scores non-deterministic; only the bounds are stable.

use rand::Rng;

use crate::models::trend::TrendCategory;

const VOLUME_DIVISOR: f64 = 10_000.0;
const MAX_VOLUME_SCORE: f64 = 50.0;
const DEFAULT_VOLUME_SCORE: f64 = 25.0;
const CATEGORY_SCORE: f64 = 30.0;
const GENERAL_CATEGORY_SCORE: f64 = 10.0;
pub const MAX_JITTER: f64 = 20.0;
/// Trends below this engagement volume are flagged as emerging.
pub const EMERGING_VOLUME_THRESHOLD: i64 = 50_000;

pub fn volume_score(volume: Option<i64>) -> f64 {
    match volume {
        Some(v) => (v.max(0) as f64 / VOLUME_DIVISOR).min(MAX_VOLUME_SCORE),
        None => DEFAULT_VOLUME_SCORE,
    }
}

pub fn category_score(category: TrendCategory) -> f64 {
    if category == TrendCategory::General {
        GENERAL_CATEGORY_SCORE
    } else {
        CATEGORY_SCORE
    }
}

#[cfg(test)]
/// Inclusive `(min, max)` a relevance score can take for these inputs.
pub fn score_bounds(volume: Option<i64>, category: TrendCategory) -> (u32, u32) {
    let base = volume_score(volume) + category_score(category);
    (to_score(base), to_score(base + MAX_JITTER))
}

pub fn relevance_score<R: Rng>(
    volume: Option<i64>,
    category: TrendCategory,
    rng: &mut R,
) -> u32 {
    let jitter = rng.gen_range(0.0..=MAX_JITTER);
    to_score(volume_score(volume) + category_score(category) + jitter)
}

/// Unknown volume counts as emerging.
pub fn is_emerging(volume: Option<i64>) -> bool {
    volume.map_or(true, |v| v < EMERGING_VOLUME_THRESHOLD)
}

fn to_score(raw: f64) -> u32 {
    raw.round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_volume_score_is_capped_at_50() {
        assert_eq!(volume_score(Some(80_000)), 8.0);
        assert_eq!(volume_score(Some(2_000_000)), 50.0);
        assert_eq!(volume_score(None), 25.0);
        assert_eq!(volume_score(Some(-5)), 0.0);
    }

    #[test]
    fn test_category_score() {
        assert_eq!(category_score(TrendCategory::Finance), 30.0);
        assert_eq!(category_score(TrendCategory::General), 10.0);
    }

    #[test]
    fn test_finance_score_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let (lo, hi) = score_bounds(Some(80_000), TrendCategory::Finance);
        assert_eq!((lo, hi), (38, 58));
        for _ in 0..500 {
            let score = relevance_score(Some(80_000), TrendCategory::Finance, &mut rng);
            assert!(
                (lo..=hi).contains(&score),
                "score {score} outside [{lo}, {hi}]"
            );
        }
    }

    #[test]
    fn test_score_never_exceeds_100() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let score = relevance_score(Some(i64::MAX), TrendCategory::Sports, &mut rng);
            assert!(score <= 100);
        }
        assert_eq!(score_bounds(Some(i64::MAX), TrendCategory::Sports).1, 100);
    }

    #[test]
    fn test_unknown_volume_bounds() {
        assert_eq!(score_bounds(None, TrendCategory::General), (35, 55));
    }

    #[test]
    fn test_is_emerging_threshold() {
        assert!(!is_emerging(Some(80_000)));
        assert!(!is_emerging(Some(50_000)));
        assert!(is_emerging(Some(49_999)));
        assert!(is_emerging(None));
    }
}
