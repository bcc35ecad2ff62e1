//! Prompt Builder: renders the recommendation prompt. Pure and deterministic
//! for identical inputs.

use crate::errors::AppError;
use crate::models::aspect::AspectId;
use crate::models::recommendation::{CONTENT_MAX_CHARS, TITLE_MAX_CHARS};
use crate::models::trend::TrendRecord;
use crate::recommendations::context::UserContextSummary;
use crate::recommendations::prompts::RECOMMENDATION_PROMPT_TEMPLATE;
use crate::recommendations::tone::render_tone;

pub const MAX_PROMPT_TRENDS: usize = 5;
pub const MAX_AVOID_TITLES: usize = 10;

/// The rendered prompt plus the trends it embeds (needed later for provenance).
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub text: String,
    pub trends: Vec<TrendRecord>,
}

/// Top trends touching the user's priorities, highest relevance first.
/// With no stated priorities every trackable aspect counts.
pub fn select_prompt_trends(trends: &[TrendRecord], priorities: &[AspectId]) -> Vec<TrendRecord> {
    let scope: &[AspectId] = if priorities.is_empty() {
        &AspectId::TRACKABLE
    } else {
        priorities
    };

    let mut selected: Vec<TrendRecord> = trends
        .iter()
        .filter(|t| t.touches_any(scope))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    selected.truncate(MAX_PROMPT_TRENDS);
    selected
}

pub fn build_prompt(
    summary: &UserContextSummary,
    ranked_trends: &[TrendRecord],
    existing_titles: &[String],
) -> Result<RenderedPrompt, AppError> {
    let trends = select_prompt_trends(ranked_trends, &summary.aspect_priorities);

    let activity_json = serde_json::to_string_pretty(&summary.per_aspect_activity)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize activity: {e}")))?;

    let priorities = if summary.aspect_priorities.is_empty() {
        "none stated".to_string()
    } else {
        summary
            .aspect_priorities
            .iter()
            .map(AspectId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let text = RECOMMENDATION_PROMPT_TEMPLATE
        .replace("{tone}", &render_tone(summary.tone_style))
        .replace("{title_max}", &TITLE_MAX_CHARS.to_string())
        .replace("{content_max}", &CONTENT_MAX_CHARS.to_string())
        .replace("{priorities}", &priorities)
        .replace("{trends_section}", &render_trends(&trends))
        .replace("{activity_json}", &activity_json)
        .replace("{display_name}", &summary.display_name)
        .replace("{avoid_section}", &render_avoid(existing_titles));

    Ok(RenderedPrompt { text, trends })
}

fn render_trends(trends: &[TrendRecord]) -> String {
    if trends.is_empty() {
        return "(none right now; base suggestions on the user's own activity)".to_string();
    }
    trends
        .iter()
        .map(|t| {
            format!(
                "- \"{}\" (category: {}, relevance: {}/100, sentiment: {}, emerging: {}, aspects: {})",
                t.topic,
                t.category.as_str(),
                t.relevance_score,
                t.sentiment.as_str(),
                if t.is_emerging { "yes" } else { "no" },
                t.related_aspects
                    .iter()
                    .map(AspectId::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_avoid(titles: &[String]) -> String {
    if titles.is_empty() {
        return "(none)".to_string();
    }
    titles
        .iter()
        .take(MAX_AVOID_TITLES)
        .map(|t| format!("- {t}"))
        .collect::<Vec<_>>()
        .join("\n")
}
