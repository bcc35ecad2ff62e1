// LLM prompt constants for recommendation generation.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Persona for the recommendation model. `JSON_ONLY_SYSTEM` is appended at call time.
pub const RECOMMENDATION_SYSTEM: &str = "You are a personal life assistant that turns a \
    user's recent activity and current trends into a few short, concrete suggestions \
    across their life areas (training, food, finance, friends, travel and so on).";

/// Recommendation prompt template.
/// Replace: {tone}, {display_name}, {priorities}, {activity_json},
///          {trends_section}, {avoid_section}, {title_max}, {content_max}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"TONE:
{tone}

USER: {display_name}
PRIORITY ASPECTS (most important first): {priorities}

RECENT ACTIVITY:
{activity_json}

TRENDING TOPICS relevant to these priorities:
{trends_section}

EXISTING RECOMMENDATIONS (do NOT repeat these or close variations):
{avoid_section}

Generate 3 to 5 new recommendations. Return a JSON object with this EXACT shape:
{
  "recommendations": [
    {
      "aspect": "finance",
      "title": "Review your ETF allocation",
      "content": "Bitcoin ETF news is everywhere. A 10-minute look at your portfolio mix keeps you ahead of the noise.",
      "action_type": "action",
      "priority": "medium",
      "action_url": null,
      "trend_context": "Bitcoin ETF"
    }
  ]
}

HARD RULES:
1. `aspect` MUST be one of: training, food, sports, films, finance, business, travel, family, friends, events
2. `title` at most {title_max} characters; `content` at most {content_max} characters
3. `action_type` MUST be one of: info, action, reminder, trending
4. `priority` MUST be one of: low, medium, high, urgent
5. Set `trend_context` to the trending topic a suggestion builds on, otherwise null
6. Ground every suggestion in the activity or trends above; do not invent personal facts
7. Favour the priority aspects, most important first"#;
