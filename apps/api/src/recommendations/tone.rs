//! Tone calibration: maps a user's tone preference to the voice the model
//! should write in.

use crate::models::user::ToneStyle;

#[derive(Debug, Clone)]
pub struct ToneGuide {
    pub instruction: &'static str,
    pub example_openers: Vec<&'static str>,
    pub avoid: Vec<&'static str>,
}

pub fn tone_guide(tone: ToneStyle) -> ToneGuide {
    match tone {
        ToneStyle::Chill => ToneGuide {
            instruction: "Keep it relaxed and low-pressure, like a laid-back friend. \
                Short sentences, no urgency unless something is genuinely time-sensitive.",
            example_openers: vec!["No rush, but", "Might be nice to", "When you get a sec,"],
            avoid: vec!["must", "immediately", "don't miss out"],
        },
        ToneStyle::Professional => ToneGuide {
            instruction: "Be concise, factual and polished, like an executive assistant. \
                Lead with the outcome and keep wording neutral.",
            example_openers: vec!["Consider", "Recommended:", "Schedule"],
            avoid: vec!["awesome", "crushing it", "emoji"],
        },
        ToneStyle::Motivational => ToneGuide {
            instruction: "Be energetic and encouraging, like a coach. \
                Celebrate progress and frame each suggestion as a next win.",
            example_openers: vec!["Keep the streak going:", "You've got this:", "Level up:"],
            avoid: vec!["maybe", "if you feel like it", "no big deal"],
        },
        ToneStyle::Friendly => ToneGuide {
            instruction: "Be warm and conversational, like a thoughtful friend who knows \
                the user's routine. Personal, upbeat, never pushy.",
            example_openers: vec!["How about", "Good moment to", "Quick idea:"],
            avoid: vec!["you failed", "you should have", "urgent!!!"],
        },
    }
}

/// Renders the tone block that heads the prompt.
pub fn render_tone(tone: ToneStyle) -> String {
    let guide = tone_guide(tone);
    format!(
        "{}\nExample openers: {}.\nAvoid phrases like: {}.",
        guide.instruction,
        guide.example_openers.join(" / "),
        guide.avoid.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_tone_has_distinct_instruction() {
        let tones = [
            ToneStyle::Chill,
            ToneStyle::Professional,
            ToneStyle::Motivational,
            ToneStyle::Friendly,
        ];
        let instructions: Vec<&str> = tones.iter().map(|t| tone_guide(*t).instruction).collect();
        for (i, a) in instructions.iter().enumerate() {
            for b in &instructions[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_motivational_avoids_hedging() {
        assert!(tone_guide(ToneStyle::Motivational).avoid.contains(&"maybe"));
    }

    #[test]
    fn test_render_tone_includes_openers() {
        let text = render_tone(ToneStyle::Chill);
        assert!(text.contains("laid-back"));
        assert!(text.contains("No rush, but"));
    }
}
