//! Keyword/theme/content-type signals shared by the filter and the heuristic ranker.

use mediapick_core::{Asset, ContentType, ScoringWeights};

use crate::types::{ContentNeed, MessageContext};

/// Asset content types that count as an answer.
const ANSWER_TYPES: &[ContentType] = &[
    ContentType::Statement,
    ContentType::WellbeingResponse,
    ContentType::AboutSelfStatement,
];

/// Which signals fired for one asset against one message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    /// Asset keywords occurring in the message (duplicates counted).
    pub keyword_hits: u32,
    /// Asset themes shared with the message.
    pub theme_hits: u32,
    /// The asset's discourse type fits what the reply needs.
    pub content_fit: bool,
    /// A wellbeing answer to a question.
    pub wellbeing_answer: bool,
    /// Gratitude in reply to a statement.
    pub gratitude_reply: bool,
}

impl Signals {
    /// Evaluate an asset against lowercased text and its analyzed context.
    pub fn evaluate(text: &str, context: &MessageContext, asset: &Asset) -> Self {
        let keyword_hits = asset
            .keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count() as u32;
        let theme_hits = asset.themes.intersection(&context.themes).count() as u32;

        let content_fit = match context.content_type_needed {
            ContentNeed::Statement => {
                !asset.has_content_type(ContentType::Question)
                    && ANSWER_TYPES.iter().any(|t| asset.has_content_type(*t))
            }
            ContentNeed::Question => asset.has_content_type(ContentType::Question),
        };

        Self {
            keyword_hits,
            theme_hits,
            content_fit,
            wellbeing_answer: context.is_question
                && asset.has_content_type(ContentType::WellbeingResponse),
            gratitude_reply: !context.is_question
                && asset.has_content_type(ContentType::Gratitude),
        }
    }

    /// Additive raw score.
    pub fn raw_score(&self, weights: &ScoringWeights) -> u32 {
        let mut score = self.keyword_hits * weights.keyword + self.theme_hits * weights.theme;
        if self.content_fit {
            score += weights.content_fit;
        }
        if self.wellbeing_answer {
            score += weights.wellbeing_answer_bonus;
        }
        if self.gratitude_reply {
            score += weights.gratitude_bonus;
        }
        score
    }

    /// Raw score mapped onto [0, 1].
    pub fn relevance(&self, weights: &ScoringWeights) -> f64 {
        if weights.normalization <= 0.0 {
            return 0.0;
        }
        (self.raw_score(weights) as f64 / weights.normalization).clamp(0.0, 1.0)
    }

    /// Human-readable list of the signals that fired.
    pub fn reason(&self, context: &MessageContext) -> String {
        let mut parts = Vec::new();
        if self.keyword_hits > 0 {
            parts.push(plural(self.keyword_hits, "keyword match", "keyword matches"));
        }
        if self.theme_hits > 0 {
            parts.push(plural(self.theme_hits, "theme match", "theme matches"));
        }
        if self.content_fit {
            parts.push(match context.content_type_needed {
                ContentNeed::Statement => "answer to question".to_string(),
                ContentNeed::Question => "keeps the conversation going".to_string(),
            });
        }
        if self.wellbeing_answer {
            parts.push("direct answer about wellbeing".to_string());
        }
        if self.gratitude_reply {
            parts.push("thanks in reply to a statement".to_string());
        }
        parts.join(", ")
    }
}

fn plural(n: u32, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::analyze;
    use mediapick_core::{MediaKind, Theme};
    use std::path::PathBuf;

    fn asset(keywords: &[&str], themes: &[Theme], types: &[ContentType]) -> Asset {
        Asset {
            path: PathBuf::from("/lib/voices/x.ogg"),
            filename: "x.ogg".into(),
            kind: MediaKind::Voice,
            size: 0,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            themes: themes.iter().copied().collect(),
            content_types: types.iter().copied().collect(),
            has_description: false,
        }
    }

    #[test]
    fn test_question_with_wellbeing_answer() {
        let msg = "привет, как дела?";
        let ctx = analyze(msg);
        let a = asset(
            &["привет"],
            &[Theme::Greeting, Theme::Wellbeing],
            &[ContentType::WellbeingResponse],
        );
        let signals = Signals::evaluate(msg, &ctx, &a);
        assert_eq!(signals.keyword_hits, 1);
        assert_eq!(signals.theme_hits, 2);
        assert!(signals.content_fit);
        assert!(signals.wellbeing_answer);
        assert!(!signals.gratitude_reply);

        let weights = ScoringWeights::default();
        assert_eq!(signals.raw_score(&weights), 2 + 6 + 2 + 3);
        assert_eq!(signals.relevance(&weights), 1.0);
        assert_eq!(
            signals.reason(&ctx),
            "1 keyword match, 2 theme matches, answer to question, direct answer about wellbeing"
        );
    }

    #[test]
    fn test_question_asset_never_fits_a_question() {
        let msg = "как дела?";
        let ctx = analyze(msg);
        let a = asset(&[], &[], &[ContentType::Question, ContentType::Statement]);
        assert!(!Signals::evaluate(msg, &ctx, &a).content_fit);
    }

    #[test]
    fn test_statement_prefers_questions() {
        let msg = "я сегодня устал";
        let ctx = analyze(msg);
        let q = asset(&[], &[], &[ContentType::Question]);
        let s = asset(&[], &[], &[ContentType::Statement]);
        assert!(Signals::evaluate(msg, &ctx, &q).content_fit);
        assert!(!Signals::evaluate(msg, &ctx, &s).content_fit);
    }

    #[test]
    fn test_zero_normalization_is_safe() {
        let weights = ScoringWeights {
            normalization: 0.0,
            ..Default::default()
        };
        let signals = Signals {
            keyword_hits: 3,
            ..Default::default()
        };
        assert_eq!(signals.relevance(&weights), 0.0);
    }
}
