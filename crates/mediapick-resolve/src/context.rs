//! Incoming message classification.

use mediapick_ingest::extract::{is_interrogative, match_themes};

use crate::types::{ContentNeed, MessageContext, Urgency};

/// Openings that address the other person directly and read as a question.
pub const ADDRESS_PREFIXES: &[&str] = &["ты ", "вы ", "you ", "are you ", "do you "];

/// Classify a message. Pure: the same input always yields the same context.
pub fn analyze(message: &str) -> MessageContext {
    let lower = message.to_lowercase();
    let text = lower.trim();

    let is_question = text.contains('?')
        || ADDRESS_PREFIXES.iter().any(|p| text.starts_with(p))
        || is_interrogative(text);

    MessageContext {
        is_question,
        themes: match_themes(text),
        content_type_needed: if is_question {
            ContentNeed::Statement
        } else {
            ContentNeed::Question
        },
        urgency: Urgency::Normal,
    }
}
