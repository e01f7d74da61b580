//! Model-assisted ranking: prompt building, the model call and response parsing.

use std::time::Duration;

use mediapick_chat::{GenerationRequest, TextGenerator};
use mediapick_core::{Asset, Error, RecommenderConfig};
use mediapick_resolve::{analyze, sort_and_truncate, MessageContext, Recommendation};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::types::RankOutcome;

/// What the model answers when nothing fits.
pub const NO_SUITABLE_ITEM: &str = "No suitable item";

const SYSTEM_PROMPT: &str = "You pick media files for replies in a friendly personal chat. \
Always respect the conversation context and never answer a question with another question.";

/// `Item <n>: <score> - <reason>`, tolerant of list markers, bold markers,
/// `#`, `.`/`)` after the index and dash variants.
static RANKING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[\s\-*•]*(?:item|файл)\s*#?(\d+)[*\s]*[:.)]\s*(\d+(?:\.\d+)?)\s*[-–—:]\s*(.+?)\s*$",
    )
    .expect("ranking line pattern is valid")
});

static SENTINEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)no suitable (?:item|file)|нет подходящих").expect("sentinel pattern is valid")
});

/// Ranks a candidate list with a text generator.
pub struct ModelRanker<'a> {
    generator: &'a dyn TextGenerator,
    config: &'a RecommenderConfig,
}

impl<'a> ModelRanker<'a> {
    pub fn new(generator: &'a dyn TextGenerator, config: &'a RecommenderConfig) -> Self {
        Self { generator, config }
    }

    /// Ask the model to rank `candidates`.
    ///
    /// Only the first `prompt_candidates` candidates and the last
    /// `history_window` history entries reach the prompt. Any failure is
    /// returned as [`RankOutcome::Degraded`]; nothing here panics or errors.
    pub async fn rank(
        &self,
        message: &str,
        candidates: &[&Asset],
        history: &[String],
        max_results: usize,
        api_key: &str,
    ) -> RankOutcome {
        let candidates = &candidates[..candidates.len().min(self.config.prompt_candidates)];
        if candidates.is_empty() {
            return RankOutcome::Ranked(Vec::new());
        }

        let context = analyze(message);
        let history = recent(history, self.config.history_window);
        let request = GenerationRequest {
            prompt: build_prompt(message, &context, candidates, history, max_results),
            system_prompt: SYSTEM_PROMPT.to_string(),
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            api_key: api_key.to_string(),
            max_tokens: self.config.max_tokens,
        };

        debug!(
            "Model ranking {} candidates with {}",
            candidates.len(),
            request.model
        );

        let secs = self.config.model_timeout_secs;
        let response =
            match tokio::time::timeout(Duration::from_secs(secs), self.generator.generate(&request))
                .await
            {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!("Model ranking failed: {}", e);
                    return RankOutcome::Degraded(e.to_string());
                }
                Err(_) => {
                    let e = Error::Timeout(secs);
                    warn!("Model ranking failed: {}", e);
                    return RankOutcome::Degraded(e.to_string());
                }
            };

        match parse_ranking(&response, candidates, max_results) {
            Some(recommendations) => {
                info!("Model ranked {} recommendations", recommendations.len());
                RankOutcome::Ranked(recommendations)
            }
            None => {
                warn!("Model response had no usable ranking lines");
                RankOutcome::Degraded("unparseable model response".into())
            }
        }
    }
}

fn recent(history: &[String], window: usize) -> &[String] {
    &history[history.len().saturating_sub(window)..]
}

/// Build the ranking prompt. Candidates are numbered from 1.
pub fn build_prompt(
    message: &str,
    context: &MessageContext,
    candidates: &[&Asset],
    history: &[String],
    max_results: usize,
) -> String {
    let (kind, needed) = if context.is_question {
        ("a QUESTION", "answers or statements")
    } else {
        ("a STATEMENT", "questions or thanks")
    };

    let history_block = if history.is_empty() {
        "(no history)".to_string()
    } else {
        history.join("\n")
    };

    let items: Vec<String> = candidates
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let mut line = format!("{}. {} - kind: {}", i + 1, asset.filename, asset.kind);
            if !asset.themes.is_empty() {
                line.push_str(&format!(", themes: {}", asset.theme_list()));
            }
            if !asset.content_types.is_empty() {
                line.push_str(&format!(", content: {}", asset.content_type_list()));
            }
            line
        })
        .collect();

    format!(
        "Help choose media files to reply with in a personal chat.\n\
\n\
MESSAGE CONTEXT:\n\
- Incoming message: \"{message}\"\n\
- This is {kind}\n\
- The reply needs: {needed}\n\
\n\
RULES:\n\
1. Answer a QUESTION with answers, not with new questions\n\
2. A STATEMENT may be followed by thanks or a question that keeps the conversation going\n\
3. Prefer files whose themes and content fit the message\n\
\n\
Recent history:\n\
{history_block}\n\
\n\
AVAILABLE FILES:\n\
{items}\n\
\n\
Choose up to {max_results} of the most suitable files. Give each one on its own line as\n\
Item <n>: <score from 0.0 to 1.0> - <short reason>\n\
\n\
If no file fits, answer \"{NO_SUITABLE_ITEM}\".\n",
        items = items.join("\n"),
    )
}

/// Parse a model response against the candidates it was shown.
///
/// Returns `Some(vec![])` for the explicit sentinel and `None` when no line
/// could be used. Lines with unknown indices or scores outside [0, 1] are
/// skipped; a repeated index keeps its first line.
pub fn parse_ranking(
    response: &str,
    candidates: &[&Asset],
    max_results: usize,
) -> Option<Vec<Recommendation>> {
    if SENTINEL.is_match(response) {
        return Some(Vec::new());
    }

    let mut seen = vec![false; candidates.len()];
    let mut recommendations = Vec::new();

    for line in response.lines() {
        let Some(caps) = RANKING_LINE.captures(line) else {
            continue;
        };
        let Ok(index) = caps[1].parse::<usize>() else {
            continue;
        };
        let Ok(score) = caps[2].parse::<f64>() else {
            continue;
        };
        if index == 0 || index > candidates.len() || !(0.0..=1.0).contains(&score) {
            debug!("Discarding ranking line: {}", line.trim());
            continue;
        }
        if std::mem::replace(&mut seen[index - 1], true) {
            continue;
        }
        recommendations.push(Recommendation::new(
            candidates[index - 1],
            score,
            caps[3].trim(),
        ));
    }

    if recommendations.is_empty() {
        return None;
    }
    sort_and_truncate(&mut recommendations, max_results);
    Some(recommendations)
}
