//! Deterministic ranking. Used directly for small shortlists and as the
//! fallback whenever model ranking is unavailable or fails.

use mediapick_core::{Asset, ScoringWeights};

use crate::context::analyze;
use crate::scoring::Signals;
use crate::types::{sort_and_truncate, Recommendation};

/// Heuristic ranker. Total: never fails, may return an empty list.
pub struct HeuristicRanker<'w> {
    weights: &'w ScoringWeights,
}

impl<'w> HeuristicRanker<'w> {
    pub fn new(weights: &'w ScoringWeights) -> Self {
        Self { weights }
    }

    /// Rank candidates against the raw message.
    ///
    /// Relevance is the normalized signal score; candidates under
    /// `min_relevance` are dropped even when nothing else remains.
    pub fn rank(
        &self,
        message: &str,
        candidates: &[&Asset],
        max_results: usize,
    ) -> Vec<Recommendation> {
        let text = message.to_lowercase();
        let context = analyze(&text);

        let mut recommendations: Vec<Recommendation> = candidates
            .iter()
            .filter_map(|asset| {
                let signals = Signals::evaluate(&text, &context, asset);
                let relevance = signals.relevance(self.weights);
                (relevance >= self.weights.min_relevance).then(|| {
                    Recommendation::new(asset, relevance, signals.reason(&context))
                })
            })
            .collect();

        sort_and_truncate(&mut recommendations, max_results);
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediapick_core::{ContentType, MediaKind, Theme};
    use std::path::PathBuf;

    fn asset(name: &str, keywords: &[&str], themes: &[Theme], types: &[ContentType]) -> Asset {
        Asset {
            path: PathBuf::from(format!("/lib/voices/{name}.ogg")),
            filename: format!("{name}.ogg"),
            kind: MediaKind::Voice,
            size: 1,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            themes: themes.iter().copied().collect(),
            content_types: types.iter().copied().collect(),
            has_description: false,
        }
    }

    #[test]
    fn test_greeting_answer_ranks_first() {
        let weights = ScoringWeights::default();
        let hello = asset(
            "hello",
            &["привет"],
            &[Theme::Greeting, Theme::Wellbeing],
            &[ContentType::WellbeingResponse],
        );
        let other = asset("food", &["борщ"], &[Theme::Food], &[ContentType::Statement]);

        let recs = HeuristicRanker::new(&weights).rank("привет, как дела?", &[&other, &hello], 3);
        assert_eq!(recs[0].path, hello.path);
        assert!(recs[0].relevance > 0.0);
        assert!(recs[0].reason.contains("keyword match"));
    }

    #[test]
    fn test_gratitude_beats_keyword_overlap() {
        let weights = ScoringWeights::default();
        let generic = asset("generic", &["помощь"], &[], &[ContentType::Statement]);
        let thanks = asset("thanks", &[], &[], &[ContentType::Gratitude]);

        let recs = HeuristicRanker::new(&weights).rank("спасибо за помощь", &[&generic, &thanks], 3);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].path, thanks.path);
        assert!((recs[0].relevance - 0.3).abs() < 1e-9);
        assert!((recs[1].relevance - 0.2).abs() < 1e-9);
        assert!(recs[0].reason.contains("thanks in reply"));
    }

    #[test]
    fn test_below_threshold_yields_empty() {
        let weights = ScoringWeights::default();
        let a = asset("a", &["море"], &[Theme::Travel], &[ContentType::Statement]);
        assert!(HeuristicRanker::new(&weights).rank("зелёный трамвай", &[&a], 3).is_empty());
    }

    #[test]
    fn test_bounds_order_and_length() {
        let weights = ScoringWeights::default();
        let assets: Vec<Asset> = (0..8)
            .map(|i| {
                let keywords: Vec<&str> = ["привет", "как", "дела"].into_iter().take(i % 4).collect();
                asset(&format!("a{i}"), &keywords, &[Theme::Greeting], &[ContentType::Statement])
            })
            .collect();
        let refs: Vec<&Asset> = assets.iter().collect();

        let recs = HeuristicRanker::new(&weights).rank("привет как дела?", &refs, 5);
        assert!(recs.len() <= 5);
        assert!(recs.iter().all(|r| (0.0..=1.0).contains(&r.relevance)));
        assert!(recs.windows(2).all(|w| w[0].relevance >= w[1].relevance));
    }

    #[test]
    fn test_empty_message_does_not_panic() {
        let weights = ScoringWeights::default();
        let a = asset("q", &["вопрос"], &[], &[ContentType::Question]);
        let recs = HeuristicRanker::new(&weights).rank("", &[&a], 3);
        // An empty message is a statement; question assets still fit it
        assert_eq!(recs.len(), 1);
        assert!((recs[0].relevance - 0.2).abs() < 1e-9);
    }
}
