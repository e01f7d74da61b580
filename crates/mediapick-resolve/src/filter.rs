//! Candidate shortlisting.

use mediapick_core::{Asset, ScoringWeights};
use tracing::debug;

use crate::scoring::Signals;
use crate::types::MessageContext;

/// An asset that passed the filter, with its raw score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub asset: &'a Asset,
    pub score: u32,
}

/// Score every asset against the context and keep the best `cap`.
///
/// `text` is the lowercased text the context was built from. Assets below
/// `weights.shortlist_cutoff` are dropped; ties keep index order. An empty
/// result is valid and left to the caller to interpret.
pub fn shortlist<'a>(
    text: &str,
    context: &MessageContext,
    assets: &'a [Asset],
    weights: &ScoringWeights,
    cap: usize,
) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = assets
        .iter()
        .filter_map(|asset| {
            let score = Signals::evaluate(text, context, asset).raw_score(weights);
            (score >= weights.shortlist_cutoff).then_some(Candidate { asset, score })
        })
        .collect();

    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(cap);

    debug!(
        "Shortlisted {} of {} assets (cap {})",
        candidates.len(),
        assets.len(),
        cap
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::analyze;
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
    fn test_greeting_asset_is_shortlisted() {
        let text = "привет, как дела?";
        let ctx = analyze(text);
        let assets = vec![asset(
            "hi",
            &["привет"],
            &[Theme::Greeting, Theme::Wellbeing],
            &[ContentType::WellbeingResponse],
        )];

        let shortlist = shortlist(text, &ctx, &assets, &ScoringWeights::default(), 20);
        assert_eq!(shortlist.len(), 1);
        assert!(shortlist[0].score >= 2);
    }

    #[test]
    fn test_cutoff_excludes_weak_assets() {
        let text = "зелёный трамвай";
        let ctx = analyze(text);
        let assets = vec![asset("a", &["море"], &[Theme::Travel], &[ContentType::Statement])];
        assert!(shortlist(text, &ctx, &assets, &ScoringWeights::default(), 20).is_empty());
    }

    #[test]
    fn test_sorted_stable_and_capped() {
        let text = "спасибо за помощь";
        let ctx = analyze(text);
        let assets = vec![
            asset("a", &["помощь"], &[], &[ContentType::Statement]),
            asset("b", &[], &[Theme::Gratitude], &[ContentType::Gratitude]),
            asset("c", &["помощь"], &[], &[ContentType::Statement]),
            asset("d", &["помощь"], &[], &[ContentType::Statement]),
        ];

        let list = shortlist(text, &ctx, &assets, &ScoringWeights::default(), 3);
        let names: Vec<_> = list.iter().map(|c| c.asset.filename.as_str()).collect();
        assert_eq!(names, vec!["b.ogg", "a.ogg", "c.ogg"]);
        assert_eq!(list[0].score, 6);
        assert_eq!(list[1].score, 2);
    }
}
