//! Recommender: owns one library's index and chooses a ranking path.

use std::sync::Arc;

use mediapick_chat::TextGenerator;
use mediapick_core::{Asset, Error, LibraryPaths, MediaPickConfig, RecommenderConfig, Result};
use mediapick_ingest::{AssetIndex, ScanOptions};
use mediapick_resolve::{analyze, shortlist, HeuristicRanker, Recommendation};
use tracing::{debug, info};

use crate::model_ranker::ModelRanker;
use crate::types::*;

/// Media recommender for one library.
///
/// The index is read-only while recommending; [`rebuild_index`](Self::rebuild_index)
/// takes `&mut self`, so it cannot overlap an in-flight request.
pub struct MediaRecommender {
    library: Option<LibraryPaths>,
    scan: ScanOptions,
    index: AssetIndex,
    config: RecommenderConfig,
    generator: Arc<dyn TextGenerator>,
}

impl MediaRecommender {
    /// Scan the configured library and build a recommender over it.
    pub fn open(config: &MediaPickConfig, generator: Arc<dyn TextGenerator>) -> Self {
        let scan = ScanOptions::default();
        let index = AssetIndex::build_with(&config.library, &scan);
        info!(
            "Media recommender ready: {} assets in {}",
            index.len(),
            config.library.root.display()
        );
        Self {
            library: Some(config.library.clone()),
            scan,
            index,
            config: config.recommender.clone(),
            generator,
        }
    }

    /// Build a recommender over a prepared index. It cannot be rebuilt.
    pub fn with_index(
        index: AssetIndex,
        config: RecommenderConfig,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            library: None,
            scan: ScanOptions::default(),
            index,
            config,
            generator,
        }
    }

    pub fn index(&self) -> &AssetIndex {
        &self.index
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Rescan the library, e.g. after files were renamed. Returns the new asset count.
    pub fn rebuild_index(&mut self) -> Result<usize> {
        let library = self
            .library
            .as_ref()
            .ok_or_else(|| Error::Library("recommender was built without library paths".into()))?;
        self.index = AssetIndex::build_with(library, &self.scan);
        info!("Rebuilt media index: {} assets", self.index.len());
        Ok(self.index.len())
    }

    /// Recommend up to `max_results` assets for an incoming message.
    ///
    /// Never fails: model problems fall back to the heuristic ranker and an
    /// empty list is a valid answer.
    pub async fn recommend(
        &self,
        message: &str,
        history: &[String],
        max_results: usize,
        api_key: Option<&str>,
    ) -> Vec<Recommendation> {
        self.recommend_detailed(message, history, max_results, api_key)
            .await
            .recommendations
    }

    /// Like [`recommend`](Self::recommend), also reporting the strategy taken.
    pub async fn recommend_detailed(
        &self,
        message: &str,
        history: &[String],
        max_results: usize,
        api_key: Option<&str>,
    ) -> RecommendOutcome {
        let api_key = api_key.map(str::trim).filter(|k| !k.is_empty());
        if max_results == 0 {
            return RecommendOutcome::empty(0);
        }

        let text = filter_text(message, history, self.config.history_window).to_lowercase();
        let context = analyze(&text);
        let weights = &self.config.weights;
        let shortlisted = shortlist(
            &text,
            &context,
            self.index.assets(),
            weights,
            self.config.shortlist_cap,
        );
        let candidates: Vec<&Asset> = shortlisted.iter().map(|c| c.asset).collect();

        debug!(
            "{} candidates for message (question: {}, model key: {})",
            candidates.len(),
            context.is_question,
            api_key.is_some()
        );

        match (candidates.len(), api_key) {
            (0, Some(key)) if !self.index.is_empty() => {
                let everything: Vec<&Asset> = self.index.assets().iter().collect();
                self.rank_with_model(
                    Strategy::ModelSweep,
                    message,
                    &everything,
                    history,
                    max_results,
                    key,
                )
                .await
            }
            (0, _) => RecommendOutcome::empty(0),
            (n, Some(key)) if n > max_results.saturating_mul(2) => {
                self.rank_with_model(Strategy::Model, message, &candidates, history, max_results, key)
                    .await
            }
            (n, _) => RecommendOutcome {
                recommendations: HeuristicRanker::new(weights).rank(message, &candidates, max_results),
                strategy: Strategy::Heuristic,
                shortlisted: n,
                degraded: None,
            },
        }
    }

    async fn rank_with_model(
        &self,
        strategy: Strategy,
        message: &str,
        candidates: &[&Asset],
        history: &[String],
        max_results: usize,
        api_key: &str,
    ) -> RecommendOutcome {
        let shortlisted = if strategy == Strategy::ModelSweep {
            0
        } else {
            candidates.len()
        };
        let shown = &candidates[..candidates.len().min(self.config.prompt_candidates)];

        let ranker = ModelRanker::new(self.generator.as_ref(), &self.config);
        match ranker.rank(message, shown, history, max_results, api_key).await {
            RankOutcome::Ranked(recommendations) => RecommendOutcome {
                recommendations,
                strategy,
                shortlisted,
                degraded: None,
            },
            RankOutcome::Degraded(reason) => {
                info!("Falling back to heuristic ranking: {}", reason);
                RecommendOutcome {
                    recommendations: HeuristicRanker::new(&self.config.weights).rank(
                        message,
                        shown,
                        max_results,
                    ),
                    strategy,
                    shortlisted,
                    degraded: Some(reason),
                }
            }
        }
    }
}

/// Message followed by the last `window` history entries, space-joined.
fn filter_text(message: &str, history: &[String], window: usize) -> String {
    let recent = &history[history.len().saturating_sub(window)..];
    let joined = recent.join(" ");
    if joined.trim().is_empty() {
        message.to_string()
    } else {
        format!("{} {}", message, joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mediapick_chat::GenerationRequest;
    use mediapick_core::{ContentType, MediaKind, Theme};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Generator returning a fixed reply and recording prompts.
    struct Scripted {
        reply: Option<String>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt.clone());
            self.reply
                .clone()
                .ok_or_else(|| Error::Generation("backend unreachable".into()))
        }
    }

    /// Generator that never answers.
    struct Stalled;

    #[async_trait]
    impl TextGenerator for Stalled {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

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

    /// Eight greeting answers; all pass the filter for "привет, как дела?".
    fn greeting_library() -> AssetIndex {
        let assets = (1..=8)
            .map(|i| {
                asset(
                    &format!("hello_{i}"),
                    &["привет"],
                    &[Theme::Greeting],
                    &[ContentType::Statement],
                )
            })
            .collect();
        AssetIndex::from_assets("/lib", assets)
    }

    fn recommender(index: AssetIndex, generator: Arc<dyn TextGenerator>) -> MediaRecommender {
        MediaRecommender::with_index(index, RecommenderConfig::default(), generator)
    }

    #[tokio::test]
    async fn test_large_shortlist_uses_model() {
        let generator = Scripted::replying("Item 2: 0.9 - warm\nItem 1: 0.4 - fine\nItem 40: 0.8 - bogus");
        let rec = recommender(greeting_library(), generator.clone());

        let outcome = rec
            .recommend_detailed("привет, как дела?", &[], 3, Some("sk-test"))
            .await;
        assert_eq!(outcome.strategy, Strategy::Model);
        assert_eq!(outcome.shortlisted, 8);
        assert!(outcome.degraded.is_none());
        assert_eq!(outcome.recommendations.len(), 2);
        assert_eq!(
            outcome.recommendations[0].path,
            PathBuf::from("/lib/voices/hello_2.ogg")
        );
        assert_eq!(outcome.recommendations[0].relevance, 0.9);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unbounded_max_results_stays_heuristic() {
        let generator = Scripted::replying("Item 1: 1.0 - unused");
        let rec = recommender(greeting_library(), generator.clone());

        let recs = rec
            .recommend("привет, как дела?", &[], usize::MAX, Some("sk-test"))
            .await;
        assert_eq!(recs.len(), 8);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_large_shortlist_without_key_is_heuristic() {
        let generator = Scripted::replying("Item 1: 1.0 - unused");
        let rec = recommender(greeting_library(), generator.clone());

        let outcome = rec.recommend_detailed("привет, как дела?", &[], 3, None).await;
        assert_eq!(outcome.strategy, Strategy::Heuristic);
        assert_eq!(outcome.recommendations.len(), 3);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

        // Blank keys count as missing
        let outcome = rec.recommend_detailed("привет, как дела?", &[], 3, Some("  ")).await;
        assert_eq!(outcome.strategy, Strategy::Heuristic);
    }

    #[tokio::test]
    async fn test_small_shortlist_is_heuristic_even_with_key() {
        let generator = Scripted::replying("Item 1: 1.0 - unused");
        let index = AssetIndex::from_assets(
            "/lib",
            vec![
                asset(
                    "hello",
                    &["привет"],
                    &[Theme::Greeting, Theme::Wellbeing],
                    &[ContentType::WellbeingResponse],
                ),
                asset("borscht", &["борщ"], &[Theme::Food], &[ContentType::Statement]),
            ],
        );
        let rec = recommender(index, generator.clone());

        let recs = rec.recommend("привет, как дела?", &[], 3, Some("sk-test")).await;
        assert_eq!(recs[0].path, PathBuf::from("/lib/voices/hello.ogg"));
        assert_eq!(recs[0].relevance, 1.0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_gratitude_scenario() {
        let index = AssetIndex::from_assets(
            "/lib",
            vec![
                asset("generic", &["помощь"], &[], &[ContentType::Statement]),
                asset("thanks", &[], &[Theme::Gratitude], &[ContentType::Gratitude]),
            ],
        );
        let rec = recommender(index, Scripted::failing());

        let recs = rec.recommend("спасибо за помощь", &[], 3, None).await;
        assert_eq!(recs[0].path, PathBuf::from("/lib/voices/thanks.ogg"));
        assert!(recs[0].relevance > recs[1].relevance);
    }

    #[tokio::test]
    async fn test_no_candidates_without_key_is_empty() {
        let index = AssetIndex::from_assets(
            "/lib",
            vec![asset("sea", &["море"], &[Theme::Travel], &[ContentType::Statement])],
        );
        let rec = recommender(index, Scripted::failing());

        let outcome = rec.recommend_detailed("зелёный трамвай", &[], 3, None).await;
        assert!(outcome.recommendations.is_empty());
        assert_eq!(outcome.strategy, Strategy::None);
        assert!(outcome.degraded.is_none());
    }

    #[tokio::test]
    async fn test_no_candidates_with_key_sweeps_library() {
        let generator = Scripted::replying("Item 2: 0.6 - closest mood");
        let index = AssetIndex::from_assets(
            "/lib",
            vec![
                asset("sea", &["море"], &[Theme::Travel], &[ContentType::Statement]),
                asset("cake", &["торт"], &[Theme::Food], &[ContentType::Statement]),
            ],
        );
        let rec = recommender(index, generator.clone());

        let outcome = rec.recommend_detailed("зелёный трамвай", &[], 3, Some("sk")).await;
        assert_eq!(outcome.strategy, Strategy::ModelSweep);
        assert_eq!(outcome.shortlisted, 0);
        // Sweep order is by path: cake before sea
        assert_eq!(
            outcome.recommendations[0].path,
            PathBuf::from("/lib/voices/sea.ogg")
        );
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("1. cake.ogg"));
        assert!(prompts[0].contains("2. sea.ogg"));
    }

    #[tokio::test]
    async fn test_empty_library_with_key_is_empty() {
        let generator = Scripted::replying("Item 1: 1.0 - x");
        let rec = recommender(AssetIndex::from_assets("/lib", Vec::new()), generator.clone());

        let outcome = rec.recommend_detailed("привет", &[], 3, Some("sk")).await;
        assert!(outcome.recommendations.is_empty());
        assert_eq!(outcome.strategy, Strategy::None);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generation_error_falls_back_to_heuristic() {
        let rec = recommender(greeting_library(), Scripted::failing());

        let outcome = rec
            .recommend_detailed("привет, как дела?", &[], 3, Some("sk-test"))
            .await;
        assert_eq!(outcome.strategy, Strategy::Model);
        assert!(outcome.degraded.unwrap().contains("backend unreachable"));
        assert_eq!(outcome.recommendations.len(), 3);
        assert!(outcome.recommendations.iter().all(|r| r.relevance >= 0.15));
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back() {
        let rec = recommender(greeting_library(), Scripted::replying("they all look nice"));

        let outcome = rec
            .recommend_detailed("привет, как дела?", &[], 3, Some("sk-test"))
            .await;
        assert!(outcome.degraded.is_some());
        assert_eq!(outcome.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn test_sentinel_is_not_degraded() {
        let rec = recommender(greeting_library(), Scripted::replying("No suitable item"));

        let outcome = rec
            .recommend_detailed("привет, как дела?", &[], 3, Some("sk-test"))
            .await;
        assert!(outcome.recommendations.is_empty());
        assert!(outcome.degraded.is_none());
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let config = RecommenderConfig {
            model_timeout_secs: 1,
            ..Default::default()
        };
        let rec = MediaRecommender::with_index(greeting_library(), config, Arc::new(Stalled));

        let outcome = rec
            .recommend_detailed("привет, как дела?", &[], 3, Some("sk-test"))
            .await;
        assert!(outcome.degraded.unwrap().contains("timed out"));
        assert_eq!(outcome.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn test_history_widens_filter() {
        let index = AssetIndex::from_assets(
            "/lib",
            vec![asset("cat", &["котик"], &[Theme::Pets], &[ContentType::Statement])],
        );
        let rec = recommender(index, Scripted::failing());

        let without = rec.recommend_detailed("ну и ладно", &[], 3, None).await;
        assert_eq!(without.shortlisted, 0);

        let history = vec![
            "старое".to_string(),
            "у меня котик".to_string(),
            "он спит".to_string(),
            "весь день".to_string(),
        ];
        let with = rec.recommend_detailed("ну и ладно", &history, 3, None).await;
        assert_eq!(with.shortlisted, 1);
        assert_eq!(with.strategy, Strategy::Heuristic);
    }

    #[tokio::test]
    async fn test_results_bounded_and_sorted() {
        let rec = recommender(greeting_library(), Scripted::failing());
        for max in [1, 2, 5] {
            let recs = rec.recommend("привет, как дела?", &[], max, None).await;
            assert!(recs.len() <= max);
            assert!(recs.windows(2).all(|w| w[0].relevance >= w[1].relevance));
        }
        assert!(rec.recommend("привет", &[], 0, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_open_and_rebuild_index() {
        let dir = tempfile::tempdir().unwrap();
        let config = MediaPickConfig::from_env(dir.path()).unwrap();
        std::fs::create_dir_all(&config.library.voices).unwrap();
        std::fs::write(config.library.voices.join("привет_как_дела.ogg"), b"x").unwrap();

        let mut rec = MediaRecommender::open(&config, Scripted::failing());
        assert_eq!(rec.index().len(), 1);

        std::fs::write(config.library.voices.join("спасибо.ogg"), b"x").unwrap();
        assert_eq!(rec.rebuild_index().unwrap(), 2);

        let mut detached = recommender(AssetIndex::from_assets("/lib", Vec::new()), Scripted::failing());
        assert!(detached.rebuild_index().is_err());
    }

    #[test]
    fn test_filter_text_uses_last_history_entries() {
        let history: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(filter_text("msg", &history, 3), "msg b c d");
        assert_eq!(filter_text("msg", &[], 3), "msg");
    }
}
