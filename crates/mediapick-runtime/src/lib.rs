//! Media recommender runtime.
//!
//! Owns the asset index and picks a ranking strategy per request: the
//! heuristic ranker for small shortlists, model-assisted ranking for large
//! ones, and a model sweep over the whole library when nothing passes the
//! filter. Model failures always fall back to the heuristic ranker.

pub mod model_ranker;
pub mod recommender;
pub mod types;

pub use model_ranker::{parse_ranking, ModelRanker};
pub use recommender::MediaRecommender;
pub use types::*;
