//! Runtime types.

use mediapick_resolve::Recommendation;
use serde::Serialize;

/// Ranking path taken for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Nothing to rank: empty shortlist and no model key, or an empty library.
    None,
    /// Heuristic ranker on the shortlist.
    Heuristic,
    /// Model-assisted ranking of the shortlist.
    Model,
    /// Model-assisted ranking of the whole library after an empty shortlist.
    ModelSweep,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::None => write!(f, "none"),
            Strategy::Heuristic => write!(f, "heuristic"),
            Strategy::Model => write!(f, "model"),
            Strategy::ModelSweep => write!(f, "model_sweep"),
        }
    }
}

/// Result of one model ranking attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RankOutcome {
    /// The model answered. May be empty when it reported no suitable item.
    Ranked(Vec<Recommendation>),
    /// The model could not be used; the reason is for logs.
    Degraded(String),
}

/// Everything a caller may want to know about a recommendation request.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendOutcome {
    pub recommendations: Vec<Recommendation>,
    pub strategy: Strategy,
    /// Number of assets that passed the candidate filter.
    pub shortlisted: usize,
    /// Set when model ranking degraded to the heuristic ranker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl RecommendOutcome {
    pub fn empty(shortlisted: usize) -> Self {
        Self {
            recommendations: Vec::new(),
            strategy: Strategy::None,
            shortlisted,
            degraded: None,
        }
    }
}
