//! Resolver types.

use std::collections::BTreeSet;
use std::path::PathBuf;

use mediapick_core::{Asset, MediaKind, Theme};
use serde::{Deserialize, Serialize};

/// What kind of asset a reply needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentNeed {
    /// The message asked something; answer it.
    Statement,
    /// The message stated something; a question or thanks may follow.
    Question,
}

/// Reply urgency. Only `Normal` is produced today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Normal,
}

/// Analyzed form of one incoming message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
    pub is_question: bool,
    pub themes: BTreeSet<Theme>,
    pub content_type_needed: ContentNeed,
    pub urgency: Urgency,
}

/// One proposed asset to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub path: PathBuf,
    pub kind: MediaKind,
    /// Relevance in [0, 1].
    pub relevance: f64,
    pub reason: String,
    /// Snapshot of the asset's metadata at recommendation time.
    pub metadata: Asset,
}

impl Recommendation {
    pub fn new(asset: &Asset, relevance: f64, reason: impl Into<String>) -> Self {
        Self {
            path: asset.path.clone(),
            kind: asset.kind,
            relevance: relevance.clamp(0.0, 1.0),
            reason: reason.into(),
            metadata: asset.clone(),
        }
    }
}

/// Stable sort by descending relevance, then truncate.
pub fn sort_and_truncate(recommendations: &mut Vec<Recommendation>, max_results: usize) {
    recommendations.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    recommendations.truncate(max_results);
}
