//! Configuration and library directory management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::media::MediaKind;

/// Paths inside one user's media library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryPaths {
    /// Library root (e.g., `library/<user_id>/`).
    pub root: PathBuf,
    /// Voice messages (`voices/`).
    pub voices: PathBuf,
    /// Video notes (`video/`).
    pub video: PathBuf,
    /// Stickers and images (`stickers/`).
    pub stickers: PathBuf,
    /// Pasted text snippets (`pastes/`).
    pub pastes: PathBuf,
    /// Recommender tuning (`recommender.json`).
    pub recommender_config_file: PathBuf,
    /// LLM provider configuration (`llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl LibraryPaths {
    /// Create library paths from a root directory. Creates the root if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            voices: root.join(MediaKind::Voice.folder()),
            video: root.join(MediaKind::Video.folder()),
            stickers: root.join(MediaKind::Sticker.folder()),
            pastes: root.join(MediaKind::PastedText.folder()),
            recommender_config_file: root.join("recommender.json"),
            llm_config_file: root.join("llm-config.json"),
            root,
        };
        std::fs::create_dir_all(&paths.root)?;
        Ok(paths)
    }

    /// Folder holding assets of the given kind.
    pub fn folder_for(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Voice => &self.voices,
            MediaKind::Video => &self.video,
            MediaKind::Sticker => &self.stickers,
            MediaKind::PastedText => &self.pastes,
        }
    }
}

/// Weights and cut-offs of the keyword/theme scoring.
///
/// The defaults are empirical; they are kept configurable rather than
/// treated as meaningful constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Points per asset keyword found in the message.
    pub keyword: u32,
    /// Points per shared theme.
    pub theme: u32,
    /// Points when the asset's discourse type fits what the reply needs.
    pub content_fit: u32,
    /// Bonus for a wellbeing answer to a question.
    pub wellbeing_answer_bonus: u32,
    /// Bonus for gratitude in reply to a statement.
    pub gratitude_bonus: u32,
    /// Minimum raw score for the candidate shortlist.
    pub shortlist_cutoff: u32,
    /// Divisor that maps raw scores onto [0, 1].
    pub normalization: f64,
    /// Minimum normalized relevance for a heuristic recommendation.
    pub min_relevance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword: 2,
            theme: 3,
            content_fit: 2,
            wellbeing_answer_bonus: 3,
            gratitude_bonus: 3,
            shortlist_cutoff: 2,
            normalization: 10.0,
            min_relevance: 0.15,
        }
    }
}

/// Recommender tuning, persisted as `recommender.json` in the library root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Maximum size of the candidate shortlist.
    pub shortlist_cap: usize,
    /// Maximum number of candidates enumerated in a model prompt.
    pub prompt_candidates: usize,
    /// Number of trailing history entries used for context.
    pub history_window: usize,
    /// Default number of recommendations per request.
    pub default_max_results: usize,
    /// Model identifier passed to the text generator.
    pub model: String,
    /// Sampling temperature for ranking calls.
    pub temperature: f64,
    pub max_tokens: usize,
    /// Upper bound on a single model call; a timeout degrades to heuristics.
    pub model_timeout_secs: u64,
    pub weights: ScoringWeights,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            shortlist_cap: 20,
            prompt_candidates: 12,
            history_window: 3,
            default_max_results: 3,
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            max_tokens: 400,
            model_timeout_secs: 30,
            weights: ScoringWeights::default(),
        }
    }
}

impl RecommenderConfig {
    /// Load from a JSON file; missing file or missing fields fall back to defaults.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(config) => {
                info!("Loaded recommender config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save to disk as pretty JSON.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Top-level MediaPick configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaPickConfig {
    pub library: LibraryPaths,
    pub recommender: RecommenderConfig,
}

impl MediaPickConfig {
    /// Build configuration for a library root, reading `recommender.json` if present.
    pub fn from_env(library_root: impl AsRef<Path>) -> std::io::Result<Self> {
        let library = LibraryPaths::new(library_root)?;
        let mut recommender = RecommenderConfig::load(&library.recommender_config_file);

        if let Some(secs) = std::env::var("MEDIAPICK_MODEL_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            recommender.model_timeout_secs = secs;
        }

        Ok(Self {
            library,
            recommender,
        })
    }

    /// Library root for a user id: `library/<user_id>`.
    pub fn user_library_root(base: impl AsRef<Path>, user_id: &str) -> PathBuf {
        base.as_ref().join(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_layout() {
        let dir = tempfile::tempdir().unwrap();
        let paths = LibraryPaths::new(dir.path().join("42")).unwrap();
        assert!(paths.root.exists());
        assert_eq!(paths.folder_for(MediaKind::Voice), paths.root.join("voices"));
        assert_eq!(paths.folder_for(MediaKind::PastedText), paths.root.join("pastes"));
    }

    #[test]
    fn test_recommender_config_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recommender.json");
        std::fs::write(&path, r#"{"shortlist_cap": 5, "weights": {"theme": 4}}"#).unwrap();

        let config = RecommenderConfig::load(&path);
        assert_eq!(config.shortlist_cap, 5);
        assert_eq!(config.weights.theme, 4);
        assert_eq!(config.weights.keyword, 2);
        assert_eq!(config.prompt_candidates, 12);
    }

    #[test]
    fn test_recommender_config_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recommender.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(RecommenderConfig::load(&path), RecommenderConfig::default());
    }

    #[test]
    fn test_recommender_config_roundtrip_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("recommender.json");
        let mut config = RecommenderConfig::default();
        config.temperature = 0.0;
        config.save(&path).unwrap();
        assert_eq!(RecommenderConfig::load(&path).temperature, 0.0);
    }
}
