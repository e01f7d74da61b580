//! LLM configuration persistence and provider selection.

use std::path::{Path, PathBuf};

use mediapick_core::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::LLMProvider;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Stored LLM configuration (persisted to llm-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    /// Path to config file for saving.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: "auto".into(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.into(),
            groq_model: DEFAULT_GROQ_MODEL.into(),
            config_path: PathBuf::new(),
        }
    }
}

/// A provider ready to be called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub provider: LLMProvider,
    pub model: String,
    pub api_key: String,
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config = Self::load_file(config_path);

        // Env vars as fallback for API keys
        if config.openai_api_key.is_none() {
            config.openai_api_key = env_key("OPENAI_API_KEY");
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = env_key("ANTHROPIC_API_KEY");
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = env_key("GROQ_API_KEY");
        }

        config
    }

    /// Load the file alone, without consulting the environment.
    pub fn load_file(config_path: &Path) -> Self {
        let mut config: LLMConfig = match std::fs::read_to_string(config_path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {}", config_path.display(), e);
                LLMConfig::default()
            }),
            Err(_) => LLMConfig::default(),
        };
        config.config_path = config_path.to_path_buf();
        config
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved LLM config to {}", self.config_path.display());
        Ok(())
    }

    /// Resolve which provider, model and key to use.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        let pick = |provider: LLMProvider| {
            let (key, model) = match provider {
                LLMProvider::OpenAI => (&self.openai_api_key, &self.openai_model),
                LLMProvider::Anthropic => (&self.anthropic_api_key, &self.anthropic_model),
                LLMProvider::Groq => (&self.groq_api_key, &self.groq_model),
            };
            key.as_ref().map(|k| ResolvedProvider {
                provider,
                model: model.clone(),
                api_key: k.clone(),
            })
        };

        // Explicit preference
        if self.preferred_provider != "auto" {
            return self.preferred_provider.parse().ok().and_then(pick);
        }

        // Auto mode: Anthropic > Groq > OpenAI
        [LLMProvider::Anthropic, LLMProvider::Groq, LLMProvider::OpenAI]
            .into_iter()
            .find_map(pick)
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
