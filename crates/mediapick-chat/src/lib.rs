//! Text generation with external LLM providers (OpenAI/Anthropic/Groq).
//!
//! The recommender only sees the [`TextGenerator`] trait; the HTTP
//! implementation lives in [`providers`]. No local model is required.

pub mod config;
pub mod providers;
pub mod types;

pub use config::LLMConfig;
pub use providers::{HttpGenerator, TextGenerator};
pub use types::*;
