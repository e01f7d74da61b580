//! MediaPick Core — media asset types, library configuration, errors.

pub mod config;
pub mod error;
pub mod media;

pub use config::{LibraryPaths, MediaPickConfig, RecommenderConfig, ScoringWeights};
pub use error::{Error, Result};
pub use media::{Asset, ContentType, MediaKind, Theme};
