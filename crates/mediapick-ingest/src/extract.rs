//! Heuristic metadata extraction from media filenames.
//!
//! Keywords, themes and content types are derived from the file name alone;
//! no media content is ever read.

pub mod keywords;
pub mod review;
pub mod themes;

use std::collections::BTreeSet;

use mediapick_core::{ContentType, Theme};
use serde::{Deserialize, Serialize};

pub use keywords::{extract_keywords, normalize_name, strip_media_extensions};
pub use themes::{infer_content_types, is_interrogative, match_themes};

/// Tags derived from one filename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub keywords: Vec<String>,
    pub themes: BTreeSet<Theme>,
    pub content_types: BTreeSet<ContentType>,
}

/// Derive keywords, themes and content types from a filename.
///
/// Pure: the same name always yields the same result.
pub fn extract_from_filename(filename: &str) -> ExtractionResult {
    let normalized = normalize_name(filename);
    let themes = match_themes(&normalized);
    let content_types = infer_content_types(&normalized, &themes);

    ExtractionResult {
        keywords: extract_keywords(filename),
        themes,
        content_types,
    }
}
