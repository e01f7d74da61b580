//! Media asset model shared by the indexer, the rankers and the CLI.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of media stored in a library subfolder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Voice message (`voices/`).
    Voice,
    /// Video note or clip (`video/`).
    Video,
    /// Sticker or still image (`stickers/`).
    Sticker,
    /// Pasted text snippet (`pastes/`).
    PastedText,
}

impl MediaKind {
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Voice,
        MediaKind::Video,
        MediaKind::Sticker,
        MediaKind::PastedText,
    ];

    /// Subfolder name beneath the library root.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Voice => "voices",
            Self::Video => "video",
            Self::Sticker => "stickers",
            Self::PastedText => "pastes",
        }
    }

    /// Extensions (lowercase, no dot) accepted for this kind by default.
    pub fn default_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Voice => &["ogg", "oga", "opus", "mp3", "m4a"],
            Self::Video => &["mp4", "mov", "webm"],
            Self::Sticker => &["webp", "png", "jpg", "jpeg", "tgs"],
            Self::PastedText => &["txt"],
        }
    }

    /// Whether assets of this kind can carry a `<stem>.txt` sidecar description.
    pub fn supports_sidecar(&self) -> bool {
        !matches!(self, Self::PastedText)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Voice => write!(f, "voice"),
            Self::Video => write!(f, "video"),
            Self::Sticker => write!(f, "sticker"),
            Self::PastedText => write!(f, "pasted_text"),
        }
    }
}

/// Topical tag inferred from a filename or a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Greeting,
    Wellbeing,
    AboutSelf,
    Food,
    Travel,
    Pets,
    Work,
    Gratitude,
    Apology,
    Emotion,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Wellbeing => "wellbeing",
            Self::AboutSelf => "about_self",
            Self::Food => "food",
            Self::Travel => "travel",
            Self::Pets => "pets",
            Self::Work => "work",
            Self::Gratitude => "gratitude",
            Self::Apology => "apology",
            Self::Emotion => "emotion",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discourse function of an asset: what it does in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Question,
    Statement,
    GreetingStart,
    Farewell,
    WellbeingQuestion,
    WellbeingResponse,
    AboutSelfQuestion,
    AboutSelfStatement,
    FoodHobby,
    FoodRecipe,
    TravelStory,
    PetsOwnership,
    WorkEnvironment,
    Gratitude,
    Apology,
    EmotionExpression,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Statement => "statement",
            Self::GreetingStart => "greeting_start",
            Self::Farewell => "farewell",
            Self::WellbeingQuestion => "wellbeing_question",
            Self::WellbeingResponse => "wellbeing_response",
            Self::AboutSelfQuestion => "about_self_question",
            Self::AboutSelfStatement => "about_self_statement",
            Self::FoodHobby => "food_hobby",
            Self::FoodRecipe => "food_recipe",
            Self::TravelStory => "travel_story",
            Self::PetsOwnership => "pets_ownership",
            Self::WorkEnvironment => "work_environment",
            Self::Gratitude => "gratitude",
            Self::Apology => "apology",
            Self::EmotionExpression => "emotion_expression",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One media file in a user's library, with tags derived from its name.
///
/// Tags are computed once when the library is scanned and never patched;
/// a renamed file only picks up new tags after the index is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Absolute path; the asset's identity.
    pub path: PathBuf,
    /// File name including extension.
    pub filename: String,
    pub kind: MediaKind,
    /// Size in bytes at scan time.
    pub size: u64,
    /// Lowercase filename tokens, in filename order.
    pub keywords: Vec<String>,
    pub themes: BTreeSet<Theme>,
    pub content_types: BTreeSet<ContentType>,
    /// Whether a `<stem>.txt` description sits next to the file.
    #[serde(default)]
    pub has_description: bool,
}

impl Asset {
    pub fn has_content_type(&self, content_type: ContentType) -> bool {
        self.content_types.contains(&content_type)
    }

    pub fn has_theme(&self, theme: Theme) -> bool {
        self.themes.contains(&theme)
    }

    /// Comma-joined theme names, for prompts and reports.
    pub fn theme_list(&self) -> String {
        self.themes
            .iter()
            .map(Theme::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-joined content type names, for prompts and reports.
    pub fn content_type_list(&self) -> String {
        self.content_types
            .iter()
            .map(ContentType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&MediaKind::PastedText).unwrap();
        assert_eq!(json, "\"pasted_text\"");
        assert_eq!(MediaKind::PastedText.to_string(), "pasted_text");
    }

    #[test]
    fn test_sidecar_support() {
        assert!(MediaKind::Voice.supports_sidecar());
        assert!(!MediaKind::PastedText.supports_sidecar());
    }

    #[test]
    fn test_asset_lists() {
        let asset = Asset {
            path: PathBuf::from("/lib/voices/привет.ogg"),
            filename: "привет.ogg".into(),
            kind: MediaKind::Voice,
            size: 10,
            keywords: vec!["привет".into()],
            themes: [Theme::Wellbeing, Theme::Greeting].into_iter().collect(),
            content_types: [ContentType::Statement, ContentType::GreetingStart]
                .into_iter()
                .collect(),
            has_description: false,
        };
        assert_eq!(asset.theme_list(), "greeting, wellbeing");
        assert_eq!(asset.content_type_list(), "statement, greeting_start");
        assert!(asset.has_content_type(ContentType::GreetingStart));
        assert!(!asset.has_theme(Theme::Food));
    }
}
