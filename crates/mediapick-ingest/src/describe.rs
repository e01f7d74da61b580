//! Sidecar description files: templates, parsing, coverage stats.
//!
//! A description is a `<stem>.txt` file beside a voice, video or sticker
//! asset, made of `Label: value` lines. Both the Russian labels written by
//! the templates and English labels are understood when parsing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mediapick_core::{Asset, ContentType, MediaKind, Result, Theme};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::file::sidecar_path;
use crate::library::AssetIndex;

/// Marker left in auto-generated descriptions that still need a human pass.
pub const AUTO_MARKER: &str = "Автоматически созданное описание";

/// Built-in description templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    GreetingQuestion,
    WellbeingAnswer,
    GratitudeAnswer,
    FoodStory,
    TravelStory,
    AboutMe,
}

impl Template {
    /// Pick a template from an asset's inferred tags.
    pub fn guess(asset: &Asset) -> Option<Self> {
        if asset.has_theme(Theme::Greeting)
            || asset.has_content_type(ContentType::WellbeingQuestion)
        {
            Some(Self::GreetingQuestion)
        } else if asset.has_content_type(ContentType::WellbeingResponse) {
            Some(Self::WellbeingAnswer)
        } else if asset.has_theme(Theme::Gratitude) {
            Some(Self::GratitudeAnswer)
        } else if asset.has_theme(Theme::Food) {
            Some(Self::FoodStory)
        } else if asset.has_theme(Theme::Travel) {
            Some(Self::TravelStory)
        } else if asset.has_theme(Theme::AboutSelf) || asset.has_theme(Theme::Work) {
            Some(Self::AboutMe)
        } else {
            None
        }
    }

    fn description(&self) -> Description {
        let (title, context, emotion, theme, kind, keywords, usage) = match self {
            Self::GreetingQuestion => (
                "Приветствие с вопросом",
                "Ответ на приветствие, когда нужно показать интерес к собеседнику",
                "happy",
                "greeting",
                "question",
                "привет, здравствуй, как дела, как жизнь, как настроение",
                "Когда собеседник пишет \"привет\" или \"здравствуй\"",
            ),
            Self::WellbeingAnswer => (
                "Ответ на вопрос о самочувствии",
                "Прямой ответ на вопрос \"как дела?\" или \"как самочувствие?\"",
                "happy",
                "wellbeing",
                "answer",
                "отлично, хорошо, замечательно, прекрасно, супер",
                "Когда спрашивают \"как дела?\" и все хорошо",
            ),
            Self::GratitudeAnswer => (
                "Благодарность за внимание",
                "Ответ на проявление заботы, комплимент или помощь",
                "grateful",
                "gratitude",
                "answer",
                "спасибо, благодарю, приятно, рада",
                "Когда собеседник проявляет заботу или делает комплимент",
            ),
            Self::FoodStory => (
                "Рассказ о готовке",
                "Рассказать о любимых блюдах или умении готовить",
                "happy",
                "food",
                "story",
                "готовка, кухня, рецепт, люблю готовить",
                "Когда разговор заходит о еде или кулинарии",
            ),
            Self::TravelStory => (
                "Рассказ о путешествиях",
                "Поделиться впечатлениями от поездок",
                "excited",
                "travel",
                "story",
                "путешествие, поездка, отпуск, море, пляж",
                "Когда собеседник спрашивает о путешествиях",
            ),
            Self::AboutMe => (
                "Рассказ о себе",
                "Кратко рассказать о себе, работе, увлечениях",
                "neutral",
                "about_me",
                "statement",
                "работаю, занимаюсь, люблю, увлекаюсь",
                "Когда спрашивают \"кем ты работаешь?\" или \"чем занимаешься?\"",
            ),
        };
        Description {
            title: Some(title.into()),
            context: Some(context.into()),
            emotion: Some(emotion.into()),
            theme: Some(theme.into()),
            content_type: Some(kind.into()),
            keywords: split_keywords(keywords),
            usage: Some(usage.into()),
        }
    }
}

/// Parsed fields of a sidecar description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub title: Option<String>,
    pub context: Option<String>,
    pub emotion: Option<String>,
    pub theme: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub keywords: Vec<String>,
    pub usage: Option<String>,
}

impl Description {
    /// Fallback description for assets no template fits.
    pub fn basic(asset: &Asset) -> Self {
        let stem = Path::new(&asset.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            title: Some(stem.clone()),
            context: Some(format!("{} - нужно прослушать и заполнить", AUTO_MARKER)),
            emotion: Some("neutral".into()),
            theme: Some("unknown".into()),
            content_type: Some("statement".into()),
            keywords: split_keywords(&stem.replace('_', ",")),
            usage: Some("Когда подходит по контексту разговора".into()),
        }
    }

    /// Parse `Label: value` lines. Unknown labels are ignored.
    pub fn parse(text: &str) -> Self {
        let mut desc = Self::default();
        for line in text.lines() {
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match label.trim().to_lowercase().as_str() {
                "название" | "title" => desc.title = Some(value.into()),
                "контекст" | "context" => desc.context = Some(value.into()),
                "эмоция" | "emotion" => desc.emotion = Some(value.into()),
                "тема" | "theme" => desc.theme = Some(value.into()),
                "тип" | "type" => desc.content_type = Some(value.into()),
                "ключевые слова" | "keywords" => desc.keywords = split_keywords(value),
                "пример использования" | "usage" => desc.usage = Some(value.into()),
                _ => {}
            }
        }
        desc
    }

    /// Whether this still is an untouched auto-generated description.
    pub fn is_placeholder(&self) -> bool {
        self.context
            .as_deref()
            .map(|c| c.contains(AUTO_MARKER))
            .unwrap_or(false)
    }

    /// Render in the on-disk `Label: value` format.
    pub fn render(&self) -> String {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        format!(
            "Название: {}\nКонтекст: {}\nЭмоция: {}\nТема: {}\nТип: {}\nКлючевые слова: {}\nПример использования: {}\n",
            field(&self.title),
            field(&self.context),
            field(&self.emotion),
            field(&self.theme),
            field(&self.content_type),
            self.keywords.join(", "),
            field(&self.usage),
        )
    }
}

fn split_keywords(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Result of a template generation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateReport {
    pub created: Vec<PathBuf>,
    pub skipped_existing: usize,
}

/// Write template descriptions for assets of `kind` that lack one.
///
/// At most `max_files` are written; existing sidecars are only replaced
/// with `force`.
pub fn create_templates(
    index: &AssetIndex,
    kind: MediaKind,
    max_files: usize,
    force: bool,
) -> Result<TemplateReport> {
    let mut report = TemplateReport::default();

    if !kind.supports_sidecar() {
        return Ok(report);
    }

    for asset in index.assets().iter().filter(|a| a.kind == kind) {
        if report.created.len() >= max_files {
            break;
        }
        let target = sidecar_path(&asset.path);
        if target.exists() && !force {
            report.skipped_existing += 1;
            continue;
        }

        let description = match Template::guess(asset) {
            Some(template) => template.description(),
            None => Description::basic(asset),
        };
        std::fs::write(&target, description.render())?;
        debug!("Wrote description {}", target.display());
        report.created.push(target);
    }

    info!(
        "Created {} {} descriptions ({} already present)",
        report.created.len(),
        kind,
        report.skipped_existing
    );
    Ok(report)
}

/// Description coverage for one media kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageStats {
    pub total: usize,
    pub described: usize,
    /// Described, but still an untouched auto-generated template.
    pub placeholders: usize,
}

/// Description coverage per media kind.
pub fn coverage(index: &AssetIndex) -> BTreeMap<MediaKind, CoverageStats> {
    let mut stats: BTreeMap<MediaKind, CoverageStats> = BTreeMap::new();
    for asset in index.assets() {
        let entry = stats.entry(asset.kind).or_default();
        entry.total += 1;
        if asset.has_description {
            entry.described += 1;
            let placeholder = std::fs::read_to_string(sidecar_path(&asset.path))
                .map(|text| Description::parse(&text).is_placeholder())
                .unwrap_or(false);
            if placeholder {
                entry.placeholders += 1;
            }
        }
    }
    stats
}

/// One exported description.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptionRecord {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub description: Description,
}

/// Read every present sidecar description in the index.
pub fn export_descriptions(index: &AssetIndex) -> Vec<DescriptionRecord> {
    index
        .assets()
        .iter()
        .filter(|a| a.has_description)
        .filter_map(|asset| {
            let text = std::fs::read_to_string(sidecar_path(&asset.path)).ok()?;
            Some(DescriptionRecord {
                path: asset.path.clone(),
                kind: asset.kind,
                description: Description::parse(&text),
            })
        })
        .collect()
}
