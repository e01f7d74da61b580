//! Declarative trigger tables for theme and content-type inference.
//!
//! Every rule is plain data: a theme fires when any of its substring
//! triggers occurs in the normalized text, and conditional rules add
//! finer content-type tags on top of a matched theme.

use std::collections::BTreeSet;

use mediapick_core::{ContentType, Theme};

/// Theme → substring triggers. Shared by filename extraction and message analysis.
pub const THEME_TRIGGERS: &[(Theme, &[&str])] = &[
    (
        Theme::Greeting,
        &[
            "здравствуй", "привет", "добрый", "доброе", "доброго", "доброй", "спокойной",
            "хай", "пока", "hello", "hey", "good morning", "good night", "goodbye", "bye",
        ],
    ),
    (
        Theme::Wellbeing,
        &[
            "как", "самочувствие", "настроение", "дела", "жизнь", "поживаешь", "хорошо",
            "отлично", "нормально", "плохо", "так себе", "прекрасно", "замечательно",
            "в порядке", "неплохо", "how are you", "doing great", "doing fine", "feeling",
        ],
    ),
    (
        Theme::AboutSelf,
        &[
            "о себе", "расскажи", "работаешь", "кем", "about me", "about yourself",
            "yourself", "i work",
        ],
    ),
    (
        Theme::Food,
        &[
            "еда", "готовк", "кухн", "рецепт", "суп", "борщ", "стол", "food", "cook",
            "recipe", "dinner",
        ],
    ),
    (
        Theme::Travel,
        &[
            "путешеств", "поездк", "отпуск", "турци", "итали", "франци", "дубай", "питер",
            "travel", "trip", "vacation",
        ],
    ),
    (
        Theme::Pets,
        &["кошк", "собак", "животн", "кот", "пес", "kitten", "puppy", "dog"],
    ),
    (
        Theme::Work,
        &["работ", "офис", "документ", "папк", "компьютер", "office", "job"],
    ),
    (Theme::Gratitude, &["спасибо", "благодар", "спс", "thank"]),
    (Theme::Apology, &["извин", "прости", "сорри", "sorry"]),
    (
        Theme::Emotion,
        &["грустн", "рад", "счастлив", "обижен", "happy", "sad"],
    ),
];

/// Words that mark text as interrogative.
pub const INTERROGATIVE_TRIGGERS: &[&str] = &[
    "как", "что", "где", "когда", "почему", "зачем", "кто", "чей", "расскажи", "how",
    "what", "where", "when", "why", "who", "tell me",
];

/// A content-type tag conditioned on a matched theme and co-occurring words.
#[derive(Debug, Clone, Copy)]
pub struct ContentRule {
    /// The theme that must already be present.
    pub theme: Theme,
    /// Every trigger here must occur.
    pub all_of: &'static [&'static str],
    /// At least one trigger here must occur; empty means no extra condition.
    pub any_of: &'static [&'static str],
    /// Tag added when the conditions hold.
    pub tag: ContentType,
    /// Tag added when the theme matched but the conditions did not.
    pub otherwise: Option<ContentType>,
    /// Skip the rule when an earlier rule already added this tag.
    pub unless: Option<ContentType>,
}

impl ContentRule {
    const fn new(theme: Theme, any_of: &'static [&'static str], tag: ContentType) -> Self {
        Self {
            theme,
            all_of: &[],
            any_of,
            tag,
            otherwise: None,
            unless: None,
        }
    }

    fn holds(&self, text: &str) -> bool {
        self.all_of.iter().all(|t| text.contains(t))
            && (self.any_of.is_empty() || self.any_of.iter().any(|t| text.contains(t)))
    }
}

/// Secondary rule set, evaluated in order after themes are known.
pub const CONTENT_RULES: &[ContentRule] = &[
    ContentRule {
        theme: Theme::Greeting,
        all_of: &[],
        any_of: &[
            "здравствуй", "привет", "добрый", "доброе", "хай", "hello", "hey", "good morning",
        ],
        tag: ContentType::GreetingStart,
        otherwise: Some(ContentType::Farewell),
        unless: None,
    },
    ContentRule {
        theme: Theme::Wellbeing,
        all_of: &["как"],
        any_of: &["дела", "самочувствие", "настроение", "жизнь", "поживаешь"],
        tag: ContentType::WellbeingQuestion,
        otherwise: None,
        unless: None,
    },
    ContentRule::new(Theme::Wellbeing, &["how are you"], ContentType::WellbeingQuestion),
    ContentRule::new(
        Theme::Wellbeing,
        &[
            "хорошо", "отлично", "нормально", "плохо", "так себе", "прекрасно", "замечательно",
            "в порядке", "неплохо", "doing great", "doing fine",
        ],
        ContentType::WellbeingResponse,
    ),
    ContentRule {
        theme: Theme::AboutSelf,
        all_of: &[],
        any_of: &["расскажи", "tell me", "about yourself"],
        tag: ContentType::AboutSelfQuestion,
        otherwise: Some(ContentType::AboutSelfStatement),
        unless: None,
    },
    ContentRule::new(
        Theme::Food,
        &["люблю", "готов", "ем", "ела", "love", "cooking"],
        ContentType::FoodHobby,
    ),
    ContentRule {
        theme: Theme::Food,
        all_of: &[],
        any_of: &["рецепт", "как готов", "recipe"],
        tag: ContentType::FoodRecipe,
        otherwise: None,
        unless: Some(ContentType::FoodHobby),
    },
    ContentRule::new(
        Theme::Travel,
        &["был", "езди", "летал", "видел", "went", "visited"],
        ContentType::TravelStory,
    ),
    ContentRule::new(Theme::Pets, &["моя", "мой", "наш", "my "], ContentType::PetsOwnership),
    ContentRule::new(
        Theme::Work,
        &["работа", "офис", "компания", "office", "company"],
        ContentType::WorkEnvironment,
    ),
    ContentRule::new(Theme::Gratitude, &[], ContentType::Gratitude),
    ContentRule::new(Theme::Apology, &[], ContentType::Apology),
    ContentRule::new(Theme::Emotion, &[], ContentType::EmotionExpression),
];

/// Themes whose triggers occur in already-lowercased text.
pub fn match_themes(text: &str) -> BTreeSet<Theme> {
    THEME_TRIGGERS
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|t| text.contains(t)))
        .map(|(theme, _)| *theme)
        .collect()
}

/// Whether lowercased text reads as a question.
pub fn is_interrogative(text: &str) -> bool {
    text.trim_end().ends_with('?') || INTERROGATIVE_TRIGGERS.iter().any(|w| text.contains(w))
}

/// Content types for lowercased text whose themes are already known.
///
/// `question` or `statement` is always present.
pub fn infer_content_types(text: &str, themes: &BTreeSet<Theme>) -> BTreeSet<ContentType> {
    let mut types = BTreeSet::new();
    types.insert(if is_interrogative(text) {
        ContentType::Question
    } else {
        ContentType::Statement
    });

    for rule in CONTENT_RULES.iter().filter(|r| themes.contains(&r.theme)) {
        if rule.unless.is_some_and(|tag| types.contains(&tag)) {
            continue;
        }
        if rule.holds(text) {
            types.insert(rule.tag);
        } else if let Some(other) = rule.otherwise {
            types.insert(other);
        }
    }

    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_theme_has_triggers() {
        for (theme, triggers) in THEME_TRIGGERS {
            assert!(!triggers.is_empty(), "{theme} has no triggers");
            for t in *triggers {
                assert_eq!(*t, t.to_lowercase(), "trigger {t} must be lowercase");
            }
        }
    }

    #[test]
    fn test_every_rule_theme_is_in_table() {
        for rule in CONTENT_RULES {
            assert!(THEME_TRIGGERS.iter().any(|(t, _)| *t == rule.theme));
        }
    }

    #[test]
    fn test_greeting_start_vs_farewell() {
        let start = match_themes("привет солнышко");
        assert!(infer_content_types("привет солнышко", &start).contains(&ContentType::GreetingStart));

        let text = "спокойной ночи";
        let themes = match_themes(text);
        assert!(themes.contains(&Theme::Greeting));
        let types = infer_content_types(text, &themes);
        assert!(types.contains(&ContentType::Farewell));
        assert!(!types.contains(&ContentType::GreetingStart));
    }

    #[test]
    fn test_wellbeing_question_needs_both_words() {
        let text = "как дела";
        let types = infer_content_types(text, &match_themes(text));
        assert!(types.contains(&ContentType::WellbeingQuestion));
        assert!(types.contains(&ContentType::Question));

        let text = "у меня все хорошо";
        let types = infer_content_types(text, &match_themes(text));
        assert!(!types.contains(&ContentType::WellbeingQuestion));
        assert!(types.contains(&ContentType::WellbeingResponse));
        assert!(types.contains(&ContentType::Statement));
    }

    #[test]
    fn test_food_mention_without_verb_adds_no_tag() {
        let text = "борщ";
        let themes = match_themes(text);
        assert!(themes.contains(&Theme::Food));
        let types = infer_content_types(text, &themes);
        assert!(!types.contains(&ContentType::FoodHobby));
        assert!(!types.contains(&ContentType::FoodRecipe));

        let text = "люблю борщ";
        let types = infer_content_types(text, &match_themes(text));
        assert!(types.contains(&ContentType::FoodHobby));
    }

    #[test]
    fn test_food_hobby_excludes_recipe() {
        let text = "как готовить рецепт";
        let types = infer_content_types(text, &match_themes(text));
        assert!(types.contains(&ContentType::FoodHobby));
        assert!(!types.contains(&ContentType::FoodRecipe));

        let text = "рецепт борща";
        let types = infer_content_types(text, &match_themes(text));
        assert!(types.contains(&ContentType::FoodRecipe));
        assert!(!types.contains(&ContentType::FoodHobby));
    }

    #[test]
    fn test_unconditional_tags() {
        let text = "спасибо большое";
        let types = infer_content_types(text, &match_themes(text));
        assert!(types.contains(&ContentType::Gratitude));

        let text = "прости меня";
        let types = infer_content_types(text, &match_themes(text));
        assert!(types.contains(&ContentType::Apology));
    }

    #[test]
    fn test_trailing_question_mark() {
        assert!(is_interrogative("ну и?"));
        assert!(!is_interrogative("ну и ладно"));
    }
}
