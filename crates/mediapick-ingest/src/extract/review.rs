//! Filename review: guess emotion, theme and discourse type of a file and
//! propose a normalized name `<emotion>_<theme>_<type>_<description>`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::keywords::strip_media_extensions;

/// Maximum length, in characters, of the description part of a suggested name.
pub const MAX_DESCRIPTION_CHARS: usize = 30;

/// Confidence points per matching theme pattern.
const CONFIDENCE_PER_MATCH: u32 = 20;

/// Reviews below this confidence are flagged.
const LOW_CONFIDENCE: u8 = 30;

const QUESTION_PATTERNS: &[&str] = &[
    r"как.*\?", r"что.*\?", r"где.*\?", r"когда.*\?", r"почему.*\?", r"расскажи",
    r"ты.*\?", r"вы.*\?", r"кем.*\?", r"чем.*\?",
];

const THEME_PATTERNS: &[(&str, &[&str])] = &[
    ("questions", QUESTION_PATTERNS),
    (
        "greetings",
        &[r"здравствуй", r"привет", r"добрый", r"доброе", r"доброго", r"доброй", r"хай", r"hello"],
    ),
    (
        "wellbeing",
        &[
            r"как.*дела", r"как.*самочувствие", r"как.*настроение", r"как.*жизнь",
            r"как.*поживаешь", r"хорошо", r"отлично", r"замечательно", r"прекрасно",
            r"нормально", r"плохо", r"так себе",
        ],
    ),
    ("gratitude", &[r"спасибо", r"благодар", r"спс", r"thank"]),
    (
        "food",
        &[r"еда", r"готов", r"кухн", r"рецепт", r"суп", r"борщ", r"паста", r"пицца", r"салат", r"мясо", r"рыба"],
    ),
    (
        "travel",
        &[r"путешеств", r"поездк", r"отпуск", r"турция", r"италия", r"франция", r"дубай", r"питер", r"море", r"пляж", r"отель"],
    ),
    ("work", &[r"работ", r"офис", r"компьютер", r"документ", r"папк"]),
    ("pets", &[r"кошк", r"собак", r"кот", r"пес", r"животн"]),
    ("stories", &[r"рассказ", r"история", r"был", r"езди", r"летал", r"видел"]),
];

const EMOTIONS: &[(&str, &[&str])] = &[
    ("happy", &["хорошо", "отлично", "замечательно", "прекрасно", "супер"]),
    ("sad", &["плохо", "устал", "грустн", "проблем"]),
    ("grateful", &["спасибо", "благодар", "мил", "хорош"]),
    ("excited", &["взволнован", "возбужден", "класс", "круто"]),
];

static QUESTION_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| compile(QUESTION_PATTERNS));

static THEME_REGEXES: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    THEME_PATTERNS
        .iter()
        .map(|(theme, patterns)| (*theme, compile(patterns)))
        .collect()
});

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

/// Review of a single filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameReview {
    pub original_name: String,
    pub detected_emotion: String,
    pub detected_theme: String,
    pub detected_type: String,
    /// 0–100.
    pub confidence: u8,
    pub issues: Vec<String>,
    /// Proposed name without extension.
    pub suggested_name: String,
}

/// Review a filename (with or without extension).
pub fn review_filename(filename: &str) -> FilenameReview {
    let name_lower = filename.to_lowercase();

    let is_question = QUESTION_REGEXES.iter().any(|re| re.is_match(&name_lower));
    let contains_any = |words: &[&str]| words.iter().any(|w| name_lower.contains(w));

    let detected_type = if is_question {
        "question"
    } else if contains_any(&["хорошо", "отлично", "замечательно", "прекрасно"]) {
        "answer"
    } else if contains_any(&["спасибо", "благодар"]) {
        "gratitude"
    } else {
        "statement"
    };

    // First theme with the strictly highest pattern count wins.
    let mut best: Option<(&str, u32)> = None;
    for (theme, regexes) in THEME_REGEXES.iter() {
        let score = regexes.iter().filter(|re| re.is_match(&name_lower)).count() as u32;
        if score > best.map(|(_, s)| s).unwrap_or(0) {
            best = Some((theme, score));
        }
    }
    let (detected_theme, confidence) = match best {
        Some((theme, score)) => (theme, (score * CONFIDENCE_PER_MATCH).min(100) as u8),
        None => ("unknown", 0),
    };

    let detected_emotion = EMOTIONS
        .iter()
        .find(|(_, words)| contains_any(words))
        .map(|(emotion, _)| *emotion)
        .unwrap_or("neutral");

    let mut issues = Vec::new();
    if detected_theme == "unknown" {
        issues.push("could not determine theme".to_string());
    }
    if confidence < LOW_CONFIDENCE {
        issues.push(format!("low confidence ({}%)", confidence));
    }

    let suggested_name = suggest_name(filename, detected_emotion, detected_theme, detected_type);

    FilenameReview {
        original_name: filename.to_string(),
        detected_emotion: detected_emotion.to_string(),
        detected_theme: detected_theme.to_string(),
        detected_type: detected_type.to_string(),
        confidence,
        issues,
        suggested_name,
    }
}

/// Build `<emotion>_<theme>_<type>[_<description>]` from a filename.
pub fn suggest_name(filename: &str, emotion: &str, theme: &str, content_type: &str) -> String {
    let base = format!("{}_{}_{}", emotion, theme, content_type);

    let original = strip_media_extensions(filename);
    let cleaned = UNSAFE_CHARS.replace_all(original, "");
    let cleaned = WHITESPACE.replace_all(cleaned.trim(), "_");
    let description: String = cleaned.chars().take(MAX_DESCRIPTION_CHARS).collect();

    if description.is_empty() {
        base
    } else {
        format!("{}_{}", base, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_wellbeing_answer() {
        let review = review_filename("отлично, всё хорошо.ogg");
        assert_eq!(review.detected_type, "answer");
        assert_eq!(review.detected_emotion, "happy");
        assert_eq!(review.detected_theme, "wellbeing");
        assert_eq!(review.confidence, 40);
        assert!(review.issues.is_empty());
        assert_eq!(
            review.suggested_name,
            "happy_wellbeing_answer_отлично_всё_хорошо"
        );
    }

    #[test]
    fn test_review_question() {
        let review = review_filename("как дела?.ogg");
        assert_eq!(review.detected_type, "question");
        // "questions" and "wellbeing" both score 1; the earlier one wins
        assert_eq!(review.detected_theme, "questions");
    }

    #[test]
    fn test_review_unknown_flags_issues() {
        let review = review_filename("IMG_0042.jpg");
        assert_eq!(review.detected_theme, "unknown");
        assert_eq!(review.confidence, 0);
        assert_eq!(review.issues.len(), 2);
        assert_eq!(review.suggested_name, "neutral_unknown_statement_IMG_0042");
    }

    #[test]
    fn test_suggested_description_is_truncated() {
        let long = format!("{}.mp4", "а".repeat(50));
        let name = suggest_name(&long, "neutral", "unknown", "statement");
        let description = name.trim_start_matches("neutral_unknown_statement_");
        assert_eq!(description.chars().count(), MAX_DESCRIPTION_CHARS);
    }
}
