//! Filename tokenization.

/// Extensions stripped from names before tokenizing.
pub const KNOWN_EXTENSIONS: &[&str] = &[
    "ogg", "oga", "opus", "mp3", "m4a", "mp4", "mov", "webm", "webp", "png", "jpg", "jpeg",
    "tgs", "txt",
];

/// Strip trailing known media extensions (`a.ogg.txt` → `a`).
pub fn strip_media_extensions(name: &str) -> &str {
    let mut stem = name;
    while let Some((head, ext)) = stem.rsplit_once('.') {
        if head.is_empty() || !KNOWN_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
            break;
        }
        stem = head;
    }
    stem
}

/// Lowercase a name, drop media extensions and turn `_`/`-` into spaces.
pub fn normalize_name(name: &str) -> String {
    strip_media_extensions(name)
        .to_lowercase()
        .replace(['_', '-'], " ")
}

/// Keyword tokens of a filename: tokens longer than two characters, in order.
pub fn extract_keywords(name: &str) -> Vec<String> {
    normalize_name(name)
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect()
}
