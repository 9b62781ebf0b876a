//! Slug and filename sanitization.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fallback used when a filename sanitizes down to nothing.
pub const UNTITLED: &str = "untitled";

// Characters rejected by at least one common filesystem.
static FORBIDDEN_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[<>:"/\\|?*\x00-\x1F\x7F]"#).unwrap()
});

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static HYPHEN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

static SLUG_SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_-]+").unwrap());

/// Generate a URL-safe slug from a note title.
///
/// - Decompose accented characters and drop the combining marks
/// - Lowercase
/// - Strip everything except word characters, whitespace and hyphens
/// - Collapse whitespace, underscore and hyphen runs into a single hyphen
/// - Trim hyphens from both ends
pub fn slugify(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();

    SLUG_SEPARATOR_RUN
        .replace_all(&stripped, "-")
        .trim_matches('-')
        .to_string()
}

/// Make a name safe to use as a file name on common filesystems.
///
/// Whitespace runs become a hyphen, forbidden and control characters are
/// dropped, repeated hyphens collapse. Returns [`UNTITLED`] when nothing is left.
pub fn sanitize_filename(name: &str) -> String {
    let hyphenated = WHITESPACE_RUN.replace_all(name.trim(), "-");
    let stripped = FORBIDDEN_FILENAME_CHARS.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUN.replace_all(&stripped, "-");
    let trimmed = collapsed.trim_matches('-');

    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("My Note"), "my-note");
    }

    #[test]
    fn test_slugify_diacritics_and_punctuation() {
        assert_eq!(slugify("Héllo, World!"), "hello-world");
        assert_eq!(slugify("Crème brûlée"), "creme-brulee");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  a--b  "), "a-b");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
        assert_eq!(slugify("- leading and trailing -"), "leading-and-trailing");
    }

    #[test]
    fn test_slugify_keeps_non_latin_letters() {
        assert_eq!(slugify("日本語 メモ"), "日本語-メモ");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_sanitize_filename_forbidden() {
        assert_eq!(sanitize_filename("a:b/c*d"), "abcd");
        assert_eq!(sanitize_filename(r#"what?"<now>|"#), "whatnow");
    }

    #[test]
    fn test_sanitize_filename_whitespace() {
        assert_eq!(sanitize_filename("My Image  File.png"), "My-Image-File.png");
        assert_eq!(sanitize_filename("a - b"), "a-b");
        assert_eq!(sanitize_filename("tab\there"), "tab-here");
    }

    #[test]
    fn test_sanitize_filename_fallback() {
        assert_eq!(sanitize_filename(""), UNTITLED);
        assert_eq!(sanitize_filename("///"), UNTITLED);
        assert_eq!(sanitize_filename(" - "), UNTITLED);
    }
}
