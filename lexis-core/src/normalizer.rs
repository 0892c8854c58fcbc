//! Text normalization.
//!
//! Markup is stripped, text is lowercased, and everything that is not a
//! letter, digit, or whitespace is removed. All classes are Unicode-aware, so
//! non-Latin scripts survive intact. Combining marks are kept with their base
//! letters; dropping them would split words in scripts such as Devanagari.

use std::sync::LazyLock;

use regex::Regex;

static MARKUP_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static DISALLOWED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}\s]+").unwrap());
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}[\p{L}\p{M}]*").unwrap());

/// Lowercased text containing only letters, digits, and whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Whitespace-delimited tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    /// Number of letter sequences. Digits do not count as words.
    pub fn word_count(&self) -> usize {
        WORD_PATTERN.find_iter(&self.0).count()
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Remove markup and lowercase, keeping punctuation.
pub fn strip_markup(raw: &str) -> String {
    // Tags become spaces so "good<br>bad" stays two words.
    MARKUP_PATTERN.replace_all(raw, " ").to_lowercase()
}

/// Normalize raw, possibly marked-up, text.
pub fn normalize(raw: &str) -> NormalizedText {
    NormalizedText(DISALLOWED_PATTERN.replace_all(&strip_markup(raw), "").into_owned())
}

/// Normalize a lexicon term to the form it is matched in: normalized and
/// with internal whitespace collapsed to single spaces.
pub fn normalize_term(term: &str) -> String {
    normalize(term).tokens().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_markup_and_punctuation() {
        let text = normalize("<p>Great <b>product</b>!!! Would buy again.</p>");
        assert_eq!(text.tokens().collect::<Vec<_>>(), ["great", "product", "would", "buy", "again"]);
    }

    #[test]
    fn tags_do_not_fuse_words() {
        let text = normalize("good<br/>bad");
        assert_eq!(text.tokens().collect::<Vec<_>>(), ["good", "bad"]);
    }

    #[test]
    fn strip_markup_keeps_punctuation_outside_tags() {
        let visible = strip_markup(r#"<a href="/p?id=1">Good</a> really?"#);
        assert_eq!(visible.trim(), "good  really?");
        assert_eq!(visible.matches('?').count(), 1);
    }

    #[test]
    fn apostrophes_are_removed_not_split() {
        assert_eq!(normalize("Don't").as_str(), "dont");
    }

    #[test]
    fn keeps_non_latin_scripts() {
        let text = normalize("Отличный ТОВАР, спасибо!");
        assert_eq!(text.as_str(), "отличный товар спасибо");
        assert_eq!(text.word_count(), 3);

        let persian = normalize("این محصول عالی است؟");
        assert_eq!(persian.word_count(), 4);
        assert!(!persian.as_str().contains('؟'));
    }

    #[test]
    fn word_count_ignores_digits() {
        let text = normalize("Paid $45,000 for 2 phones");
        assert_eq!(text.tokens().count(), 5);
        assert_eq!(text.word_count(), 3);
    }

    #[test]
    fn blank_input() {
        assert!(normalize("").is_blank());
        assert!(normalize("   \n\t").is_blank());
        assert!(normalize("<div></div> ?!").is_blank());
        assert_eq!(normalize("").word_count(), 0);
    }

    #[test]
    fn term_normalization_collapses_whitespace() {
        assert_eq!(normalize_term("  Waste   of TIME "), "waste of time");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in "[a-zA-Z0-9 <>/!?.,'\u{0410}-\u{044F}]{0,64}") {
            let once = normalize(&raw);
            let twice = normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn output_has_only_allowed_characters(raw in "[a-zA-Z0-9 <>/!?.,'\u{0410}-\u{044F}]{0,64}") {
            let text = normalize(&raw);
            prop_assert!(text
                .as_str()
                .chars()
                .all(|c| c.is_alphanumeric() || c.is_whitespace()));
        }
    }
}
