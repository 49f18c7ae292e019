//! # Text Normalization
//!
//! File: cli/src/responder/normalize.rs
//! Author: NSAKCET Development Team
//!
//! Turns raw user text and catalog patterns into a canonical form that the
//! matcher compares: lowercase alphanumeric words separated by single spaces.
//! `normalize` is idempotent, so catalog patterns and queries can be pushed
//! through it without tracking whether they were already normalized.
//!
use std::collections::BTreeSet;

/// Words that carry no topic on their own ("what is the ..."). They are
/// ignored when comparing token sets, unless a phrase consists only of them.
const STOP_WORDS: &[&str] = &[
    "a", "about", "am", "an", "and", "any", "are", "at", "be", "by", "can", "could", "did",
    "do", "does", "for", "from", "get", "had", "has", "have", "how", "i", "in", "is", "it",
    "its", "me", "my", "of", "on", "or", "please", "should", "so", "some", "tell", "that",
    "the", "there", "this", "to", "us", "was", "we", "were", "what", "when", "where",
    "which", "who", "why", "will", "with", "would", "you", "your",
];

/// # Normalize Text (`normalize`)
///
/// Lowercases the input, drops apostrophes (so "what's" becomes "whats"),
/// turns every other non-alphanumeric character into a separator, collapses
/// runs of whitespace and trims the ends.
///
/// `normalize(&normalize(s)) == normalize(s)` for every `s`.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| !matches!(c, '\'' | '\u{2019}'))
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduces simple English plurals so "fees" meets "fee" and "facilities"
/// meets "facility". Words of three letters or fewer are left alone.
pub fn stem(word: &str) -> String {
    let len = word.chars().count();
    if len > 4 && word.ends_with("ies") {
        format!("{}y", &word[..word.len() - 3])
    } else if len > 3 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// # Content Tokens (`content_tokens`)
///
/// Splits already-normalized text into words, removes stop words and stems
/// what is left. When nothing but stop words remain, every stemmed word is
/// kept instead, so phrases like "how are you" still have something to match on.
pub fn content_tokens(normalized: &str) -> BTreeSet<String> {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    let content: BTreeSet<String> = words
        .iter()
        .filter(|word| !STOP_WORDS.contains(*word))
        .map(|word| stem(word))
        .collect();

    if content.is_empty() {
        words.into_iter().map(stem).collect()
    } else {
        content
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  Hello, World!  "), "hello world");
        assert_eq!(normalize("What's the FEE?"), "whats the fee");
        assert_eq!(normalize("B.Tech"), "b tech");
        assert_eq!(normalize("CSE (AI & ML)"), "cse ai ml");
    }

    #[test]
    fn test_normalize_empty_and_whitespace() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n "), "");
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "Hello",
            "  What is the   affiliation?? ",
            "How much does B.Tech cost?",
            "₹75,000 per year",
            "İstanbul ÇAĞRI",
            "tab\tseparated\nlines",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_stem() {
        assert_eq!(stem("fees"), "fee");
        assert_eq!(stem("facilities"), "facility");
        assert_eq!(stem("programs"), "program");
        assert_eq!(stem("process"), "process");
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("bus"), "bus");
    }

    #[test]
    fn test_content_tokens_drop_stop_words() {
        let tokens = content_tokens("what are the fees");
        assert_eq!(tokens.into_iter().collect::<Vec<_>>(), vec!["fee"]);
    }

    #[test]
    fn test_content_tokens_keep_all_when_only_stop_words() {
        let tokens = content_tokens("how are you");
        assert_eq!(tokens.len(), 3);
        assert!(tokens.contains("how"));
    }
}
