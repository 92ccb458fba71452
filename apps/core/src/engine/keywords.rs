//! Keyword extraction.
//!
//! Tokenizes arbitrary text into lowercase alphanumeric words. The same
//! tokenizer runs over user messages and product fields so that overlap
//! scoring compares like with like. Includes stopword filtering for the
//! relatedness ranking.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Common English words that carry no product signal. Tokens this short
/// list covers are ignored when building a product's keyword profile.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "nor", "for", "yet", "so", "i", "you", "he", "she",
    "it", "we", "they", "me", "him", "her", "us", "them", "my", "your", "his", "its", "our",
    "their", "this", "that", "these", "those", "who", "whom", "which", "what", "whose", "is",
    "am", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
    "does", "did", "doing", "will", "would", "shall", "should", "can", "could", "may", "might",
    "must", "in", "on", "at", "to", "from", "by", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "up", "down", "out", "off", "over",
    "under", "again", "further", "here", "there", "where", "when", "why", "how", "all", "each",
    "every", "both", "few", "more", "most", "other", "some", "any", "no", "not", "only", "own",
    "same", "than", "too", "very", "just", "also", "now", "then", "once", "if", "because", "as",
    "until", "while", "of",
];

/// Minimum length for a content keyword; anything shorter is noise.
const MIN_KEYWORD_LEN: usize = 3;

// Compiled once at first use; the pattern is a compile-time constant.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("Invalid regex: word token pattern"));

/// Lowercase word tokens of `text`, in order of appearance, duplicates kept.
/// Empty input yields an empty vec.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The distinct lowercase word tokens of `text`.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Distinct tokens of `text` minus stopwords and short tokens.
///
/// This stricter form feeds the related-product ranking, where "the" or
/// "5m" overlapping between two records means nothing.
pub fn content_keywords(text: &str) -> HashSet<String> {
    token_set(text)
        .into_iter()
        .filter(|t| t.len() >= MIN_KEYWORD_LEN && !STOPWORDS.contains(&t.as_str()))
        .collect()
}
