//! Product matching and ranking.
//!
//! Scores every catalog record against a message using three signals, in
//! priority order: an exact product-ID mention, verbatim title/variation
//! substrings, and distinct keyword overlap. A separate title-only search
//! with tiered scoring backs explicit "i want a ..." requests. All scores
//! are integers; thresholds gate acceptance so weak overlap never surfaces
//! a product.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::keywords;
use crate::catalog::Catalog;
use crate::models::ProductRecord;

/// Score assigned to an exact product-ID hit; outranks any field scoring.
pub const ID_MATCH_SCORE: i64 = 1000;

/// The record's full title appears verbatim in the message.
const TITLE_MATCH_SCORE: i64 = 100;

/// The record's full variation appears verbatim in the message.
const VARIATION_MATCH_SCORE: i64 = 50;

/// Per distinct word shared between message and record fields.
const KEYWORD_OVERLAP_SCORE: i64 = 10;

/// Minimum score for the general search to accept a record. Two shared
/// keywords alone are enough; one is not.
pub const GENERAL_SCORE_FLOOR: i64 = 20;

/// Minimum score for the title-only search. Deliberately higher than the
/// general floor; the two are not unified.
pub const TITLE_SCORE_FLOOR: i64 = 100;

// Title-only tier bases, weighted down by matched-length ratio.
const EXACT_TITLE_BASE: i64 = 800;
const PREFIX_TITLE_BASE: i64 = 500;
const WORD_TITLE_BASE: i64 = 400;
const SUBSTRING_TITLE_BASE: i64 = 200;

/// A product-ID mention is a standalone run of 4+ digits.
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4,})\b").expect("Invalid regex: product id pattern"));

/// Whether the text mentions anything shaped like a product ID.
pub fn mentions_product_id(text: &str) -> bool {
    ID_RE.is_match(text)
}

/// The first product-ID-shaped token, parsed.
fn extract_id(lower: &str) -> Option<i64> {
    ID_RE
        .captures(lower)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Find the best-matching record for a free-text message.
///
/// An ID hit returns immediately with [`ID_MATCH_SCORE`]; otherwise every
/// record is field-scored and the maximum wins, with first-seen order
/// breaking ties. Returns `None` when nothing reaches
/// [`GENERAL_SCORE_FLOOR`].
pub fn match_product<'a>(
    catalog: &'a Catalog,
    message: &str,
) -> Option<(&'a ProductRecord, i64)> {
    let lower = message.to_lowercase();

    if let Some(id) = extract_id(&lower) {
        if let Some(record) = catalog.by_id(id) {
            debug!("id match: {} -> '{}'", id, record.title);
            return Some((record, ID_MATCH_SCORE));
        }
    }

    let message_words = keywords::token_set(&lower);
    let mut best: Option<(&ProductRecord, i64)> = None;
    for record in catalog.all() {
        let score = field_score(record, &lower, &message_words);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((record, score));
        }
    }

    match best {
        Some((record, score)) if score >= GENERAL_SCORE_FLOOR => {
            debug!("best match: '{}' (score {})", record.title, score);
            Some((record, score))
        }
        _ => None,
    }
}

/// Score one record against the lowercased message and its token set.
fn field_score(
    record: &ProductRecord,
    lower: &str,
    message_words: &std::collections::HashSet<String>,
) -> i64 {
    let mut score = 0;

    let title_lower = record.title.to_lowercase();
    if !title_lower.is_empty() && lower.contains(&title_lower) {
        score += TITLE_MATCH_SCORE;
    }
    if let Some(variation) = record.variation.as_deref() {
        let variation_lower = variation.to_lowercase();
        if !variation_lower.is_empty() && lower.contains(&variation_lower) {
            score += VARIATION_MATCH_SCORE;
        }
    }

    let mut product_words = keywords::token_set(&record.title);
    if let Some(description) = record.description.as_deref() {
        product_words.extend(keywords::tokenize(description));
    }
    if let Some(variation) = record.variation.as_deref() {
        product_words.extend(keywords::tokenize(variation));
    }
    let overlap = product_words
        .iter()
        .filter(|w| message_words.contains(*w))
        .count() as i64;
    score += overlap * KEYWORD_OVERLAP_SCORE;

    score
}

/// Title-only best match for an explicitly requested product name.
///
/// Tiered: exact equality, then starts-with, then whole-word containment,
/// then plain substring. Each tier's base is scaled by the ratio of the
/// phrase length to the title length, so tighter matches score higher
/// within a tier. Returns `None` below [`TITLE_SCORE_FLOOR`].
pub fn match_title<'a>(
    catalog: &'a Catalog,
    phrase: &str,
) -> Option<(&'a ProductRecord, i64)> {
    let phrase = phrase.trim().to_lowercase();
    if phrase.is_empty() {
        return None;
    }

    let mut best: Option<(&ProductRecord, i64)> = None;
    for record in catalog.all() {
        let score = title_tier_score(&record.title, &phrase);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((record, score));
        }
    }

    best.filter(|&(_, score)| score >= TITLE_SCORE_FLOOR)
}

fn title_tier_score(title: &str, phrase: &str) -> i64 {
    let title = title.to_lowercase();
    if title.is_empty() {
        return 0;
    }

    let base = if title == *phrase {
        EXACT_TITLE_BASE
    } else if title.starts_with(phrase) {
        PREFIX_TITLE_BASE
    } else if contains_whole_word(&title, phrase) {
        WORD_TITLE_BASE
    } else if title.contains(phrase) {
        SUBSTRING_TITLE_BASE
    } else {
        return 0;
    };

    base * phrase.len() as i64 / title.len() as i64
}

/// Whether `phrase` occurs in `title` on word boundaries.
fn contains_whole_word(title: &str, phrase: &str) -> bool {
    format!(" {} ", title).contains(&format!(" {} ", phrase))
}
