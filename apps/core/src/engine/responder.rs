//! Response orchestrator.
//!
//! Wires the classifier, matcher, related-product finder, and renderer into
//! the single entry point the host calls per message. Holds no per-call
//! state: every call takes one catalog snapshot and works on it alone, so
//! concurrent callers never observe a half-swapped catalog.

use tracing::debug;

use super::intent::{self, IntentDecision};
use super::matcher;
use super::related;
use super::response::RenderedResponse;
use crate::catalog::{Catalog, CatalogHandle};
use crate::models::{MatchResult, ProductRecord};

/// Related items attached to a product card unless the host overrides it.
pub const DEFAULT_RELATED_LIMIT: usize = 4;

const EMPTY_MESSAGE_REPLY: &str = "Please enter a message.";

const NO_PRODUCT_DATA_REPLY: &str =
    "I'm sorry, I don't have product information available at the moment.";

const NO_CATEGORIES_REPLY: &str =
    "I don't have categories defined, but I can tell you about specific products if you ask.";

const FALLBACK_REPLY: &str = "I'm sorry, I couldn't find information about that product or \
                              category. Can you please specify what you are looking for?";

const CLARIFICATION_REPLY: &str = "Could you be a bit more specific about the product you're \
                                   looking for? A name or product ID helps.";

fn no_direct_match_reply(name: &str) -> String {
    format!(
        "I couldn't find a direct match for '{}'. Could you try a different product name, \
         or give me a product ID?",
        name
    )
}

/// The response engine: catalog handle plus tuning, shareable across
/// request-handling threads.
#[derive(Debug, Clone)]
pub struct ResponseEngine {
    catalog: CatalogHandle,
    related_limit: usize,
}

impl ResponseEngine {
    pub fn new(catalog: CatalogHandle) -> Self {
        Self {
            catalog,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }

    pub fn with_related_limit(mut self, related_limit: usize) -> Self {
        self.related_limit = related_limit;
        self
    }

    /// Classify a message and produce the finished response.
    ///
    /// The single public operation of the core. Pure with respect to the
    /// catalog snapshot: the same message against an unchanged catalog
    /// always yields the same response.
    pub fn classify_and_respond(&self, message: &str) -> RenderedResponse {
        let snapshot = self.catalog.snapshot();
        respond(&snapshot, message, self.related_limit)
    }
}

/// Classification and response against an explicit catalog reference.
pub fn respond(catalog: &Catalog, message: &str, related_limit: usize) -> RenderedResponse {
    if message.trim().is_empty() {
        return RenderedResponse::text(EMPTY_MESSAGE_REPLY);
    }

    let decision = intent::classify(message);
    debug!("message classified as {}", decision);

    if let Some(reply) = decision.fixed_reply() {
        return RenderedResponse::text(reply);
    }

    match decision {
        IntentDecision::ListProducts => list_products_reply(catalog),
        IntentDecision::ProductRequest(name) => product_request_reply(catalog, &name, related_limit),
        // Unclassified: full catalog search, then category scan, then the
        // fixed fallback.
        _ => {
            if let Some((record, score)) = matcher::match_product(catalog, message) {
                return card_with_related(catalog, record, score, related_limit);
            }
            if let Some(listing) = category_scan(catalog, message) {
                return listing;
            }
            RenderedResponse::text(FALLBACK_REPLY)
        }
    }
}

fn list_products_reply(catalog: &Catalog) -> RenderedResponse {
    if catalog.is_empty() {
        return RenderedResponse::text(NO_PRODUCT_DATA_REPLY);
    }
    let categories = catalog.categories();
    if categories.is_empty() {
        return RenderedResponse::text(NO_CATEGORIES_REPLY);
    }
    RenderedResponse::text(format!(
        "We sell a variety of products, including items in categories like: {}. \
         What are you interested in?",
        categories.join(", ")
    ))
}

fn product_request_reply(catalog: &Catalog, name: &str, related_limit: usize) -> RenderedResponse {
    if name.is_empty() || intent::is_generic_noun(name) {
        return RenderedResponse::text(CLARIFICATION_REPLY);
    }
    match matcher::match_title(catalog, name) {
        Some((record, score)) => card_with_related(catalog, record, score, related_limit),
        None => RenderedResponse::text(no_direct_match_reply(name)),
    }
}

fn card_with_related(
    catalog: &Catalog,
    record: &ProductRecord,
    score: i64,
    related_limit: usize,
) -> RenderedResponse {
    let result = MatchResult {
        product: record,
        score,
        related: related::related_products(record, catalog, related_limit),
    };
    RenderedResponse::product_card(&result)
}

/// First category whose name appears in the message yields its listing.
fn category_scan(catalog: &Catalog, message: &str) -> Option<RenderedResponse> {
    let lower = message.to_lowercase();
    for category in catalog.categories() {
        if lower.contains(&category.to_lowercase()) {
            let key = category.to_lowercase();
            let members = catalog
                .all()
                .iter()
                .filter(|r| r.category_key().as_deref() == Some(key.as_str()));
            return Some(RenderedResponse::category_list(category, members));
        }
    }
    None
}
