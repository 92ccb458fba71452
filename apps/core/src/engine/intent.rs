//! Intent classification over ordered phrase rules.
//!
//! Every incoming message runs down a fixed rule table; the FIRST rule that
//! matches wins and the rest are never consulted. The table order encodes
//! priority: conversational courtesy and the out-of-domain rail must beat
//! catalog search even when a product word is also present, so reordering
//! rules changes behavior. No model inference, pure string matching.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::keywords;
use super::matcher;

/// The classified purpose of a user message.
///
/// Carries just enough payload to drive the next stage; transient, produced
/// fresh for every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentDecision {
    /// Message contains a greeting phrase.
    Greeting,
    /// Message contains a farewell phrase.
    Farewell,
    /// Message matched one of the small-talk mappings.
    SmallTalk(SmallTalkTopic),
    /// Message asks what the catalog offers.
    ListProducts,
    /// Message starts with a request prefix; payload is the requested name,
    /// stripped of trailing punctuation and whitespace.
    ProductRequest(String),
    /// Message looks like an out-of-domain knowledge query.
    GeneralKnowledge,
    /// No rule fired; the caller falls through to full catalog search.
    Unclassified,
}

impl IntentDecision {
    /// The canned reply for decisions that need no catalog access, or
    /// `None` when the response depends on product data.
    pub fn fixed_reply(&self) -> Option<&'static str> {
        match self {
            IntentDecision::Greeting => {
                Some("Hello! How can I assist you with our products today?")
            }
            IntentDecision::Farewell => {
                Some("Goodbye! Feel free to ask if you have more questions later.")
            }
            IntentDecision::SmallTalk(topic) => Some(topic.reply()),
            IntentDecision::GeneralKnowledge => Some(
                "I'm a product assistant, so I can't help with general knowledge \
                 questions. But I'd be happy to tell you about our products!",
            ),
            _ => None,
        }
    }
}

impl fmt::Display for IntentDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentDecision::Greeting => write!(f, "greeting"),
            IntentDecision::Farewell => write!(f, "farewell"),
            IntentDecision::SmallTalk(topic) => write!(f, "small_talk:{:?}", topic),
            IntentDecision::ListProducts => write!(f, "list_products"),
            IntentDecision::ProductRequest(name) => write!(f, "product_request:{}", name),
            IntentDecision::GeneralKnowledge => write!(f, "general_knowledge"),
            IntentDecision::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// Small-talk variants, each mapping to exactly one fixed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmallTalkTopic {
    Thanks,
    HowAreYou,
    Joke,
    Identity,
    Capability,
    Weather,
    News,
    Acknowledgement,
}

impl SmallTalkTopic {
    pub fn reply(&self) -> &'static str {
        match self {
            SmallTalkTopic::Thanks => {
                "You're welcome! Is there anything else I can help you with?"
            }
            SmallTalkTopic::HowAreYou => {
                "I'm doing great, thanks for asking! How can I help you with our products today?"
            }
            SmallTalkTopic::Joke => {
                "Why did the shopper bring a ladder to the store? Because the prices were through the roof!"
            }
            SmallTalkTopic::Identity => {
                "I'm your virtual shopping assistant. I can help you find products, check prices, and suggest similar items."
            }
            SmallTalkTopic::Capability => {
                "I can look up products by name or ID, tell you prices, list our categories, and suggest related items. What would you like to find?"
            }
            SmallTalkTopic::Weather => {
                "I can't check the weather, but I can definitely help you find a great product!"
            }
            SmallTalkTopic::News => {
                "I don't follow the news, but I can tell you what's new in our catalog!"
            }
            SmallTalkTopic::Acknowledgement => {
                "Great! Let me know if there's anything else you need."
            }
        }
    }
}

// --- Phrase tables ---
// Matched as raw substrings of the lowercased message unless noted. The
// greeting set deliberately matches inside longer words ("hit" contains
// "hi"), reproducing the shipped behavior; see the quirk test below.

const GREETING_PHRASES: &[&str] = &["hello", "hi", "hey"];

const FAREWELL_PHRASES: &[&str] = &["bye", "goodbye", "see you"];

const SMALL_TALK_PHRASES: &[(&[&str], SmallTalkTopic)] = &[
    (&["thank you", "thanks"], SmallTalkTopic::Thanks),
    (&["how are you"], SmallTalkTopic::HowAreYou),
    (&["joke"], SmallTalkTopic::Joke),
    (&["who are you", "what are you"], SmallTalkTopic::Identity),
    (&["what can you do", "how can you help"], SmallTalkTopic::Capability),
    (&["weather"], SmallTalkTopic::Weather),
    (&["news"], SmallTalkTopic::News),
];

/// Acknowledgements match as standalone words, not substrings; "ok" as a
/// substring would swallow every message containing "looking".
const ACKNOWLEDGEMENT_WORDS: &[&str] = &["ok", "okay", "great", "cool", "nice", "awesome", "perfect"];

const LIST_PRODUCT_PHRASES: &[&str] = &["what do you sell", "what products", "list products"];

/// Prefixes that announce an explicit product request. Checked against the
/// start of the message only.
const REQUEST_PREFIXES: &[&str] = &[
    "i want a ",
    "i want an ",
    "i need a ",
    "i need an ",
    "i'm looking for a ",
    "im looking for a ",
    "i am looking for a ",
    "find me a ",
    "do you have a ",
];

/// Requested names too generic to search for; the responder asks for
/// clarification instead.
const GENERIC_NOUNS: &[&str] = &["item", "product", "device", "thing", "something", "any"];

/// Phrases that mark a message as a general-knowledge question.
const KNOWLEDGE_PATTERNS: &[&str] = &[
    "what is",
    "who is",
    "where is",
    "when was",
    "when did",
    "why is",
    "why do",
    "how do",
    "how does",
    "tell me about",
    "define",
    "meaning of",
    "capital of",
    "president of",
    "history of",
    "who invented",
    "who wrote",
    "how many people",
    "translate",
];

/// Words that pull a knowledge-shaped question back into the product
/// domain: product nouns, commerce verbs, category words, and descriptive
/// attributes. Without this escape hatch, "what is the price of X" would be
/// refused as out-of-domain.
const PRODUCT_INDICATORS: &[&str] = &[
    "price", "cost", "buy", "purchase", "order", "sell", "cheap", "expensive", "discount",
    "deal", "product", "item", "catalog", "catalogue", "stock", "shipping", "brand", "model",
    "warranty", "brush", "makeup", "shaver", "trimmer", "speaker", "chair", "desk", "lamp",
    "led", "strip", "bluetooth", "headphone", "charger", "beauty", "health", "electronics",
    "furniture", "audio", "smart", "home", "wireless", "portable", "rechargeable", "waterproof",
    "ergonomic",
];

// --- Rule table ---

struct IntentRule {
    name: &'static str,
    check: fn(&str) -> Option<IntentDecision>,
}

/// Evaluation order is the whole contract; do not sort or dedup.
const RULES: &[IntentRule] = &[
    IntentRule { name: "greeting", check: check_greeting },
    IntentRule { name: "farewell", check: check_farewell },
    IntentRule { name: "small_talk", check: check_small_talk },
    IntentRule { name: "list_products", check: check_list_products },
    IntentRule { name: "product_request", check: check_product_request },
    IntentRule { name: "knowledge_gate", check: check_knowledge_gate },
];

/// Classify a message into an [`IntentDecision`].
///
/// Pure and catalog-free: rules inspect only the message text, so each rule
/// can be unit-tested in isolation. Returns `Unclassified` when no rule
/// fires, which sends the caller into full catalog search.
pub fn classify(message: &str) -> IntentDecision {
    let lower = message.to_lowercase();
    for rule in RULES {
        if let Some(decision) = (rule.check)(&lower) {
            tracing::debug!("intent rule '{}' matched: {}", rule.name, decision);
            return decision;
        }
    }
    IntentDecision::Unclassified
}

/// Whether a requested name is too generic to search for.
pub fn is_generic_noun(name: &str) -> bool {
    GENERIC_NOUNS.contains(&name)
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

fn check_greeting(lower: &str) -> Option<IntentDecision> {
    contains_any(lower, GREETING_PHRASES).then_some(IntentDecision::Greeting)
}

fn check_farewell(lower: &str) -> Option<IntentDecision> {
    contains_any(lower, FAREWELL_PHRASES).then_some(IntentDecision::Farewell)
}

fn check_small_talk(lower: &str) -> Option<IntentDecision> {
    for (phrases, topic) in SMALL_TALK_PHRASES {
        if contains_any(lower, phrases) {
            return Some(IntentDecision::SmallTalk(*topic));
        }
    }
    let words = keywords::token_set(lower);
    if ACKNOWLEDGEMENT_WORDS.iter().any(|w| words.contains(*w)) {
        return Some(IntentDecision::SmallTalk(SmallTalkTopic::Acknowledgement));
    }
    None
}

fn check_list_products(lower: &str) -> Option<IntentDecision> {
    contains_any(lower, LIST_PRODUCT_PHRASES).then_some(IntentDecision::ListProducts)
}

fn check_product_request(lower: &str) -> Option<IntentDecision> {
    let trimmed = lower.trim_start();
    for prefix in REQUEST_PREFIXES {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            let name = rest
                .trim()
                .trim_end_matches(|c: char| c.is_ascii_punctuation())
                .trim()
                .to_string();
            return Some(IntentDecision::ProductRequest(name));
        }
    }
    None
}

fn check_knowledge_gate(lower: &str) -> Option<IntentDecision> {
    if !contains_any(lower, KNOWLEDGE_PATTERNS) {
        return None;
    }
    // A product-domain word, or a product-ID mention, pulls the question
    // back into catalog territory and the gate stays open.
    if contains_any(lower, PRODUCT_INDICATORS) || matcher::mentions_product_id(lower) {
        return None;
    }
    Some(IntentDecision::GeneralKnowledge)
}
