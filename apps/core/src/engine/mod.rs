//! # Response Engine
//!
//! Rule-based response generation for the call center assistant. Analyzes
//! user input without any model inference and turns it into a structured
//! reply backed by the product catalog.
//!
//! ## Components
//! - `keywords`: word tokenization and stopword filtering
//! - `intent`: ordered-rule intent classification (first match wins)
//! - `matcher`: catalog scoring and ranking (ID, field-scored, title-only)
//! - `related`: related-product selection by category and keyword overlap
//! - `response`: structured response payloads and their projections
//! - `responder`: main orchestrator

pub mod intent;
pub mod keywords;
pub mod matcher;
pub mod related;
pub mod response;
pub mod responder;

// Re-export the types a host needs; not all are exercised by the bundled
// REPL host.
#[allow(unused_imports)]
pub use intent::{IntentDecision, SmallTalkTopic};
#[allow(unused_imports)]
pub use response::{ProductView, RenderedResponse};
pub use responder::ResponseEngine;
