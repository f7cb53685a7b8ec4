//! # azner-core — Structured Entity Recognition for Azerbaijani Text
//!
//! This crate finds structured entities in free-form text (phone numbers,
//! e-mails, URLs, IBANs, license plates, FIN and VOEN codes) and resolves
//! overlapping matches into one ordered, conflict-free list.
//!
//! ## Architecture
//!
//! The engine is a linear pipeline with no state between calls:
//!
//! 1.  **Input**: raw text (`&str`, or `&[u8]` via [`Recognizer::recognize_bytes`]).
//! 2.  **Pattern matchers** ([`patterns`]): seven independent regex extractors, each
//!     scanning the whole input and emitting candidates with byte offsets.
//! 3.  **Aggregation** ([`patterns::collect_candidates`]): candidates concatenated
//!     in the fixed [`patterns::MATCHER_ORDER`].
//! 4.  **Resolution** ([`resolver`]): ranking plus a greedy sweep drops overlaps.
//! 5.  **Output**: a list of [`Entity`] sorted by start offset.
//!
//! ## Example
//!
//! ```rust
//! use azner_core::{recognize, EntityType};
//!
//! let entities = recognize("FIN: 5ARPXK2, tel +994501234567");
//!
//! assert_eq!(entities.len(), 2);
//! assert_eq!(entities[0].entity_type, EntityType::Fin);
//! assert!(entities[0].labeled);
//! assert_eq!(entities[1].text, "+994501234567");
//!
//! assert_eq!(azner_core::emails("Yazın: info@gov.az"), vec!["info@gov.az"]);
//! ```
//!
//! ## Main modules
//!
//! - [`pipeline`]: the [`Recognizer`] façade, event streaming, byte and batch input.
//! - [`patterns`]: regexes and matcher order.
//! - [`resolver`]: overlap resolution.
//! - [`entity`]: the [`Entity`] value type.

pub mod corpus;
pub mod entity;
pub mod patterns;
pub mod pipeline;
pub mod resolver;

pub use entity::{Entity, EntityType};
pub use patterns::{Matcher, MATCHER_ORDER};
pub use pipeline::{Recognizer, RecognizerEvent};
pub use resolver::DiscardReason;

/// Recognizes all entities in `text`. Empty when nothing matches.
pub fn recognize(text: &str) -> Vec<Entity> {
    Recognizer::new().recognize(text)
}

pub fn phones(text: &str) -> Vec<String> {
    Recognizer::new().phones(text)
}

pub fn emails(text: &str) -> Vec<String> {
    Recognizer::new().emails(text)
}

pub fn urls(text: &str) -> Vec<String> {
    Recognizer::new().urls(text)
}

pub fn ibans(text: &str) -> Vec<String> {
    Recognizer::new().ibans(text)
}

pub fn license_plates(text: &str) -> Vec<String> {
    Recognizer::new().license_plates(text)
}

pub fn fins(text: &str) -> Vec<String> {
    Recognizer::new().fins(text)
}

pub fn voens(text: &str) -> Vec<String> {
    Recognizer::new().voens(text)
}
