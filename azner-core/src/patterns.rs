//! # Pattern Matchers — Regex Extractors for Each Entity Type
//!
//! Each matcher scans the **whole** input once with a fixed regular expression
//! and returns every non-overlapping match, left to right. Matchers know nothing
//! about each other: a 10-digit run inside a phone number is reported by the
//! phone matcher *and* by the bare VOEN matcher. Deciding between them is the
//! job of [`crate::resolver`].
//!
//! ## Aggregation order
//!
//! [`MATCHER_ORDER`] lists the matchers from most specific to most ambiguous:
//!
//! 1. URL
//! 2. Email
//! 3. IBAN
//! 4. LicensePlate
//! 5. Phone (international, then local)
//! 6. FIN (labeled, then bare)
//! 7. VOEN (labeled, then bare)
//!
//! The position of a matcher in this list is its *priority*, used by the
//! resolver only after start, length and label have failed to separate two
//! candidates.
//!
//! ## Word boundaries
//!
//! All boundaries are ASCII boundaries, written `(?-u:\b)`. A letter like `ə` or
//! `Ş` is **not** a word character for these patterns, so `ə1234567890` yields a
//! VOEN candidate exactly like `,1234567890` would. Digits are `[0-9]` and
//! whitespace is `[\t\n\f\r ]` for the same reason.
//!
//! The `regex` crate guarantees linear-time matching, so hostile input cannot
//! trigger catastrophic backtracking.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::entity::{Entity, EntityType};

static URL_RE: Lazy<Regex> = Lazy::new(|| compile(r#"https?://[^\t\n\f\r <>"{}|\\^`]+"#));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}"));

static IBAN_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?-u:\b)AZ[0-9]{2}[A-Z]{4}[A-Z0-9]{20}(?-u:\b)"));

static LICENSE_PLATE_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?-u:\b)[0-9]{2}-[A-Z]{2}-[0-9]{3}(?-u:\b)"));

// +994 50 123 45 67, spaces optional, no boundaries
static PHONE_INTL_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"\+994[\t\n\f\r ]?[0-9]{2}[\t\n\f\r ]?[0-9]{3}[\t\n\f\r ]?[0-9]{2}[\t\n\f\r ]?[0-9]{2}")
});

// 050 123 45 67
static PHONE_LOCAL_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?-u:\b)0[0-9]{2}[\t\n\f\r ]?[0-9]{3}[\t\n\f\r ]?[0-9]{2}[\t\n\f\r ]?[0-9]{2}(?-u:\b)")
});

// I and O are excluded from FIN codes (confusable with 1 and 0).
static FIN_LABELED_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)(?-u:\b)FIN[:\t\n\f\r ][\t\n\f\r ]?([A-HJ-NP-Z0-9]{7})(?-u:\b)")
});

static FIN_BARE_RE: Lazy<Regex> = Lazy::new(|| compile(r"(?-u:\b)[A-HJ-NP-Z0-9]{7}(?-u:\b)"));

static VOEN_LABELED_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)(?-u:\b)V[ÖO]EN[:\t\n\f\r ][\t\n\f\r ]?([0-9]{10})(?-u:\b)")
});

static VOEN_BARE_RE: Lazy<Regex> = Lazy::new(|| compile(r"(?-u:\b)[0-9]{10}(?-u:\b)"));

/// Characters stripped from the end of a URL match (sentence punctuation, closers).
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '>'];

fn compile(pattern: &str) -> Regex {
    // Patterns are constants covered by the tests below.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// One regex extractor. Phone, FIN and VOEN are split into two sub-matchers each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    Url,
    Email,
    Iban,
    LicensePlate,
    PhoneInternational,
    PhoneLocal,
    FinLabeled,
    FinBare,
    VoenLabeled,
    VoenBare,
}

/// Fixed aggregation order. The index of a matcher here is its priority (lower wins).
pub const MATCHER_ORDER: [Matcher; 10] = [
    Matcher::Url,
    Matcher::Email,
    Matcher::Iban,
    Matcher::LicensePlate,
    Matcher::PhoneInternational,
    Matcher::PhoneLocal,
    Matcher::FinLabeled,
    Matcher::FinBare,
    Matcher::VoenLabeled,
    Matcher::VoenBare,
];

impl Matcher {
    /// Entity type produced by this matcher.
    pub fn entity_type(&self) -> EntityType {
        match self {
            Matcher::Url => EntityType::Url,
            Matcher::Email => EntityType::Email,
            Matcher::Iban => EntityType::Iban,
            Matcher::LicensePlate => EntityType::LicensePlate,
            Matcher::PhoneInternational | Matcher::PhoneLocal => EntityType::Phone,
            Matcher::FinLabeled | Matcher::FinBare => EntityType::Fin,
            Matcher::VoenLabeled | Matcher::VoenBare => EntityType::Voen,
        }
    }

    /// Whether matches require a preceding keyword (`FIN:`, `VÖEN`).
    pub fn is_labeled(&self) -> bool {
        matches!(self, Matcher::FinLabeled | Matcher::VoenLabeled)
    }

    /// Position in [`MATCHER_ORDER`].
    pub fn priority(&self) -> usize {
        MATCHER_ORDER
            .iter()
            .position(|m| m == self)
            .unwrap_or(MATCHER_ORDER.len())
    }

    fn regex(&self) -> &'static Regex {
        match self {
            Matcher::Url => &URL_RE,
            Matcher::Email => &EMAIL_RE,
            Matcher::Iban => &IBAN_RE,
            Matcher::LicensePlate => &LICENSE_PLATE_RE,
            Matcher::PhoneInternational => &PHONE_INTL_RE,
            Matcher::PhoneLocal => &PHONE_LOCAL_RE,
            Matcher::FinLabeled => &FIN_LABELED_RE,
            Matcher::FinBare => &FIN_BARE_RE,
            Matcher::VoenLabeled => &VOEN_LABELED_RE,
            Matcher::VoenBare => &VOEN_BARE_RE,
        }
    }

    /// Runs this matcher over the whole text.
    ///
    /// Labeled matchers report only the code (capture group 1), not the keyword.
    pub fn find_all(&self, text: &str) -> Vec<Entity> {
        let re = self.regex();
        let ty = self.entity_type();

        if self.is_labeled() {
            return re
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| Entity::new(text, m.start(), m.end(), ty, true))
                .collect();
        }

        re.find_iter(text)
            .filter_map(|m| {
                let end = if *self == Matcher::Url {
                    m.start() + m.as_str().trim_end_matches(URL_TRAILING).len()
                } else {
                    m.end()
                };
                (end > m.start()).then(|| Entity::new(text, m.start(), end, ty, false))
            })
            .collect()
    }
}

/// A matcher output waiting for overlap resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub entity: Entity,
    pub matcher: Matcher,
    /// Position in the aggregated candidate list.
    pub index: usize,
}

impl Candidate {
    pub fn priority(&self) -> usize {
        self.matcher.priority()
    }
}

/// Runs every matcher in [`MATCHER_ORDER`] and concatenates their output.
///
/// Nothing is filtered or deduplicated here.
pub fn collect_candidates(text: &str) -> Vec<Candidate> {
    collect_candidates_with(text, |_, _| {})
}

/// Same as [`collect_candidates`], calling `on_matcher(matcher, count)` after each matcher runs.
pub fn collect_candidates_with(
    text: &str,
    mut on_matcher: impl FnMut(Matcher, usize),
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    if text.is_empty() {
        for matcher in MATCHER_ORDER {
            on_matcher(matcher, 0);
        }
        return candidates;
    }

    for matcher in MATCHER_ORDER {
        let found = matcher.find_all(text);
        trace!(?matcher, count = found.len(), "matcher finished");
        on_matcher(matcher, found.len());
        for entity in found {
            let index = candidates.len();
            candidates.push(Candidate { entity, matcher, index });
        }
    }
    candidates
}

pub fn match_url(text: &str) -> Vec<Entity> {
    Matcher::Url.find_all(text)
}

pub fn match_email(text: &str) -> Vec<Entity> {
    Matcher::Email.find_all(text)
}

pub fn match_iban(text: &str) -> Vec<Entity> {
    Matcher::Iban.find_all(text)
}

pub fn match_license_plate(text: &str) -> Vec<Entity> {
    Matcher::LicensePlate.find_all(text)
}

/// International matches first, then local ones.
pub fn match_phone(text: &str) -> Vec<Entity> {
    let mut out = Matcher::PhoneInternational.find_all(text);
    out.extend(Matcher::PhoneLocal.find_all(text));
    out
}

/// Labeled matches first, then bare ones. The same code usually appears in both.
pub fn match_fin(text: &str) -> Vec<Entity> {
    let mut out = Matcher::FinLabeled.find_all(text);
    out.extend(Matcher::FinBare.find_all(text));
    out
}

/// Labeled matches first, then bare ones.
pub fn match_voen(text: &str) -> Vec<Entity> {
    let mut out = Matcher::VoenLabeled.find_all(text);
    out.extend(Matcher::VoenBare.find_all(text));
    out
}
