//! # Entity Types and Recognized Spans
//!
//! Defines the closed set of entity types the recognizer knows about and the
//! [`Entity`] value produced for every recognized span.
//!
//! ## Entity Types
//!
//! | Type         | Meaning                                   | Example                          |
//! |--------------|-------------------------------------------|----------------------------------|
//! | Phone        | Azerbaijani phone number (intl. or local) | `+994 50 123 45 67`, `0501234567` |
//! | Email        | E-mail address                            | `info@gov.az`                    |
//! | URL          | `http`/`https` address                    | `https://e-gov.az/az`            |
//! | IBAN         | Azerbaijani bank account (28 chars)       | `AZ21NABZ00000000137010001944`   |
//! | LicensePlate | Vehicle plate `DD-LL-DDD`                 | `10-AB-123`                      |
//! | FIN          | Personal identification code (7 chars)    | `5ARPXK2`                        |
//! | VOEN         | Taxpayer identification number (10 digits)| `1234567890`                     |
//!
//! ## Offsets
//!
//! `start` and `end` are **byte** offsets into the original UTF-8 text, half-open
//! (`text[start..end] == entity.text`). Azerbaijani letters such as `ə`, `ş` or `ğ`
//! take two bytes, so `end - start` is not a character count.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Entity types recognized by the engine.
///
/// The declaration order is the aggregation order of the matchers: the more
/// specific, less ambiguous shapes come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// **URL**: `http://` or `https://` followed by a non-whitespace run.
    Url,
    /// **Email**: `local@domain.tld`, no DNS validation.
    Email,
    /// **IBAN**: `AZ` + 2 digits + 4 bank letters + 20 alphanumerics.
    Iban,
    /// **LicensePlate**: `DD-LL-DDD`, e.g. `90-HA-555`.
    LicensePlate,
    /// **Phone**: `+994` international or `0`-prefixed local form.
    Phone,
    /// **FIN**: 7-character personal code over `[A-HJ-NP-Z0-9]`.
    Fin,
    /// **VOEN**: 10-digit taxpayer number.
    Voen,
}

impl EntityType {
    /// All types, in aggregation order.
    pub const ALL: [EntityType; 7] = [
        EntityType::Url,
        EntityType::Email,
        EntityType::Iban,
        EntityType::LicensePlate,
        EntityType::Phone,
        EntityType::Fin,
        EntityType::Voen,
    ];

    /// Display name of the type (`"Phone"`, `"IBAN"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            EntityType::Url => "URL",
            EntityType::Email => "Email",
            EntityType::Iban => "IBAN",
            EntityType::LicensePlate => "LicensePlate",
            EntityType::Phone => "Phone",
            EntityType::Fin => "FIN",
            EntityType::Voen => "VOEN",
        }
    }

    /// Parses a type name, case-insensitive.
    ///
    /// Accepts the display names (`"LicensePlate"`) and their snake_case
    /// aliases (`"license_plate"`).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "url" => Some(EntityType::Url),
            "email" => Some(EntityType::Email),
            "iban" => Some(EntityType::Iban),
            "licenseplate" | "license_plate" => Some(EntityType::LicensePlate),
            "phone" => Some(EntityType::Phone),
            "fin" => Some(EntityType::Fin),
            "voen" => Some(EntityType::Voen),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A recognized span in the input text.
///
/// Entities are plain values: created fresh on every call, compared by their
/// fields, never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// The matched substring, copied out of the input.
    pub text: String,
    /// Byte offset of the first byte (inclusive).
    pub start: usize,
    /// Byte offset one past the last byte (exclusive).
    pub end: usize,
    /// Entity type.
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// True only for FIN/VOEN codes found right after their keyword
    /// (`FIN:`, `VÖEN`). Used as a tie-break during resolution, never as a filter.
    pub labeled: bool,
}

impl Entity {
    /// Builds an entity for `source[start..end]`.
    ///
    /// Callers pass boundaries produced by the regex engine, which always fall
    /// on character boundaries.
    pub fn new(source: &str, start: usize, end: usize, entity_type: EntityType, labeled: bool) -> Self {
        Self {
            text: source[start..end].to_string(),
            start,
            end,
            entity_type,
            labeled,
        }
    }

    /// Span length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length span; the matchers never produce one.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Byte range of the span, usable to slice the original text.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether the half-open ranges of both entities intersect.
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Moves the span by `offset` bytes, for results computed on a slice of a larger buffer.
    pub(crate) fn shifted(mut self, offset: usize) -> Self {
        self.start += offset;
        self.end += offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_round_trip() {
        for t in EntityType::ALL {
            assert_eq!(EntityType::from_name(t.name()), Some(t));
        }
        assert_eq!(EntityType::from_name("license_plate"), Some(EntityType::LicensePlate));
        assert_eq!(EntityType::from_name("Iban"), Some(EntityType::Iban));
        assert_eq!(EntityType::from_name("passport"), None);
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(EntityType::Url.to_string(), "URL");
        assert_eq!(EntityType::LicensePlate.to_string(), "LicensePlate");
    }

    #[test]
    fn test_byte_offsets_with_multibyte_text() {
        let text = "Şəxsi FIN: 5ARPXK2";
        let start = text.find("5ARPXK2").unwrap();
        let e = Entity::new(text, start, start + 7, EntityType::Fin, true);
        assert_eq!(e.text, "5ARPXK2");
        // "Şəxsi" is 5 chars but 7 bytes
        assert_eq!(start, 13);
        assert_eq!(&text[e.range()], e.text);
    }

    #[test]
    fn test_overlaps_is_half_open() {
        let text = "0123456789";
        let a = Entity::new(text, 0, 4, EntityType::Voen, false);
        let b = Entity::new(text, 4, 8, EntityType::Voen, false);
        let c = Entity::new(text, 3, 5, EntityType::Voen, false);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_len_range_and_is_empty() {
        let text = "tel 0501234567";
        let e = Entity::new(text, 4, 14, EntityType::Phone, false);
        assert_eq!(e.range(), 4..14);
        assert_eq!(e.len(), 10);
        assert!(!e.is_empty());
        assert!(Entity::new(text, 4, 4, EntityType::Phone, false).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let e = Entity::new("10-AB-123", 0, 9, EntityType::LicensePlate, false);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "license_plate");
        assert_eq!(json["text"], "10-AB-123");
        assert_eq!(json["labeled"], false);
    }
}
