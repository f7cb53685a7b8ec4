//! # Recognition Pipeline — Façade with Observable Events
//!
//! [`Recognizer`] is the single entry point of the engine:
//!
//! 1. **Candidates** ([`crate::patterns`]): every matcher scans the full text.
//! 2. **Resolution** ([`crate::resolver`]): ranking plus a greedy left-to-right sweep.
//! 3. **Result**: non-overlapping entities sorted by start offset.
//!
//! The pipeline is a pure function of its input. It holds no state between
//! calls, so one `Recognizer` can be shared across threads freely.
//!
//! ## Usage modes
//! - **Sync**: [`Recognizer::recognize`] and the per-type projections.
//! - **Streaming**: [`Recognizer::recognize_streaming`] pushes a
//!   [`RecognizerEvent`] for every matcher run and every sweep decision, which the
//!   web front end forwards over WebSocket.
//! - **Bytes**: [`Recognizer::recognize_bytes`] for input that may not be valid UTF-8.
//! - **Batch**: [`Recognizer::recognize_batch`] runs independent texts in parallel.

use std::sync::mpsc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::entity::{Entity, EntityType};
use crate::patterns::{collect_candidates, collect_candidates_with, Matcher};
use crate::patterns::Candidate;
use crate::resolver::{resolve_with, Decision, DiscardReason};

/// Events emitted while a text is processed.
///
/// Order: one `CandidatesFound` per matcher (in aggregation order), then one
/// `Committed`/`Discarded` per candidate (in sweep order), then `Done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RecognizerEvent {
    /// A matcher finished scanning the text.
    CandidatesFound { matcher: Matcher, count: usize },
    /// The sweep kept this candidate.
    Committed { entity: Entity },
    /// The sweep dropped this candidate because it hits a committed span ending at `blocked_by_end`.
    Discarded {
        entity: Entity,
        reason: DiscardReason,
        blocked_by_end: usize,
    },
    /// Final result.
    Done {
        entities: Vec<Entity>,
        candidates: usize,
        processing_us: u64,
    },
}

fn trace_discard(candidate: &Candidate, reason: DiscardReason) {
    trace!(
        matcher = ?candidate.matcher,
        start = candidate.entity.start,
        end = candidate.entity.end,
        ?reason,
        "candidate discarded"
    );
}

/// The recognition engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recognizer;

impl Recognizer {
    pub fn new() -> Self {
        Self
    }

    /// Recognizes all entities in `text`.
    ///
    /// Returns an empty list for empty input or when no matcher fires.
    pub fn recognize(&self, text: &str) -> Vec<Entity> {
        if text.is_empty() {
            return Vec::new();
        }

        let candidates = collect_candidates(text);
        if candidates.is_empty() {
            return Vec::new();
        }

        let total = candidates.len();
        let entities = resolve_with(candidates, |candidate, decision| {
            if let Decision::Discard { reason, .. } = decision {
                trace_discard(candidate, reason);
            }
        });
        debug!(bytes = text.len(), candidates = total, entities = entities.len(), "recognized");
        entities
    }

    /// Processes `text` and sends progress events through `tx`.
    ///
    /// The entities carried by the final `Done` event are exactly those
    /// [`recognize`](Self::recognize) returns. A closed receiver is ignored.
    pub fn recognize_streaming(&self, text: &str, tx: mpsc::Sender<RecognizerEvent>) {
        let start = Instant::now();

        let candidates = collect_candidates_with(text, |matcher, count| {
            let _ = tx.send(RecognizerEvent::CandidatesFound { matcher, count });
        });
        let total = candidates.len();

        let entities = resolve_with(candidates, |candidate, decision| {
            let event = match decision {
                Decision::Commit => RecognizerEvent::Committed {
                    entity: candidate.entity.clone(),
                },
                Decision::Discard { reason, blocked_by_end } => {
                    trace_discard(candidate, reason);
                    RecognizerEvent::Discarded {
                        entity: candidate.entity.clone(),
                        reason,
                        blocked_by_end,
                    }
                }
            };
            let _ = tx.send(event);
        });

        debug!(bytes = text.len(), candidates = total, entities = entities.len(), "recognized (streaming)");
        let _ = tx.send(RecognizerEvent::Done {
            entities,
            candidates: total,
            processing_us: start.elapsed().as_micros() as u64,
        });
    }

    /// Collects the streamed events into a `Vec`, for callers that want the full trace at once.
    pub fn trace(&self, text: &str) -> Vec<RecognizerEvent> {
        let (tx, rx) = mpsc::channel();
        self.recognize_streaming(text, tx);
        rx.try_iter().collect()
    }

    /// Recognizes entities in a byte buffer that may contain invalid UTF-8.
    ///
    /// Invalid sequences split the input: each valid run is recognized on its
    /// own and offsets are rebased onto `input`, so no entity ever spans an
    /// invalid byte.
    pub fn recognize_bytes(&self, input: &[u8]) -> Vec<Entity> {
        let mut entities = Vec::new();
        let mut offset = 0usize;

        for chunk in input.utf8_chunks() {
            let valid = chunk.valid();
            entities.extend(
                self.recognize(valid)
                    .into_iter()
                    .map(|e| e.shifted(offset)),
            );
            offset += valid.len() + chunk.invalid().len();
        }
        entities
    }

    /// Recognizes many independent texts in parallel. Output order follows input order.
    pub fn recognize_batch<S>(&self, texts: &[S]) -> Vec<Vec<Entity>>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|t| self.recognize(t.as_ref())).collect()
    }

    /// Texts of the recognized entities of one type, in result order.
    pub fn texts_of(&self, text: &str, entity_type: EntityType) -> Vec<String> {
        self.recognize(text)
            .into_iter()
            .filter(|e| e.entity_type == entity_type)
            .map(|e| e.text)
            .collect()
    }

    pub fn phones(&self, text: &str) -> Vec<String> {
        self.texts_of(text, EntityType::Phone)
    }

    pub fn emails(&self, text: &str) -> Vec<String> {
        self.texts_of(text, EntityType::Email)
    }

    pub fn urls(&self, text: &str) -> Vec<String> {
        self.texts_of(text, EntityType::Url)
    }

    pub fn ibans(&self, text: &str) -> Vec<String> {
        self.texts_of(text, EntityType::Iban)
    }

    pub fn license_plates(&self, text: &str) -> Vec<String> {
        self.texts_of(text, EntityType::LicensePlate)
    }

    pub fn fins(&self, text: &str) -> Vec<String> {
        self.texts_of(text, EntityType::Fin)
    }

    pub fn voens(&self, text: &str) -> Vec<String> {
        self.texts_of(text, EntityType::Voen)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn check_invariants(input: &[u8], entities: &[Entity]) -> Result<(), TestCaseError> {
        for e in entities {
            prop_assert!(e.start < e.end);
            prop_assert!(e.end <= input.len());
            prop_assert_eq!(&input[e.start..e.end], e.text.as_bytes());
        }
        for pair in entities.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
            prop_assert!(pair[0].end <= pair[1].start);
        }
        Ok(())
    }

    fn fragment() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("FIN: ".to_string()),
            Just("VÖEN ".to_string()),
            Just("+994 ".to_string()),
            Just("AZ21NABZ".to_string()),
            Just("https://".to_string()),
            Just("@gov.az".to_string()),
            Just("-AB-".to_string()),
            Just("ə".to_string()),
            "[0-9]{1,12}",
            "[A-Z0-9]{1,9}",
            "[ .,:;()]{1,2}",
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_string(text in "\\PC{0,200}") {
            let entities = Recognizer::new().recognize(&text);
            check_invariants(text.as_bytes(), &entities)?;
        }

        #[test]
        fn invariants_hold_for_entity_shaped_text(parts in prop::collection::vec(fragment(), 0..24)) {
            let text: String = parts.concat();
            let r = Recognizer::new();
            let entities = r.recognize(&text);
            check_invariants(text.as_bytes(), &entities)?;
            prop_assert_eq!(&entities, &r.recognize(&text));
        }

        #[test]
        fn invariants_hold_for_any_bytes(input in prop::collection::vec(any::<u8>(), 0..256)) {
            let entities = Recognizer::new().recognize_bytes(&input);
            check_invariants(&input, &entities)?;
        }
    }
}
