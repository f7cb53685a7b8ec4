//! # Overlap Resolution
//!
//! Turns the raw candidate list (which freely overlaps) into a list of
//! non-overlapping entities sorted by start offset.
//!
//! ## Algorithm
//!
//! 1. **Ranking**: candidates are ordered by
//!    - `start` ascending,
//!    - span length descending,
//!    - labeled before bare,
//!    - matcher priority (position in [`MATCHER_ORDER`](crate::patterns::MATCHER_ORDER)),
//!    - aggregation index.
//!
//!    The last two keys make the order total, so equal spans from different
//!    matchers (a local phone `0501234567` is also a bare VOEN) always resolve
//!    the same way.
//! 2. **Sweep**: walk the ranked list keeping `max_end`, the end of the last
//!    committed entity (initially 0).
//!    - `start >= max_end` → commit, `max_end = end`.
//!    - `start < max_end < end` → discard (partial overlap).
//!    - `end <= max_end` → discard (contained).
//! 3. Sort committed entities by `start`.
//!
//! A committed span is never revised: a longer candidate starting inside it is
//! dropped even if it would cover more text. Downstream consumers rely on this
//! exact selection policy.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::patterns::Candidate;

/// Why a candidate was dropped by the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// Starts inside a committed span and ends after it.
    PartialOverlap,
    /// Lies entirely inside a committed span.
    Contained,
}

/// Outcome of the sweep for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Commit,
    Discard {
        reason: DiscardReason,
        /// `max_end` at the time of the decision.
        blocked_by_end: usize,
    },
}

/// Sorts candidates into resolution order.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_unstable_by_key(|c| {
        (
            c.entity.start,
            Reverse(c.entity.len()),
            Reverse(c.entity.labeled),
            c.priority(),
            c.index,
        )
    });
}

/// Resolves overlaps and returns the surviving entities sorted by start.
pub fn resolve(candidates: Vec<Candidate>) -> Vec<Entity> {
    resolve_with(candidates, |_, _| {})
}

/// Like [`resolve`], reporting the decision taken for every candidate in sweep order.
pub fn resolve_with(
    mut candidates: Vec<Candidate>,
    mut on_decision: impl FnMut(&Candidate, Decision),
) -> Vec<Entity> {
    rank(&mut candidates);

    let mut result = Vec::with_capacity(candidates.len());
    let mut max_end = 0usize;

    for candidate in candidates {
        let (start, end) = (candidate.entity.start, candidate.entity.end);
        let decision = if start >= max_end {
            Decision::Commit
        } else if end > max_end {
            Decision::Discard {
                reason: DiscardReason::PartialOverlap,
                blocked_by_end: max_end,
            }
        } else {
            Decision::Discard {
                reason: DiscardReason::Contained,
                blocked_by_end: max_end,
            }
        };

        on_decision(&candidate, decision);
        if decision == Decision::Commit {
            max_end = end;
            result.push(candidate.entity);
        }
    }

    result.sort_by_key(|e| e.start);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityType;
    use crate::patterns::{collect_candidates, Matcher};

    fn candidate(text: &str, start: usize, end: usize, matcher: Matcher, index: usize) -> Candidate {
        Candidate {
            entity: Entity::new(text, start, end, matcher.entity_type(), matcher.is_labeled()),
            matcher,
            index,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve(vec![]).is_empty());
    }

    #[test]
    fn test_longer_span_wins_at_same_start() {
        let text = "0501234567890";
        let short = candidate(text, 0, 10, Matcher::VoenBare, 0);
        let long = candidate(text, 0, 13, Matcher::Url, 1);
        let out = resolve(vec![short, long]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].end, 13);
    }

    #[test]
    fn test_labeled_wins_at_same_span() {
        let text = "5ARPXK2";
        let bare = candidate(text, 0, 7, Matcher::FinBare, 0);
        let labeled = candidate(text, 0, 7, Matcher::FinLabeled, 1);
        let out = resolve(vec![bare, labeled]);
        assert_eq!(out.len(), 1);
        assert!(out[0].labeled);
    }

    #[test]
    fn test_matcher_priority_breaks_full_ties() {
        // a local phone is also a bare VOEN
        let text = "0501234567";
        let mut candidates = collect_candidates(text);
        assert_eq!(candidates.len(), 2);
        candidates.reverse();
        let out = resolve(candidates);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entity_type, EntityType::Phone);
    }

    #[test]
    fn test_partial_overlap_is_discarded() {
        let text = "abcdefghijkl";
        let first = candidate(text, 0, 6, Matcher::Email, 0);
        let longer_inside = candidate(text, 3, 12, Matcher::Url, 1);
        let mut decisions = Vec::new();
        let out = resolve_with(vec![first, longer_inside], |c, d| decisions.push((c.index, d)));
        assert_eq!(out.len(), 1);
        assert_eq!((out[0].start, out[0].end), (0, 6));
        assert_eq!(
            decisions[1],
            (
                1,
                Decision::Discard {
                    reason: DiscardReason::PartialOverlap,
                    blocked_by_end: 6
                }
            )
        );
    }

    #[test]
    fn test_contained_is_discarded() {
        let text = "AZ21NABZ00000000137010001944";
        let iban = candidate(text, 0, 28, Matcher::Iban, 0);
        let inner = candidate(text, 8, 18, Matcher::VoenBare, 1);
        let mut reasons = Vec::new();
        let out = resolve_with(vec![inner, iban], |_, d| reasons.push(d));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entity_type, EntityType::Iban);
        assert_eq!(
            reasons[1],
            Decision::Discard {
                reason: DiscardReason::Contained,
                blocked_by_end: 28
            }
        );
    }

    #[test]
    fn test_adjacent_spans_both_survive() {
        let text = "1234567890ABCDEFG";
        let voen = candidate(text, 0, 10, Matcher::VoenBare, 0);
        let fin = candidate(text, 10, 17, Matcher::FinBare, 1);
        let out = resolve(vec![fin, voen]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].start, 0);
        assert_eq!(out[1].start, 10);
    }

    #[test]
    fn test_fin_overlapping_voen_keeps_one() {
        let text = "AB123456789012";
        // VOEN starts first: the FIN inside it is contained
        let fin = candidate(text, 2, 9, Matcher::FinBare, 0);
        let voen = candidate(text, 0, 10, Matcher::VoenBare, 1);
        let out = resolve(vec![fin, voen.clone()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entity_type, EntityType::Voen);

        // same start: the longer VOEN wins
        let fin_same_start = candidate(text, 0, 7, Matcher::FinBare, 0);
        let out = resolve(vec![fin_same_start, voen]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entity_type, EntityType::Voen);

        // FIN starts first: it is committed and the VOEN is dropped
        let fin_first = candidate(text, 0, 7, Matcher::FinBare, 0);
        let voen_later = candidate(text, 4, 14, Matcher::VoenBare, 1);
        let out = resolve(vec![voen_later, fin_first]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entity_type, EntityType::Fin);
    }

    #[test]
    fn test_rank_is_independent_of_input_order() {
        let text = "FIN: 5ARPXK2, VÖEN 1234567890, tel 0501234567";
        let candidates = collect_candidates(text);
        let forward = resolve(candidates.clone());
        let mut reversed = candidates;
        reversed.reverse();
        assert_eq!(forward, resolve(reversed));
    }
}
