//! Tiered similarity between two short answers.
//!
//! Not a general string metric. For terse answers an exact or substring
//! match says far more than incidental word overlap, so the tiers never
//! blend: the first tier that applies decides the score.
//!
//! | Tier | Condition (on normalized text) | Score |
//! |------|--------------------------------|-------|
//! | 1 | identical | 1.0 |
//! | 2 | one contains the other, both non-empty | 0.8 |
//! | 3 | word overlap `|A∩B| / max(|A|,|B|)` | 0.0 – 1.0 |

use super::normalize::normalize;
use std::collections::HashSet;

/// Minimum score for two answers to count as votes for the same thing
pub const MATCH_THRESHOLD: f64 = 0.7;

const SUBSTRING_SCORE: f64 = 0.8;

/// Similarity of two raw answers in `[0, 1]`. Symmetric and total.
pub fn score(a: &str, b: &str) -> f64 {
    score_normalized(&normalize(a), &normalize(b))
}

/// Whether two raw answers are similarity-equivalent for voting
pub fn is_match(a: &str, b: &str) -> bool {
    score(a, b) >= MATCH_THRESHOLD
}

/// [`score`] for text that is already normalized.
pub(crate) fn score_normalized(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a)) {
        return SUBSTRING_SCORE;
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let shared = words_a.intersection(&words_b).count();
    shared as f64 / words_a.len().max(words_b.len()) as f64
}
