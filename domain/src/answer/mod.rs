//! Answer text processing
//!
//! Everything the consensus step needs to compare short, noisy model answers:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`normalize`] | Canonical form used as the equality key |
//! | [`extract`] | Strip markup from a raw response and keep the core phrase |
//! | [`similarity`] | Tiered [0, 1] similarity between two answers |
//! | [`matching`] | Map a final answer onto the choices an answer field offers |

pub mod extract;
pub mod matching;
pub mod normalize;
pub mod similarity;

pub use extract::{AnswerExtractor, DEFAULT_MAX_ANSWER_WORDS, clean, extract_core};
pub use matching::{AnswerField, FieldSelection, MatchStrategy, OptionMatch, match_option};
pub use normalize::normalize;
pub use similarity::{MATCH_THRESHOLD, is_match, score};
