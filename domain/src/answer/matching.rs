//! Answer fields and option matching.
//!
//! An answer is delivered into one of a few field shapes. Free-text fields
//! take the answer as-is; choice fields need the answer mapped onto one of
//! the offered labels.

use super::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const SUBSTRING_SCORE: f64 = 0.95;
const MIN_OVERLAP: f64 = 0.6;
const FIRST_WORD_SCORE: f64 = 0.5;
const MIN_ACCEPTED_SCORE: f64 = 0.5;

/// The field an answer has to be delivered into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum AnswerField {
    /// Free-text input
    TextField,
    /// Radio group: exactly one option
    SingleChoiceGroup(Vec<String>),
    /// Checkbox group: the best matching option is ticked
    MultiChoiceGroup(Vec<String>),
    /// Select element
    Dropdown(Vec<String>),
}

impl AnswerField {
    /// Labels offered by a choice field (empty for text fields)
    pub fn options(&self) -> &[String] {
        match self {
            AnswerField::TextField => &[],
            AnswerField::SingleChoiceGroup(options)
            | AnswerField::MultiChoiceGroup(options)
            | AnswerField::Dropdown(options) => options,
        }
    }

    /// Decide what to put into this field for `answer`.
    ///
    /// Returns `None` when the answer is blank or no option matches well
    /// enough.
    pub fn select(&self, answer: &str) -> Option<FieldSelection> {
        match self {
            AnswerField::TextField => {
                let text = answer.trim();
                (!text.is_empty()).then(|| FieldSelection::Text(text.to_string()))
            }
            _ => match_option(answer, self.options()).map(FieldSelection::Choice),
        }
    }
}

/// What to enter into an [`AnswerField`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldSelection {
    Text(String),
    Choice(OptionMatch),
}

/// How an option was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    Substring,
    WordOverlap,
    FirstWord,
}

/// A chosen option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionMatch {
    /// Position of the option in the field
    pub index: usize,
    /// Option label as offered
    pub label: String,
    pub score: f64,
    pub strategy: MatchStrategy,
}

/// Match an answer against option labels.
///
/// An exact (normalized) match wins immediately. Otherwise options are
/// scored by containment (0.95), word overlap (≥ 0.6) or a shared first
/// word (0.5); the highest score wins, earlier options win ties, and
/// anything below 0.5 is rejected.
pub fn match_option(answer: &str, options: &[String]) -> Option<OptionMatch> {
    let answer_norm = normalize(answer);
    if answer_norm.is_empty() {
        return None;
    }
    let answer_words: HashSet<&str> = answer_norm.split_whitespace().collect();
    let answer_first = answer_norm.split_whitespace().next();

    let mut best: Option<OptionMatch> = None;
    for (index, label) in options.iter().enumerate() {
        let option_norm = normalize(label);
        if option_norm.is_empty() {
            continue;
        }

        if option_norm == answer_norm {
            return Some(OptionMatch {
                index,
                label: label.clone(),
                score: 1.0,
                strategy: MatchStrategy::Exact,
            });
        }

        let candidate = if option_norm.contains(&answer_norm) || answer_norm.contains(&option_norm)
        {
            Some((SUBSTRING_SCORE, MatchStrategy::Substring))
        } else {
            let option_words: HashSet<&str> = option_norm.split_whitespace().collect();
            let shared = answer_words.intersection(&option_words).count();
            let overlap = shared as f64 / answer_words.len().max(option_words.len()) as f64;
            if overlap >= MIN_OVERLAP {
                Some((overlap, MatchStrategy::WordOverlap))
            } else if answer_first.is_some() && answer_first == option_norm.split_whitespace().next()
            {
                Some((FIRST_WORD_SCORE, MatchStrategy::FirstWord))
            } else {
                None
            }
        };

        if let Some((score, strategy)) = candidate
            && best.as_ref().is_none_or(|b| score > b.score)
        {
            best = Some(OptionMatch {
                index,
                label: label.clone(),
                score,
                strategy,
            });
        }
    }

    best.filter(|m| m.score >= MIN_ACCEPTED_SCORE)
}
