//! Quorum requirement for answer consensus
//!
//! Defines how many mutually similar answers are needed before one of them
//! is accepted as the consensus answer.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default absolute floor on the quorum
pub const DEFAULT_MIN_REQUIRED: usize = 3;
/// Default fraction of answers that must agree
pub const DEFAULT_REQUIRED_RATIO: f64 = 0.6;

/// Rule for the number of agreeing answers a poll needs
///
/// `required = min(max(min_required, ceil(required_ratio * total)), total)`
///
/// # Example
///
/// ```
/// use answer_quorum_domain::quorum::QuorumRequirement;
///
/// let rule = QuorumRequirement::default(); // 3 / 0.6
/// assert_eq!(rule.required_matches(10), 6); // ceil(6.0)
/// assert_eq!(rule.required_matches(4), 3);  // floor of 3 wins over ceil(2.4)
/// assert_eq!(rule.required_matches(2), 2);  // capped at the answer count
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuorumRequirement {
    /// Absolute floor on the quorum
    pub min_required: usize,
    /// Fraction of answers that must agree, in `(0, 1]`
    pub required_ratio: f64,
}

impl QuorumRequirement {
    /// Create a requirement, validating the ratio and floor
    pub fn new(min_required: usize, required_ratio: f64) -> Result<Self, DomainError> {
        if min_required == 0 {
            return Err(DomainError::InvalidRequirement(
                "min_required must be at least 1".to_string(),
            ));
        }
        if !(required_ratio > 0.0 && required_ratio <= 1.0) {
            return Err(DomainError::InvalidRequirement(format!(
                "required_ratio must be in (0, 1], got {required_ratio}"
            )));
        }
        Ok(Self {
            min_required,
            required_ratio,
        })
    }

    /// Number of agreeing answers needed out of `total_answers`.
    ///
    /// Never exceeds `total_answers`.
    pub fn required_matches(&self, total_answers: usize) -> usize {
        let by_ratio = (self.required_ratio * total_answers as f64).ceil() as usize;
        self.min_required.max(by_ratio).min(total_answers)
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        format!(
            "at least {} and {:.0}% of answers",
            self.min_required,
            self.required_ratio * 100.0
        )
    }
}

impl Default for QuorumRequirement {
    fn default() -> Self {
        Self {
            min_required: DEFAULT_MIN_REQUIRED,
            required_ratio: DEFAULT_REQUIRED_RATIO,
        }
    }
}

impl std::fmt::Display for QuorumRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_requirement() {
        let rule = QuorumRequirement::default();
        assert_eq!(rule.min_required, 3);
        assert_eq!(rule.required_ratio, 0.6);
    }

    #[test]
    fn test_required_matches_defaults() {
        let rule = QuorumRequirement::default();
        assert_eq!(rule.required_matches(0), 0);
        assert_eq!(rule.required_matches(1), 1);
        assert_eq!(rule.required_matches(3), 3);
        assert_eq!(rule.required_matches(4), 3);
        assert_eq!(rule.required_matches(5), 3);
        assert_eq!(rule.required_matches(6), 4);
        assert_eq!(rule.required_matches(10), 6);
    }

    #[test]
    fn test_never_exceeds_total() {
        let rule = QuorumRequirement::new(7, 1.0).unwrap();
        for total in 0..12 {
            assert!(rule.required_matches(total) <= total);
        }
    }

    #[test]
    fn test_ratio_dominates_floor() {
        let rule = QuorumRequirement::new(1, 0.5).unwrap();
        assert_eq!(rule.required_matches(5), 3);
        assert_eq!(rule.required_matches(8), 4);
    }

    #[test]
    fn test_invalid_requirement() {
        assert!(QuorumRequirement::new(0, 0.6).is_err());
        assert!(QuorumRequirement::new(3, 0.0).is_err());
        assert!(QuorumRequirement::new(3, 1.5).is_err());
        assert!(QuorumRequirement::new(3, f64::NAN).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            QuorumRequirement::default().to_string(),
            "at least 3 and 60% of answers"
        );
    }
}
