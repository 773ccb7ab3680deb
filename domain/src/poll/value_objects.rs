//! Poll value objects - per-model results of one question fan-out.
//!
//! - [`RawResponse`] - outcome of querying one model (text or last error)
//! - [`Answer`] - cleaned core answer from a successful response
//! - [`ModelStatus`] - per-model status reported while a poll runs
//! - [`PollOutcome`] - everything a poll gathered before its deadline

use crate::core::identity::ModelIdentity;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of querying one model, after retries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    pub identity: ModelIdentity,
    /// Response text, absent when every attempt failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Last failure detail, present when every attempt failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of attempts made
    pub attempts: u32,
    /// One line per failed attempt, for the session error log
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attempt_errors: Vec<String>,
}

impl RawResponse {
    pub fn success(identity: ModelIdentity, text: impl Into<String>, attempts: u32) -> Self {
        Self {
            identity,
            text: Some(text.into()),
            error: None,
            attempts,
            attempt_errors: Vec::new(),
        }
    }

    pub fn failure(identity: ModelIdentity, error: impl Into<String>, attempts: u32) -> Self {
        Self {
            identity,
            text: None,
            error: Some(error.into()),
            attempts,
            attempt_errors: Vec::new(),
        }
    }

    pub fn with_attempt_errors(mut self, errors: Vec<String>) -> Self {
        self.attempt_errors = errors;
        self
    }

    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }
}

/// A cleaned candidate answer from one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub identity: ModelIdentity,
    pub text: String,
}

impl Answer {
    pub fn new(identity: ModelIdentity, text: impl Into<String>) -> Self {
        Self {
            identity,
            text: text.into(),
        }
    }
}

/// Status of one model within a poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ModelStatus {
    /// Responded; carries the extracted core answer
    Answered(String),
    /// Responded with nothing usable after extraction
    Unusable,
    /// Every attempt failed; carries the last error
    Failed(String),
    /// Still running when the poll deadline elapsed
    TimedOut,
}

impl ModelStatus {
    pub fn is_answered(&self) -> bool {
        matches!(self, ModelStatus::Answered(_))
    }
}

/// Per-status counts of a poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollCounts {
    pub requested: usize,
    pub answered: usize,
    pub failed: usize,
    pub timed_out: usize,
}

/// Per-model result of a poll, in configured model order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub identity: ModelIdentity,
    pub status: ModelStatus,
    /// Raw text as returned by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

/// Everything one poll gathered before its deadline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollOutcome {
    /// Usable answers, in configured model order
    pub answers: Vec<Answer>,
    /// One entry per requested model, in configured model order
    pub results: Vec<ModelResult>,
    /// Diagnostic lines (failed attempts, slow models, worker failures)
    pub errors: Vec<String>,
    /// Wall-clock time spent collecting
    pub elapsed: Duration,
}

impl PollOutcome {
    pub fn counts(&self) -> PollCounts {
        let mut counts = PollCounts {
            requested: self.results.len(),
            ..PollCounts::default()
        };
        for result in &self.results {
            match result.status {
                ModelStatus::Answered(_) => counts.answered += 1,
                ModelStatus::Unusable | ModelStatus::Failed(_) => counts.failed += 1,
                ModelStatus::TimedOut => counts.timed_out += 1,
            }
        }
        counts
    }

    /// Models that were still running at the deadline
    pub fn timed_out(&self) -> impl Iterator<Item = &ModelIdentity> {
        self.results
            .iter()
            .filter(|r| r.status == ModelStatus::TimedOut)
            .map(|r| &r.identity)
    }

    pub fn has_answers(&self) -> bool {
        !self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::Provider;

    fn id(model: &str) -> ModelIdentity {
        ModelIdentity::new(Provider::Groq, model)
    }

    #[test]
    fn test_raw_response_constructors() {
        let ok = RawResponse::success(id("a"), "Paris", 1);
        assert!(ok.is_success());
        assert_eq!(ok.error, None);

        let failed = RawResponse::failure(id("b"), "HTTP 429", 2)
            .with_attempt_errors(vec!["GROQ:b attempt 1: HTTP 429".to_string()]);
        assert!(!failed.is_success());
        assert_eq!(failed.attempts, 2);
        assert_eq!(failed.attempt_errors.len(), 1);
    }

    #[test]
    fn test_poll_counts() {
        let outcome = PollOutcome {
            answers: vec![Answer::new(id("a"), "Paris")],
            results: vec![
                ModelResult {
                    identity: id("a"),
                    status: ModelStatus::Answered("Paris".to_string()),
                    raw_text: Some("Paris.".to_string()),
                },
                ModelResult {
                    identity: id("b"),
                    status: ModelStatus::Failed("HTTP 500".to_string()),
                    raw_text: None,
                },
                ModelResult {
                    identity: id("c"),
                    status: ModelStatus::TimedOut,
                    raw_text: None,
                },
                ModelResult {
                    identity: id("d"),
                    status: ModelStatus::Unusable,
                    raw_text: Some("**".to_string()),
                },
            ],
            ..PollOutcome::default()
        };

        let counts = outcome.counts();
        assert_eq!(counts.requested, 4);
        assert_eq!(counts.answered, 1);
        assert_eq!(counts.failed, 2);
        assert_eq!(counts.timed_out, 1);
        assert_eq!(outcome.timed_out().collect::<Vec<_>>(), vec![&id("c")]);
        assert!(outcome.has_answers());
    }
}
