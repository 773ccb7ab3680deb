//! Port for the structured answer log.
//!
//! Defines the [`AnswerLogger`] trait for recording one record per solved or
//! failed question to a machine-readable log (JSONL).
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port keeps an auditable history of
//! what was asked and what was answered.

use answer_quorum_domain::Resolution;
use serde::Serialize;

/// Maximum number of question characters kept in a record
pub const MAX_LOGGED_QUESTION_CHARS: usize = 500;

/// One model's contribution to a question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelAnswerEntry {
    /// `PROVIDER:model`
    pub model: String,
    /// Extracted core answer, if the model produced one
    pub answer: Option<String>,
    /// `answered`, `unusable`, `failed` or `timed_out`
    pub status: &'static str,
}

/// A structured record of one question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerRecord {
    /// 1-based position of the question within the session
    pub question_num: usize,
    /// Free-form tag naming where the question came from
    pub platform: String,
    pub question: String,
    /// Selected answer, `None` when the question failed
    pub answer: Option<String>,
    pub resolution: Option<Resolution>,
    pub model_answers: Vec<ModelAnswerEntry>,
    pub errors: Vec<String>,
    pub time_taken_secs: f64,
}

impl AnswerRecord {
    /// Event type identifier used in the log
    pub fn event_type(&self) -> &'static str {
        if self.answer.is_some() {
            "question_solved"
        } else {
            "question_failed"
        }
    }
}

/// Port for logging answer records.
///
/// Implementations write each record as a single entry (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible so that logging failures
/// never disturb answering.
pub trait AnswerLogger: Send + Sync {
    /// Record one question's outcome.
    fn log(&self, record: &AnswerRecord);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoAnswerLogger;

impl AnswerLogger for NoAnswerLogger {
    fn log(&self, _record: &AnswerRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(answer: Option<&str>) -> AnswerRecord {
        AnswerRecord {
            question_num: 1,
            platform: "cli".to_string(),
            question: "Capital of France?".to_string(),
            answer: answer.map(str::to_string),
            resolution: answer.map(|_| Resolution::Consensus),
            model_answers: vec![ModelAnswerEntry {
                model: "GROQ:llama".to_string(),
                answer: answer.map(str::to_string),
                status: "answered",
            }],
            errors: Vec::new(),
            time_taken_secs: 1.5,
        }
    }

    #[test]
    fn test_event_type() {
        assert_eq!(record(Some("Paris")).event_type(), "question_solved");
        assert_eq!(record(None).event_type(), "question_failed");
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(record(Some("Paris"))).unwrap();
        assert_eq!(value["answer"], "Paris");
        assert_eq!(value["resolution"], "consensus");
        assert_eq!(value["model_answers"][0]["model"], "GROQ:llama");
        assert!(value["answer"].is_string());

        let failed = serde_json::to_value(record(None)).unwrap();
        assert!(failed["answer"].is_null());
    }
}
