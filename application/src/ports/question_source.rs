//! Question source and answer sink ports
//!
//! The batch loop pulls questions from a [`QuestionSource`] until it runs dry
//! and hands every report to an [`AnswerSink`].

use crate::use_cases::solve_question::SolveReport;
use answer_quorum_domain::Question;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuestionSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source closed: {0}")]
    Closed(String),
}

/// Where questions come from
#[async_trait]
pub trait QuestionSource: Send {
    /// Next question, or `None` when there are no more
    async fn next_question(&mut self) -> Result<Option<Question>, QuestionSourceError>;
}

/// Where finished reports go
pub trait AnswerSink: Send + Sync {
    fn deliver(&self, report: &SolveReport);
}

/// Question source over a fixed list, mostly for tests and one-shot runs
pub struct VecQuestionSource {
    questions: std::vec::IntoIter<Question>,
}

impl VecQuestionSource {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into_iter(),
        }
    }
}

#[async_trait]
impl QuestionSource for VecQuestionSource {
    async fn next_question(&mut self) -> Result<Option<Question>, QuestionSourceError> {
        Ok(self.questions.next())
    }
}
