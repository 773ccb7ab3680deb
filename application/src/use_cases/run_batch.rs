//! Run Batch use case
//!
//! Answers questions from a [`QuestionSource`] one after another until the
//! source runs dry or the run is cancelled. Cancellation is checked between
//! questions; a question already being solved is finished first.

use crate::ports::progress::PollProgressNotifier;
use crate::ports::provider_gateway::ProviderGateway;
use crate::ports::question_source::{AnswerSink, QuestionSource};
use crate::session::SessionState;
use crate::use_cases::solve_question::{SolveInput, SolveQuestionUseCase};
use answer_quorum_domain::ModelIdentity;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Settings applied to every question of a batch
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub models: Vec<ModelIdentity>,
    pub platform: String,
    pub required_matches: Option<usize>,
}

impl BatchInput {
    pub fn new(models: Vec<ModelIdentity>) -> Self {
        Self {
            models,
            platform: "cli".to_string(),
            required_matches: None,
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_required_matches(mut self, required: Option<usize>) -> Self {
        self.required_matches = required;
        self
    }
}

/// How a batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStop {
    /// The source had no more questions
    Exhausted,
    Cancelled,
    /// The source failed to produce the next question
    SourceError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub attempted: usize,
    pub solved: usize,
    pub failed: usize,
    pub stopped: BatchStop,
}

/// Use case for answering a stream of questions
pub struct RunBatchUseCase<'a, G: ProviderGateway + 'static> {
    solve: &'a SolveQuestionUseCase<G>,
    sink: &'a dyn AnswerSink,
    progress: &'a dyn PollProgressNotifier,
}

impl<'a, G: ProviderGateway + 'static> RunBatchUseCase<'a, G> {
    pub fn new(
        solve: &'a SolveQuestionUseCase<G>,
        sink: &'a dyn AnswerSink,
        progress: &'a dyn PollProgressNotifier,
    ) -> Self {
        Self {
            solve,
            sink,
            progress,
        }
    }

    pub async fn execute(
        &self,
        input: &BatchInput,
        source: &mut dyn QuestionSource,
        session: &mut SessionState,
        cancel: &CancellationToken,
    ) -> BatchSummary {
        let (solved_before, failed_before) = (session.stats().solved, session.stats().failed);

        let stopped = loop {
            if cancel.is_cancelled() {
                break BatchStop::Cancelled;
            }

            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break BatchStop::Cancelled,
                next = source.next_question() => next,
            };

            let question = match next {
                Ok(Some(question)) => question,
                Ok(None) => break BatchStop::Exhausted,
                Err(e) => {
                    warn!("Question source failed: {}", e);
                    break BatchStop::SourceError;
                }
            };

            let solve_input = SolveInput::new(question, input.models.clone())
                .with_platform(input.platform.clone())
                .with_required_matches(input.required_matches);
            let report = self
                .solve
                .execute_with_progress(solve_input, session, self.progress)
                .await;
            self.sink.deliver(&report);
        };

        let solved = session.stats().solved - solved_before;
        let failed = session.stats().failed - failed_before;
        info!(
            "Batch finished ({:?}): {} solved, {} failed",
            stopped, solved, failed
        );

        BatchSummary {
            attempted: solved + failed,
            solved,
            failed,
            stopped,
        }
    }
}
