//! Solve Question use case
//!
//! Orchestrates one question end to end: poll the models, resolve the
//! answers, update the session and write the answer log.

use crate::ports::answer_log::{
    AnswerLogger, AnswerRecord, MAX_LOGGED_QUESTION_CHARS, ModelAnswerEntry, NoAnswerLogger,
};
use crate::ports::progress::{NoProgress, PollProgressNotifier};
use crate::ports::provider_gateway::ProviderGateway;
use crate::session::SessionState;
use crate::use_cases::poll_models::ParallelPoll;
use answer_quorum_domain::core::string::clip_chars;
use answer_quorum_domain::{
    AnswerField, ConsensusDecision, ConsensusResolver, FieldSelection, ModelIdentity, ModelStatus,
    PollOutcome, Question,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Why a question could not be answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No models were given to poll
    NoModels,
    /// Every model failed, timed out or returned nothing usable
    NoAnswers,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::NoModels => write!(f, "no models to poll"),
            FailureReason::NoAnswers => write!(f, "no model produced an answer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SolveOutcome {
    Solved(ConsensusDecision),
    Failed { reason: FailureReason },
}

impl SolveOutcome {
    pub fn answer(&self) -> Option<&str> {
        match self {
            SolveOutcome::Solved(decision) => Some(&decision.answer),
            SolveOutcome::Failed { .. } => None,
        }
    }

    pub fn decision(&self) -> Option<&ConsensusDecision> {
        match self {
            SolveOutcome::Solved(decision) => Some(decision),
            SolveOutcome::Failed { .. } => None,
        }
    }
}

/// Input for the SolveQuestion use case
#[derive(Debug, Clone)]
pub struct SolveInput {
    pub question: Question,
    /// Models to poll, in the order answers are considered
    pub models: Vec<ModelIdentity>,
    /// Tag recorded in the answer log
    pub platform: String,
    /// Overrides the policy's quorum when set
    pub required_matches: Option<usize>,
    /// Field the final answer is delivered into
    pub field: AnswerField,
}

impl SolveInput {
    pub fn new(question: Question, models: Vec<ModelIdentity>) -> Self {
        Self {
            question,
            models,
            platform: "cli".to_string(),
            required_matches: None,
            field: AnswerField::TextField,
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

    pub fn with_field(mut self, field: AnswerField) -> Self {
        self.field = field;
        self
    }
}

/// Everything known about one solved (or failed) question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveReport {
    /// 1-based position within the session
    pub question_num: usize,
    pub question: Question,
    pub outcome: SolveOutcome,
    /// Option picked for a choice field; `None` for text fields or when
    /// no option matches the answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<FieldSelection>,
    pub poll: PollOutcome,
}

/// Use case for answering one question
pub struct SolveQuestionUseCase<G: ProviderGateway + 'static> {
    poll: ParallelPoll<G>,
    resolver: ConsensusResolver,
    logger: Arc<dyn AnswerLogger>,
}

impl<G: ProviderGateway + 'static> SolveQuestionUseCase<G> {
    pub fn new(poll: ParallelPoll<G>, resolver: ConsensusResolver) -> Self {
        Self {
            poll,
            resolver,
            logger: Arc::new(NoAnswerLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn AnswerLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: SolveInput, session: &mut SessionState) -> SolveReport {
        self.execute_with_progress(input, session, &NoProgress)
            .await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: SolveInput,
        session: &mut SessionState,
        progress: &dyn PollProgressNotifier,
    ) -> SolveReport {
        info!("Solving: {}", input.question.preview(80));

        let (outcome, poll) = if input.models.is_empty() {
            (
                SolveOutcome::Failed {
                    reason: FailureReason::NoModels,
                },
                PollOutcome::default(),
            )
        } else {
            let poll = self
                .poll
                .poll_with_progress(&input.question, &input.models, progress)
                .await;
            let outcome = match self.resolver.resolve(&poll.answers, input.required_matches) {
                Some(decision) => SolveOutcome::Solved(decision),
                None => SolveOutcome::Failed {
                    reason: FailureReason::NoAnswers,
                },
            };
            (outcome, poll)
        };

        let question_num = match &outcome {
            SolveOutcome::Solved(decision) => {
                info!(
                    "Answer: {} ({}, {}/{} agree)",
                    decision.answer,
                    decision.resolution,
                    decision.support,
                    decision.total_answers
                );
                session.record_solved()
            }
            SolveOutcome::Failed { reason } => {
                warn!("Question failed: {}", reason);
                session.record_failed()
            }
        };

        let selection = select_option(&input.field, &outcome);
        let report = SolveReport {
            question_num,
            question: input.question,
            outcome,
            selection,
            poll,
        };
        self.logger.log(&answer_record(&report, &input.platform));
        report
    }
}

fn select_option(field: &AnswerField, outcome: &SolveOutcome) -> Option<FieldSelection> {
    if *field == AnswerField::TextField {
        return None;
    }
    let answer = outcome.answer()?;
    let selection = field.select(answer);
    match &selection {
        Some(FieldSelection::Choice(m)) => {
            info!("Matched option {} '{}' ({:?})", m.index + 1, m.label, m.strategy)
        }
        _ => warn!("No option matches '{}'", answer),
    }
    selection
}

fn answer_record(report: &SolveReport, platform: &str) -> AnswerRecord {
    let model_answers = report
        .poll
        .results
        .iter()
        .map(|result| {
            let (answer, status) = match &result.status {
                ModelStatus::Answered(text) => (Some(text.clone()), "answered"),
                ModelStatus::Unusable => (None, "unusable"),
                ModelStatus::Failed(_) => (None, "failed"),
                ModelStatus::TimedOut => (None, "timed_out"),
            };
            ModelAnswerEntry {
                model: result.identity.to_string(),
                answer,
                status,
            }
        })
        .collect();

    AnswerRecord {
        question_num: report.question_num,
        platform: platform.to_string(),
        question: clip_chars(report.question.content(), MAX_LOGGED_QUESTION_CHARS).to_string(),
        answer: report.outcome.answer().map(str::to_string),
        resolution: report.outcome.decision().map(|d| d.resolution),
        model_answers,
        errors: report.poll.errors.clone(),
        time_taken_secs: report.poll.elapsed.as_secs_f64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::ports::provider_gateway::GatewayError;
    use crate::use_cases::query_model::ModelQueryRunner;
    use crate::use_cases::test_support::{ScriptedGateway, Step, ids};
    use answer_quorum_domain::{MatchStrategy, Resolution};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryLogger {
        records: Mutex<Vec<AnswerRecord>>,
    }

    impl AnswerLogger for MemoryLogger {
        fn log(&self, record: &AnswerRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    fn use_case(
        gateway: ScriptedGateway,
        logger: Arc<MemoryLogger>,
    ) -> SolveQuestionUseCase<ScriptedGateway> {
        let runner =
            ModelQueryRunner::new(Arc::new(gateway)).with_retry(RetryPolicy::no_retry());
        SolveQuestionUseCase::new(ParallelPoll::new(runner), ConsensusResolver::default())
            .with_logger(logger)
    }

    #[tokio::test(start_paused = true)]
    async fn test_solves_by_consensus_and_logs() {
        let logger = Arc::new(MemoryLogger::default());
        let use_case = use_case(
            ScriptedGateway::new()
                .answer("perplexity:m1", "Paris")
                .answer("groq:m2", "paris")
                .answer("groq:m3", "Paris.")
                .answer("groq:m4", "London"),
            Arc::clone(&logger),
        );
        let mut session = SessionState::new();
        let input = SolveInput::new(
            Question::new("Capital of France?").unwrap(),
            ids(&["perplexity:m1", "groq:m2", "groq:m3", "groq:m4"]),
        )
        .with_platform("trivia");

        let report = use_case.execute(input, &mut session).await;

        assert_eq!(report.outcome.answer(), Some("Paris"));
        assert_eq!(
            report.outcome.decision().unwrap().resolution,
            Resolution::Consensus
        );
        assert_eq!(report.question_num, 1);
        assert_eq!(session.stats().solved, 1);

        let records = logger.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_type(), "question_solved");
        assert_eq!(records[0].platform, "trivia");
        assert_eq!(records[0].answer.as_deref(), Some("Paris"));
        assert_eq!(records[0].model_answers.len(), 4);
        assert_eq!(records[0].model_answers[3].answer.as_deref(), Some("London"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failures_is_a_failed_question() {
        let logger = Arc::new(MemoryLogger::default());
        let use_case = use_case(
            ScriptedGateway::new().script(
                "groq:a",
                vec![Step::err(GatewayError::Unauthorized("bad key".to_string()))],
            ),
            Arc::clone(&logger),
        );
        let mut session = SessionState::new();
        let input = SolveInput::new(Question::new("Q?").unwrap(), ids(&["groq:a", "groq:b"]));

        let report = use_case.execute(input, &mut session).await;

        assert_eq!(
            report.outcome,
            SolveOutcome::Failed {
                reason: FailureReason::NoAnswers
            }
        );
        assert_eq!(session.stats().failed, 1);
        assert_eq!(report.poll.errors.len(), 2);

        let records = logger.records.lock().unwrap();
        assert_eq!(records[0].event_type(), "question_failed");
        assert_eq!(records[0].answer, None);
        assert_eq!(records[0].resolution, None);
    }

    #[tokio::test]
    async fn test_no_models() {
        let logger = Arc::new(MemoryLogger::default());
        let use_case = use_case(ScriptedGateway::new(), Arc::clone(&logger));
        let mut session = SessionState::new();

        let report = use_case
            .execute(
                SolveInput::new(Question::new("Q?").unwrap(), Vec::new()),
                &mut session,
            )
            .await;

        assert_eq!(
            report.outcome,
            SolveOutcome::Failed {
                reason: FailureReason::NoModels
            }
        );
        assert_eq!(session.stats().failed, 1);
    }

    #[tokio::test]
    async fn test_logged_question_is_clipped() {
        let logger = Arc::new(MemoryLogger::default());
        let use_case = use_case(
            ScriptedGateway::new().answer("groq:a", "Yes"),
            Arc::clone(&logger),
        );
        let mut session = SessionState::new();
        let long = "why ".repeat(300);

        use_case
            .execute(
                SolveInput::new(Question::new(long).unwrap(), ids(&["groq:a"])),
                &mut session,
            )
            .await;

        let records = logger.records.lock().unwrap();
        assert_eq!(records[0].question.chars().count(), 500);
    }

    #[tokio::test]
    async fn test_session_numbers_questions() {
        let use_case = use_case(
            ScriptedGateway::new().answer("groq:a", "Yes"),
            Arc::new(MemoryLogger::default()),
        );
        let mut session = SessionState::new();

        for expected in 1..=3 {
            let report = use_case
                .execute(
                    SolveInput::new(Question::new("Q?").unwrap(), ids(&["groq:a"])),
                    &mut session,
                )
                .await;
            assert_eq!(report.question_num, expected);
        }
        assert_eq!(session.stats().solved, 3);
    }
    #[tokio::test(start_paused = true)]
    async fn test_errors_stay_with_their_question() {
        let use_case = use_case(
            ScriptedGateway::new()
                .answer("groq:a", "Yes")
                .script("groq:b", vec![Step::err(GatewayError::Timeout)]),
            Arc::new(MemoryLogger::default()),
        );
        let mut session = SessionState::new();

        for _ in 0..3 {
            let report = use_case
                .execute(
                    SolveInput::new(Question::new("Q?").unwrap(), ids(&["groq:a", "groq:b"])),
                    &mut session,
                )
                .await;
            assert_eq!(report.poll.errors, vec!["GROQ:b attempt 1: Timeout".to_string()]);
        }
        assert_eq!(session.stats().attempted(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_choice_field_selects_matching_option() {
        let use_case = use_case(
            ScriptedGateway::new()
                .answer("groq:a", "Jupiter")
                .answer("groq:b", "jupiter."),
            Arc::new(MemoryLogger::default()),
        );
        let mut session = SessionState::new();
        let field = AnswerField::SingleChoiceGroup(vec![
            "Saturn".to_string(),
            "The planet Jupiter".to_string(),
            "Mars".to_string(),
        ]);
        let input = SolveInput::new(
            Question::new("Largest planet?").unwrap(),
            ids(&["groq:a", "groq:b"]),
        )
        .with_field(field);

        let report = use_case.execute(input, &mut session).await;

        match &report.selection {
            Some(FieldSelection::Choice(m)) => {
                assert_eq!(m.index, 1);
                assert_eq!(m.label, "The planet Jupiter");
                assert_eq!(m.strategy, MatchStrategy::Substring);
            }
            other => panic!("unexpected selection {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmatched_or_text_field_has_no_selection() {
        let use_case = use_case(
            ScriptedGateway::new().answer("groq:a", "Jupiter"),
            Arc::new(MemoryLogger::default()),
        );
        let mut session = SessionState::new();
        let question = Question::new("Largest planet?").unwrap();

        let text = use_case
            .execute(SolveInput::new(question.clone(), ids(&["groq:a"])), &mut session)
            .await;
        assert_eq!(text.selection, None);

        let unmatched = use_case
            .execute(
                SolveInput::new(question, ids(&["groq:a"])).with_field(AnswerField::Dropdown(
                    vec!["Venus".to_string(), "Mercury".to_string()],
                )),
                &mut session,
            )
            .await;
        assert_eq!(unmatched.outcome.answer(), Some("Jupiter"));
        assert_eq!(unmatched.selection, None);
    }
}
