//! Application layer for answer-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod session;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AppConfig, DiscoveryParams, PollDeadline, PollParams, QueryParams, RetryPolicy};
pub use ports::{
    answer_log::{AnswerLogger, AnswerRecord, ModelAnswerEntry, NoAnswerLogger},
    progress::{NoProgress, PollProgressNotifier},
    provider_gateway::{GatewayError, ProviderGateway, ProviderRequest},
    question_source::{AnswerSink, QuestionSource, QuestionSourceError, VecQuestionSource},
};
pub use session::{SessionState, SessionStats};
pub use use_cases::discover_models::{
    DiscoverModelsUseCase, DiscoveryError, DiscoveryReport, FailedProbe,
};
pub use use_cases::poll_models::ParallelPoll;
pub use use_cases::query_model::ModelQueryRunner;
pub use use_cases::run_batch::{BatchInput, BatchStop, BatchSummary, RunBatchUseCase};
pub use use_cases::solve_question::{
    FailureReason, SolveInput, SolveOutcome, SolveQuestionUseCase, SolveReport,
};
