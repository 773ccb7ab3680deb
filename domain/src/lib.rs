//! Domain layer for answer-quorum
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Poll
//!
//! One question is sent to many models at once. Each model either answers,
//! fails, or is still running when the poll deadline passes.
//!
//! ## Quorum
//!
//! Model answers are short and noisy. They are cleaned, normalized and
//! compared with a tiered similarity score; an answer that enough other
//! answers agree with wins. Without a quorum the resolver falls back to the
//! primary provider's answer, then the best-supported answer, then the
//! first one.

pub mod answer;
pub mod core;
pub mod poll;
pub mod quorum;

// Re-export commonly used types
pub use answer::{
    AnswerExtractor, AnswerField, FieldSelection, MATCH_THRESHOLD, MatchStrategy, OptionMatch,
    match_option, normalize,
};
pub use core::{
    error::DomainError,
    identity::{ModelIdentity, Provider, dedup_identities},
    question::Question,
};
pub use poll::{Answer, ModelResult, ModelStatus, PollCounts, PollOutcome, RawResponse};

// Re-export quorum types
pub use quorum::{
    AnswerVote, ConsensusDecision, ConsensusPolicy, ConsensusResolver, DEFAULT_MIN_REQUIRED,
    DEFAULT_REQUIRED_RATIO, QuorumRequirement, Resolution,
};
