//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No models configured for the poll")]
    NoModels,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid model identity: {0} (expected PROVIDER:MODEL)")]
    InvalidIdentity(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid quorum requirement: {0}")]
    InvalidRequirement(String),
}
