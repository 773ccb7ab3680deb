//! Query parameters - how each model is asked.
//!
//! [`QueryParams`] holds the prompt and sampling settings used for every
//! model in a poll. These are application-layer concerns, not domain policy.

use crate::ports::provider_gateway::ProviderRequest;
use answer_quorum_domain::Question;
use answer_quorum_domain::answer::DEFAULT_MAX_ANSWER_WORDS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// System instruction asking for a terse answer
pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "Output ONLY the direct answer in 2-3 words. No explanation.";

/// Prefix placed before the question in the user message
pub const DEFAULT_USER_PREFIX: &str = "Answer: ";

/// Prompt and sampling settings for answering a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub system_instruction: String,
    pub user_prefix: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Per-call timeout
    pub timeout: Duration,
    /// Words kept from a response by the answer extractor
    pub max_answer_words: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            user_prefix: DEFAULT_USER_PREFIX.to_string(),
            temperature: 0.2,
            max_output_tokens: 100,
            timeout: Duration::from_secs(20),
            max_answer_words: DEFAULT_MAX_ANSWER_WORDS,
        }
    }
}

impl QueryParams {
    // ==================== Builder Methods ====================

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_answer_words(mut self, max: usize) -> Self {
        self.max_answer_words = max;
        self
    }

    /// Build the provider request for a question
    pub fn request_for(&self, question: &Question) -> ProviderRequest {
        ProviderRequest::new(format!("{}{}", self.user_prefix, question.content()))
            .with_system_instruction(self.system_instruction.clone())
            .with_temperature(self.temperature)
            .with_max_output_tokens(self.max_output_tokens)
            .with_timeout(self.timeout)
    }
}
