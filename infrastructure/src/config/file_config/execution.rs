//! Poll, query, retry and discovery settings from TOML
//!
//! ```toml
//! [poll]
//! max_concurrency = 5
//! deadline_per_model_ms = 1500
//! deadline_min_secs = 15
//! deadline_max_secs = 20
//!
//! [query]
//! timeout_secs = 20
//! temperature = 0.2
//! max_output_tokens = 100
//! max_answer_words = 5
//!
//! [retry]
//! max_attempts = 2
//! initial_delay_ms = 300
//! max_delay_ms = 900
//! multiplier = 1.5
//!
//! [discovery]
//! min_working_models = 2
//! max_concurrency = 4
//! probe_timeout_secs = 20
//! ```

use answer_quorum_application::{
    DiscoveryParams, PollDeadline, PollParams, QueryParams, RetryPolicy,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `[poll]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePollConfig {
    pub max_concurrency: usize,
    pub deadline_per_model_ms: u64,
    pub deadline_min_secs: u64,
    pub deadline_max_secs: u64,
}

impl Default for FilePollConfig {
    fn default() -> Self {
        let params = PollParams::default();
        Self {
            max_concurrency: params.max_concurrency,
            deadline_per_model_ms: params.deadline.per_model.as_millis() as u64,
            deadline_min_secs: params.deadline.min.as_secs(),
            deadline_max_secs: params.deadline.max.as_secs(),
        }
    }
}

impl FilePollConfig {
    pub fn to_poll_params(&self) -> PollParams {
        PollParams::default()
            .with_max_concurrency(self.max_concurrency)
            .with_deadline(PollDeadline {
                per_model: Duration::from_millis(self.deadline_per_model_ms),
                min: Duration::from_secs(self.deadline_min_secs),
                max: Duration::from_secs(self.deadline_max_secs),
            })
    }
}

/// `[query]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQueryConfig {
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub max_answer_words: usize,
    /// Overrides the built-in terse-answer instruction
    pub system_instruction: Option<String>,
}

impl Default for FileQueryConfig {
    fn default() -> Self {
        let params = QueryParams::default();
        Self {
            timeout_secs: params.timeout.as_secs(),
            temperature: params.temperature,
            max_output_tokens: params.max_output_tokens,
            max_answer_words: params.max_answer_words,
            system_instruction: None,
        }
    }
}

impl FileQueryConfig {
    pub fn to_query_params(&self) -> QueryParams {
        let defaults = QueryParams::default();
        QueryParams {
            system_instruction: self
                .system_instruction
                .clone()
                .unwrap_or(defaults.system_instruction),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
            max_answer_words: self.max_answer_words,
            ..QueryParams::default()
        }
    }
}

/// `[retry]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_delay_ms: policy.initial_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
            multiplier: policy.multiplier,
        }
    }
}

impl FileRetryConfig {
    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            multiplier: self.multiplier,
        }
    }
}

/// `[discovery]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscoveryConfig {
    pub min_working_models: usize,
    /// Probes in flight at once
    pub max_concurrency: usize,
    /// Also bounds the model listing request
    pub probe_timeout_secs: u64,
}

impl Default for FileDiscoveryConfig {
    fn default() -> Self {
        let params = DiscoveryParams::default();
        Self {
            min_working_models: params.min_working_models,
            max_concurrency: params.max_concurrency,
            probe_timeout_secs: params.timeout.as_secs(),
        }
    }
}

impl FileDiscoveryConfig {
    pub fn to_discovery_params(&self) -> DiscoveryParams {
        DiscoveryParams::default()
            .with_min_working_models(self.min_working_models)
            .with_max_concurrency(self.max_concurrency)
            .with_timeout(Duration::from_secs(self.probe_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_application_defaults() {
        let config = super::super::FileConfig::default();
        assert_eq!(config.poll.to_poll_params(), PollParams::default());
        assert_eq!(config.query.to_query_params(), QueryParams::default());
        assert_eq!(config.retry.to_retry_policy(), RetryPolicy::default());
        assert_eq!(
            config.discovery.to_discovery_params(),
            DiscoveryParams::default()
        );
    }

    #[test]
    fn test_execution_sections_deserialize() {
        let toml_str = r#"
[poll]
max_concurrency = 8
deadline_max_secs = 30

[query]
timeout_secs = 10
system_instruction = "Reply with one word."

[retry]
max_attempts = 3

[discovery]
max_concurrency = 1
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();

        let poll = config.poll.to_poll_params();
        assert_eq!(poll.max_concurrency, 8);
        assert_eq!(poll.deadline.max, Duration::from_secs(30));
        assert_eq!(poll.deadline.min, Duration::from_secs(15));

        let query = config.query.to_query_params();
        assert_eq!(query.timeout, Duration::from_secs(10));
        assert_eq!(query.system_instruction, "Reply with one word.");
        assert_eq!(query.max_output_tokens, 100);

        assert_eq!(config.retry.to_retry_policy().max_attempts, 3);

        let discovery = config.discovery.to_discovery_params();
        assert_eq!(discovery.max_concurrency, 1);
        assert_eq!(discovery.min_working_models, 2);
    }
}
