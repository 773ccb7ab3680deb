//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod consensus;
mod execution;
mod providers;

pub use consensus::FileConsensusConfig;
pub use execution::{FileDiscoveryConfig, FilePollConfig, FileQueryConfig, FileRetryConfig};
pub use providers::{FileProviderConfig, FileProvidersConfig};

use answer_quorum_application::AppConfig;
use answer_quorum_domain::QuorumRequirement;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("consensus.required_ratio must be in (0, 1], got {0}")]
    InvalidRequiredRatio(f64),

    #[error("consensus.min_required cannot be 0")]
    InvalidMinRequired,

    #[error("{0} cannot be 0")]
    InvalidConcurrency(&'static str),

    #[error("poll.deadline_min_secs ({min}) exceeds poll.deadline_max_secs ({max})")]
    InvalidDeadline { min: u64, max: u64 },

    #[error("retry.max_attempts cannot be 0")]
    InvalidAttempts,

    #[error("retry.multiplier must be at least 1.0, got {0}")]
    InvalidMultiplier(f64),

    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("query.max_answer_words cannot be 0")]
    InvalidAnswerWords,
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write the JSONL answer log
    pub enabled: bool,
    pub answer_log: PathBuf,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            answer_log: PathBuf::from("logs/answers.jsonl"),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Quorum and fallback settings
    pub consensus: FileConsensusConfig,
    /// Fan-out width and collection deadline
    pub poll: FilePollConfig,
    /// Prompt, sampling and per-call timeout
    pub query: FileQueryConfig,
    pub retry: FileRetryConfig,
    pub discovery: FileDiscoveryConfig,
    /// Per-provider endpoints and key variables
    pub providers: FileProvidersConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let ratio = self.consensus.required_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigValidationError::InvalidRequiredRatio(ratio));
        }
        if self.consensus.min_required == 0 {
            return Err(ConfigValidationError::InvalidMinRequired);
        }

        if self.poll.max_concurrency == 0 {
            return Err(ConfigValidationError::InvalidConcurrency("poll.max_concurrency"));
        }
        if self.poll.deadline_min_secs > self.poll.deadline_max_secs {
            return Err(ConfigValidationError::InvalidDeadline {
                min: self.poll.deadline_min_secs,
                max: self.poll.deadline_max_secs,
            });
        }
        if self.poll.deadline_max_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout("poll.deadline_max_secs"));
        }

        if self.query.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout("query.timeout_secs"));
        }
        if self.query.max_answer_words == 0 {
            return Err(ConfigValidationError::InvalidAnswerWords);
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigValidationError::InvalidAttempts);
        }
        if self.retry.multiplier < 1.0 {
            return Err(ConfigValidationError::InvalidMultiplier(self.retry.multiplier));
        }

        if self.discovery.max_concurrency == 0 {
            return Err(ConfigValidationError::InvalidConcurrency(
                "discovery.max_concurrency",
            ));
        }
        if self.discovery.probe_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout(
                "discovery.probe_timeout_secs",
            ));
        }

        Ok(())
    }

    /// Validate and convert into the application configuration
    pub fn to_app_config(&self) -> Result<AppConfig, ConfigValidationError> {
        self.validate()?;
        let requirement =
            QuorumRequirement::new(self.consensus.min_required, self.consensus.required_ratio)
                .map_err(|_| {
                    ConfigValidationError::InvalidRequiredRatio(self.consensus.required_ratio)
                })?;

        Ok(AppConfig::new(
            self.consensus.to_policy(requirement),
            self.query.to_query_params(),
            self.retry.to_retry_policy(),
            self.poll.to_poll_params(),
            self.discovery.to_discovery_params(),
        ))
    }
}
