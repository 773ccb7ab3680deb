//! Poll parameters - fan-out width and the collection deadline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deadline for collecting one poll: `clamp(n × per_model, min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDeadline {
    pub per_model: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl Default for PollDeadline {
    fn default() -> Self {
        Self {
            per_model: Duration::from_millis(1500),
            min: Duration::from_secs(15),
            max: Duration::from_secs(20),
        }
    }
}

impl PollDeadline {
    /// Deadline for a poll over `models` models
    pub fn for_models(&self, models: usize) -> Duration {
        let scaled = self.per_model.saturating_mul(models.min(u32::MAX as usize) as u32);
        scaled.max(self.min).min(self.max)
    }
}

/// Fan-out settings for a poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollParams {
    /// Maximum in-flight queries
    pub max_concurrency: usize,
    pub deadline: PollDeadline,
}

impl Default for PollParams {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            deadline: PollDeadline::default(),
        }
    }
}

impl PollParams {
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    pub fn with_deadline(mut self, deadline: PollDeadline) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline_for(&self, models: usize) -> Duration {
        self.deadline.for_models(models)
    }
}
