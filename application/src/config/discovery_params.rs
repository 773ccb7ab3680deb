//! Discovery parameters - how candidate models are probed.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryParams {
    /// Trivial prompt sent to each candidate
    pub probe_content: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
    /// Fewer working models than this is an error
    pub min_working_models: usize,
    /// Probes in flight at once
    pub max_concurrency: usize,
}

impl Default for DiscoveryParams {
    fn default() -> Self {
        Self {
            probe_content: "test".to_string(),
            temperature: 0.3,
            max_output_tokens: 10,
            timeout: Duration::from_secs(20),
            min_working_models: 2,
            max_concurrency: 4,
        }
    }
}

impl DiscoveryParams {
    pub fn with_min_working_models(mut self, min: usize) -> Self {
        self.min_working_models = min;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
