//! Consensus configuration from TOML (`[consensus]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [consensus]
//! required_ratio = 0.6     # fraction of answers that must agree
//! min_required = 3         # absolute floor, capped at the answer count
//! prefer_primary = true    # fall back to the primary provider's answer
//! primary_provider = "perplexity"
//! ```

use answer_quorum_domain::{
    ConsensusPolicy, DEFAULT_MIN_REQUIRED, DEFAULT_REQUIRED_RATIO, Provider, QuorumRequirement,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    pub required_ratio: f64,
    pub min_required: usize,
    pub prefer_primary: bool,
    pub primary_provider: Provider,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            required_ratio: DEFAULT_REQUIRED_RATIO,
            min_required: DEFAULT_MIN_REQUIRED,
            prefer_primary: true,
            primary_provider: Provider::Perplexity,
        }
    }
}

impl FileConsensusConfig {
    /// Convert to a domain policy. Callers validate the ratio first.
    pub(super) fn to_policy(&self, requirement: QuorumRequirement) -> ConsensusPolicy {
        ConsensusPolicy::default()
            .with_requirement(requirement)
            .with_prefer_primary(self.prefer_primary)
            .with_primary(self.primary_provider)
    }
}
