//! Application configuration container.
//!
//! [`AppConfig`] groups the split configuration types into a single value the
//! binary builds once (from files, env and CLI flags) and hands to the use
//! cases.
//!
//! # Design
//!
//! Use cases receive only the slices they need. The container exists so that
//! the wiring code has one thing to load, override and print.
//!
//! | Type | Query | Poll | Solve | Discover |
//! |------|-------|------|-------|----------|
//! | `QueryParams` | Yes | Yes | Yes | No |
//! | `RetryPolicy` | Yes | Yes | Yes | No |
//! | `PollParams` | No | Yes | Yes | No |
//! | `ConsensusPolicy` | No | No | Yes | No |
//! | `DiscoveryParams` | No | No | No | Yes |

use crate::config::{DiscoveryParams, PollParams, QueryParams, RetryPolicy};
use answer_quorum_domain::{ConsensusPolicy, ConsensusResolver, Provider, QuorumRequirement};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    consensus: ConsensusPolicy,
    query: QueryParams,
    retry: RetryPolicy,
    poll: PollParams,
    discovery: DiscoveryParams,
}

impl AppConfig {
    pub fn new(
        consensus: ConsensusPolicy,
        query: QueryParams,
        retry: RetryPolicy,
        poll: PollParams,
        discovery: DiscoveryParams,
    ) -> Self {
        Self {
            consensus,
            query,
            retry,
            poll,
            discovery,
        }
    }

    // ==================== Accessors ====================

    pub fn consensus(&self) -> &ConsensusPolicy {
        &self.consensus
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn poll(&self) -> &PollParams {
        &self.poll
    }

    pub fn discovery(&self) -> &DiscoveryParams {
        &self.discovery
    }

    // ==================== Builder Methods (CLI overrides) ====================

    pub fn with_requirement(mut self, requirement: QuorumRequirement) -> Self {
        self.consensus = self.consensus.with_requirement(requirement);
        self
    }

    pub fn with_prefer_primary(mut self, prefer: bool) -> Self {
        self.consensus = self.consensus.with_prefer_primary(prefer);
        self
    }

    pub fn with_primary(mut self, primary: Provider) -> Self {
        self.consensus = self.consensus.with_primary(primary);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_poll(mut self, poll: PollParams) -> Self {
        self.poll = poll;
        self
    }

    // ==================== Factories ====================

    /// Resolver configured with this consensus policy
    pub fn resolver(&self) -> ConsensusResolver {
        ConsensusResolver::new(self.consensus)
    }
}
