//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`QueryParams`] - prompt, sampling and per-call timeout
//! - [`RetryPolicy`] - attempts and backoff per model
//! - [`PollParams`] - fan-out width and collection deadline
//! - [`DiscoveryParams`] - model probing
//! - [`AppConfig`] - container for all of the above plus the consensus policy

pub mod app_config;
pub mod discovery_params;
pub mod poll_params;
pub mod query_params;
pub mod retry_policy;

pub use app_config::AppConfig;
pub use discovery_params::DiscoveryParams;
pub use poll_params::{PollDeadline, PollParams};
pub use query_params::QueryParams;
pub use retry_policy::RetryPolicy;
