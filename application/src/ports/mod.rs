//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod answer_log;
pub mod progress;
pub mod provider_gateway;
pub mod question_source;
