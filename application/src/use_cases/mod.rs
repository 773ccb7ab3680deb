//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod discover_models;
pub mod poll_models;
pub mod query_model;
pub mod run_batch;
pub mod solve_question;

#[cfg(test)]
pub(crate) mod test_support;
