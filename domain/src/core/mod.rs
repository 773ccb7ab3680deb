//! Core domain concepts shared across all subdomains.
//!
//! - [`identity::ModelIdentity`]: a (provider, model) pair that can be polled
//! - [`question::Question`]: a validated question to pose to the models
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod identity;
pub mod question;
pub mod string;
