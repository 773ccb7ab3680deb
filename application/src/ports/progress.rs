//! Progress notification port
//!
//! Defines the interface for reporting progress while a poll runs.

use answer_quorum_domain::{ModelIdentity, PollOutcome};
use std::time::Duration;

/// Callback for progress updates during a poll
///
/// Implementations live in the presentation layer. Notifications are
/// observational only; they never influence which answers are collected.
pub trait PollProgressNotifier: Send + Sync {
    /// Called when a poll starts
    fn on_poll_start(&self, total_models: usize, deadline: Duration);

    /// Called when one model's query finishes (after retries)
    fn on_model_complete(&self, identity: &ModelIdentity, success: bool);

    /// Called when the poll has collected everything it is going to
    fn on_poll_complete(&self, outcome: &PollOutcome);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl PollProgressNotifier for NoProgress {
    fn on_poll_start(&self, _total_models: usize, _deadline: Duration) {}
    fn on_model_complete(&self, _identity: &ModelIdentity, _success: bool) {}
    fn on_poll_complete(&self, _outcome: &PollOutcome) {}
}
