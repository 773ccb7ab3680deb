//! Progress reporting while a poll runs

use answer_quorum_application::PollProgressNotifier;
use answer_quorum_domain::{ModelIdentity, PollOutcome};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Whether a progress bar on stderr would be drawn
pub fn stderr_is_terminal() -> bool {
    !ProgressDrawTarget::stderr().is_hidden()
}

/// Reports progress with one progress bar per poll
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn poll_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut guard) = self.bar.lock() {
            f(&mut guard);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PollProgressNotifier for ProgressReporter {
    fn on_poll_start(&self, total_models: usize, deadline: Duration) {
        let pb = ProgressBar::new(total_models as u64);
        pb.set_style(Self::poll_style());
        pb.set_prefix("Polling");
        pb.set_message(format!("deadline {}s", deadline.as_secs()));
        pb.enable_steady_tick(Duration::from_millis(120));
        self.with_bar(|bar| *bar = Some(pb));
    }

    fn on_model_complete(&self, identity: &ModelIdentity, success: bool) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.as_ref() {
                let status = if success {
                    format!("{} {}", "v".green(), identity)
                } else {
                    format!("{} {}", "x".red(), identity)
                };
                pb.set_message(status);
                pb.inc(1);
            }
        });
    }

    fn on_poll_complete(&self, outcome: &PollOutcome) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.take() {
                let counts = outcome.counts();
                pb.finish_and_clear();
                eprintln!(
                    "{} {}/{} answered{}",
                    "Poll complete:".green(),
                    counts.answered,
                    counts.requested,
                    if counts.timed_out > 0 {
                        format!(", {} timed out", counts.timed_out)
                    } else {
                        String::new()
                    }
                );
            }
        });
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl PollProgressNotifier for SimpleProgress {
    fn on_poll_start(&self, total_models: usize, deadline: Duration) {
        eprintln!(
            "{} {} ({} models, {}s deadline)",
            "->".cyan(),
            "Polling".bold(),
            total_models,
            deadline.as_secs()
        );
    }

    fn on_model_complete(&self, identity: &ModelIdentity, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), identity);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), identity);
        }
    }

    fn on_poll_complete(&self, outcome: &PollOutcome) {
        for identity in outcome.timed_out() {
            eprintln!("  {} {} (timed out)", "-".yellow(), identity);
        }
        eprintln!();
    }
}
