//! Session state shared across the questions of one run.
//!
//! Owned by the control flow and passed by `&mut` into the solve use case;
//! poll workers never touch it.

use chrono::{DateTime, Utc};

/// Counters for one run
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub solved: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
}

impl SessionStats {
    pub fn attempted(&self) -> usize {
        self.solved + self.failed
    }

    /// Solved share of attempted questions, `0.0` before any attempt
    pub fn success_rate(&self) -> f64 {
        match self.attempted() {
            0 => 0.0,
            n => self.solved as f64 / n as f64,
        }
    }

    /// Seconds since the run started
    pub fn elapsed_secs(&self) -> f64 {
        (Utc::now() - self.started_at).num_milliseconds().max(0) as f64 / 1000.0
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            solved: 0,
            failed: 0,
            started_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    stats: SessionStats,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Record a solved question, returning its 1-based number
    pub fn record_solved(&mut self) -> usize {
        self.stats.solved += 1;
        self.stats.attempted()
    }

    /// Record a failed question, returning its 1-based number
    pub fn record_failed(&mut self) -> usize {
        self.stats.failed += 1;
        self.stats.attempted()
    }
}
