//! Presentation layer for answer-quorum
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the stdin question source for batch mode.

pub mod cli;
pub mod input;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{ChoiceKind, Cli, OutputFormat, ProgressMode};
pub use input::line_source::{LineQuestionSource, StdinQuestionSource};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use output::sink::ConsoleAnswerSink;
pub use progress::reporter::{ProgressReporter, SimpleProgress, stderr_is_terminal};
