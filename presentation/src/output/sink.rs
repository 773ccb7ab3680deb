//! Prints each finished question to stdout

use crate::cli::commands::OutputFormat;
use crate::output::console::ConsoleFormatter;
use crate::output::formatter::OutputFormatter;
use answer_quorum_application::{AnswerSink, SolveReport};

/// [`AnswerSink`] that renders reports with a formatter in the chosen format
pub struct ConsoleAnswerSink<F: OutputFormatter = ConsoleFormatter> {
    formatter: F,
    format: OutputFormat,
}

impl ConsoleAnswerSink {
    pub fn new(format: OutputFormat) -> Self {
        Self::with_formatter(ConsoleFormatter, format)
    }
}

impl<F: OutputFormatter> ConsoleAnswerSink<F> {
    pub fn with_formatter(formatter: F, format: OutputFormat) -> Self {
        Self { formatter, format }
    }

    pub fn render(&self, report: &SolveReport) -> String {
        match self.format {
            OutputFormat::Answer => self.formatter.format_answer_only(report),
            OutputFormat::Full => self.formatter.format(report),
            OutputFormat::Json => self.formatter.format_json(report),
        }
    }
}

impl<F: OutputFormatter + Send + Sync> AnswerSink for ConsoleAnswerSink<F> {
    fn deliver(&self, report: &SolveReport) {
        println!("{}", self.render(report));
    }
}
