//! Output formatter trait

use answer_quorum_application::SolveReport;

/// Trait for formatting solved (or failed) questions
pub trait OutputFormatter {
    /// Format the complete report
    fn format(&self, report: &SolveReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &SolveReport) -> String;

    /// Format the selected answer only (concise output)
    fn format_answer_only(&self, report: &SolveReport) -> String;
}
