//! Console output formatter for answer reports

use crate::output::formatter::OutputFormatter;
use answer_quorum_application::{BatchSummary, DiscoveryReport, SessionStats, SolveOutcome, SolveReport};
use answer_quorum_domain::{FieldSelection, ModelStatus, Resolution};
use colored::Colorize;

/// Formats answer reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &SolveReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Question {}", report.question_num)));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            report.question.content()
        ));

        // Per-model results
        output.push_str(&Self::section_header("Model Answers"));
        for result in &report.poll.results {
            let line = match &result.status {
                ModelStatus::Answered(answer) => {
                    format!("  {} {:<40} {}", "v".green(), result.identity.to_string(), answer)
                }
                ModelStatus::Unusable => format!(
                    "  {} {:<40} {}",
                    "?".yellow(),
                    result.identity.to_string(),
                    "(no usable answer)".dimmed()
                ),
                ModelStatus::Failed(error) => format!(
                    "  {} {:<40} {}",
                    "x".red(),
                    result.identity.to_string(),
                    error.dimmed()
                ),
                ModelStatus::TimedOut => format!(
                    "  {} {:<40} {}",
                    "-".yellow(),
                    result.identity.to_string(),
                    "(timed out)".dimmed()
                ),
            };
            output.push_str(&line);
            output.push('\n');
        }

        // Decision
        output.push_str(&Self::section_header("Decision"));
        match &report.outcome {
            SolveOutcome::Solved(decision) => {
                output.push_str(&format!(
                    "\n{} {}\n",
                    "Answer:".green().bold(),
                    decision.answer.bold()
                ));
                output.push_str(&format!(
                    "{} {} ({}/{} agree, {} required)\n",
                    "Resolution:".cyan(),
                    Self::resolution_label(decision.resolution),
                    decision.support,
                    decision.total_answers,
                    decision.required_matches
                ));
                output.push_str(&format!("{} {}\n", "From:".cyan(), decision.identity));
                if let Some(FieldSelection::Choice(m)) = &report.selection {
                    output.push_str(&format!(
                        "{} {} (option {}, {:.2})\n",
                        "Selected:".cyan(),
                        m.label.bold(),
                        m.index + 1,
                        m.score
                    ));
                }
            }
            SolveOutcome::Failed { reason } => {
                output.push_str(&format!("\n{} {}\n", "Failed:".red().bold(), reason));
            }
        }

        if !report.poll.errors.is_empty() {
            output.push_str(&format!("\n{}\n", "Errors:".yellow().bold()));
            for error in &report.poll.errors {
                output.push_str(&format!("  * {}\n", error));
            }
        }

        output.push_str(&format!(
            "\n{} {:.1}s\n",
            "Elapsed:".dimmed(),
            report.poll.elapsed.as_secs_f64()
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &SolveReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the answer only (concise output).
    ///
    /// A matched option label replaces the raw answer.
    pub fn format_answer_only(report: &SolveReport) -> String {
        match &report.outcome {
            SolveOutcome::Solved(decision) => match &report.selection {
                Some(FieldSelection::Choice(m)) => m.label.clone(),
                _ => decision.answer.clone(),
            },
            SolveOutcome::Failed { reason } => {
                format!("{} {}", "No answer:".red().bold(), reason)
            }
        }
    }

    /// Format the end-of-batch summary
    pub fn format_batch_summary(summary: &BatchSummary, stats: &SessionStats) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header("Session Summary"));
        output.push_str(&format!(
            "  {} {}\n  {} {}\n  {} {}\n",
            "Solved:".green(),
            stats.solved,
            "Failed:".red(),
            stats.failed,
            "Success rate:".cyan(),
            format!("{:.0}%", stats.success_rate() * 100.0)
        ));
        output.push_str(&format!(
            "  {} {:.1}s\n",
            "Elapsed:".dimmed(),
            stats.elapsed_secs()
        ));
        output.push_str(&format!(
            "  {} {:?} after {} question(s)\n",
            "Stopped:".dimmed(),
            summary.stopped,
            summary.attempted
        ));
        output
    }

    /// Format the result of model discovery
    pub fn format_discovery(report: &DiscoveryReport) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header(&format!(
            "Working Models ({}/{})",
            report.working.len(),
            report.candidates()
        )));
        for identity in &report.working {
            output.push_str(&format!("  {} {}\n", "v".green(), identity));
        }
        for failed in &report.failed {
            output.push_str(&format!(
                "  {} {:<40} {}\n",
                "x".red(),
                failed.identity.to_string(),
                failed.error.dimmed()
            ));
        }
        output
    }

    fn resolution_label(resolution: Resolution) -> String {
        match resolution {
            Resolution::Consensus => "consensus".green().to_string(),
            Resolution::ProviderPreference => "provider preference".yellow().to_string(),
            Resolution::BestMatch => "best match".yellow().to_string(),
            Resolution::FirstAvailable => "first available".red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &SolveReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &SolveReport) -> String {
        Self::format_json(report)
    }

    fn format_answer_only(&self, report: &SolveReport) -> String {
        Self::format_answer_only(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answer_quorum_application::FailureReason;
    use answer_quorum_domain::{
        Answer, AnswerField, ConsensusResolver, ModelIdentity, ModelResult, PollOutcome, Question,
    };
    use std::time::Duration;

    fn id(s: &str) -> ModelIdentity {
        s.parse().unwrap()
    }

    fn solved_report() -> SolveReport {
        let answers = vec![
            Answer::new(id("groq:a"), "Canberra"),
            Answer::new(id("groq:b"), "canberra"),
            Answer::new(id("perplexity:sonar"), "Canberra."),
        ];
        let decision = ConsensusResolver::default().resolve(&answers, None).unwrap();
        let results = vec![
            ModelResult {
                identity: id("groq:a"),
                status: ModelStatus::Answered("Canberra".to_string()),
                raw_text: Some("Canberra".to_string()),
            },
            ModelResult {
                identity: id("groq:c"),
                status: ModelStatus::TimedOut,
                raw_text: None,
            },
        ];
        SolveReport {
            question_num: 1,
            question: Question::new("Capital of Australia?").unwrap(),
            outcome: SolveOutcome::Solved(decision),
            selection: None,
            poll: PollOutcome {
                answers,
                results,
                errors: vec!["Timeout: 1 model(s) slow".to_string()],
                elapsed: Duration::from_millis(1500),
            },
        }
    }

    #[test]
    fn test_answer_only() {
        assert_eq!(ConsoleFormatter::format_answer_only(&solved_report()), "Canberra");
    }

    #[test]
    fn test_full_format_lists_models_and_errors() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&solved_report());
        assert!(text.contains("Capital of Australia?"));
        assert!(text.contains("GROQ:a"));
        assert!(text.contains("(timed out)"));
        assert!(text.contains("Answer: Canberra"));
        assert!(text.contains("consensus (3/3 agree, 3 required)"));
        assert!(text.contains("Timeout: 1 model(s) slow"));
    }

    #[test]
    fn test_json_format() {
        let json = ConsoleFormatter::format_json(&solved_report());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcome"]["outcome"], "solved");
        assert_eq!(value["outcome"]["answer"], "Canberra");
        assert_eq!(value["question_num"], 1);
    }

    #[test]
    fn test_failed_report() {
        colored::control::set_override(false);
        let report = SolveReport {
            outcome: SolveOutcome::Failed {
                reason: FailureReason::NoAnswers,
            },
            ..solved_report()
        };
        assert_eq!(
            ConsoleFormatter::format_answer_only(&report),
            "No answer: no model produced an answer"
        );
        assert!(ConsoleFormatter::format(&report).contains("Failed: no model produced an answer"));
    }

    #[test]
    fn test_selected_option_is_shown() {
        colored::control::set_override(false);
        let field = AnswerField::SingleChoiceGroup(vec![
            "Sydney".to_string(),
            "Canberra, ACT".to_string(),
        ]);
        let report = SolveReport {
            selection: field.select("Canberra"),
            ..solved_report()
        };

        assert_eq!(ConsoleFormatter::format_answer_only(&report), "Canberra, ACT");
        assert!(ConsoleFormatter::format(&report).contains("Selected: Canberra, ACT (option 2, 0.95)"));

        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&report)).unwrap();
        assert_eq!(value["selection"]["Choice"]["label"], "Canberra, ACT");
        assert_eq!(value["selection"]["Choice"]["strategy"], "substring");
    }

    #[test]
    fn test_json_omits_missing_selection() {
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&solved_report())).unwrap();
        assert!(value.get("selection").is_none());
    }
}
