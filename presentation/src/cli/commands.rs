//! CLI command definitions

use answer_quorum_domain::AnswerField;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the selected answer
    Answer,
    /// The answer plus every model's result and the resolution
    Full,
    /// JSON report per question
    Json,
}

/// Shape of the choice field built from `--option`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChoiceKind {
    /// Radio group, exactly one option
    Single,
    /// Checkbox group
    Multi,
    /// Select element
    Dropdown,
}

/// How poll progress is shown on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProgressMode {
    /// Progress bar on a terminal, plain lines otherwise
    Auto,
    /// Progress bar
    Bar,
    /// One line per model
    Lines,
}

impl ProgressMode {
    /// Settle `Auto` for the given stderr
    pub fn resolve(self, stderr_is_terminal: bool) -> Self {
        match self {
            ProgressMode::Auto if stderr_is_terminal => ProgressMode::Bar,
            ProgressMode::Auto => ProgressMode::Lines,
            mode => mode,
        }
    }
}

/// CLI arguments for answer-quorum
#[derive(Parser, Debug)]
#[command(name = "answer-quorum")]
#[command(author, version, about = "Ask several LLMs a short question and pick the answer they agree on")]
#[command(long_about = r#"
answer-quorum sends one short-answer question to many models at once and
selects the answer most of them agree on.

Each run:
1. Discovery: probe the configured providers and keep the models that respond
   (skipped when models are given with -m)
2. Poll: ask every model in parallel, collecting what arrives before the deadline
3. Consensus: normalize and compare the answers; fall back to the primary
   provider, then the best-supported answer, when there is no quorum

API keys are read from PERPLEXITY_API_KEY and GROQ_API_KEY.

Configuration files are loaded from (in priority order):
1. ANSWER_QUORUM_* env vars    e.g. ANSWER_QUORUM_CONSENSUS__REQUIRED_RATIO=0.5
2. --config <path>             Explicit config file
3. ./answer-quorum.toml        Project-level config
4. ~/.config/answer-quorum/config.toml   Global config

Example:
  answer-quorum "What is the capital of Australia?"
  answer-quorum -m groq:llama-3.3-70b-versatile -m perplexity:sonar "Largest planet?"
  answer-quorum --option Saturn --option Jupiter "Largest planet?"
  answer-quorum --batch < questions.txt
  answer-quorum --discover
"#)]
pub struct Cli {
    /// The question to answer (omit with --batch or --discover)
    pub question: Option<String>,

    /// Models to poll as PROVIDER:MODEL (repeatable; skips discovery)
    #[arg(short, long, value_name = "PROVIDER:MODEL")]
    pub model: Vec<String>,

    /// Read questions from stdin, one per line, until EOF or Ctrl-C
    #[arg(long, conflicts_with = "question")]
    pub batch: bool,

    /// Probe providers, list the working models and exit
    #[arg(long, conflicts_with_all = ["question", "batch"])]
    pub discover: bool,

    /// Offered choice; the answer is mapped onto one of these labels (repeatable)
    #[arg(long = "option", value_name = "LABEL", conflicts_with_all = ["batch", "discover"])]
    pub options: Vec<String>,

    /// Kind of choice field the options belong to
    #[arg(long, value_enum, default_value = "single", requires = "options")]
    pub choice_kind: ChoiceKind,

    /// Output format
    #[arg(short, long, value_enum, default_value = "answer")]
    pub output: OutputFormat,

    /// Tag recorded in the answer log for where questions came from
    #[arg(long, value_name = "TAG", default_value = "cli")]
    pub platform: String,

    /// Fraction of answers that must agree (overrides config)
    #[arg(long, value_name = "RATIO")]
    pub required_ratio: Option<f64>,

    /// Minimum number of agreeing answers (overrides config)
    #[arg(long, value_name = "N")]
    pub min_required: Option<usize>,

    /// Do not fall back to the primary provider's answer
    #[arg(long)]
    pub no_prefer_primary: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Progress display
    #[arg(long, value_enum, default_value = "auto")]
    pub progress: ProgressMode,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Field the answer is delivered into: free text unless options were given
    pub fn answer_field(&self) -> AnswerField {
        if self.options.is_empty() {
            return AnswerField::TextField;
        }
        let options = self.options.clone();
        match self.choice_kind {
            ChoiceKind::Single => AnswerField::SingleChoiceGroup(options),
            ChoiceKind::Multi => AnswerField::MultiChoiceGroup(options),
            ChoiceKind::Dropdown => AnswerField::Dropdown(options),
        }
    }
}
