//! CLI entrypoint for answer-quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use answer_quorum_application::{
    AnswerLogger, AnswerSink, AppConfig, BatchInput, DiscoverModelsUseCase, ModelQueryRunner,
    NoAnswerLogger, NoProgress, ParallelPoll, PollProgressNotifier, RunBatchUseCase, SessionState,
    SolveInput, SolveOutcome, SolveQuestionUseCase,
};
use answer_quorum_domain::{
    ModelIdentity, Provider, Question, QuorumRequirement, dedup_identities,
};
use answer_quorum_infrastructure::{
    ConfigLoader, FileConfig, JsonlAnswerLogger, OpenAiCompatAdapter, ProviderAdapter,
    ProviderError, RoutingGateway,
};
use answer_quorum_presentation::{
    Cli, ConsoleAnswerSink, ConsoleFormatter, OutputFormat, ProgressMode, ProgressReporter,
    SimpleProgress, StdinQuestionSource, stderr_is_terminal,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting answer-quorum");

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("{}", e))
            .context("Failed to load configuration")?
    };
    let config = apply_overrides(
        file_config
            .to_app_config()
            .context("Invalid configuration")?,
        &cli,
    )?;

    // === Dependency Injection ===
    let gateway = Arc::new(build_gateway(&file_config, config.discovery().timeout)?);

    let models = if cli.model.is_empty() || cli.discover {
        let report = DiscoverModelsUseCase::new(Arc::clone(&gateway))
            .with_params(config.discovery().clone())
            .execute()
            .await?;
        if cli.discover {
            println!("{}", ConsoleFormatter::format_discovery(&report));
            return Ok(ExitCode::SUCCESS);
        }
        if !cli.quiet {
            eprintln!(
                "Using {} of {} models",
                report.working.len(),
                report.candidates()
            );
        }
        report.working
    } else {
        parse_models(&cli.model)?
    };

    let runner = ModelQueryRunner::new(Arc::clone(&gateway))
        .with_params(config.query().clone())
        .with_retry(config.retry().clone());
    let poll = ParallelPoll::new(runner).with_params(config.poll().clone());
    let solve = SolveQuestionUseCase::new(poll, config.resolver())
        .with_logger(answer_logger(&file_config));

    let progress: Box<dyn PollProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        match cli.progress.resolve(stderr_is_terminal()) {
            ProgressMode::Lines => Box::new(SimpleProgress),
            _ => Box::new(ProgressReporter::new()),
        }
    };
    let sink = ConsoleAnswerSink::new(cli.output);
    let mut session = SessionState::new();

    // Batch mode
    if cli.batch {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping after the current question");
                on_signal.cancel();
            }
        });

        let input = BatchInput::new(models).with_platform(cli.platform.clone());
        let mut source = StdinQuestionSource::stdin();
        let summary = RunBatchUseCase::new(&solve, &sink, progress.as_ref())
            .execute(&input, &mut source, &mut session, &cancel)
            .await;

        if cli.output != OutputFormat::Json {
            eprintln!(
                "{}",
                ConsoleFormatter::format_batch_summary(&summary, session.stats())
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Single question mode - question is required
    let question = match cli.question.as_deref() {
        Some(q) => Question::new(q)?,
        None => bail!("Question is required. Use --batch to read questions from stdin."),
    };

    let input = SolveInput::new(question, models)
        .with_platform(cli.platform.clone())
        .with_field(cli.answer_field());
    let report = solve
        .execute_with_progress(input, &mut session, progress.as_ref())
        .await;
    sink.deliver(&report);

    Ok(match report.outcome {
        SolveOutcome::Solved(_) => ExitCode::SUCCESS,
        SolveOutcome::Failed { .. } => ExitCode::FAILURE,
    })
}

/// Install the tracing subscriber chosen by `-v` and `--log-file`
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match &cli.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(config: AppConfig, cli: &Cli) -> Result<AppConfig> {
    let mut config = config;

    if cli.required_ratio.is_some() || cli.min_required.is_some() {
        let current = config.consensus().requirement;
        let requirement = QuorumRequirement::new(
            cli.min_required.unwrap_or(current.min_required),
            cli.required_ratio.unwrap_or(current.required_ratio),
        )?;
        config = config.with_requirement(requirement);
    }

    if cli.no_prefer_primary {
        config = config.with_prefer_primary(false);
    }

    Ok(config)
}

/// One adapter per enabled provider whose API key is set
fn build_gateway(file_config: &FileConfig, list_timeout: Duration) -> Result<RoutingGateway> {
    let mut adapters: Vec<Arc<dyn ProviderAdapter>> = Vec::new();

    for provider in Provider::ALL {
        let provider_config = file_config.providers.get(provider);
        if !provider_config.enabled {
            info!("{} disabled in configuration", provider);
            continue;
        }

        match provider_config.to_adapter_config(provider) {
            Ok(adapter_config) => {
                let adapter_config = adapter_config.with_list_timeout(list_timeout);
                adapters.push(Arc::new(OpenAiCompatAdapter::new(adapter_config)?));
            }
            Err(ProviderError::MissingApiKey { env, .. }) => {
                warn!("{} skipped: {} is not set", provider, env);
            }
            Err(e) => return Err(e.into()),
        }
    }

    if adapters.is_empty() {
        bail!("No providers available. Set PERPLEXITY_API_KEY and/or GROQ_API_KEY.");
    }
    Ok(RoutingGateway::new(adapters))
}

fn parse_models(specs: &[String]) -> Result<Vec<ModelIdentity>> {
    let models = specs
        .iter()
        .map(|s| {
            s.parse::<ModelIdentity>()
                .with_context(|| format!("Invalid --model value '{}'", s))
        })
        .collect::<Result<Vec<_>>>()?;

    let unique = dedup_identities(models);
    if unique.len() < specs.len() {
        warn!("Ignoring {} repeated --model value(s)", specs.len() - unique.len());
    }
    Ok(unique)
}

fn answer_logger(file_config: &FileConfig) -> Arc<dyn AnswerLogger> {
    if !file_config.logging.enabled {
        return Arc::new(NoAnswerLogger);
    }
    match JsonlAnswerLogger::new(&file_config.logging.answer_log) {
        Some(logger) => Arc::new(logger),
        None => Arc::new(NoAnswerLogger),
    }
}
