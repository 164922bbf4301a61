//! CLI entrypoint for archivist
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use archivist_application::{
    AgentDeps, AgentOrchestrator, AuditSink, ListAuditUseCase, RunProgressNotifier,
};
use archivist_domain::{AuditFilter, OutputFormat as DomainOutputFormat, Query, SensitivityLabel};
use archivist_infrastructure::{
    ConfigLoader, CorpusRetrievalGateway, FileConfig, JsonlAuditSink, OpenAiClientConfig,
    OpenAiCompatibleClient, SystemClock, UuidIdGenerator, build_registry,
};
use archivist_presentation::{
    AskArgs, AuditArgs, Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter,
    SimpleProgress,
};
use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise map -v flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };
    config.validate().context("invalid configuration")?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Some(Command::Ask(args)) => ask(&config, args, cli.quiet).await,
        Some(Command::Audit(args)) => audit(&config, args).await,
        None => {
            Cli::command().print_help()?;
            Ok(ExitCode::from(2))
        }
    }
}

async fn ask(config: &FileConfig, args: AskArgs, quiet: bool) -> Result<ExitCode> {
    let mut query = Query::new(&args.query, &args.actor)?;
    if let Some(clearance) = &args.clearance {
        query = query.with_clearance(SensitivityLabel::new(clearance.to_lowercase()));
    }

    // === Dependency Injection ===
    let corpus_path = Path::new(&config.retrieval.corpus_path);
    let gateway = CorpusRetrievalGateway::from_path(corpus_path)
        .with_context(|| format!("failed to load corpus from {}", corpus_path.display()))?
        .with_policy(config.sensitivity.clone());
    if gateway.is_empty() {
        warn!(path = %corpus_path.display(), "corpus is empty");
    }
    let registry = build_registry(config, Arc::new(gateway))?;
    let audit_sink = JsonlAuditSink::new(&config.audit.dir)?;
    let reasoning = OpenAiCompatibleClient::new(OpenAiClientConfig::from(&config.reasoning))?;

    let mut params = config.to_run_params();
    if let Some(max_steps) = args.max_steps {
        params = params.with_max_steps(max_steps);
    }
    if let Some(secs) = args.step_timeout {
        params = params.with_step_timeout(Duration::from_secs(secs));
    }
    let max_steps = params.max_steps;
    let step_timeout = params.step_timeout;

    let cancellation = CancellationToken::new();
    let orchestrator = AgentOrchestrator::new(AgentDeps {
        reasoning: Arc::new(reasoning),
        tools: Arc::new(registry),
        audit_sink: Arc::new(audit_sink),
        clock: Arc::new(SystemClock),
        ids: Arc::new(UuidIdGenerator),
    })
    .with_params(params)
    .with_sensitivity_policy(config.sensitivity.clone())
    .with_cancellation(cancellation.clone());

    let ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling run");
            ctrl_c.cancel();
        }
    });

    info!(actor = %args.actor, max_steps, "starting run");

    let progress: Box<dyn RunProgressNotifier> = if quiet {
        Box::new(archivist_application::NoRunProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let format = args
        .output
        .map(DomainOutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    match orchestrator
        .run_with_progress(query, max_steps, step_timeout, progress.as_ref())
        .await
    {
        Ok(result) => {
            let output = match format {
                DomainOutputFormat::Text => ConsoleFormatter::format(&result),
                DomainOutputFormat::Json => ConsoleFormatter::format_json(&result),
            };
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            match format {
                DomainOutputFormat::Text => eprint!("{}", ConsoleFormatter::format_error(&error)),
                DomainOutputFormat::Json => {
                    println!("{}", ConsoleFormatter::format_error_json(&error))
                }
            }
            if error.is_cancelled() {
                Ok(ExitCode::from(130))
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

async fn audit(config: &FileConfig, args: AuditArgs) -> Result<ExitCode> {
    let dir = Path::new(&config.audit.dir);
    if !dir.is_dir() {
        bail!("no audit trail at {}", dir.display());
    }
    let sink: Arc<dyn AuditSink> = Arc::new(JsonlAuditSink::new(dir)?);

    let mut filter = AuditFilter::new();
    if let Some(actor) = args.actor {
        filter = filter.with_actor(actor);
    }
    if let Some(source) = args.source {
        filter = filter.with_source(source);
    }
    if let Some(label) = args.label {
        filter = filter.with_label(label);
    }
    if let Some(run) = args.run {
        filter = filter.with_run(run);
    }

    let records = ListAuditUseCase::new(sink).execute(&filter).await?;
    let output = match args.output {
        OutputFormat::Text => ConsoleFormatter::format_audit(&records),
        OutputFormat::Json => ConsoleFormatter::format_audit_json(&records),
    };
    println!("{}", output);
    Ok(ExitCode::SUCCESS)
}
