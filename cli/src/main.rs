//! CLI entrypoint for Quorum Debate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use debate_application::{
    DebateController, DebateEngine, GatewayTurnInvoker, TranscriptLogger,
};
use debate_domain::{ConsensusStrategyKind, DebateConfig, OutputFormat, Severity};
use debate_infrastructure::{
    ConfigLoader, FileConfig, JsonlTranscriptLogger, ProviderKind, build_gateway,
};
use debate_presentation::{Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, follow};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set.
///
/// The returned guard flushes the log file and must live until exit.
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "quorum-debate.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => error!("{}", issue.message),
            Severity::Warning => warn!("{}", issue.message),
        }
    }
    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("configuration has {} error(s)", errors);
    }
    Ok(config)
}

fn consensus_kind(cli: &Cli, file: &FileConfig) -> ConsensusStrategyKind {
    let kind = match cli.consensus {
        Some(arg) => arg.into(),
        None => file.consensus.parse_strategy().0,
    };
    if kind == ConsensusStrategyKind::Manual {
        warn!("The manual consensus strategy has no trigger on the command line; consensus will not be detected");
    }
    kind
}

fn transcript_logger(file: &FileConfig) -> Option<Arc<dyn TranscriptLogger>> {
    let name = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let path = file.logging.transcript_path(&name)?;
    let logger = JsonlTranscriptLogger::new(&path)?;
    info!(path = %logger.path().display(), "Writing transcript log");
    Some(Arc::new(logger))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting Quorum Debate");

    let file = load_config(&cli)?;
    if cli.no_color || !file.output.color {
        colored::control::set_override(false);
    }

    let question = match cli.question.as_deref() {
        Some(q) if !q.trim().is_empty() => q.to_string(),
        _ => bail!("A question is required. Example: quorum-debate \"Tabs or spaces?\""),
    };

    // === Debate configuration ===
    let debate_config: DebateConfig = cli
        .apply_overrides(file.debate.clone())
        .with_default_roles_if_empty();
    let registry = debate_config
        .validate()
        .context("invalid debate configuration")?;
    let (params, _) = file.invocation.to_invocation_params();

    // === Dependency Injection ===
    let provider = if cli.offline {
        ProviderKind::Echo
    } else {
        file.provider.parse_kind().0
    };
    let gateway = build_gateway(provider, &file.provider)?;
    let invoker = Arc::new(GatewayTurnInvoker::new(gateway));

    let mut controller = DebateController::new(invoker)
        .with_params(params)
        .with_consensus(consensus_kind(&cli, &file).build());
    if let Some(logger) = transcript_logger(&file) {
        controller = controller.with_logger(logger);
    }
    let engine = DebateEngine::new(controller);

    // Subscribe before starting so no event is missed
    let events = engine.events().subscribe();
    let handle = engine.start_debate(question.as_str(), debate_config)?;
    let session_id = handle.id();

    if !cli.quiet {
        eprintln!();
        eprintln!("Question: {}", question);
        eprintln!(
            "Debaters: {}",
            registry
                .debaters()
                .iter()
                .map(|r| ConsoleFormatter::role_label(r.name(), r.color()).to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        eprintln!();
    }

    let progress = (!cli.quiet).then(|| {
        let reporter = ProgressReporter::new(registry.roles());
        tokio::spawn(async move { follow(&reporter, events, session_id).await })
    });

    // Ctrl-C stops after the in-flight turn; later presses are ignored
    let token = handle.cancellation_token();
    tokio::spawn(async move {
        let mut pressed = false;
        while tokio::signal::ctrl_c().await.is_ok() {
            if !pressed {
                eprintln!("\nStopping after the current turn...");
                token.cancel();
                pressed = true;
            }
        }
    });

    let result = handle.wait().await.context("debate task failed")?;
    if let Some(progress) = progress {
        let _ = progress.await;
    }

    // Output results
    let format = cli
        .output
        .map(OutputFormat::from)
        .or(file.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter.render(&result, format));

    if result.is_failed() {
        error!(
            "Debate failed: {}",
            result.error.as_deref().unwrap_or("too many failed turns")
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
