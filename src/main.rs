//! Tarjome - Persian translation of movie, TV and person metadata
//!
//! Command-line entry point: search TMDB, show a record, or translate it
//! field by field into Persian with a live progress bar.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{Level, info, warn};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tarjome::cli::{Args, Commands};
use tarjome::config::{Config, Credentials, TranslationFlow};
use tarjome::content::MediaKind;
use tarjome::error::TarjomeError;
use tarjome::pipeline::{ReentryPolicy, RunState, TranslationOrchestrator, status_message};
use tarjome::present;
use tarjome::retrieval::{ContentSource, SortOrder, TmdbClient, sort_results};
use tarjome::session::{DetailSession, LeaveCheck};
use tarjome::translate::TranslatorFactory;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("tarjome.toml").exists() {
                info!("Found tarjome.toml in current directory, loading...");
                Config::from_file("tarjome.toml")?
            } else {
                Config::default()
            }
        }
    };
    let credentials = Credentials::from_env();

    if let Err(e) = execute(args.command, &config, &credentials).await {
        // precondition failures are user errors, not crashes
        if let Some(err) = e.downcast_ref::<TarjomeError>().filter(|err| err.is_precondition()) {
            eprintln!("{}", err);
            std::process::exit(2);
        }
        return Err(e);
    }

    Ok(())
}

async fn execute(command: Commands, config: &Config, credentials: &Credentials) -> Result<()> {
    match command {
        Commands::Search { query, sort } => {
            let order: SortOrder = sort.parse().map_err(|e: String| anyhow!(e))?;
            let client = TmdbClient::new(config.retrieval.clone(), credentials)?;

            let mut results = client.search(&query).await?;
            sort_results(&mut results.results, order);
            print!("{}", present::render_search_results(&results));
        }
        Commands::Show { kind, id } => {
            let kind = parse_kind(&kind)?;
            let client = TmdbClient::new(config.retrieval.clone(), credentials)?;

            let (record, credits) = client.fetch_details(kind, id).await?;
            print!("{}", present::render_details(&record, &credits));
        }
        Commands::Translate { kind, id, instructions, flow, json } => {
            let kind = parse_kind(&kind)?;
            let flow = parse_flow(&flow)?;

            let source = Arc::new(TmdbClient::new(config.retrieval.clone(), credentials)?);
            let translator = TranslatorFactory::create_translator(config.translate.clone(), credentials)?;
            let orchestrator = Arc::new(TranslationOrchestrator::new(
                translator,
                config.translate.temperature_for(flow),
                config.translate.cancel_mode,
            ));

            let mut session = DetailSession::new(source, orchestrator.clone());
            if let Some(instructions) = instructions {
                session.set_custom_instructions(instructions);
            }
            session.load(kind, id).await?;
            let session = Arc::new(session);

            let progress_task = spawn_progress_bar(&orchestrator);
            let mut run = tokio::spawn({
                let session = session.clone();
                async move { session.translate(ReentryPolicy::Restart).await }
            });
            let outcome = tokio::select! {
                joined = &mut run => joined?,
                _ = tokio::signal::ctrl_c() => {
                    if let LeaveCheck::ConfirmRequired(warning) = session.leave() {
                        eprintln!("\n{}", warning);
                    }
                    orchestrator.cancel();
                    Err(TarjomeError::Cancelled)
                }
            };
            progress_task.abort();

            let translated = outcome?;
            let run = orchestrator.progress();
            if run.failed_units > 0 {
                warn!("{} of {} units kept their original text", run.failed_units, run.total_units);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&translated)?);
            } else if let Some(record) = session.record() {
                print!("{}", present::render_translation(record, &translated));
            }
        }
        Commands::InitConfig { path } => {
            Config::default().save_to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

/// Drive a progress bar from the orchestrator's snapshots until aborted
fn spawn_progress_bar(orchestrator: &TranslationOrchestrator) -> tokio::task::JoinHandle<()> {
    let mut updates = orchestrator.subscribe();
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let run = updates.borrow_and_update().clone();
            let percent = run.percent();
            pb.set_position(percent.round() as u64);
            pb.set_message(status_message(percent));
            match run.state {
                RunState::Completed => {
                    pb.finish_with_message("✅ ترجمه کامل شد");
                    break;
                }
                RunState::Failed | RunState::Cancelled => {
                    pb.abandon();
                    break;
                }
                RunState::Idle | RunState::Running => {}
            }
        }
    })
}

fn parse_kind(kind: &str) -> Result<MediaKind> {
    kind.parse::<MediaKind>().map_err(|e| anyhow!(e))
}

/// Parse translation flow from string
fn parse_flow(flow: &str) -> Result<TranslationFlow> {
    match flow.to_lowercase().as_str() {
        "inline" => Ok(TranslationFlow::Inline),
        "storyteller" | "story" => Ok(TranslationFlow::Storyteller),
        _ => Err(TarjomeError::Config(format!(
            "Invalid translation flow '{}'. Valid flows: inline, storyteller",
            flow
        ))
        .into()),
    }
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".tarjome").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "tarjome.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // stdout carries command output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}", log_level, log_dir.join("tarjome.log").display());

    Ok(())
}
