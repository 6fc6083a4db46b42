//! batch-dispatch: dry runs and load tests for the dispatch engine
//!
//! Reads a JSON array of messages and pushes them through the engine against
//! a simulated relay, so chunking, rate limits and retries can be tuned
//! before pointing a real transport at a provider.

#![allow(missing_docs)]

use anyhow::{Context, Result};
use batch_dispatch::config::{Config, ProviderProfile};
use batch_dispatch::core::batch::BatchDispatcher;
use batch_dispatch::core::delivery::{OutboundMessage, SimulatedDelivery};
use batch_dispatch::utils::logging::init_logging;
use batch_dispatch::utils::validation::{is_valid_email, partition_recipients};
use batch_dispatch::{VERSION, build_info};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Exit code when the run was interrupted
const EXIT_CANCELLED: u8 = 130;
/// Exit code when some messages failed
const EXIT_PARTIAL_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "batch-dispatch", version, about = "Rate-limited batch dispatch of outbound email")]
struct Cli {
    /// YAML config file; DISPATCH_* variables that are set override it
    #[arg(short, long, env = "DISPATCH_CONFIG")]
    config: Option<PathBuf>,

    /// JSON array of messages to send
    #[arg(short, long)]
    jobs: Option<PathBuf>,

    /// SMTP host, used to pick a provider preset when the config has none
    #[arg(long, env = "SMTP_HOST")]
    smtp_host: Option<String>,

    /// Latency of each simulated delivery
    #[arg(long, default_value_t = 50)]
    simulate_latency_ms: u64,

    /// Share of simulated deliveries that fail, between 0 and 1
    #[arg(long, default_value_t = 0.0)]
    simulate_failure_rate: f64,

    /// Print the summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?
            .with_env_overrides()
            .context("Failed to apply environment overrides")?,
        None => Config::from_env().context("Failed to load configuration from environment")?,
    };
    if config.provider.is_none() {
        config.provider = cli.smtp_host.as_deref().map(ProviderProfile::detect);
    }

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(ExitCode::SUCCESS);
    }

    init_logging(&config.logging)?;
    let build = build_info();
    info!(
        "batch-dispatch {} ({}) starting, provider: {}",
        VERSION,
        build.git_hash,
        config.provider.unwrap_or_default()
    );

    let jobs_path = cli
        .jobs
        .as_ref()
        .context("--jobs is required unless --print-config is given")?;
    let raw = tokio::fs::read_to_string(jobs_path)
        .await
        .with_context(|| format!("Failed to read {}", jobs_path.display()))?;
    let messages: Vec<OutboundMessage> =
        serde_json::from_str(&raw).context("Job file must be a JSON array of messages")?;

    let jobs = valid_messages(messages);
    if jobs.is_empty() {
        warn!("No valid recipients, nothing to send");
        return Ok(ExitCode::SUCCESS);
    }

    let total = jobs.len();
    let completed = Arc::new(AtomicUsize::new(0));
    let options = {
        let completed = Arc::clone(&completed);
        config.batch_options().on_progress(move |_, total| {
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % (total / 10).max(1) == 0 || done == total {
                info!("Progress: {}/{} ({}%)", done, total, done * 100 / total);
            }
        })
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, finishing in-flight deliveries");
                cancel.cancel();
            }
        });
    }

    let delivery = SimulatedDelivery::new(
        Duration::from_millis(cli.simulate_latency_ms),
        cli.simulate_failure_rate,
    );
    info!("Dispatching {} messages", total);
    let report = BatchDispatcher::new(options)
        .run_with_report(jobs, delivery, cancel)
        .await?;

    let summary = report.summary();
    summary.log("dispatch");
    info!(
        "Run {} took {:.1}s, peak {} messages/s",
        report.run_id,
        report.elapsed.as_secs_f64(),
        report.peak_throughput
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if let Err(e) = report.ensure_completed() {
        warn!("{}", e);
        return Ok(ExitCode::from(EXIT_CANCELLED));
    }
    if summary.has_errors {
        return Ok(ExitCode::from(EXIT_PARTIAL_FAILURE));
    }
    Ok(ExitCode::SUCCESS)
}

/// Drop messages whose recipient is not an email address
fn valid_messages(messages: Vec<OutboundMessage>) -> Vec<OutboundMessage> {
    let recipients: Vec<&str> = messages.iter().map(|m| m.to.as_str()).collect();
    let partition = partition_recipients(&recipients);
    if !partition.invalid.is_empty() {
        warn!(
            "Skipping {} invalid recipients: {}",
            partition.invalid.len(),
            partition.invalid.join(", ")
        );
    }

    messages
        .into_iter()
        .filter(|message| is_valid_email(&message.to))
        .map(|mut message| {
            message.to = message.to.trim().to_string();
            message
        })
        .collect()
}
