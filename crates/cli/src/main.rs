use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use cvlift_api::EnhancerClient;
use cvlift_engine::{AnalysisRunner, CancelFlag, EnhancerBackend, HttpBackend, resolve_input};
use tokio::sync::mpsc;
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "cvlift", version, about = "Analyze and optimize a CV against the enhancement service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the analysis pipeline headlessly and print the JSON report
    Analyze(AnalyzeArgs),
    /// Check the enhancement service health
    Health,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Path to a CV file (pdf, doc, docx, txt). Takes precedence over --text.
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,
    /// CV text passed inline
    #[arg(long, short = 't')]
    text: Option<String>,
    /// Read the CV text from stdin
    #[arg(long, conflicts_with = "text")]
    stdin: bool,
    /// Job description text used for match scoring
    #[arg(long)]
    jd: Option<String>,
    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let client = EnhancerClient::new_from_env()?;
    let runner = Arc::new(AnalysisRunner::new(HttpBackend::new(client)));

    let cli = Cli::parse();
    match cli.command {
        // No subcommand => TUI
        None => cvlift_tui::run(runner).await,
        Some(Command::Analyze(args)) => run_analyze(&runner, args).await,
        Some(Command::Health) => run_health(&runner).await,
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .try_init();
}

async fn run_analyze(runner: &AnalysisRunner<HttpBackend>, args: AnalyzeArgs) -> Result<()> {
    let text = if args.stdin {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("read CV text from stdin")?;
        buffer
    } else {
        args.text.unwrap_or_default()
    };

    let input = resolve_input(args.file.as_deref(), &text).map_err(|error| anyhow!(error.to_string()))?;

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
    let stage_logger = tokio::spawn(async move {
        while let Some(stage) = progress_rx.recv().await {
            info!(%stage, "pipeline stage");
        }
    });

    let jd = args.jd.unwrap_or_default();
    let result = runner.run(input, &jd, &CancelFlag::new(), Some(&progress_tx)).await;
    drop(progress_tx);
    let _ = stage_logger.await;

    let report = result.map_err(|error| anyhow!(error.to_string()))?;
    let rendered = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{rendered}");
    Ok(())
}

async fn run_health(runner: &AnalysisRunner<HttpBackend>) -> Result<()> {
    let health = runner
        .backend()
        .health()
        .await
        .map_err(|error| anyhow!(error.to_string()))?;
    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}
