// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use cv_filter::utils::logging::{
    format_error, format_info, format_rank, format_score, format_success, format_warning,
};
use cv_filter::{
    BatchOrchestrator, BatchResult, BatchStats, ChatCompletionAnalyzer, Config, DocumentExtractor,
    DocumentKind, Extractor, FileScanner, ProgressTracker, ScannedFile, SseSink, StreamDelivery,
    TargetSpec, TerminalSink, Validator, progress_channel,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "cv_filter")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Screen CVs against job requirements with an LLM", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze and rank documents against job requirements
    Screen(ScreenArgs),

    /// Print the text extracted from one document
    Extract {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[arg(long, default_value_t = 500)]
        preview_chars: usize,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["requirements", "requirements_file"])))]
struct ScreenArgs {
    /// Job requirements as text
    #[arg(short, long)]
    requirements: Option<String>,

    /// Read job requirements from a file
    #[arg(long, value_name = "FILE")]
    requirements_file: Option<PathBuf>,

    /// Write server-sent event frames to stdout instead of progress bars
    #[arg(long, action = ArgAction::SetTrue)]
    stream: bool,

    /// Also write the ranked results as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Documents or directories to screen
    #[arg(required = true, value_name = "PATHS")]
    paths: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    cv_filter::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using built-in defaults",
            cli.config.display()
        );
        Config::default_config()
    };

    match cli.command {
        Commands::Screen(args) => screen_command(config, args, cli.color).await,
        Commands::Extract {
            path,
            preview_chars,
        } => extract_command(&path, preview_chars).await,
    }
}

async fn screen_command(config: Config, args: ScreenArgs, colored: bool) -> Result<()> {
    let requirements = match (&args.requirements, &args.requirements_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read requirements file {}", path.display())
        })?,
        (None, None) => String::new(),
    };
    Validator::validate_requirements(&requirements)?;

    let scanner = FileScanner::new(config.input.clone());
    let items: Vec<_> = scanner
        .scan(&args.paths)
        .context("Failed to collect documents")?
        .into_iter()
        .map(ScannedFile::into_item)
        .collect();

    if items.is_empty() {
        eprintln!("{}", format_warning("No supported documents found"));
        return Ok(());
    }

    if config.analyzer.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; every document will fail analysis");
    }

    let analyzer =
        ChatCompletionAnalyzer::new(&config.analyzer).context("Failed to create analyzer")?;
    info!("Using model {}", analyzer.model());

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    let orchestrator = Arc::new(BatchOrchestrator::with_cancellation(
        &config,
        Arc::new(DocumentExtractor::new()),
        Arc::new(analyzer),
        cancel.clone(),
    ));

    let total = items.len();
    let start_time = Instant::now();
    let (sender, receiver) = progress_channel();
    let task = orchestrator.spawn(items, TargetSpec::new(requirements.clone()), sender);
    let delivery = StreamDelivery::from_config(&config.stream, cancel);

    let delivered = if args.stream {
        let mut sink = SseSink::new(tokio::io::stdout());
        delivery.run(total, receiver, task, &mut sink).await
    } else {
        let mut sink = TerminalSink::new(ProgressTracker::with_color(total, colored));
        delivery.run(total, receiver, task, &mut sink).await
    };
    let outcome = delivered.context("Progress delivery failed")?;
    info!(
        "Delivered {} progress frames ({} late)",
        outcome.progress_frames, outcome.late_events
    );

    let batch = outcome.result.context("Screening batch failed")?;
    let stats = BatchStats::from_batch(&batch, start_time.elapsed());

    if !args.stream {
        print_summary(&batch, &stats);
    }

    if let Some(path) = &args.json {
        write_json_report(path, &batch, &requirements)?;
        eprintln!(
            "{}",
            format_success(&format!("Results written to {}", path.display()))
        );
    }

    Ok(())
}

fn cancel_on_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling remaining documents");
            cancel.cancel();
        }
    });
}

fn print_summary(batch: &BatchResult, stats: &BatchStats) {
    println!();
    println!("{}", format_info("Ranked candidates"));

    for (index, result) in batch.results.iter().enumerate() {
        let rank = format_rank(index + 1, batch.count);
        if result.is_failure() {
            println!(
                "{} {}",
                rank,
                format_error(&format!("{}: {}", result.filename, result.summary))
            );
        } else {
            println!(
                "{} {} {}  {}",
                rank,
                format_score(result.match_percentage),
                result.filename,
                Validator::truncate_text(&result.summary, 100)
            );
        }
    }

    println!();
    let best = stats
        .best_match
        .map(|score| format!(", best match {:.1}%", score))
        .unwrap_or_default();
    let line = format!(
        "Screened {} documents in {:.1}s ({:.0}% succeeded, {:.1} docs/min, mean match {:.1}%{})",
        stats.documents,
        stats.duration_secs,
        stats.success_rate(),
        stats.documents_per_minute(),
        stats.mean_match,
        best
    );
    if stats.failed == 0 {
        println!("{}", format_success(&line));
    } else {
        println!("{}", format_warning(&line));
    }
}

fn write_json_report(path: &Path, batch: &BatchResult, requirements: &str) -> Result<()> {
    let report = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "requirements": requirements,
        "results": batch.results,
        "count": batch.count,
    });

    let content = serde_json::to_string_pretty(&report).context("Failed to encode results")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;
    Ok(())
}

async fn extract_command(path: &Path, preview_chars: usize) -> Result<()> {
    Validator::validate_file_path(path)?;

    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let kind = DocumentKind::from_path(path);

    let text = DocumentExtractor::new()
        .extract(&content, &kind)
        .await
        .with_context(|| format!("Failed to extract text from {}", path.display()))?;

    println!(
        "{}",
        format_success(&format!(
            "Extracted {} characters from {} ({})",
            text.chars().count(),
            path.display(),
            kind
        ))
    );
    println!("{}", Validator::truncate_text(&text, preview_chars));

    Ok(())
}
