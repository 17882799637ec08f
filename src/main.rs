//! bfs-crawler main entry point
//!
//! This is the command-line interface for the breadth-first crawler.

use anyhow::{bail, Context};
use bfs_crawler::checkpoint::{CheckpointManager, StartupDecision};
use bfs_crawler::config::{load_config_with_hash, validate, validate_seed, Config};
use bfs_crawler::crawler::{listen_for_signals, run_crawl, shutdown_channel};
use bfs_crawler::output::{load_statistics, print_report, print_statistics};
use bfs_crawler::storage::SqliteSink;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// bfs-crawler: a resumable breadth-first web crawler
///
/// Crawls outward from a seed URL in FIFO order, stores the visible text of
/// every fetched page, and checkpoints its frontier so an interrupted crawl
/// can be resumed.
#[derive(Parser, Debug)]
#[command(name = "bfs-crawler")]
#[command(version)]
#[command(about = "A resumable breadth-first web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// URL to start a fresh crawl from
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Maximum number of pages to process
    #[arg(long, value_name = "PAGES")]
    budget: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume an interrupted crawl (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh crawl, ignoring saved checkpoints
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the document database and checkpoints, then exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(&cli)?;
    let checkpoints = CheckpointManager::new(&config.checkpoint.directory);

    if cli.dry_run {
        return handle_dry_run(&config, &checkpoints, cli.fresh);
    }
    if cli.stats {
        return handle_stats(&config, &checkpoints);
    }

    handle_crawl(config, checkpoints, cli.fresh).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bfs_crawler=info,warn"),
            1 => EnvFilter::new("bfs_crawler=debug,info"),
            2 => EnvFilter::new("bfs_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(seed) = &cli.seed {
        config.crawler.seed = Some(seed.clone());
    }
    config.crawler.seed = config.crawler.seed.map(|seed| seed.trim().to_string());
    if let Some(budget) = cli.budget {
        config.crawler.budget = budget;
    }

    validate(&config).context("invalid settings")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the startup decision and settings
fn handle_dry_run(
    config: &Config,
    checkpoints: &CheckpointManager,
    fresh: bool,
) -> anyhow::Result<()> {
    println!("=== bfs-crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Budget: {} pages", config.crawler.budget);
    println!("  Delay between pages: {}ms", config.crawler.request_delay_ms);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!("  User agent: {}", config.crawler.user_agent);
    println!(
        "  Checkpoint interval: {}",
        match config.crawler.checkpoint_interval {
            0 => "on exit only".to_string(),
            n => format!("every {} pages", n),
        }
    );

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Checkpoints: {}", checkpoints.directory().display());

    match checkpoints.decide(fresh) {
        StartupDecision::Resume => {
            let queue = checkpoints.load_frontier();
            println!(
                "\n✓ Would resume with {} URLs in queue ({} queued in total)",
                queue.size(),
                queue.total_enqueued()
            );
        }
        StartupDecision::Fresh => match &config.crawler.seed {
            Some(seed) => println!("\n✓ Would start a fresh crawl from {}", seed),
            None => println!("\n✓ Would start a fresh crawl and prompt for a seed URL"),
        },
    }

    Ok(())
}

/// Handles the --stats mode
fn handle_stats(config: &Config, checkpoints: &CheckpointManager) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let sink = SqliteSink::new(Path::new(&config.output.database_path))
        .context("failed to open document database")?;
    let stats = load_statistics(&sink, checkpoints)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    checkpoints: CheckpointManager,
    fresh: bool,
) -> anyhow::Result<()> {
    let decision = checkpoints.decide(fresh);
    match decision {
        StartupDecision::Fresh if fresh => {
            tracing::info!("Starting fresh crawl (ignoring saved checkpoints)")
        }
        StartupDecision::Fresh => tracing::info!("No checkpoint found, starting fresh crawl"),
        StartupDecision::Resume => tracing::info!("Checkpoint found, resuming crawl"),
    }

    let seed = match (decision, config.crawler.seed.clone()) {
        (_, Some(seed)) => Some(seed),
        (StartupDecision::Fresh, None) => Some(prompt_for_seed()?),
        (StartupDecision::Resume, None) => None,
    };

    let state = checkpoints.initialize(decision, seed)?;

    let (handle, signal) = shutdown_channel();
    listen_for_signals(handle);

    match run_crawl(&config, state, signal).await {
        Ok(report) => {
            tracing::info!("Crawl finished: {:?}", report.reason);
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Asks for a seed URL on stdin until a valid one is entered
fn prompt_for_seed() -> anyhow::Result<String> {
    let stdin = io::stdin();
    loop {
        print!("Enter link to start crawling: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            bail!("no seed URL given");
        }

        let seed = line.trim();
        match validate_seed(seed) {
            Ok(()) => return Ok(seed.to_string()),
            Err(e) => eprintln!("{}", e),
        }
    }
}
