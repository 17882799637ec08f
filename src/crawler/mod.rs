//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a soft-failure boundary
//! - HTML parsing for links and visible text
//! - Cooperative shutdown handling
//! - The crawl loop itself

mod controller;
mod fetcher;
mod parser;
mod shutdown;

pub use controller::{CrawlController, CrawlReport, TerminationReason};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher};
pub use parser::{extract_links, extract_text};
pub use shutdown::{listen_for_signals, shutdown_channel, ShutdownHandle, ShutdownSignal};

use crate::checkpoint::CheckpointManager;
use crate::config::Config;
use crate::state::CrawlState;
use crate::storage::SqliteSink;
use crate::CrawlError;
use std::path::Path;

/// Runs a complete crawl against the configured SQLite database
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `state` - State from the fresh-or-resume decision
/// * `shutdown` - Cancellation observed by the loop
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl stopped and its checkpoint was attempted
/// * `Err(CrawlError)` - The sink could not be opened or the frontier invariant broke
pub async fn run_crawl(
    config: &Config,
    state: CrawlState,
    shutdown: ShutdownSignal,
) -> Result<CrawlReport, CrawlError> {
    let sink = SqliteSink::new(Path::new(&config.output.database_path))?;
    let checkpoints = CheckpointManager::new(&config.checkpoint.directory);
    let mut controller =
        CrawlController::new(config.crawler.clone(), state, sink, checkpoints, shutdown)?;
    controller.run().await
}
