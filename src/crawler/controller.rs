//! Crawl controller - the main crawl loop
//!
//! This module contains the loop that coordinates all aspects of a crawl:
//! - Pulling URLs from the frontier in FIFO order
//! - Deduplicating against the seen set and enforcing the page budget
//! - Fetching, storing, and extracting links from each page
//! - Observing shutdown requests and checkpointing on every exit path

use crate::checkpoint::CheckpointManager;
use crate::config::CrawlerConfig;
use crate::crawler::parser::extract_links;
use crate::crawler::{Fetcher, ShutdownSignal};
use crate::state::CrawlState;
use crate::storage::{Document, DocumentSink};
use crate::CrawlError;
use std::time::Instant;
use url::Url;

/// Why a crawl run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The frontier ran dry
    QueueEmpty,
    /// `processed_count` reached the budget
    BudgetReached,
    /// Shutdown was requested
    Cancelled,
}

/// Counters describing one call to `CrawlController::run`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub reason: TerminationReason,
    /// Pages marked seen during this run
    pub processed: u64,
    pub documents_stored: u64,
    /// Pages whose fetch produced no content
    pub fetch_failures: u64,
    pub sink_failures: u64,
    /// Pages abandoned by an error at the iteration boundary
    pub iteration_errors: u64,
    /// Dequeued URLs dropped because they were already seen
    pub skipped_duplicates: u64,
    pub links_enqueued: u64,
}

impl CrawlReport {
    fn new(reason: TerminationReason) -> Self {
        Self {
            reason,
            processed: 0,
            documents_stored: 0,
            fetch_failures: 0,
            sink_failures: 0,
            iteration_errors: 0,
            skipped_duplicates: 0,
            links_enqueued: 0,
        }
    }
}

/// Owns the crawl state for the duration of a run
pub struct CrawlController<S> {
    settings: CrawlerConfig,
    state: CrawlState,
    fetcher: Fetcher,
    sink: S,
    checkpoints: CheckpointManager,
    shutdown: ShutdownSignal,
}

impl<S: DocumentSink> CrawlController<S> {
    /// Creates a controller
    ///
    /// # Arguments
    ///
    /// * `settings` - Budget, delay, timeout, and user agent
    /// * `state` - The state produced by the startup decision
    /// * `sink` - Where page text is stored
    /// * `checkpoints` - Where the frontier and seen set are saved
    /// * `shutdown` - Observed at every safe point of the loop
    pub fn new(
        settings: CrawlerConfig,
        state: CrawlState,
        sink: S,
        checkpoints: CheckpointManager,
        shutdown: ShutdownSignal,
    ) -> Result<Self, CrawlError> {
        let fetcher = Fetcher::new(&settings)?;
        Ok(Self {
            settings,
            state,
            fetcher,
            sink,
            checkpoints,
            shutdown,
        })
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs the crawl loop until the frontier empties, the budget is spent,
    /// or shutdown is requested
    ///
    /// Both checkpoint documents are written before this returns, on every
    /// path. An error is returned only when the frontier invariant is broken.
    pub async fn run(&mut self) -> Result<CrawlReport, CrawlError> {
        let budget = self.settings.budget;
        let delay = self.settings.request_delay();
        let start_time = Instant::now();
        let mut report = CrawlReport::new(TerminationReason::QueueEmpty);

        tracing::info!(
            "Starting crawl: {} URLs in queue, {} pages seen, budget {}",
            self.state.frontier.size(),
            self.state.seen.len(),
            budget
        );

        report.reason = loop {
            if self.shutdown.is_requested() {
                break TerminationReason::Cancelled;
            }
            if self.state.processed_count >= budget {
                tracing::info!("Page budget of {} reached", budget);
                break TerminationReason::BudgetReached;
            }
            if self.state.frontier.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break TerminationReason::QueueEmpty;
            }

            let url = match self.state.frontier.dequeue() {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!("Frontier invariant violated: {}", e);
                    self.checkpoint();
                    return Err(e.into());
                }
            };

            if self.state.seen.contains(&url) {
                tracing::debug!("Skipping already seen {}", url);
                report.skipped_duplicates += 1;
                continue;
            }

            self.state.seen.add(&url);
            self.state.processed_count += 1;
            report.processed += 1;

            if let Err(e) = self.process_url(&url, &mut report).await {
                tracing::error!("Error processing {}: {}", url, e);
                report.iteration_errors += 1;
            }

            tracing::info!(
                "Processed {}, total pages: {}, in queue: {}",
                url,
                self.state.processed_count,
                self.state.frontier.size()
            );

            let interval = self.settings.checkpoint_interval;
            if interval > 0 && report.processed % interval == 0 {
                self.checkpoint();
            }

            if !delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = self.shutdown.requested() => {}
                }
            }
        };

        if report.reason == TerminationReason::Cancelled {
            tracing::info!("Crawl cancelled, saving checkpoint");
        }
        self.checkpoint();

        tracing::info!(
            "Crawl stopped ({:?}): {} pages processed in {:?}",
            report.reason,
            report.processed,
            start_time.elapsed()
        );

        Ok(report)
    }

    /// Fetches, stores, and expands a single page
    ///
    /// A page that cannot be fetched is not an error: it stays seen and
    /// contributes no document and no links.
    async fn process_url(&mut self, url: &str, report: &mut CrawlReport) -> Result<(), CrawlError> {
        let body = match self.fetcher.fetch(url).await.into_body() {
            Some(body) => body,
            None => {
                report.fetch_failures += 1;
                return Ok(());
            }
        };

        let document = Document::from_html(url, &body);
        match self.sink.store(&document) {
            Ok(()) => {
                report.documents_stored += 1;
                tracing::debug!("Added to store: {}", url);
            }
            Err(e) => {
                report.sink_failures += 1;
                tracing::warn!("Error storing {}: {}", url, e);
            }
        }

        let base_url = Url::parse(url).map_err(|source| CrawlError::UrlParse {
            url: url.to_string(),
            source,
        })?;

        for link in extract_links(&body, &base_url) {
            if !self.state.seen.contains(&link) {
                self.state.frontier.enqueue(link);
                report.links_enqueued += 1;
            }
        }

        Ok(())
    }

    /// Saves both checkpoint documents, logging failures without retrying
    fn checkpoint(&self) {
        if let Err(e) = self.checkpoints.save(&self.state) {
            tracing::error!("Failed to save checkpoint: {}", e);
        }
    }
}
