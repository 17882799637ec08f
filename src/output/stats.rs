//! Statistics generation from the document store and checkpoints
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics.

use crate::checkpoint::{CheckpointError, CheckpointManager};
use crate::crawler::CrawlReport;
use crate::storage::{DocumentSink, SqliteSink};
use crate::CrawlError;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Rows in the document store, duplicates included
    pub documents_stored: u64,

    /// Distinct URLs with at least one stored document
    pub distinct_urls_stored: u64,

    /// URLs waiting in the checkpointed frontier
    pub queue_length: u64,

    /// Lifetime enqueue count from the checkpoint
    pub total_enqueued: u64,

    /// URL hashes in the checkpointed seen set
    pub seen_count: u64,
}

/// Loads statistics from the document store and checkpoint files
///
/// Missing checkpoint files count as empty; unreadable ones are an error.
pub fn load_statistics(
    sink: &SqliteSink,
    checkpoints: &CheckpointManager,
) -> Result<CrawlStatistics, CrawlError> {
    let documents_stored = sink.count()?;
    let distinct_urls_stored = sink.count_distinct_urls()?;

    let queue = optional(checkpoints.read_queue())?.unwrap_or_default();
    let crawled = optional(checkpoints.read_crawled())?.unwrap_or_default();

    Ok(CrawlStatistics {
        documents_stored,
        distinct_urls_stored,
        queue_length: queue.urls.len() as u64,
        total_enqueued: queue.total_qued,
        seen_count: crawled.data.len() as u64,
    })
}

fn optional<T>(result: Result<T, CheckpointError>) -> Result<Option<T>, CheckpointError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_missing() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Documents:");
    println!("  Stored: {}", stats.documents_stored);
    println!("  Distinct URLs: {}", stats.distinct_urls_stored);
    println!();

    println!("Checkpoint:");
    println!("  Pages seen: {}", stats.seen_count);
    println!("  URLs in queue: {}", stats.queue_length);
    println!("  Total ever queued: {}", stats.total_enqueued);
    println!();

    let success_rate = if stats.seen_count > 0 {
        (stats.distinct_urls_stored as f64 / stats.seen_count as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} seen pages stored)",
        success_rate, stats.distinct_urls_stored, stats.seen_count
    );
}

/// Prints the outcome of a single crawl run
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");
    println!("Stopped: {:?}", report.reason);
    println!("  Pages processed: {}", report.processed);
    println!("  Documents stored: {}", report.documents_stored);
    println!("  Fetch failures: {}", report.fetch_failures);
    println!("  Store failures: {}", report.sink_failures);
    println!("  Page errors: {}", report.iteration_errors);
    println!("  Duplicates skipped: {}", report.skipped_duplicates);
    println!("  Links queued: {}", report.links_enqueued);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CrawlState;
    use crate::storage::Document;

    #[test]
    fn test_statistics_without_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let sink = SqliteSink::new_in_memory().unwrap();
        let stats = load_statistics(&sink, &CheckpointManager::new(dir.path())).unwrap();
        assert_eq!(stats, CrawlStatistics::default());
    }

    #[test]
    fn test_statistics_from_store_and_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoints = CheckpointManager::new(dir.path());

        let mut state = CrawlState::fresh("http://c.test/");
        state.seen.add("http://a.test/");
        state.seen.add("http://b.test/");
        checkpoints.save(&state).unwrap();

        let mut sink = SqliteSink::new_in_memory().unwrap();
        sink.store(&Document::new("http://a.test/", "a")).unwrap();
        sink.store(&Document::new("http://a.test/", "a again")).unwrap();

        let stats = load_statistics(&sink, &checkpoints).unwrap();
        assert_eq!(stats.documents_stored, 2);
        assert_eq!(stats.distinct_urls_stored, 1);
        assert_eq!(stats.queue_length, 1);
        assert_eq!(stats.total_enqueued, 1);
        assert_eq!(stats.seen_count, 2);
    }

    #[test]
    fn test_corrupt_checkpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoints = CheckpointManager::new(dir.path());
        std::fs::write(checkpoints.queue_path(), "garbage").unwrap();

        let sink = SqliteSink::new_in_memory().unwrap();
        assert!(load_statistics(&sink, &checkpoints).is_err());
    }
}
