//! Output module for crawl statistics and run reports
//!
//! This module handles:
//! - Collecting statistics from the document database and checkpoint files
//! - Printing statistics and end-of-run reports to stdout

pub mod stats;

pub use stats::{load_statistics, print_report, print_statistics, CrawlStatistics};
