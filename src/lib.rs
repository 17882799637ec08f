//! bfs-crawler: a resumable breadth-first web crawler
//!
//! This crate fetches pages starting from a seed URL, stores their visible text
//! in a document sink, follows outbound links in FIFO order, and checkpoints its
//! frontier and seen set so an interrupted crawl can pick up where it left off.

pub mod checkpoint;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] checkpoint::CheckpointError),

    #[error("Sink error: {0}")]
    Sink(#[from] storage::SinkError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] state::FrontierError),

    #[error("URL parse error for {url}: {source}")]
    UrlParse {
        url: String,
        source: ::url::ParseError,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("No seed URL available for a fresh crawl")]
    MissingSeed,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use checkpoint::{CheckpointManager, StartupDecision};
pub use config::Config;
pub use crawler::{CrawlController, CrawlReport, ShutdownHandle, ShutdownSignal, TerminationReason};
pub use state::{CrawlState, FrontierQueue, SeenSet};
pub use storage::{Document, DocumentSink, MemorySink, SqliteSink};
