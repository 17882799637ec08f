//! Checkpointing of the crawl frontier and seen set
//!
//! Two JSON documents live in the checkpoint directory:
//! - `queue.json`: `{ total_qued, number, urls }`
//! - `crawled.json`: `{ data: { "<hash>": true, ... }, number }`
//!
//! Each save rewrites a whole document through a temporary file in the same
//! directory followed by a rename, so a crash mid-save leaves the previous
//! checkpoint intact. The presence of `queue.json` marks a resumable crawl.

mod schema;

pub use schema::{CrawledDocument, QueueDocument};

use crate::state::{CrawlState, FrontierQueue, SeenSet};
use crate::CrawlError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// File holding the frontier
pub const QUEUE_FILE: &str = "queue.json";

/// File holding the seen-set hashes
pub const CRAWLED_FILE: &str = "crawled.json";

/// Errors raised while reading or writing checkpoint documents
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Malformed checkpoint {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize checkpoint: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CheckpointError {
    /// True when the checkpoint file simply does not exist
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// How the crawl state is produced at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupDecision {
    /// Empty seen set, queue holding only the seed
    Fresh,
    /// State loaded from the checkpoint documents
    Resume,
}

/// Reads and writes the checkpoint documents in one directory
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    directory: PathBuf,
}

impl CheckpointManager {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn queue_path(&self) -> PathBuf {
        self.directory.join(QUEUE_FILE)
    }

    pub fn crawled_path(&self) -> PathBuf {
        self.directory.join(CRAWLED_FILE)
    }

    /// True when a previous run left a frontier behind
    pub fn has_checkpoint(&self) -> bool {
        self.queue_path().is_file()
    }

    /// Chooses between a fresh start and resuming
    pub fn decide(&self, force_fresh: bool) -> StartupDecision {
        if !force_fresh && self.has_checkpoint() {
            StartupDecision::Resume
        } else {
            StartupDecision::Fresh
        }
    }

    /// Builds the single crawl state the controller will own
    ///
    /// A fresh start requires a seed. When resuming, the seed is only used
    /// if the restored frontier is empty.
    pub fn initialize(
        &self,
        decision: StartupDecision,
        seed: Option<String>,
    ) -> Result<CrawlState, CrawlError> {
        match decision {
            StartupDecision::Fresh => {
                let seed = seed.ok_or(CrawlError::MissingSeed)?;
                tracing::info!("Starting fresh crawl from {}", seed);
                Ok(CrawlState::fresh(seed))
            }
            StartupDecision::Resume => {
                let frontier = self.load_frontier();
                let seen = self.load_seen();
                let mut state = CrawlState::restored(frontier, seen);

                if state.frontier.is_empty() {
                    if let Some(seed) = seed {
                        tracing::info!("Restored frontier is empty, enqueueing seed {}", seed);
                        state.frontier.enqueue(seed);
                    }
                }

                tracing::info!(
                    "Resuming with {} URLs in queue, {} pages seen",
                    state.frontier.size(),
                    state.seen.len()
                );
                Ok(state)
            }
        }
    }

    /// Reads `queue.json`, failing on any error
    pub fn read_queue(&self) -> Result<QueueDocument, CheckpointError> {
        read_document(&self.queue_path())
    }

    /// Reads `crawled.json`, failing on any error
    pub fn read_crawled(&self) -> Result<CrawledDocument, CheckpointError> {
        read_document(&self.crawled_path())
    }

    /// Loads the frontier, falling back to an empty queue
    pub fn load_frontier(&self) -> FrontierQueue {
        match self.read_queue() {
            Ok(doc) => {
                let frontier = doc.into_frontier();
                tracing::info!(
                    "Loaded queue from {} ({} URLs)",
                    self.queue_path().display(),
                    frontier.size()
                );
                frontier
            }
            Err(e) if e.is_missing() => {
                tracing::info!("No {} found, starting with an empty queue", QUEUE_FILE);
                FrontierQueue::new()
            }
            Err(e) => {
                tracing::warn!("{}; starting with an empty queue", e);
                FrontierQueue::new()
            }
        }
    }

    /// Loads the seen set, falling back to an empty set
    ///
    /// A missing `crawled.json` is replaced on disk by the default empty
    /// document.
    pub fn load_seen(&self) -> SeenSet {
        match self.read_crawled() {
            Ok(doc) => {
                let seen = doc.into_seen();
                tracing::info!(
                    "Loaded {} URL hashes from {}",
                    seen.len(),
                    self.crawled_path().display()
                );
                seen
            }
            Err(e) if e.is_missing() => {
                tracing::info!("No {} found, creating a new one", CRAWLED_FILE);
                if let Err(e) = self.write(&self.crawled_path(), &CrawledDocument::default()) {
                    tracing::error!("{}", e);
                }
                SeenSet::new()
            }
            Err(e) => {
                tracing::warn!("{}; starting with an empty seen set", e);
                SeenSet::new()
            }
        }
    }

    /// Rewrites `queue.json` from the frontier
    pub fn dump_frontier(&self, frontier: &FrontierQueue) -> Result<(), CheckpointError> {
        self.write(&self.queue_path(), &QueueDocument::from(frontier))?;
        tracing::info!(
            "Saved queue to {} ({} URLs)",
            self.queue_path().display(),
            frontier.size()
        );
        Ok(())
    }

    /// Rewrites `crawled.json` from the seen set
    pub fn dump_seen(&self, seen: &SeenSet) -> Result<(), CheckpointError> {
        self.write(&self.crawled_path(), &CrawledDocument::from(seen))?;
        tracing::info!(
            "Saved {} URL hashes to {}",
            seen.len(),
            self.crawled_path().display()
        );
        Ok(())
    }

    /// Writes both documents
    ///
    /// Each write is attempted once regardless of the other's outcome; the
    /// first failure is returned.
    pub fn save(&self, state: &CrawlState) -> Result<(), CheckpointError> {
        let seen = self.dump_seen(&state.seen);
        let frontier = self.dump_frontier(&state.frontier);
        seen.and(frontier)
    }

    fn write<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), CheckpointError> {
        let write_err = |source: io::Error| CheckpointError::Write {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.directory).map_err(write_err)?;
        let mut file = NamedTempFile::new_in(&self.directory).map_err(write_err)?;
        {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut file, formatter);
            value.serialize(&mut serializer)?;
        }
        file.write_all(b"\n").map_err(write_err)?;
        file.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, CheckpointError> {
    let content = fs::read_to_string(path).map_err(|source| CheckpointError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CheckpointError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
