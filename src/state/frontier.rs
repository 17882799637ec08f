/// FIFO frontier of URLs waiting to be fetched
use std::collections::VecDeque;
use thiserror::Error;

/// Errors raised by frontier operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrontierError {
    /// `dequeue` was called on an empty queue; callers check `size()` first
    #[error("dequeue called on an empty frontier")]
    Empty,
}

/// Strict FIFO queue of URLs with lifetime enqueue accounting
///
/// No deduplication happens here: the same URL may be enqueued several times
/// and is filtered against the seen set when it reaches the head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontierQueue {
    urls: VecDeque<String>,
    total_enqueued: u64,
}

impl FrontierQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a queue from checkpointed parts
    ///
    /// `total_enqueued` is raised to the queue length if a damaged checkpoint
    /// recorded fewer enqueues than URLs, keeping `size() <= total_enqueued`.
    pub fn from_parts(urls: Vec<String>, total_enqueued: u64) -> Self {
        let total_enqueued = total_enqueued.max(urls.len() as u64);
        Self {
            urls: urls.into(),
            total_enqueued,
        }
    }

    /// Appends a URL to the tail
    pub fn enqueue(&mut self, url: impl Into<String>) {
        self.urls.push_back(url.into());
        self.total_enqueued += 1;
    }

    /// Removes and returns the head
    pub fn dequeue(&mut self) -> Result<String, FrontierError> {
        self.urls.pop_front().ok_or(FrontierError::Empty)
    }

    /// Current number of queued URLs
    pub fn size(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Number of enqueues over the lifetime of the crawl, across resumes
    pub fn total_enqueued(&self) -> u64 {
        self.total_enqueued
    }

    pub fn total_dequeued(&self) -> u64 {
        self.total_enqueued - self.urls.len() as u64
    }

    /// Queued URLs from head to tail
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}
