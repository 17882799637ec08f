//! Sink trait and error types

use crate::storage::Document;
use thiserror::Error;

/// Errors that can occur while persisting documents
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Append-only destination for crawled documents
///
/// No uniqueness is implied: storing the same URL twice keeps both records.
pub trait DocumentSink {
    /// Persists one document
    fn store(&mut self, document: &Document) -> SinkResult<()>;

    /// Number of documents persisted so far
    fn count(&self) -> SinkResult<u64>;
}
