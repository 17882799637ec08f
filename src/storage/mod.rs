//! Document storage for crawled pages
//!
//! This module handles persisting the text of fetched pages:
//! - `Document`, the `{url, text}` unit handed to a sink
//! - the `DocumentSink` trait the crawl loop writes through
//! - a SQLite-backed sink and an in-memory sink

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemorySink;
pub use sqlite::SqliteSink;
pub use traits::{DocumentSink, SinkError, SinkResult};

use crate::crawler::extract_text;

/// Page text persisted by a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub url: String,
    pub text: String,
}

impl Document {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }

    /// Builds a document from raw HTML, keeping only visible text
    pub fn from_html(url: &str, html: &str) -> Self {
        Self::new(url, extract_text(html))
    }
}
