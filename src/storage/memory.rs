use crate::storage::traits::{DocumentSink, SinkError, SinkResult};
use crate::storage::Document;

/// Sink that keeps documents in memory
///
/// Used by dry runs and tests. `fail_after` makes every store past the given
/// count fail, to exercise the crawl loop's handling of sink errors.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Vec<Document>,
    fail_after: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects stores once `limit` documents are held
    pub fn failing_after(limit: usize) -> Self {
        Self {
            documents: Vec::new(),
            fail_after: Some(limit),
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn urls(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.url.as_str()).collect()
    }
}

impl DocumentSink for MemorySink {
    fn store(&mut self, document: &Document) -> SinkResult<()> {
        if let Some(limit) = self.fail_after {
            if self.documents.len() >= limit {
                return Err(SinkError::Unavailable(format!(
                    "memory sink refuses more than {} documents",
                    limit
                )));
            }
        }
        self.documents.push(document.clone());
        Ok(())
    }

    fn count(&self) -> SinkResult<u64> {
        Ok(self.documents.len() as u64)
    }
}
