use crate::state::{FrontierQueue, SeenSet};

/// Everything the crawl loop mutates, owned by a single controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlState {
    pub frontier: FrontierQueue,
    pub seen: SeenSet,
    /// Pages marked seen so far; compared against the budget
    pub processed_count: u64,
}

impl CrawlState {
    /// Fresh state: empty seen set and a queue holding only the seed
    pub fn fresh(seed: impl Into<String>) -> Self {
        let mut frontier = FrontierQueue::new();
        frontier.enqueue(seed);
        Self {
            frontier,
            seen: SeenSet::new(),
            processed_count: 0,
        }
    }

    /// State restored from a checkpoint
    ///
    /// The processed counter resumes at the seen count so the budget spans
    /// the whole crawl rather than a single process lifetime.
    pub fn restored(frontier: FrontierQueue, seen: SeenSet) -> Self {
        let processed_count = seen.len() as u64;
        Self {
            frontier,
            seen,
            processed_count,
        }
    }
}
