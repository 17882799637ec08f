//! In-memory crawl state
//!
//! This module defines the structures the crawl loop mutates:
//! - `FrontierQueue`: FIFO of discovered, unfetched URLs
//! - `SeenSet`: FNV-1a hashes of every URL already marked visited
//! - `CrawlState`: the two above plus the processed-page counter

mod crawl_state;
mod frontier;
mod seen;

pub use crawl_state::CrawlState;
pub use frontier::{FrontierError, FrontierQueue};
pub use seen::{hash_url, SeenSet};
