/// Hash-based record of visited URLs
use std::collections::HashSet;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a hash of the URL's UTF-8 bytes
pub fn hash_url(url: &str) -> u64 {
    url.as_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Set of URL hashes marked as visited
///
/// Only the hash is kept. Two URLs with colliding hashes are treated as the
/// same page, so a colliding URL that was never fetched is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    hashes: HashSet<u64>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as seen, returning true if it was not seen before
    pub fn add(&mut self, url: &str) -> bool {
        self.insert_hash(hash_url(url))
    }

    pub fn contains(&self, url: &str) -> bool {
        self.contains_hash(hash_url(url))
    }

    pub fn insert_hash(&mut self, hash: u64) -> bool {
        self.hashes.insert(hash)
    }

    pub fn contains_hash(&self, hash: u64) -> bool {
        self.hashes.contains(&hash)
    }

    /// Number of distinct hashes marked seen
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn hashes(&self) -> impl Iterator<Item = u64> + '_ {
        self.hashes.iter().copied()
    }
}

impl FromIterator<u64> for SeenSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            hashes: iter.into_iter().collect(),
        }
    }
}
