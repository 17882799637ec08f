//! On-disk layout of the two checkpoint documents

use crate::state::{FrontierQueue, SeenSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contents of `queue.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDocument {
    #[serde(default)]
    pub total_qued: u64,
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub urls: Vec<String>,
}

impl From<&FrontierQueue> for QueueDocument {
    fn from(frontier: &FrontierQueue) -> Self {
        Self {
            total_qued: frontier.total_enqueued(),
            number: frontier.size() as u64,
            urls: frontier.iter().map(str::to_string).collect(),
        }
    }
}

impl QueueDocument {
    pub fn into_frontier(self) -> FrontierQueue {
        if self.number != self.urls.len() as u64 {
            tracing::warn!(
                "queue.json records {} URLs but lists {}; using the list",
                self.number,
                self.urls.len()
            );
        }
        FrontierQueue::from_parts(self.urls, self.total_qued)
    }
}

/// Contents of `crawled.json`
///
/// Keys are decimal renderings of URL hashes. A `BTreeMap` keeps the key order
/// stable so dumping the same set twice produces the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawledDocument {
    #[serde(default)]
    pub data: BTreeMap<String, bool>,
    #[serde(default)]
    pub number: u64,
}

impl From<&SeenSet> for CrawledDocument {
    fn from(seen: &SeenSet) -> Self {
        let data: BTreeMap<String, bool> =
            seen.hashes().map(|hash| (hash.to_string(), true)).collect();
        Self {
            number: data.len() as u64,
            data,
        }
    }
}

impl CrawledDocument {
    /// Converts to a seen set, skipping keys that are not valid hashes
    pub fn into_seen(self) -> SeenSet {
        let recorded = self.number;
        let seen: SeenSet = self
            .data
            .into_keys()
            .filter_map(|key| match key.parse::<u64>() {
                Ok(hash) => Some(hash),
                Err(_) => {
                    tracing::warn!("Ignoring malformed hash key in crawled.json: {}", key);
                    None
                }
            })
            .collect();

        if recorded != seen.len() as u64 {
            tracing::warn!(
                "crawled.json records {} hashes but holds {}; using the held count",
                recorded,
                seen.len()
            );
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::hash_url;

    #[test]
    fn test_queue_document_field_names() {
        let mut frontier = FrontierQueue::new();
        frontier.enqueue("http://a.test/");
        frontier.enqueue("http://b.test/");
        frontier.dequeue().unwrap();

        let json = serde_json::to_value(QueueDocument::from(&frontier)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total_qued": 2,
                "number": 1,
                "urls": ["http://b.test/"]
            })
        );
    }

    #[test]
    fn test_crawled_document_field_names() {
        let mut seen = SeenSet::new();
        seen.add("http://a.test/");

        let json = serde_json::to_value(CrawledDocument::from(&seen)).unwrap();
        let key = hash_url("http://a.test/").to_string();
        assert_eq!(json["number"], 1);
        assert_eq!(json["data"][key.as_str()], true);
    }

    #[test]
    fn test_malformed_keys_are_skipped() {
        let doc: CrawledDocument = serde_json::from_str(
            r#"{"data": {"12345": true, "not-a-hash": true}, "number": 2}"#,
        )
        .unwrap();
        let seen = doc.into_seen();
        assert_eq!(seen.len(), 1);
        assert!(seen.contains_hash(12345));
    }

    #[test]
    fn test_missing_fields_default() {
        let doc: QueueDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, QueueDocument::default());

        let doc: CrawledDocument = serde_json::from_str(r#"{"number": 0}"#).unwrap();
        assert!(doc.data.is_empty());
    }
}
