//! HTML parsing for link and text extraction
//!
//! This module handles parsing HTML content to extract:
//! - Outbound links from `<a href>` tags, resolved to absolute http(s) URLs
//! - Whitespace-normalized visible text for the document sink
//!
//! The underlying parser is error tolerant: malformed markup produces a
//! partial tree, so both functions return whatever could be recovered.

use scraper::{Html, Node, Selector};
use url::Url;

/// Elements whose text content is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts every anchor link from the page
///
/// # Link Extraction Rules
///
/// - Every `<a href="...">` is considered, in document order
/// - Empty hrefs are skipped
/// - Relative hrefs are resolved against `base_url`
/// - Only `http` and `https` results are kept
/// - Duplicates are kept; deduplication happens in the crawl loop
///
/// # Example
///
/// ```
/// use bfs_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/page">Link</a><a href="mailto:a@b.c">Mail</a>"#;
/// let base_url = Url::parse("https://example.com/dir/").unwrap();
/// assert_eq!(extract_links(html, &base_url), vec!["https://example.com/page"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None for empty hrefs, hrefs that cannot be joined onto the base,
/// and anything that does not resolve to http or https.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(e) => {
            tracing::debug!("Could not resolve link {} against {}: {}", href, base_url, e);
            None
        }
    }
}

/// Extracts the visible text of a page
///
/// Text nodes outside script-like elements are split on whitespace and
/// joined with single spaces.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                matches!(ancestor.value(), Node::Element(element)
                    if HIDDEN_ELEMENTS.contains(&element.name()))
            });
            if !hidden {
                words.extend(text.split_whitespace());
            }
        }
    }

    words.join(" ")
}
