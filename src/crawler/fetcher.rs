//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with a browser-like user agent and a fixed timeout
//! - GET requests to fetch page content
//! - Classifying failures so the crawl loop only sees "body" or "nothing"
//!
//! Nothing in here returns an error to the caller. A page that cannot be
//! fetched is reported as a non-success `FetchResult` and logged.

use crate::config::CrawlerConfig;
use reqwest::{Client, StatusCode};

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered 200 with a body
    Success {
        /// Page body content
        body: String,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Timeout, DNS failure, refused or reset connection, unreadable body
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// The page body, or None for every failure and for an empty body
    pub fn into_body(self) -> Option<String> {
        match self {
            Self::Success { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

/// Builds an HTTP client with the configured user agent and timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.fetch_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 | Success |
/// | Any other status | HttpError |
/// | Timeout | NetworkError |
/// | Connection refused / DNS | NetworkError |
/// | Body read failure | NetworkError |
/// | Unparseable URL | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            tracing::warn!("Error fetching {}: {}", url, error);
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::debug!("{} answered HTTP {}", url, status.as_u16());
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    if response.url().as_str() != url {
        tracing::debug!("{} redirected to {}", url, response.url());
    }

    match response.text().await {
        Ok(body) => FetchResult::Success { body },
        Err(e) => {
            tracing::warn!("Error reading body of {}: {}", url, e);
            FetchResult::NetworkError {
                error: e.to_string(),
            }
        }
    }
}

/// Owns the HTTP client used by the crawl loop
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}
