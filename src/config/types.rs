use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default cap on processed pages per run
pub const DEFAULT_BUDGET: u64 = 5000;

/// Browser-like user agent sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub checkpoint: CheckpointConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// URL used to seed a fresh crawl
    pub seed: Option<String>,

    /// Maximum number of pages marked seen before the run halts
    pub budget: u64,

    /// Pause between processed pages (milliseconds)
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    pub fetch_timeout_secs: u64,

    /// User-Agent header value
    pub user_agent: String,

    /// Snapshot the checkpoint every N processed pages, 0 disables
    pub checkpoint_interval: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            budget: DEFAULT_BUDGET,
            request_delay_ms: 100,
            fetch_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            checkpoint_interval: 50,
        }
    }
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Where `queue.json` and `crawled.json` live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    pub directory: PathBuf,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite document database
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./pages.db".to_string(),
        }
    }
}
