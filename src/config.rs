//! Analysis configuration

use crate::error::{AnalysisError, Result};
use std::time::Duration;

/// Default base URL for the site-mapping service
pub const DEFAULT_MAP_BASE_URL: &str = "https://api.firecrawl.dev/v1";

/// Default base URL for the extraction job service
pub const DEFAULT_EXTRACT_BASE_URL: &str = "https://api.firecrawl.dev/v2";

/// Model used for topic naming (lightweight, per-folder calls)
pub const TOPIC_MODEL: &str = "gpt-4.1-nano";

/// Model used for URL classification batches
pub const CLASSIFY_MODEL: &str = "gpt-4o-mini";

/// Configuration for one domain analysis
///
/// Holds the credentials for both external services plus the pacing knobs.
/// Credentials live for the lifetime of an analysis; nothing is global.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// API key for the site-mapping / extraction service
    pub map_api_key: String,

    /// API key for the chat-style labeling service
    pub labeling_api_key: String,

    /// Base URL for the site-mapping service
    pub map_base_url: String,

    /// Base URL for the extraction job service
    pub extract_base_url: String,

    /// Result cap passed to map calls
    pub map_limit: usize,

    /// URLs per classification batch
    pub batch_size: usize,

    /// Pause between classification batches
    pub batch_delay: Duration,

    /// Extract job poll interval
    pub poll_interval: Duration,

    /// Extract job poll budget (attempts * poll_interval = timeout)
    pub max_poll_attempts: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            map_api_key: String::new(),
            labeling_api_key: String::new(),
            map_base_url: DEFAULT_MAP_BASE_URL.to_string(),
            extract_base_url: DEFAULT_EXTRACT_BASE_URL.to_string(),
            map_limit: 5000,
            batch_size: 50,
            batch_delay: Duration::from_millis(500),
            poll_interval: Duration::from_secs(2),
            max_poll_attempts: 60, // 60 * 2s = 2 minutes
        }
    }
}

impl AnalysisConfig {
    /// Create a new config builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Load configuration from environment variables
    ///
    /// Requires `FIRECRAWL_API_KEY` and `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let map_api_key = std::env::var("FIRECRAWL_API_KEY")
            .map_err(|_| AnalysisError::ConfigError("FIRECRAWL_API_KEY not set".to_string()))?;
        let labeling_api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AnalysisError::ConfigError("OPENAI_API_KEY not set".to_string()))?;

        Ok(Self {
            map_api_key,
            labeling_api_key,
            ..Self::default()
        })
    }
}

/// Builder for AnalysisConfig
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Set the site-mapping service API key
    pub fn map_api_key(mut self, key: &str) -> Self {
        self.config.map_api_key = key.to_string();
        self
    }

    /// Set the labeling service API key
    pub fn labeling_api_key(mut self, key: &str) -> Self {
        self.config.labeling_api_key = key.to_string();
        self
    }

    /// Set the site-mapping service base URL
    pub fn map_base_url(mut self, url: &str) -> Self {
        self.config.map_base_url = url.to_string();
        self
    }

    /// Set the extraction service base URL
    pub fn extract_base_url(mut self, url: &str) -> Self {
        self.config.extract_base_url = url.to_string();
        self
    }

    /// Set the map result cap
    pub fn map_limit(mut self, limit: usize) -> Self {
        self.config.map_limit = limit;
        self
    }

    /// Set the classification batch size
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the pause between classification batches
    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.config.batch_delay = delay;
        self
    }

    /// Set the extract job poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the extract job poll budget
    pub fn max_poll_attempts(mut self, attempts: u32) -> Self {
        self.config.max_poll_attempts = attempts;
        self
    }

    /// Build the config
    pub fn build(self) -> AnalysisConfig {
        self.config
    }
}

impl Default for AnalysisConfigBuilder {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = AnalysisConfig::builder()
            .map_api_key("fc-test")
            .batch_size(10)
            .max_poll_attempts(3)
            .build();

        assert_eq!(config.map_api_key, "fc-test");
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_poll_attempts, 3);
        // Untouched fields keep defaults
        assert_eq!(config.map_limit, 5000);
        assert_eq!(config.batch_delay, Duration::from_millis(500));
    }
}
