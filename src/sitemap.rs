//! Site-mapping service client
//!
//! Discovers a site's URLs through the external mapping service. Discovery
//! failures are fatal to the enclosing analysis; there is no fallback URL
//! source.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Options for one map call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    /// Optional search term to bias discovery (the blog call uses "blog")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Whether to include subdomains in the map
    pub include_subdomains: bool,

    /// Result cap
    pub limit: usize,

    /// Restrict discovery to the sitemap (used for the blog call)
    pub sitemap_only: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            search: None,
            include_subdomains: false,
            limit: 5000,
            sitemap_only: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct MapRequest<'a> {
    url: &'a str,
    #[serde(flatten)]
    options: &'a MapOptions,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    success: bool,
    #[serde(default)]
    links: Option<Vec<String>>,
}

/// Client for the site-mapping service
pub struct SiteMapper {
    client: Client,
    api_key: String,
    base_url: String,
    limit: usize,
}

impl SiteMapper {
    /// Create a mapper from analysis config
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key: config.map_api_key.clone(),
            base_url: config.map_base_url.clone(),
            limit: config.map_limit,
        })
    }

    /// Map a site and return the discovered URLs
    pub async fn map(&self, url: &str, options: &MapOptions) -> Result<Vec<String>> {
        let target = if url.starts_with("http") {
            url.to_string()
        } else {
            format!("https://{url}")
        };

        info!("Mapping site: {}", target);

        let response = self
            .client
            .post(format!("{}/map", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&MapRequest {
                url: &target,
                options,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::MapFailed {
                url: target,
                message: format!("status {status}: {body}"),
            });
        }

        let data: MapResponse = response.json().await?;
        if !data.success {
            return Err(AnalysisError::MapFailed {
                url: target,
                message: "service reported failure".to_string(),
            });
        }

        let links = data.links.ok_or_else(|| AnalysisError::MapFailed {
            url: target.clone(),
            message: "no links returned".to_string(),
        })?;

        debug!("Map returned {} URLs for {}", links.len(), target);
        Ok(links)
    }

    /// Map the whole site
    pub async fn map_website(&self, domain: &str) -> Result<Vec<String>> {
        self.map(
            domain,
            &MapOptions {
                limit: self.limit,
                ..MapOptions::default()
            },
        )
        .await
    }

    /// Map blog pages via a sitemap-restricted search
    ///
    /// The search is noisy; callers re-validate results against the blog URL
    /// patterns before trusting them.
    pub async fn map_blog_pages(&self, domain: &str) -> Result<Vec<String>> {
        self.map(
            domain,
            &MapOptions {
                search: Some("blog".to_string()),
                include_subdomains: true,
                limit: self.limit,
                sitemap_only: true,
            },
        )
        .await
    }
}
