//! Data model for analysis results
//!
//! The serde renames on the response types pin the wire format consumed by
//! downstream tooling; field names here follow Rust conventions.

use serde::{Deserialize, Serialize};

/// A URL paired with its extracted keyword string
///
/// Created once by the keyword extractor and immutable afterwards. The
/// keyword string is a space-joined sequence of lowercase tokens; records
/// with an empty string are dropped before any downstream step sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlKeywords {
    pub url: String,
    pub keywords: String,
}

/// A topic identified for the whole site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A topic bucket with its assigned URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicWithUrls {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub urls: Vec<UrlKeywords>,
    pub count: usize,
}

impl TopicWithUrls {
    /// Empty bucket for a topic, filled during classification merge
    pub fn empty(topic: &Topic) -> Self {
        Self {
            name: topic.name.clone(),
            description: topic.description.clone(),
            urls: Vec::new(),
            count: 0,
        }
    }
}

/// A named topic with an estimated page count (folder/blog sub-topics)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub name: String,
    pub count: usize,
}

/// URLs grouped under one first-level folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderGroup {
    pub folder: String,
    pub urls: Vec<String>,
    pub count: usize,
    pub topics: Vec<TopicCount>,
}

/// Result of the full-site topic analysis
///
/// The "no topics found" case is a valid success: `topics` is empty and the
/// outlier fields are omitted entirely, which is a deliberately different
/// shape from the fatal-error case (a bare error message).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicAnalysis {
    pub domain: String,
    pub topics: Vec<TopicWithUrls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<Vec<UrlKeywords>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_count: Option<usize>,
    pub total_urls: usize,
    pub valid_urls: usize,
    pub urls_with_keywords: usize,
}

/// Result of the blog-to-website ratio analysis
///
/// Percentages are integer-rounded independently for blog and website, so
/// they are not guaranteed to sum to exactly 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogRatio {
    pub domain: String,
    pub total_urls: usize,
    pub blog_urls: usize,
    pub website_urls: usize,
    pub blog_percentage: u32,
    pub website_percentage: u32,
    pub blog_urls_list: Vec<String>,
    pub website_urls_list: Vec<String>,
    pub website_folders: Vec<FolderGroup>,
    pub blog_topics: Vec<TopicCount>,
}

/// Integer-rounded percentage of `part` within `total` (0 when total is 0)
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}
