//! Sitescope - a Rust service for analyzing website content structure
//!
//! Given a domain, this service discovers the site's URLs through an
//! external site-mapping service, filters out junk and localized pages,
//! derives keywords per URL, groups URLs by folder, names topics with an
//! AI labeling service, classifies every URL into a topic, and computes a
//! blog-to-website content ratio.
//!
//! Two entry points:
//! - [`analyze_topics`] - full-site topic classification with outliers
//! - [`analyze_blog_ratio`] - blog vs. core-site split with per-folder topics

pub mod classify;
pub mod config;
pub mod error;
pub mod folders;
pub mod keywords;
pub mod labeling;
pub mod model;
pub mod sitemap;
pub mod topics;
pub mod url_filter;

pub use classify::{merge_classifications, Classification, MergeOutcome};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use folders::{group_by_folder, min_topic_count, other_threshold, topic_count};
pub use keywords::extract_keywords;
pub use labeling::{ExtractJobClient, Labeler};
pub use model::{BlogRatio, FolderGroup, Topic, TopicAnalysis, TopicCount, TopicWithUrls, UrlKeywords};
pub use sitemap::{MapOptions, SiteMapper};
pub use url_filter::{filter_non_english, filter_urls, is_blog_url, normalize_domain};

use std::collections::HashSet;
use tracing::{info, warn};

/// Run the full-site topic analysis for a domain
///
/// Discovery and the site-wide topic extraction are fatal paths; an empty
/// topic set from a successful extraction is a valid terminal state where
/// classification is skipped entirely and the outlier fields stay absent.
pub async fn analyze_topics(config: &AnalysisConfig, domain: &str) -> Result<TopicAnalysis> {
    let domain = normalize_domain(domain);
    if domain.is_empty() {
        return Err(AnalysisError::InvalidDomain);
    }

    info!("Analyzing domain: {}", domain);

    // Step 1: discover all URLs
    let mapper = SiteMapper::new(config)?;
    let all_urls = mapper.map_website(&domain).await?;
    info!("Map returned {} URLs", all_urls.len());

    // Step 2: drop junk, localized and off-domain URLs
    let valid_urls = filter_urls(&all_urls, Some(&domain));
    info!("{} valid URLs after filtering", valid_urls.len());

    // Step 3: keyword extraction shrinks the working set further
    let records = extract_keywords(&valid_urls);
    if records.is_empty() {
        return Err(AnalysisError::NoKeywords);
    }

    // Step 4: site-wide topic set from the homepage (fatal on failure)
    let extract_client = ExtractJobClient::new(config)?;
    let site_topics = topics::extract_site_topics(&extract_client, &domain).await?;

    if site_topics.is_empty() {
        info!("No topics found for {}; returning empty topic set", domain);
        return Ok(TopicAnalysis {
            domain,
            topics: Vec::new(),
            outliers: None,
            outlier_count: None,
            total_urls: all_urls.len(),
            valid_urls: valid_urls.len(),
            urls_with_keywords: records.len(),
        });
    }

    // Step 5: classify every record into the topic set
    let labeler = Labeler::new(&config.labeling_api_key);
    let topic_names: Vec<String> = site_topics.iter().map(|t| t.name.clone()).collect();
    let classifications =
        classify::classify_urls(&labeler, config, &topic_names, &records).await?;
    info!("Received {} classifications", classifications.len());

    let outcome = merge_classifications(&site_topics, &records, &classifications);
    if outcome.skipped > 0 || outcome.unmatched > 0 {
        warn!(
            "Merge dropped {} malformed and {} unmatched classification entries",
            outcome.skipped, outcome.unmatched
        );
    }
    for bucket in &outcome.topics {
        info!("  {}: {} pages", bucket.name, bucket.count);
    }
    info!("Outliers: {}", outcome.outliers.len());

    Ok(TopicAnalysis {
        domain,
        topics: outcome.topics,
        outlier_count: Some(outcome.outliers.len()),
        outliers: Some(outcome.outliers),
        total_urls: all_urls.len(),
        valid_urls: valid_urls.len(),
        urls_with_keywords: records.len(),
    })
}

fn dedupe_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

/// Run the blog-to-website ratio analysis for a domain
pub async fn analyze_blog_ratio(config: &AnalysisConfig, domain: &str) -> Result<BlogRatio> {
    let domain = normalize_domain(domain);
    if domain.is_empty() {
        return Err(AnalysisError::InvalidDomain);
    }

    info!("Starting blog ratio analysis for: {}", domain);

    // Both map calls are independent; run them concurrently
    let mapper = SiteMapper::new(config)?;
    let (blog_mapped, site_mapped) =
        tokio::join!(mapper.map_blog_pages(&domain), mapper.map_website(&domain));
    let blog_mapped = blog_mapped?;
    let site_mapped = site_mapped?;
    info!(
        "Blog map returned {} URLs, site map returned {}",
        blog_mapped.len(),
        site_mapped.len()
    );

    let blog_candidates = filter_non_english(&blog_mapped);
    let site_candidates = filter_non_english(&site_mapped);

    // The blog search is noisy: keep only URLs that actually look like blog
    // pages, and drop blog-shaped URLs from the site set
    let blog_urls: Vec<String> = blog_candidates
        .into_iter()
        .filter(|u| is_blog_url(u))
        .collect();
    let website_urls: Vec<String> = site_candidates
        .into_iter()
        .filter(|u| !is_blog_url(u))
        .collect();

    let blog_urls = dedupe_preserving_order(blog_urls);
    let website_urls = dedupe_preserving_order(website_urls);
    info!(
        "Unique blog URLs: {}, unique website URLs: {}",
        blog_urls.len(),
        website_urls.len()
    );

    let groups = group_by_folder(&website_urls);
    info!("Website folders: {}", groups.len());

    // Blog topics and per-folder topics are independent labeling calls
    let labeler = Labeler::new(&config.labeling_api_key);
    let (blog_topics, website_folders) = tokio::join!(
        topics::extract_topics(
            &labeler,
            &blog_urls,
            topic_count(blog_urls.len()),
            min_topic_count(blog_urls.len()),
        ),
        topics::add_topics_to_folders(&labeler, groups),
    );
    info!("Blog topics: {}", blog_topics.len());

    let total_urls = blog_urls.len() + website_urls.len();
    let blog_percentage = model::percentage(blog_urls.len(), total_urls);
    let website_percentage = model::percentage(website_urls.len(), total_urls);

    let mut blog_urls_list = blog_urls;
    blog_urls_list.sort();
    let mut website_urls_list = website_urls;
    website_urls_list.sort();

    info!("Blog ratio analysis complete for {}", domain);

    Ok(BlogRatio {
        domain,
        total_urls,
        blog_urls: blog_urls_list.len(),
        website_urls: website_urls_list.len(),
        blog_percentage,
        website_percentage,
        blog_urls_list,
        website_urls_list,
        website_folders,
        blog_topics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let input = vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
        ];
        assert_eq!(
            dedupe_preserving_order(input),
            vec!["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_domain_fails_before_any_external_call() {
        let config = AnalysisConfig::default();
        let err = analyze_topics(&config, "   ").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidDomain));

        let err = analyze_blog_ratio(&config, "https:///").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidDomain));
    }
}
