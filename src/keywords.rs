//! Keyword extraction from URL paths
//!
//! Two passes over the corpus: first detect site-specific structural tokens
//! by document frequency, then extract the surviving topical tokens per URL.

use crate::model::UrlKeywords;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};
use url::Url;

/// Tokens that describe site structure rather than content topics
const STRUCTURAL_KEYWORDS: &[&str] = &[
    // Content sections
    "blog", "blogs", "articles", "article", "post", "posts", "news", "resources", "resource",
    "guides", "guide", "tutorials", "tutorial", "docs", "documentation", "learn", "academy",
    "education", "training", "help", "support", "faq", "faqs",
    // Site structure
    "page", "pages", "content", "category", "categories", "tag", "tags", "author", "authors",
    // Actions/features
    "webinar", "webinars", "event", "events", "case-study", "case-studies", "ebook", "ebooks",
    "whitepaper", "whitepapers", "newsletter",
    // Common dates
    "2025", "2024", "2023", "2022", "2021", "2020", "2019", "2018",
    // Generic terms
    "home", "index", "main", "default", "www",
    // Common stop words
    "the", "and", "for", "with", "how", "what", "why", "when", "where", "can", "you", "your",
    "our", "all", "new", "get", "use", "make",
];

/// Fraction of URLs a token must appear in to count as structural for the
/// corpus
const COMMON_KEYWORD_THRESHOLD: f64 = 0.3;

/// Path of a URL, tolerating bare paths and unparseable input
fn url_path(url: &str) -> Option<String> {
    match Url::parse(url) {
        Ok(parsed) => Some(parsed.path().to_string()),
        // Relative input: treat the string itself as a path if it looks
        // like one, matching lenient base-URL parsing upstream
        Err(_) if url.starts_with('/') => Some(url.to_string()),
        Err(_) => None,
    }
}

/// Tokens appearing in more than `threshold` of the URLs
///
/// Each token counts once per URL (document frequency, not raw frequency).
fn find_common_keywords(urls: &[String], threshold: f64) -> HashSet<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let total = urls.len();

    for url in urls {
        let Some(path) = url_path(url) else { continue };
        let unique: HashSet<String> = path
            .split(['/', '-', '_'])
            .filter(|t| t.len() > 2)
            .map(|t| t.to_lowercase())
            .collect();
        for token in unique {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let common: HashSet<String> = counts
        .into_iter()
        .filter(|(_, count)| total > 0 && *count as f64 / total as f64 > threshold)
        .map(|(token, _)| token)
        .collect();

    debug!(
        "Found {} common structural keywords: {:?}",
        common.len(),
        common
    );

    common
}

/// Topical tokens for one URL
fn keywords_for_url(url: &str, common: &HashSet<String>) -> Vec<String> {
    let Some(path) = url_path(url) else {
        return Vec::new();
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    // The first segment is a folder label, already captured by the folder
    // grouping; keep it only when it is the whole path
    let relevant = if segments.len() > 1 {
        &segments[1..]
    } else {
        &segments[..]
    };

    relevant
        .iter()
        .flat_map(|seg| seg.split(['-', '_']))
        .map(|t| t.to_lowercase())
        .filter(|t| {
            t.len() > 2
                && !t.chars().all(|c| c.is_ascii_digit())
                && !STRUCTURAL_KEYWORDS.contains(&t.as_str())
                && !common.contains(t)
        })
        .collect()
}

/// Extract keywords from every URL in the corpus
///
/// URLs whose keyword string comes out empty are dropped, so the output may
/// be shorter than the input.
pub fn extract_keywords(urls: &[String]) -> Vec<UrlKeywords> {
    info!("Extracting keywords from {} URLs", urls.len());

    let common = find_common_keywords(urls, COMMON_KEYWORD_THRESHOLD);

    let records: Vec<UrlKeywords> = urls
        .iter()
        .filter_map(|url| {
            let keywords = keywords_for_url(url, &common).join(" ");
            if keywords.is_empty() {
                None
            } else {
                Some(UrlKeywords {
                    url: url.clone(),
                    keywords,
                })
            }
        })
        .collect();

    info!(
        "Extracted keywords from {}/{} URLs",
        records.len(),
        urls.len()
    );

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn output_never_longer_than_input_and_keywords_non_empty() {
        let input = urls(&[
            "https://ex.com/pricing-plans",
            "https://ex.com/", // no tokens at all
            "https://ex.com/blog/virtual-backgrounds-guide",
            "https://ex.com/docs", // single structural segment
        ]);
        let records = extract_keywords(&input);
        assert!(records.len() <= input.len());
        for record in &records {
            assert!(!record.keywords.is_empty());
        }
    }

    /// A corpus wide enough that no token crosses the 30% document
    /// frequency threshold on its own
    fn spread_corpus(extra: &[&str]) -> Vec<String> {
        let mut input = urls(&[
            "https://ex.com/one/alpha-topic",
            "https://ex.com/two/beta-subject",
            "https://ex.com/three/gamma-theme",
            "https://ex.com/four/delta-matter",
        ]);
        input.extend(urls(extra));
        input
    }

    #[test]
    fn first_segment_dropped_when_deeper_path_exists() {
        let input = spread_corpus(&["https://ex.com/shop/garden-furniture"]);
        let records = extract_keywords(&input);
        let record = records
            .iter()
            .find(|r| r.url.ends_with("garden-furniture"))
            .unwrap();
        // "shop" is the folder; only the slug tokens survive
        assert_eq!(record.keywords, "garden furniture");
    }

    #[test]
    fn single_segment_paths_keep_their_tokens() {
        let input = spread_corpus(&["https://ex.com/enterprise-security"]);
        let records = extract_keywords(&input);
        let record = records
            .iter()
            .find(|r| r.url.ends_with("enterprise-security"))
            .unwrap();
        assert_eq!(record.keywords, "enterprise security");
    }

    #[test]
    fn short_numeric_and_structural_tokens_removed() {
        let input = spread_corpus(&["https://ex.com/blog/how-to-win-2024-ai-tips"]);
        let records = extract_keywords(&input);
        let record = records.iter().find(|r| r.url.contains("win")).unwrap();
        // "how", "2024" (fixed list), "to"/"ai" (len <= 2) all dropped
        assert_eq!(record.keywords, "win tips");
    }

    #[test]
    fn corpus_frequent_tokens_become_structural() {
        // "shop" appears in every URL, above the 30% document frequency
        // threshold, so it carries no signal for this site
        let input = urls(&[
            "https://ex.com/a/shop-chairs",
            "https://ex.com/b/shop-tables",
            "https://ex.com/c/shop-lamps",
            "https://ex.com/d/shop-desks",
        ]);
        let records = extract_keywords(&input);
        assert_eq!(records.len(), 4);
        for record in &records {
            assert!(
                !record.keywords.contains("shop"),
                "structural token kept: {}",
                record.keywords
            );
        }
    }

    #[test]
    fn unparseable_urls_are_dropped_not_errors() {
        let input = spread_corpus(&["not a url"]);
        let records = extract_keywords(&input);
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.url != "not a url"));
    }
}
