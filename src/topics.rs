//! Topic aggregation
//!
//! The lightweight path names topics for a URL corpus (per folder, per blog)
//! and degrades to an empty list on any labeling fault. The heavy path runs
//! the site-wide extraction job whose faults are fatal.

use crate::config::TOPIC_MODEL;
use crate::error::Result;
use crate::folders::{min_topic_count, topic_count};
use crate::labeling::{ExtractJobClient, Labeler};
use crate::model::{FolderGroup, Topic, TopicCount};
use futures::future::join_all;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{info, warn};
use url::Url;

/// Slug sample cap per labeling request, bounding external-call cost
const MAX_SLUGS: usize = 100;

fn extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.[a-z]+$").expect("invalid extension pattern"))
}

/// Slug portion of a URL: everything after the first path segment, with
/// extensions stripped and separators spaced out
///
/// Returns None when nothing remains after the folder segment.
pub fn extract_slug(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path().split('/').filter(|s| !s.is_empty()).collect();

    // The folder segment is already visible in the grouping
    let slug_segments = segments.get(1..)?;
    if slug_segments.is_empty() {
        return None;
    }

    let joined = slug_segments.join("/");
    let stripped = extension_pattern().replace(&joined, "");
    Some(stripped.replace(['-', '_'], " ").to_lowercase())
}

fn topic_prompt(slugs: &[String], total_urls: usize, top_n: usize, min_count: usize) -> String {
    let slug_list = slugs
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze these URL slugs from a website section and identify the top {top_n} content themes/topics.
Group similar content together and return concise, human-readable topic names (2-4 words max).
Estimate how many of the slugs belong to each topic.

URL slugs:
{slug_list}

Total URLs in this section: {total_urls}

Return JSON with this exact structure:
{{
  "topics": [
    {{ "name": "Topic Name", "count": number_of_articles }}
  ]
}}

Rules:
- Return at most {top_n} topics
- Topic names should be concise and descriptive (e.g., "Virtual Backgrounds", "Webinar Software")
- Count should be your estimate of how many URLs belong to that topic
- Only include topics that have at least {min_count} related URLs
- IMPORTANT: Detect the language of the URL slugs and return topic names in that SAME language (e.g., if slugs are in French, return French topic names like "Arrière-plans Virtuels")"#
    )
}

/// Validate a topic-naming response into `TopicCount`s
///
/// Drops entries below `min_count` even when the service ignored the
/// instruction, then truncates to `top_n`.
pub fn validate_topics(value: &Value, top_n: usize, min_count: usize) -> Option<Vec<TopicCount>> {
    let topics = value.get("topics")?.as_array()?;

    let valid: Vec<TopicCount> = topics
        .iter()
        .filter_map(|t| {
            let name = t.get("name")?.as_str()?.to_string();
            let count = t.get("count")?.as_u64()? as usize;
            (count >= min_count).then_some(TopicCount { name, count })
        })
        .take(top_n)
        .collect();

    Some(valid)
}

/// Name the top topics for a URL corpus
///
/// Topics are supplementary to the ratio computation, so every fault here
/// (transport, malformed JSON, wrong shape) degrades to an empty list.
pub async fn extract_topics(
    labeler: &Labeler,
    urls: &[String],
    top_n: usize,
    min_count: usize,
) -> Vec<TopicCount> {
    let slugs: Vec<String> = urls.iter().filter_map(|u| extract_slug(u)).collect();
    if slugs.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let unique: Vec<String> = slugs
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .take(MAX_SLUGS)
        .collect();

    let prompt = topic_prompt(&unique, urls.len(), top_n, min_count);

    let value = match labeler.complete_json(TOPIC_MODEL, &prompt).await {
        Ok(v) => v,
        Err(e) => {
            warn!("Topic naming failed, continuing without topics: {}", e);
            return Vec::new();
        }
    };

    match validate_topics(&value, top_n, min_count) {
        Some(topics) => topics,
        None => {
            warn!("Topic naming returned an unexpected shape, ignoring");
            Vec::new()
        }
    }
}

/// Name topics for every folder group concurrently
///
/// One independent labeling call per folder with size-adaptive counts;
/// results are combined by index after all complete. A single failing call
/// contributes an empty list instead of failing the batch.
pub async fn add_topics_to_folders(
    labeler: &Labeler,
    groups: Vec<FolderGroup>,
) -> Vec<FolderGroup> {
    info!("Extracting topics for {} folders", groups.len());

    let futures = groups
        .iter()
        .map(|group| extract_topics(labeler, &group.urls, topic_count(group.count), min_topic_count(group.count)));
    let all_topics = join_all(futures).await;

    groups
        .into_iter()
        .zip(all_topics)
        .map(|(mut group, topics)| {
            group.topics = topics;
            group
        })
        .collect()
}

fn site_topics_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "topics": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Topic name (2-5 words)" },
                        "description": { "type": "string", "description": "Brief description of this topic area" },
                    },
                    "required": ["name", "description"],
                },
                "description": "Top 5 main benefit areas or topic categories of this website",
            },
        },
        "required": ["topics"],
    })
}

const SITE_TOPICS_PROMPT: &str = "Analyze this website homepage and identify the top 5 main \
benefit areas, topic categories, or sections that this website offers. These should be \
high-level themes";

/// Parse the extract job payload into site-wide topics
pub fn parse_site_topics(data: &Value) -> Vec<Topic> {
    data.get("topics")
        .and_then(|t| t.as_array())
        .map(|topics| {
            topics
                .iter()
                .filter_map(|t| {
                    Some(Topic {
                        name: t.get("name")?.as_str()?.to_string(),
                        description: t
                            .get("description")
                            .and_then(|d| d.as_str())
                            .map(|d| d.to_string()),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Extract the site-wide topic set from the domain's homepage
///
/// Heavy path: faults propagate. An empty topic array is still a valid
/// terminal result for the caller.
pub async fn extract_site_topics(
    extract_client: &ExtractJobClient,
    domain: &str,
) -> Result<Vec<Topic>> {
    let url = format!("https://{domain}");
    let data = extract_client
        .extract(&url, site_topics_schema(), SITE_TOPICS_PROMPT)
        .await?;

    let topics = parse_site_topics(&data);
    info!("Site topic extraction found {} topics", topics.len());
    Ok(topics)
}
