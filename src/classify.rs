//! URL classification and merge
//!
//! Classification batches go to the labeling service sequentially with a
//! deliberate pause between them (backpressure against its rate limits, not
//! an optimization). The merge step then maps returned labels back onto the
//! original records by exact or fuzzy topic-name matching.

use crate::config::{AnalysisConfig, CLASSIFY_MODEL};
use crate::error::{AnalysisError, Result};
use crate::labeling::Labeler;
use crate::model::{Topic, TopicWithUrls, UrlKeywords};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tokio::time::sleep;
use tracing::{info, warn};

/// One classification entry returned by the labeling service
///
/// Both fields are optional on the wire; entries missing either are dropped
/// during the merge.
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Pull a classification list out of a tolerant set of response shapes
///
/// Ordered shape adapters: `results`, `classifications`, `urls`, then a bare
/// array; the first structurally valid one wins.
pub fn parse_classifications(value: &Value) -> Option<Vec<Classification>> {
    let array = ["results", "classifications", "urls"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_array()))
        .or_else(|| value.as_array())?;

    let entries = array
        .iter()
        .map(|entry| Classification {
            url: entry.get("url").and_then(|v| v.as_str()).map(String::from),
            topic: entry
                .get("topic")
                .and_then(|v| v.as_str())
                .map(String::from),
        })
        .collect();

    Some(entries)
}

fn classification_prompt(topic_names: &[String], batch: &[UrlKeywords]) -> Result<String> {
    let topic_list = topic_names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n");

    let batch_json = serde_json::to_string_pretty(batch)?;

    Ok(format!(
        r#"You are classifying website URLs into topic categories.

Main Topics:
{topic_list}

Task: Classify each URL below into ONE of the topics above (use exact topic name), or mark as "outlier" if it doesn't fit any topic.

URLs to classify:
{batch_json}

Return a JSON object with this structure:
{{
  "results": [
    {{ "url": "full URL here", "topic": "exact topic name or 'outlier'" }}
  ]
}}"#
    ))
}

/// Classify all records against the topic names, batch by batch
///
/// Batches run strictly sequentially with the configured pause between them.
/// Any transport or shape failure is fatal for the whole classification.
pub async fn classify_urls(
    labeler: &Labeler,
    config: &AnalysisConfig,
    topic_names: &[String],
    records: &[UrlKeywords],
) -> Result<Vec<Classification>> {
    let batches: Vec<&[UrlKeywords]> = records.chunks(config.batch_size).collect();
    info!(
        "Classifying {} URLs in {} batches of max {}",
        records.len(),
        batches.len(),
        config.batch_size
    );

    let mut all = Vec::with_capacity(records.len());

    for (idx, batch) in batches.iter().enumerate() {
        info!(
            "Processing batch {}/{} ({} URLs)",
            idx + 1,
            batches.len(),
            batch.len()
        );

        let prompt = classification_prompt(topic_names, batch)?;
        let value = labeler
            .complete_json(CLASSIFY_MODEL, &prompt)
            .await
            .map_err(|e| AnalysisError::ClassificationFailed {
                batch: idx + 1,
                message: e.to_string(),
            })?;

        let entries =
            parse_classifications(&value).ok_or_else(|| AnalysisError::ClassificationFailed {
                batch: idx + 1,
                message: "expected a classification array".to_string(),
            })?;

        info!("Batch {} complete: {} classifications", idx + 1, entries.len());
        all.extend(entries);

        if idx + 1 < batches.len() {
            sleep(config.batch_delay).await;
        }
    }

    Ok(all)
}

/// Result of merging classifications back onto the working set
#[derive(Debug)]
pub struct MergeOutcome {
    /// Topic buckets in declaration order, with assigned records
    pub topics: Vec<TopicWithUrls>,
    /// Records labeled "outlier" or whose label matched no topic, sorted by URL
    pub outliers: Vec<UrlKeywords>,
    /// Entries dropped for missing url/topic fields
    pub skipped: usize,
    /// Entries referencing a URL outside the working set
    pub unmatched: usize,
}

/// Merge classification entries onto the original records
///
/// Every record that survives the field and URL-lookup checks lands in
/// exactly one bucket: an exact topic match, a fuzzy (bidirectional
/// substring, case-insensitive) topic match, or the outliers.
pub fn merge_classifications(
    topics: &[Topic],
    records: &[UrlKeywords],
    classifications: &[Classification],
) -> MergeOutcome {
    let mut buckets: Vec<TopicWithUrls> = topics.iter().map(TopicWithUrls::empty).collect();
    let lowered_names: Vec<String> = topics.iter().map(|t| t.name.to_lowercase()).collect();
    let by_url: HashMap<&str, &UrlKeywords> =
        records.iter().map(|r| (r.url.as_str(), r)).collect();

    let mut outliers: Vec<UrlKeywords> = Vec::new();
    let mut skipped = 0usize;
    let mut unmatched = 0usize;

    for entry in classifications {
        let (Some(url), Some(topic)) = (&entry.url, &entry.topic) else {
            warn!("Classification entry missing url or topic: {:?}", entry);
            skipped += 1;
            continue;
        };

        let Some(record) = by_url.get(url.as_str()) else {
            warn!("Classified URL not in working set: {}", url);
            unmatched += 1;
            continue;
        };

        let label = topic.to_lowercase();
        if label == "outlier" {
            outliers.push((*record).clone());
            continue;
        }

        let index = lowered_names
            .iter()
            .position(|name| *name == label)
            .or_else(|| {
                // Fuzzy fallback: containment in either direction, first
                // topic in declaration order wins
                lowered_names
                    .iter()
                    .position(|name| name.contains(&label) || label.contains(name.as_str()))
            });

        match index {
            Some(i) => {
                buckets[i].urls.push((*record).clone());
                buckets[i].count += 1;
            }
            None => {
                warn!("Topic not matched: {:?} for URL: {}", topic, url);
                outliers.push((*record).clone());
            }
        }
    }

    outliers.sort_by(|a, b| a.url.cmp(&b.url));

    MergeOutcome {
        topics: buckets,
        outliers,
        skipped,
        unmatched,
    }
}
