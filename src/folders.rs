//! Folder grouping and size heuristics
//!
//! URLs are bucketed by their first path segment; small buckets can later be
//! merged into a synthetic "Other" bucket using a dynamic threshold, and the
//! topic-count heuristics size the labeling requests per bucket.

use crate::model::FolderGroup;
use std::collections::HashMap;
use url::Url;

/// First-level folder of a URL (`/` for the root or unparseable input)
pub fn extract_folder(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return "/".to_string();
    };

    match parsed.path().split('/').find(|s| !s.is_empty()) {
        Some(segment) => format!("/{segment}"),
        None => "/".to_string(),
    }
}

/// Group URLs by first-level folder
///
/// Each group's URL list is sorted lexicographically; groups are ordered by
/// descending count, ties keeping first-discovery order.
pub fn group_by_folder(urls: &[String]) -> Vec<FolderGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<String>> = HashMap::new();

    for url in urls {
        let folder = extract_folder(url);
        let bucket = buckets.entry(folder.clone()).or_insert_with(|| {
            order.push(folder);
            Vec::new()
        });
        bucket.push(url.clone());
    }

    let mut groups: Vec<FolderGroup> = order
        .into_iter()
        .map(|folder| {
            let mut urls = buckets.remove(&folder).unwrap_or_default();
            urls.sort();
            let count = urls.len();
            FolderGroup {
                folder,
                urls,
                count,
                topics: Vec::new(),
            }
        })
        .collect();

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// Dynamic threshold below which folders merge into an "Other" bucket
///
/// Works over bare counts so it can also be applied to per-group page
/// counts elsewhere. Returns 0 when no grouping should happen.
pub fn other_threshold(counts: &[usize], total_urls: usize) -> usize {
    let mut sorted: Vec<usize> = counts.to_vec();
    sorted.sort_by(|a, b| b.cmp(a));

    // With six or fewer folders there is no long tail to hide
    if sorted.len() <= 6 {
        return 0;
    }

    let percentage_threshold = std::cmp::max(1, (total_urls as f64 * 0.02).floor() as usize);
    let sixth_largest = if sorted.len() >= 6 { sorted[5] } else { 0 };

    let threshold = std::cmp::min(
        std::cmp::max(percentage_threshold, 2),
        std::cmp::max(sixth_largest, 2),
    );

    let would_be_grouped = sorted.iter().filter(|&&c| c < threshold).count();

    // Never hide so much that fewer than 3 folders stay visible
    if sorted.len() - would_be_grouped < 3 && sorted.len() >= 3 {
        return if sorted[2] > 0 { sorted[2] } else { 1 };
    }

    // A synthetic bucket for 1-2 folders is not worth it
    if would_be_grouped <= 2 {
        return 0;
    }

    threshold
}

/// Number of topics to request for a corpus of `page_count` pages
pub fn topic_count(page_count: usize) -> usize {
    match page_count {
        0..=10 => 3,
        11..=25 => 5,
        26..=50 => 7,
        _ => 10,
    }
}

/// Minimum pages a topic must cover to be retained
pub fn min_topic_count(page_count: usize) -> usize {
    match page_count {
        0..=20 => 2,
        21..=50 => 3,
        51..=100 => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn folder_is_first_path_segment() {
        assert_eq!(extract_folder("https://ex.com/products/item"), "/products");
        assert_eq!(extract_folder("https://ex.com/about"), "/about");
        assert_eq!(extract_folder("https://ex.com/"), "/");
        assert_eq!(extract_folder("https://ex.com"), "/");
        assert_eq!(extract_folder("not a url"), "/");
    }

    #[test]
    fn groups_ordered_by_descending_count() {
        let groups = group_by_folder(&urls(&[
            "https://ex.com/shop/a",
            "https://ex.com/shop/b",
            "https://ex.com/about",
        ]));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].folder, "/shop");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].folder, "/about");
        assert_eq!(groups[1].count, 1);
    }

    #[test]
    fn group_urls_sorted_lexicographically() {
        let groups = group_by_folder(&urls(&[
            "https://ex.com/shop/z",
            "https://ex.com/shop/a",
            "https://ex.com/shop/m",
        ]));
        assert_eq!(
            groups[0].urls,
            urls(&[
                "https://ex.com/shop/a",
                "https://ex.com/shop/m",
                "https://ex.com/shop/z",
            ])
        );
    }

    #[test]
    fn grouping_partitions_the_input() {
        let input = urls(&[
            "https://ex.com/a/1",
            "https://ex.com/b/1",
            "https://ex.com/a/2",
            "https://ex.com/",
            "https://ex.com/c",
        ]);
        let groups = group_by_folder(&input);

        let mut seen: Vec<String> = groups.iter().flat_map(|g| g.urls.clone()).collect();
        seen.sort();
        let mut expected = input.clone();
        expected.sort();
        assert_eq!(seen, expected);

        // No URL appears in two groups
        let unique: HashSet<&String> = seen.iter().collect();
        assert_eq!(unique.len(), seen.len());
    }

    #[test]
    fn threshold_zero_for_six_or_fewer_groups() {
        assert_eq!(other_threshold(&[10, 8, 5, 3, 2, 1], 29), 0);
        assert_eq!(other_threshold(&[4, 2], 6), 0);
        assert_eq!(other_threshold(&[], 0), 0);
    }

    #[test]
    fn threshold_groups_the_long_tail() {
        // 8 folders, a clear head and a tail of singletons
        let counts = [40, 30, 20, 10, 5, 4, 1, 1];
        let total: usize = counts.iter().sum();
        let threshold = other_threshold(&counts, total);
        // pct = max(1, floor(111 * 0.02)) = 2; sixth largest = 4
        // threshold = min(max(2,2), max(4,2)) = 2, but only the two
        // singletons fall below it, so grouping is skipped
        assert_eq!(threshold, 0);
    }

    #[test]
    fn threshold_applies_when_tail_is_large() {
        let counts = [40, 30, 20, 2, 1, 1, 1, 1, 1];
        let total: usize = counts.iter().sum();
        let threshold = other_threshold(&counts, total);
        // pct = max(1, floor(97 * 0.02)) = 1 -> max(1,2)=2
        // sixth largest = 1 -> max(1,2)=2; threshold = 2
        // 5 folders fall below 2, 4 stay visible
        assert_eq!(threshold, 2);
        let grouped = counts.iter().filter(|&&c| c < threshold).count();
        assert!(counts.len() - grouped >= 3);
    }

    #[test]
    fn threshold_keeps_at_least_three_groups_visible() {
        // Everything except the top entry is tiny; naive threshold would
        // leave fewer than 3 visible, so it falls back to the 3rd largest
        let counts = [100, 1, 1, 1, 1, 1, 1];
        let total: usize = counts.iter().sum();
        let threshold = other_threshold(&counts, total);
        assert_eq!(threshold, 1);
        let visible = counts.iter().filter(|&&c| c >= threshold).count();
        assert!(visible >= 3);
    }

    #[test]
    fn topic_count_scales_with_pages() {
        assert_eq!(topic_count(5), 3);
        assert_eq!(topic_count(10), 3);
        assert_eq!(topic_count(11), 5);
        assert_eq!(topic_count(25), 5);
        assert_eq!(topic_count(50), 7);
        assert_eq!(topic_count(500), 10);
    }

    #[test]
    fn min_topic_count_scales_with_pages() {
        assert_eq!(min_topic_count(20), 2);
        assert_eq!(min_topic_count(21), 3);
        assert_eq!(min_topic_count(50), 3);
        assert_eq!(min_topic_count(100), 4);
        assert_eq!(min_topic_count(101), 5);
    }
}
