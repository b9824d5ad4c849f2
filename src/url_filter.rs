//! URL normalization and filtering
//!
//! Drops the URLs that carry no topical signal before keyword extraction:
//! pagination/tag/feed/admin junk, non-English locale variants, and (when a
//! main domain is known) unrelated subdomains.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// ISO 639-1 two-letter language codes, excluding English
///
/// A URL whose first path segment or subdomain equals one of these (with an
/// optional `-ca`-style region suffix) is treated as a localized variant.
const LANGUAGE_CODES: &[&str] = &[
    "fr", "de", "es", "it", "pt", "nl", "pl", "ru", "ja", "zh", "ko", "ar", "tr", "sv", "da", "no",
    "fi", "cs", "hu", "ro", "el", "he", "th", "vi", "id", "ms", "uk", "bg", "hr", "sk", "sl", "lt",
    "lv", "et", "is", "ga", "mt", "cy", "sq", "mk", "sr", "bs", "ka", "hy", "az", "kk", "uz", "mn",
    "ne", "si", "km", "lo", "my", "am", "ti", "or", "ta", "te", "kn", "ml", "tl", "jv", "su", "mg",
    "haw", "af", "sw", "zu", "xh", "ca", "gl", "eu", "be", "fa", "ur", "hi", "bn", "pa", "gu",
    "mr",
];

/// Junk URL shapes: pagination, archives, feeds, admin, commerce and search
/// pages, binary/document extensions, legal pages
const JUNK_PATTERNS: &[&str] = &[
    r"/blog/",
    r"/tag/",
    r"/tags/",
    r"/category/",
    r"/author/",
    r"/page/",
    r"\?page=",
    r"/feed",
    r"/rss",
    r"\.xml$",
    r"\.json$",
    r"/wp-admin",
    r"/wp-content",
    r"/cart",
    r"/checkout",
    r"/login",
    r"/search",
    r"\?s=",
    r"\?q=",
    r"\.pdf$",
    r"\.jpg$",
    r"\.jpeg$",
    r"\.png$",
    r"\.gif$",
    r"\.svg$",
    r"\.webp$",
    r"/legal/",
];

/// URL shapes that indicate a blog/article page
const BLOG_PATTERNS: &[&str] = &[
    r"(?i)/blog/",
    r"(?i)/blog$",
    r"(?i)/posts?/",
    r"(?i)/articles?/",
    r"(?i)/news/",
    r"(?i)/stories/",
    r"(?i)/insights?/",
    r"(?i)/resources/blog",
    r"(?i)/updates?/",
    r"(?i)/announcements?/",
    r"(?i)^https?://blog\.",
    r"/\d{4}/\d{2}/\d{2}/", // /2024/01/15/
    r"/\d{4}/\d{2}/",       // /2024/01/
];

fn junk_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        JUNK_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("invalid junk pattern"))
            .collect()
    })
}

fn blog_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        BLOG_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("invalid blog pattern"))
            .collect()
    })
}

/// One combined pattern for locale path segments (`/fr/`, `/fr-ca/`) and
/// locale subdomains (`fr.example.com`)
fn locale_patterns() -> &'static (Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let codes = LANGUAGE_CODES.join("|");
        let path = Regex::new(&format!(
            r"(?i)^https?://[^/]+/(?:{codes})(?:-[a-z]{{2}})?(?:/|$)"
        ))
        .expect("invalid locale path pattern");
        let subdomain = Regex::new(&format!(r"(?i)^https?://(?:{codes})\."))
            .expect("invalid locale subdomain pattern");
        (path, subdomain)
    })
}

/// Normalize raw domain input: strip scheme, leading `www.`, a single
/// trailing slash, and surrounding whitespace
///
/// Pure and total; idempotent for any input.
pub fn normalize_domain(input: &str) -> String {
    let mut domain = input.trim();

    for scheme in ["https://", "http://"] {
        if let Some(prefix) = domain.get(..scheme.len()) {
            if prefix.eq_ignore_ascii_case(scheme) {
                domain = &domain[scheme.len()..];
                break;
            }
        }
    }

    if let Some(prefix) = domain.get(..4) {
        if prefix.eq_ignore_ascii_case("www.") {
            domain = &domain[4..];
        }
    }

    domain.strip_suffix('/').unwrap_or(domain).to_string()
}

/// True if the URL is a non-English localized page
pub fn is_non_english_url(url: &str) -> bool {
    let (path, subdomain) = locale_patterns();
    path.is_match(url) || subdomain.is_match(url)
}

/// Drop non-English localized URLs from a list
pub fn filter_non_english(urls: &[String]) -> Vec<String> {
    urls.iter()
        .filter(|url| !is_non_english_url(url))
        .cloned()
        .collect()
}

/// True if the URL looks like a blog/article page
pub fn is_blog_url(url: &str) -> bool {
    blog_patterns().iter().any(|p| p.is_match(url))
}

/// Filter out junk and non-English URLs
///
/// When `main_domain` is provided, URLs whose host is not the domain itself
/// or its `www.` variant are also dropped; URLs whose host cannot be parsed
/// count as non-matching in that mode, not as errors.
pub fn filter_urls(urls: &[String], main_domain: Option<&str>) -> Vec<String> {
    urls.iter()
        .filter(|url| {
            if junk_patterns().iter().any(|p| p.is_match(url)) {
                return false;
            }

            if is_non_english_url(url) {
                return false;
            }

            if let Some(domain) = main_domain {
                let host = Url::parse(url)
                    .ok()
                    .and_then(|u| u.host_str().map(|h| h.to_string()));
                return match host {
                    Some(h) => h == domain || h == format!("www.{domain}"),
                    None => false,
                };
            }

            true
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalize_strips_scheme_www_and_slash() {
        assert_eq!(normalize_domain("https://www.example.com/"), "example.com");
        assert_eq!(normalize_domain("HTTP://Example.com"), "Example.com");
        assert_eq!(normalize_domain("  example.com  "), "example.com");
        assert_eq!(normalize_domain("example.com"), "example.com");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in [
            "https://www.example.com/",
            "www.sub.example.co.uk",
            "http://x/",
            "",
            "   ",
        ] {
            let once = normalize_domain(input);
            assert_eq!(normalize_domain(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn filter_drops_junk_urls() {
        let input = urls(&[
            "https://ex.com/",
            "https://ex.com/blog/a",
            "https://ex.com/blog/b",
            "https://ex.com/pricing",
        ]);
        let result = filter_urls(&input, Some("ex.com"));
        assert_eq!(
            result,
            urls(&["https://ex.com/", "https://ex.com/pricing"])
        );
    }

    #[test]
    fn filter_drops_extensions_and_query_junk() {
        let input = urls(&[
            "https://ex.com/sitemap.xml",
            "https://ex.com/brochure.pdf",
            "https://ex.com/products?page=2",
            "https://ex.com/?s=term",
            "https://ex.com/products",
        ]);
        assert_eq!(filter_urls(&input, None), urls(&["https://ex.com/products"]));
    }

    #[test]
    fn filter_drops_non_english_urls() {
        let input = urls(&[
            "https://ex.com/fr/pricing",
            "https://ex.com/fr-ca/pricing",
            "https://de.ex.com/preise",
            "https://ex.com/france-tours", // "fr" only as full segment
            "https://ex.com/pricing",
        ]);
        let result = filter_urls(&input, None);
        assert_eq!(
            result,
            urls(&["https://ex.com/france-tours", "https://ex.com/pricing"])
        );
    }

    #[test]
    fn filter_drops_foreign_hosts_when_domain_given() {
        let input = urls(&[
            "https://ex.com/a",
            "https://www.ex.com/b",
            "https://docs.ex.com/c",
            "https://other.com/d",
            "not a url",
        ]);
        let result = filter_urls(&input, Some("ex.com"));
        assert_eq!(result, urls(&["https://ex.com/a", "https://www.ex.com/b"]));
    }

    #[test]
    fn malformed_urls_pass_without_domain_filter() {
        // Junk and locale checks are string matches; host parsing only
        // happens when a main domain is supplied
        let input = urls(&["not a url"]);
        assert_eq!(filter_urls(&input, None), urls(&["not a url"]));
        assert!(filter_urls(&input, Some("ex.com")).is_empty());
    }

    #[test]
    fn blog_url_detection() {
        for url in [
            "https://ex.com/blog/my-post",
            "https://ex.com/blog",
            "https://ex.com/posts/hello",
            "https://ex.com/article/hello",
            "https://ex.com/news/today",
            "https://ex.com/insights/q3",
            "https://ex.com/2024/01/15/launch",
            "https://blog.ex.com/anything",
        ] {
            assert!(is_blog_url(url), "expected blog: {url}");
        }

        for url in [
            "https://ex.com/pricing",
            "https://ex.com/products/widget",
            "https://ex.com/about",
        ] {
            assert!(!is_blog_url(url), "expected non-blog: {url}");
        }
    }
}
