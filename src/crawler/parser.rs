//! HTML link extraction
//!
//! Pulls hyperlink targets out of raw markup and resolves them to absolute
//! URLs. Two strategies are available: a structural parse of the document tree
//! and an attribute pattern matcher over the raw text. Both apply the same
//! filtering rules.

use crate::config::ExtractMode;
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// Extracts hyperlink targets from `html`, resolved against `base_url`
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` targets that resolve to an `http` or `https` URL
///
/// **Exclude:**
/// - empty targets and fragment-only targets (`#section`)
/// - `javascript:`, `mailto:`, `tel:` and `data:` targets
/// - targets that fail to resolve (logged and dropped)
///
/// Links are returned in document order; duplicates are kept, see [`dedup_links`].
///
/// # Example
///
/// ```
/// use linkwalk::config::ExtractMode;
/// use linkwalk::crawler::extract_links;
/// use url::Url;
///
/// let html = r##"<body><a href="/about">About</a><a href="#top">Top</a></body>"##;
/// let base_url = Url::parse("https://site.test/").unwrap();
/// let links = extract_links(html, &base_url, ExtractMode::Html);
/// assert_eq!(links, vec!["https://site.test/about".to_string()]);
/// ```
pub fn extract_links(html: &str, base_url: &Url, mode: ExtractMode) -> Vec<String> {
    let targets = match mode {
        ExtractMode::Html => structural_targets(html),
        ExtractMode::Pattern => pattern_targets(html),
    };

    targets
        .iter()
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Removes exact duplicates, keeping the first occurrence of each link
pub fn dedup_links(links: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(links.len());
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

/// Reads `href` attributes from anchor elements in the parsed document
fn structural_targets(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return pattern_targets(html);
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Anchor tags with an `href` attribute
///
/// The attribute must follow whitespace, so `data-href` is not mistaken for it,
/// and quoted values earlier in the tag are stepped over whole so a `>` inside
/// them does not end the tag.
fn anchor_href_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?i)<a\b(?:[^>"']|"[^"]*"|'[^']*')*?\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
        )
        .expect("anchor href pattern is valid")
    })
}

/// Comments, including one left open at the end of the document
fn comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("comment pattern is valid"))
}

fn entity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"&(?:#([0-9]+)|#[xX]([0-9a-fA-F]+)|(?i:(amp|lt|gt|quot|apos)));")
            .expect("entity pattern is valid")
    })
}

/// Reads `href` attributes by matching anchor tags in the raw text
fn pattern_targets(html: &str) -> Vec<String> {
    let html = comment_pattern().replace_all(html, "");
    anchor_href_pattern()
        .captures_iter(&html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| decode_entities(m.as_str()))
        .collect()
}

/// Decodes named and numeric character references in one pass
///
/// References that do not name a valid character are left as written.
fn decode_entities(value: &str) -> String {
    entity_pattern()
        .replace_all(value, |caps: &Captures| {
            let decoded = if let Some(decimal) = caps.get(1) {
                decimal.as_str().parse().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
                    Some("amp") => Some('&'),
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    Some("quot") => Some('"'),
                    Some("apos") => Some('\''),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Resolves a link target to an absolute URL
///
/// Returns None if the target should be skipped.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        Ok(absolute_url) => {
            tracing::debug!("Skipping non-HTTP link {}", absolute_url);
            None
        }
        Err(e) => {
            tracing::debug!("Skipping malformed link '{}' on {}: {}", href, base_url, e);
            None
        }
    }
}
