//! YAML front matter for knowledge-base tools (Obsidian and friends).
//!
//! ```text
//! ---
//! title: "Rust (programming language)"
//! wikipedia_url: "https://en.wikipedia.org/wiki/Rust_(programming_language)"
//! date_converted: "2026-10-18 09:30:00"
//! tags:
//!   - "programming-languages"
//! ---
//! ```

use crate::config::WIKIPEDIA_ORIGIN;
use crate::output::WikiPage;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// At most this many category tags are written.
pub const MAX_TAGS: usize = 10;

/// Lowercase substrings that mark maintenance categories.
const MAINTENANCE_MARKERS: &[&str] = &["hidden", "cs1", "webarchive", "articles"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static RE_TAG_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Front-matter lines, closing `---` and trailing blank line included.
pub fn front_matter_lines(page: &WikiPage, generated_at: NaiveDateTime) -> Vec<String> {
    let mut lines = vec![
        "---".to_string(),
        format!("title: {}", quoted(&page.title)),
        format!("wikipedia_url: {}", quoted(&canonical_url(page))),
        format!(
            "date_converted: {}",
            quoted(&generated_at.format(TIMESTAMP_FORMAT).to_string())
        ),
        "tags:".to_string(),
    ];
    lines.extend(
        category_tags(&page.categories)
            .into_iter()
            .map(|tag| format!("  - {}", quoted(&tag))),
    );
    lines.push("---".to_string());
    lines.push(String::new());
    lines
}

/// The page's canonical URL, or one derived from its title.
pub fn canonical_url(page: &WikiPage) -> String {
    if page.canonical_url.is_empty() {
        format!("{WIKIPEDIA_ORIGIN}/wiki/{}", page.title.replace(' ', "_"))
    } else {
        page.canonical_url.clone()
    }
}

/// Sanitised tag slugs: maintenance categories dropped, first
/// [`MAX_TAGS`] kept.
pub fn category_tags(categories: &[String]) -> Vec<String> {
    categories
        .iter()
        .map(|c| {
            c.strip_prefix("Category:")
                .unwrap_or(c.as_str())
                .replace('_', " ")
        })
        .filter(|name| !is_maintenance_category(name))
        .map(|name| tag_slug(&name))
        .filter(|slug| !slug.is_empty())
        .take(MAX_TAGS)
        .collect()
}

fn is_maintenance_category(name: &str) -> bool {
    if name.starts_with("Help:") {
        return true;
    }
    let lower = name.to_lowercase();
    MAINTENANCE_MARKERS.iter().any(|m| lower.contains(m))
}

fn tag_slug(name: &str) -> String {
    RE_TAG_WHITESPACE
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
