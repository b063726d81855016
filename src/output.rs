//! Input and output records of a conversion.
//!
//! [`WikiPage`] is what the fetch side hands to the core; [`ConversionOutput`]
//! is what the core hands back. Both are plain data and serialise with serde
//! so the CLI can dump them as JSON.

use serde::{Deserialize, Serialize};

/// A fully resolved article, as returned by the fetch collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiPage {
    /// Display title, e.g. `"Rust (programming language)"`.
    pub title: String,

    /// Rendered article markup.
    pub html: String,

    /// Category names, with or without a `Category:` prefix.
    pub categories: Vec<String>,

    /// Canonical article URL. May be empty; the front matter then derives one
    /// from the title.
    pub canonical_url: String,
}

impl WikiPage {
    /// Convenience constructor for HTML obtained some other way.
    pub fn new(title: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            html: html.into(),
            ..Self::default()
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_canonical_url(mut self, url: impl Into<String>) -> Self {
        self.canonical_url = url.into();
        self
    }

    /// File name the CLI writes this article to: `/` becomes `-`.
    pub fn file_name(&self) -> String {
        crate::convert::output_file_name(&self.title)
    }
}

/// The finished document plus bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Resolved article title (used for file naming).
    pub title: String,

    /// Final Markdown: newline separated, no trailing blank lines.
    pub markdown: String,

    pub stats: ConversionStats,
}

/// Counters collected while assembling a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Elements produced by the linearizer.
    pub elements_visited: usize,
    pub headings: usize,
    pub paragraphs: usize,
    pub list_items: usize,
    pub images: usize,
    /// Forbidden sections entered (See also, References, …).
    pub sections_skipped: usize,
    /// Elements dropped by the navigation / table-of-contents predicate.
    pub navigation_skipped: usize,
    /// Label/value rows written to the infobox table.
    pub infobox_rows: usize,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_replaces_slashes() {
        let page = WikiPage::new("AC/DC", "");
        assert_eq!(page.file_name(), "AC-DC.md");
    }

    #[test]
    fn builder_helpers() {
        let page = WikiPage::new("T", "<p>x</p>")
            .with_categories(["A", "B"])
            .with_canonical_url("https://en.wikipedia.org/wiki/T");
        assert_eq!(page.categories, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(page.canonical_url, "https://en.wikipedia.org/wiki/T");
    }

    #[test]
    fn output_serialises() {
        let out = ConversionOutput {
            title: "T".into(),
            markdown: "# T".into(),
            stats: ConversionStats::default(),
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"markdown\":\"# T\""));
    }
}
