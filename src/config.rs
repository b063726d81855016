//! Configuration types for Wikipedia-to-Markdown conversion.
//!
//! Two structs, two concerns:
//!
//! * [`ConversionConfig`] controls the conversion core. It has exactly two
//!   knobs (enriched front matter and link suppression) and nothing else.
//! * [`FetchConfig`] controls how articles are retrieved from the MediaWiki
//!   API (endpoint, timeout, user agent, fallback search width).
//!
//! Both follow the same builder-over-constructor pattern so call sites only
//! set what they care about.

use crate::error::Wiki2MdError;
use serde::{Deserialize, Serialize};

/// Fixed origin every root-relative link and image is resolved against.
pub const WIKIPEDIA_ORIGIN: &str = "https://en.wikipedia.org";

/// Default MediaWiki Action API endpoint.
pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Configuration for a single HTML-to-Markdown conversion.
///
/// # Example
/// ```rust
/// use edgequake_wiki2md::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .enriched_frontmatter(true)
///     .suppress_links(true)
///     .build();
/// assert!(config.enriched_frontmatter);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Prepend a YAML front-matter block (title, source URL, timestamp,
    /// category tags). This is what Obsidian vaults expect. Default: false.
    pub enriched_frontmatter: bool,

    /// Render body links as their visible text only. Default: false.
    ///
    /// Infobox values are treated as data and always keep their links.
    pub suppress_links: bool,
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn enriched_frontmatter(mut self, v: bool) -> Self {
        self.config.enriched_frontmatter = v;
        self
    }

    pub fn suppress_links(mut self, v: bool) -> Self {
        self.config.suppress_links = v;
        self
    }

    /// Both options are plain flags, so there is nothing to validate.
    pub fn build(self) -> ConversionConfig {
        self.config
    }
}

/// Configuration for the MediaWiki fetch client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// MediaWiki Action API endpoint. Default: [`DEFAULT_API_URL`].
    pub api_url: String,

    /// Per-request timeout in seconds. Default: 30.
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    ///
    /// Wikimedia rejects anonymous clients, so this is never empty.
    pub user_agent: String,

    /// Number of titles the fallback search offers. Default: 5.
    pub search_limit: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!(
                "edgequake-wiki2md/{} (https://github.com/raphaelmansuy/edgequake-wiki2md)",
                env!("CARGO_PKG_VERSION")
            ),
            search_limit: 5,
        }
    }
}

impl FetchConfig {
    /// Create a new builder for `FetchConfig`.
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`FetchConfig`].
#[derive(Debug)]
pub struct FetchConfigBuilder {
    config: FetchConfig,
}

impl FetchConfigBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn search_limit(mut self, n: usize) -> Self {
        self.config.search_limit = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<FetchConfig, Wiki2MdError> {
        let c = &self.config;
        if c.api_url.trim().is_empty() {
            return Err(Wiki2MdError::InvalidConfig(
                "API url must not be empty".into(),
            ));
        }
        if c.user_agent.trim().is_empty() {
            return Err(Wiki2MdError::InvalidConfig(
                "User agent must not be empty".into(),
            ));
        }
        if c.search_limit == 0 {
            return Err(Wiki2MdError::InvalidConfig(
                "Search limit must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_defaults_are_off() {
        let c = ConversionConfig::default();
        assert!(!c.enriched_frontmatter);
        assert!(!c.suppress_links);
    }

    #[test]
    fn conversion_builder_sets_flags() {
        let c = ConversionConfig::builder()
            .enriched_frontmatter(true)
            .suppress_links(true)
            .build();
        assert!(c.enriched_frontmatter);
        assert!(c.suppress_links);
    }

    #[test]
    fn fetch_defaults() {
        let c = FetchConfig::default();
        assert_eq!(c.api_url, DEFAULT_API_URL);
        assert_eq!(c.timeout_secs, 30);
        assert_eq!(c.search_limit, 5);
        assert!(c.user_agent.starts_with("edgequake-wiki2md/"));
    }

    #[test]
    fn fetch_builder_rejects_zero_search_limit() {
        let err = FetchConfig::builder().search_limit(0).build().unwrap_err();
        assert!(err.to_string().contains("Search limit"));
    }

    #[test]
    fn fetch_builder_rejects_empty_api_url() {
        assert!(FetchConfig::builder().api_url("  ").build().is_err());
    }

    #[test]
    fn fetch_builder_clamps_timeout() {
        let c = FetchConfig::builder().timeout_secs(0).build().unwrap();
        assert_eq!(c.timeout_secs, 1);
    }
}
