//! Input resolution: turn a user query into a fetched [`WikiPage`].
//!
//! A query is either a Wikipedia article URL or a free-text title. Titles
//! get one direct lookup and, if that misses (no such page, or a
//! disambiguation page), a full-text search whose results are offered back
//! to the caller. URLs are looked up directly with no fallback.
//!
//! Everything goes through the MediaWiki Action API (`action=parse` for the
//! article, `list=search` for the fallback), JSON with `formatversion=2`.
//! Response parsing is kept in plain functions so it can be tested without
//! a network.

use crate::config::{FetchConfig, WIKIPEDIA_ORIGIN};
use crate::error::Wiki2MdError;
use crate::output::WikiPage;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// URL prefixes recognised as Wikipedia article links.
pub const ACCEPTED_URL_PREFIXES: &[&str] = &[
    "http://wikipedia.org",
    "https://wikipedia.org",
    "http://www.wikipedia.org",
    "https://www.wikipedia.org",
    "http://en.wikipedia.org",
    "https://en.wikipedia.org",
];

/// A classified user query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Free text, looked up as a title with search fallback.
    Title(String),
    /// An article URL and the title extracted from it.
    Url { url: String, title: String },
}

impl Query {
    pub fn title(&self) -> &str {
        match self {
            Query::Title(t) => t,
            Query::Url { title, .. } => title,
        }
    }
}

/// Does the query start with one of [`ACCEPTED_URL_PREFIXES`]?
pub fn is_wikipedia_url(query: &str) -> bool {
    ACCEPTED_URL_PREFIXES.iter().any(|p| query.starts_with(p))
}

/// Classify a query as URL or title.
pub fn resolve_query(query: &str) -> Result<Query, Wiki2MdError> {
    let query = query.trim();
    if is_wikipedia_url(query) {
        let title = title_from_url(query)?;
        debug!("Query is a Wikipedia URL for '{}'", title);
        return Ok(Query::Url {
            url: query.to_string(),
            title,
        });
    }
    Ok(Query::Title(query.to_string()))
}

/// Article title from a `/wiki/<Title>` URL.
///
/// Query string and fragment are dropped and underscores become spaces.
pub fn title_from_url(url: &str) -> Result<String, Wiki2MdError> {
    let invalid = || Wiki2MdError::InvalidUrl {
        url: url.to_string(),
    };

    let (_, rest) = url.split_once("/wiki/").ok_or_else(invalid)?;
    let raw = rest.split(['?', '#']).next().unwrap_or_default();
    let title = raw.replace('_', " ").trim().to_string();
    if title.is_empty() {
        return Err(invalid());
    }
    Ok(title)
}

// ── API payloads ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParsedPage>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    title: String,
    text: String,
    #[serde(default)]
    categories: Vec<CategoryEntry>,
    #[serde(default)]
    properties: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    category: String,
    #[serde(default)]
    hidden: bool,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

fn api_error(err: ApiErrorBody) -> Wiki2MdError {
    Wiki2MdError::ApiError {
        message: format!("{}: {}", err.code, err.info),
    }
}

fn malformed(e: serde_json::Error) -> Wiki2MdError {
    Wiki2MdError::ApiError {
        message: format!("unexpected response: {e}"),
    }
}

/// Decode an `action=parse` response for `requested`.
///
/// Hidden (maintenance) categories are dropped here; the canonical URL is
/// built from `origin` and the resolved title.
pub fn parse_page_response(body: &str, requested: &str, origin: &str) -> Result<WikiPage, Wiki2MdError> {
    let response: ParseResponse = serde_json::from_str(body).map_err(malformed)?;

    if let Some(err) = response.error {
        return Err(match err.code.as_str() {
            "missingtitle" | "invalidtitle" => Wiki2MdError::PageNotFound {
                title: requested.to_string(),
            },
            _ => api_error(err),
        });
    }

    let parsed = response.parse.ok_or_else(|| Wiki2MdError::ApiError {
        message: "response has neither 'parse' nor 'error'".into(),
    })?;

    if parsed.properties.contains_key("disambiguation") {
        return Err(Wiki2MdError::Ambiguous {
            query: requested.to_string(),
            options: Vec::new(),
        });
    }

    let categories: Vec<String> = parsed
        .categories
        .into_iter()
        .filter(|c| !c.hidden)
        .map(|c| c.category)
        .collect();
    let canonical_url = format!("{origin}/wiki/{}", parsed.title.replace(' ', "_"));

    Ok(WikiPage::new(parsed.title, parsed.text)
        .with_categories(categories)
        .with_canonical_url(canonical_url))
}

/// Decode a `list=search` response into result titles.
pub fn parse_search_response(body: &str) -> Result<Vec<String>, Wiki2MdError> {
    let response: SearchResponse = serde_json::from_str(body).map_err(malformed)?;
    if let Some(err) = response.error {
        return Err(api_error(err));
    }
    Ok(response
        .query
        .map(|q| q.search.into_iter().map(|h| h.title).collect())
        .unwrap_or_default())
}

/// Decide the outcome of a missed lookup once the fallback search is in.
///
/// * no results → [`Wiki2MdError::NoMatches`]
/// * disambiguation → [`Wiki2MdError::Ambiguous`] carrying the results
/// * anything else → the original miss
pub fn resolve_miss(query: &str, miss: Wiki2MdError, results: Vec<String>) -> Wiki2MdError {
    if results.is_empty() {
        return Wiki2MdError::NoMatches {
            query: query.to_string(),
        };
    }
    match miss {
        Wiki2MdError::Ambiguous { .. } => Wiki2MdError::Ambiguous {
            query: query.to_string(),
            options: results,
        },
        other => other,
    }
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Async MediaWiki client.
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: reqwest::Client,
    config: FetchConfig,
    origin: String,
}

impl WikiClient {
    pub fn new(config: FetchConfig) -> Result<Self, Wiki2MdError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Wiki2MdError::Internal(format!("HTTP client: {e}")))?;

        let origin = reqwest::Url::parse(&config.api_url)
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_else(|_| WIKIPEDIA_ORIGIN.to_string());

        Ok(Self { http, config, origin })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Resolve a query (title or URL) to a page, with search fallback for
    /// titles.
    pub async fn fetch(&self, query: &str) -> Result<WikiPage, Wiki2MdError> {
        info!("Searching for '{}'", query);
        match resolve_query(query)? {
            Query::Url { title, .. } => {
                let page = self.fetch_page(&title).await?;
                info!("Found article from URL: '{}' - {}", page.title, page.canonical_url);
                Ok(page)
            }
            Query::Title(title) => match self.fetch_page(&title).await {
                Ok(page) => {
                    info!("Found article: '{}' - {}", page.title, page.canonical_url);
                    Ok(page)
                }
                Err(miss) if miss.is_lookup_miss() => {
                    warn!("Direct match for '{}' failed. Attempting a fallback search.", title);
                    let results = self.search(&title).await?;
                    Err(resolve_miss(&title, miss, results))
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Fetch one article by exact title (redirects followed).
    pub async fn fetch_page(&self, title: &str) -> Result<WikiPage, Wiki2MdError> {
        debug!("Fetching page '{}'", title);
        let body = self
            .get(&[
                ("action", "parse"),
                ("page", title),
                ("prop", "text|categories|properties"),
                ("redirects", "1"),
                ("disableeditsection", "1"),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .await?;
        parse_page_response(&body, title, &self.origin)
    }

    /// Full-text search; at most `search_limit` titles.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, Wiki2MdError> {
        let limit = self.config.search_limit.to_string();
        let body = self
            .get(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", &limit),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .await?;
        let results = parse_search_response(&body)?;
        debug!("Search '{}' returned {} results", query, results.len());
        Ok(results)
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<String, Wiki2MdError> {
        let url = &self.config.api_url;
        let to_error = |e: reqwest::Error| {
            if e.is_timeout() {
                Wiki2MdError::FetchTimeout {
                    url: url.clone(),
                    secs: self.config.timeout_secs,
                }
            } else {
                Wiki2MdError::FetchFailed {
                    url: url.clone(),
                    reason: e.to_string(),
                }
            }
        };

        let response = self.http.get(url).query(params).send().await.map_err(to_error)?;
        if !response.status().is_success() {
            return Err(Wiki2MdError::FetchFailed {
                url: url.clone(),
                reason: format!("HTTP {}", response.status()),
            });
        }
        response.text().await.map_err(to_error)
    }
}
