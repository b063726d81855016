//! Error types for the edgequake-wiki2md library.
//!
//! There is exactly one error type, [`Wiki2MdError`], and it only ever comes
//! out of the *fetch* side of the library (resolving a query, talking to the
//! MediaWiki API, writing the output file).
//!
//! The conversion core ([`crate::convert::convert_html`]) is total: missing
//! attributes, empty cells and odd nesting all have a documented fallback
//! (omit, `Image` alt text, plain link text, …), so it returns a
//! [`crate::output::ConversionOutput`] directly rather than a `Result`.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-wiki2md library.
#[derive(Debug, Error)]
pub enum Wiki2MdError {
    // ── Query errors ──────────────────────────────────────────────────────
    /// A Wikipedia URL was given but it does not point at an article.
    #[error("Invalid Wikipedia URL '{url}'\nExpected something like https://en.wikipedia.org/wiki/Article_Title")]
    InvalidUrl { url: String },

    /// The article does not exist.
    #[error("Page '{title}' does not match any pages")]
    PageNotFound { title: String },

    /// The title resolves to a disambiguation page.
    ///
    /// `options` holds the fallback search results the caller can choose from.
    #[error("'{query}' may refer to several pages: {}", .options.join(", "))]
    Ambiguous { query: String, options: Vec<String> },

    /// Direct lookup failed and the fallback search found nothing either.
    #[error("No matches found for '{query}'")]
    NoMatches { query: String },

    /// The user was asked to pick a page and did not pick a valid one.
    #[error("{0}")]
    InvalidChoice(String),

    // ── Network errors ────────────────────────────────────────────────────
    /// The HTTP request failed (connection, TLS, non-2xx status).
    #[error("Failed to fetch '{url}': {reason}\nCheck your internet connection.")]
    FetchFailed { url: String, reason: String },

    /// The HTTP request exceeded the configured timeout.
    #[error("Request timed out after {secs}s for '{url}'\nIncrease the fetch timeout.")]
    FetchTimeout { url: String, secs: u64 },

    /// The API answered, but with an error object or an unexpected payload.
    #[error("MediaWiki API error: {message}")]
    ApiError { message: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Wiki2MdError {
    /// True for the two outcomes that trigger the fallback search.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            Wiki2MdError::PageNotFound { .. } | Wiki2MdError::Ambiguous { .. }
        )
    }
}
