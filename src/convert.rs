//! Conversion entry points.
//!
//! ## Sync core, async edges
//!
//! [`convert_html`] is the whole transformation: parse, extract the infobox,
//! linearize, assemble. It is synchronous, allocation-only and total, so it
//! returns a [`ConversionOutput`] rather than a `Result`.
//!
//! The async functions wrap it with the MediaWiki fetch ([`WikiClient`]) and
//! file output. They are the only place a [`Wiki2MdError`] can come from.

use crate::config::{ConversionConfig, FetchConfig};
use crate::error::Wiki2MdError;
use crate::output::{ConversionOutput, WikiPage};
use crate::pipeline::assemble::make_markdown_from_page;
use crate::pipeline::input::WikiClient;
use chrono::{Local, NaiveDateTime};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Convert an already-fetched page to Markdown.
///
/// The front-matter timestamp (enriched mode only) is the current local
/// time.
///
/// ```rust
/// use edgequake_wiki2md::{convert_html, ConversionConfig, WikiPage};
///
/// let page = WikiPage::new("Title", "<p>Hello world.</p><h2>See Also</h2><p>skip me</p>");
/// let output = convert_html(&page, &ConversionConfig::default());
/// assert_eq!(output.markdown, "# Title\n\nHello world.");
/// ```
pub fn convert_html(page: &WikiPage, config: &ConversionConfig) -> ConversionOutput {
    convert_html_at(page, config, Local::now().naive_local())
}

/// [`convert_html`] with an explicit front-matter timestamp.
pub fn convert_html_at(
    page: &WikiPage,
    config: &ConversionConfig,
    generated_at: NaiveDateTime,
) -> ConversionOutput {
    make_markdown_from_page(page, config, generated_at)
}

/// Fetch a title or Wikipedia URL and convert it.
///
/// # Errors
/// Whatever the fetch side reports: [`Wiki2MdError::InvalidUrl`],
/// [`Wiki2MdError::PageNotFound`], [`Wiki2MdError::Ambiguous`] (with search
/// results to choose from), [`Wiki2MdError::NoMatches`] or a network error.
pub async fn convert(
    query: impl AsRef<str>,
    config: &ConversionConfig,
    client: &WikiClient,
) -> Result<ConversionOutput, Wiki2MdError> {
    let page = client.fetch(query.as_ref()).await?;
    Ok(convert_html(&page, config))
}

/// Fetch, convert, and write `<output_dir>/<title>.md`.
///
/// Returns the path written.
pub async fn convert_to_file(
    query: impl AsRef<str>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
    client: &WikiClient,
) -> Result<PathBuf, Wiki2MdError> {
    let output = convert(query, config, client).await?;
    write_markdown(&output, output_dir)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime and a client from `fetch_config`.
pub fn convert_sync(
    query: impl AsRef<str>,
    config: &ConversionConfig,
    fetch_config: FetchConfig,
) -> Result<ConversionOutput, Wiki2MdError> {
    let client = WikiClient::new(fetch_config)?;
    tokio::runtime::Runtime::new()
        .map_err(|e| Wiki2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(query, config, &client))
}

/// Output file name for a title: `/` becomes `-`, `.md` appended.
pub fn output_file_name(title: &str) -> String {
    format!("{}.md", title.replace('/', "-"))
}

/// Write a converted document into `output_dir`.
///
/// The directory is created if needed. The write is atomic: content goes to
/// a temp file in the same directory which is then persisted over the
/// target, so readers never see a partial file.
pub fn write_markdown(
    output: &ConversionOutput,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf, Wiki2MdError> {
    let dir = output_dir.as_ref();
    let path = dir.join(output_file_name(&output.title));
    let write_failed = |source: std::io::Error| Wiki2MdError::OutputWriteFailed {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(write_failed)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(output.markdown.as_bytes()).map_err(write_failed)?;
    tmp.persist(&path).map_err(|e| write_failed(e.error))?;

    debug!("Wrote {} bytes", output.markdown.len());
    info!("Saved '{}' to {}", output.title, path.display());
    Ok(path)
}
