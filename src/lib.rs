//! # edgequake-wiki2md
//!
//! Convert Wikipedia articles to clean Markdown.
//!
//! ## Why this crate?
//!
//! A rendered Wikipedia article is mostly chrome: edit links, navigation
//! boxes, reference superscripts, "See also" and "References" sections,
//! table-of-contents widgets. This crate keeps the prose (headings,
//! paragraphs, lists, images, links) and turns the infobox into a
//! two-column Markdown table, producing a file you can drop into a notes
//! vault or feed to a language model.
//!
//! ## Pipeline Overview
//!
//! ```text
//! query (title or URL)
//!  │
//!  ├─ 1. Fetch     MediaWiki API (parse + search fallback)
//!  ├─ 2. Parse     html5ever via scraper
//!  ├─ 3. Infobox   first table.infobox → Markdown table, then detached
//!  ├─ 4. Walk      post-order, deduplicated element stream
//!  ├─ 5. Assemble  section skipping, list buffering, blank-line cleanup
//!  └─ 6. Output    Markdown (+ optional YAML front matter) and stats
//! ```
//!
//! Steps 2–6 are synchronous and infallible ([`convert_html`]); only the
//! fetch and the file write can fail.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_wiki2md::{convert, ConversionConfig, FetchConfig, WikiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WikiClient::new(FetchConfig::default())?;
//!     let config = ConversionConfig::builder().enriched_frontmatter(true).build();
//!     let output = convert("Rust (programming language)", &config, &client).await?;
//!     println!("{}", output.markdown);
//!     eprintln!("{} paragraphs, {} infobox rows",
//!         output.stats.paragraphs,
//!         output.stats.infobox_rows);
//!     Ok(())
//! }
//! ```
//!
//! Already have the HTML? Skip the network entirely:
//!
//! ```rust
//! use edgequake_wiki2md::{convert_html, ConversionConfig, WikiPage};
//!
//! let page = WikiPage::new("Ferris", "<p>Ferris is a crab.</p>");
//! let output = convert_html(&page, &ConversionConfig::default());
//! assert_eq!(output.markdown, "# Ferris\n\nFerris is a crab.");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `wiki2md` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-wiki2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, FetchConfig, FetchConfigBuilder};
pub use convert::{convert, convert_html, convert_html_at, convert_sync, convert_to_file, write_markdown};
pub use error::Wiki2MdError;
pub use output::{ConversionOutput, ConversionStats, WikiPage};
pub use pipeline::assemble::make_markdown_from_page;
pub use pipeline::input::WikiClient;
pub use pipeline::walk::walk_dom;
