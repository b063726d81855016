//! Pipeline stages for Wikipedia-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on a hand-written fragment without the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ infobox ──▶ walk ──▶ assemble
//! (API)     (extract)   (linearize) (state machine → lines)
//! ```
//!
//! 1. [`input`]    — resolve a title or URL and fetch the article from the
//!    MediaWiki API; the only stage with network I/O
//! 2. [`infobox`]  — convert the first `table.infobox` to a Markdown table,
//!    then detach it from the tree
//! 3. [`walk`]     — post-order, deduplicated walk yielding headings,
//!    paragraphs, images and list elements
//! 4. [`assemble`] — section skipping, list buffering and line layout,
//!    plus [`frontmatter`] in enriched mode
//!
//! [`text`], [`links`], [`inline`] and [`dom`] are the shared leaf helpers.

pub mod assemble;
pub mod dom;
pub mod frontmatter;
pub mod infobox;
pub mod inline;
pub mod input;
pub mod links;
pub mod text;
pub mod walk;
