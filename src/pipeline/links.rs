//! Link and image resolution: `<a>` / `<img>` → Markdown tokens.
//!
//! Wikipedia serves three URL shapes: absolute (`https://…`), root-relative
//! (`/wiki/Foo`, `/static/…`) and protocol-relative (`//upload.wikimedia.org/…`).
//! Markdown readers outside the browser cannot resolve the last two, so they
//! are rewritten against [`WIKIPEDIA_ORIGIN`] / `https:` here.

use crate::config::WIKIPEDIA_ORIGIN;
use crate::pipeline::dom::{attr, stripped_text};
use scraper::ElementRef;

/// Render an anchor as `[text](url)`, or as plain text.
///
/// Plain text is returned when `suppress_links` is set, when the anchor has
/// no `href`, or when the `href` is neither absolute (`http…`) nor an
/// article path (`/wiki/…`). Fragment links (`#cite_note-1`) therefore fall
/// back to text.
pub fn link_to_markdown(anchor: ElementRef<'_>, suppress_links: bool) -> String {
    render_link(anchor, suppress_links, &[])
}

/// [`link_to_markdown`] over a pruned view of the anchor's content.
pub(crate) fn render_link(anchor: ElementRef<'_>, suppress_links: bool, pruned: &[&str]) -> String {
    let text = stripped_text(*anchor, pruned);
    if suppress_links {
        return text;
    }

    let href = attr(anchor, "href");
    if href.starts_with("http") {
        format!("[{text}]({href})")
    } else if href.starts_with("/wiki/") {
        format!("[{text}]({WIKIPEDIA_ORIGIN}{href})")
    } else {
        text
    }
}

/// Render an image as `![alt](src)`.
///
/// Returns an empty string when the image has no `src`; callers must treat
/// that as "emit nothing". A missing or blank `alt` becomes `Image`.
pub fn image_to_markdown(img: ElementRef<'_>) -> String {
    let src = attr(img, "src");
    if src.is_empty() {
        return String::new();
    }

    let alt = match attr(img, "alt").trim() {
        "" => "Image",
        alt => alt,
    };
    format!("![{alt}]({})", resolve_image_src(src))
}

/// Make an image source absolute.
///
/// * `//host/path` → `https://host/path`
/// * `/path`       → `https://en.wikipedia.org/path`
/// * anything else is passed through
pub fn resolve_image_src(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        format!("{WIKIPEDIA_ORIGIN}{src}")
    } else {
        src.to_string()
    }
}
