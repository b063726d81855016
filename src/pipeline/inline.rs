//! Inline content rendering for headings, list items and paragraphs.
//!
//! Only an element's *direct* children are rendered. Nested blocks (a `<ul>`
//! inside an `<li>`, an `<img>` inside a heading) reach the output through
//! their own linearizer entry instead.

use crate::pipeline::dom::{single_string, tag_name};
use crate::pipeline::links::{image_to_markdown, link_to_markdown};
use scraper::ElementRef;
use tracing::trace;

/// Text of a heading or list item.
///
/// Links are resolved (honouring `suppress_links`), `<sup>` children are
/// dropped, and every other child contributes its trimmed single string.
/// Non-empty fragments are joined with one space.
pub fn node_text(el: ElementRef<'_>, suppress_links: bool) -> String {
    let mut parts: Vec<String> = Vec::new();

    for child in el.children() {
        match ElementRef::wrap(child) {
            Some(c) if tag_name(c) == "a" => {
                let text = link_to_markdown(c, suppress_links);
                if !text.is_empty() {
                    trace!("  link: {}", text);
                    parts.push(text);
                }
            }
            Some(c) if tag_name(c) == "sup" => {
                trace!("  skipping reference number (sup)");
            }
            _ => {
                if let Some(text) = single_string(child, &[]).map(str::trim) {
                    if !text.is_empty() {
                        parts.push(text.to_string());
                    }
                }
            }
        }
    }

    parts.join(" ")
}

/// Text of a paragraph, keeping natural spacing between fragments.
///
/// Text fragments keep their own whitespace; a single space is inserted
/// only where two fragments would otherwise collide (after a link or image,
/// or between text nodes that do not already end/start with a space or
/// newline). The result is trimmed but not yet whitespace-collapsed.
pub fn paragraph_text(el: ElementRef<'_>, suppress_links: bool) -> String {
    let mut out = String::new();
    let mut needs_space = false;

    for child in el.children() {
        let token = match ElementRef::wrap(child) {
            Some(c) if tag_name(c) == "a" => Some(link_to_markdown(c, suppress_links)),
            Some(c) if tag_name(c) == "sup" => continue,
            Some(c) if tag_name(c) == "img" => Some(image_to_markdown(c)),
            _ => None,
        };

        if let Some(token) = token {
            if token.is_empty() {
                continue;
            }
            if needs_space {
                out.push(' ');
            }
            out.push_str(&token);
            needs_space = true;
            continue;
        }

        let Some(text) = single_string(child, &[]) else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        if needs_space && !text.starts_with([' ', '\n']) {
            out.push(' ');
        }
        out.push_str(text);
        needs_space = !text.ends_with([' ', '\n']);
    }

    out.trim().to_string()
}
