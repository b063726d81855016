//! Infobox → two-column Markdown table.
//!
//! An infobox is a `<table class="infobox">` whose rows pair a
//! `th.infobox-label` with a `td.infobox-data`. Title rows
//! (`th.infobox-above`) and image-only rows are dropped; the first
//! `td.infobox-image` picture is hoisted above the table instead.
//!
//! ## Cell flattening
//!
//! Data cells are free-form markup. They are flattened to a single line:
//!
//! 1. `<style>`, `<sup>` and `<span>` subtrees are ignored entirely.
//! 2. A cell holding a list (`<ul>` or `div.hlist`) becomes its items,
//!    cleaned and comma-joined.
//! 3. Otherwise the direct children are scanned left to right. Free text is
//!    buffered; links, `<br>` and bare-comma text nodes flush the buffer.
//!    Links become parts of their own, rendered as Markdown links even when
//!    body links are suppressed (infobox values are data, not prose).
//! 4. Parts are trimmed of spaces/commas, empties dropped, joined by `, `,
//!    and `|` is escaped so the table survives.

use crate::pipeline::dom::{
    find_descendant, full_text, has_class, single_string, stripped_text, tag_name,
    visible_children, visible_descendants,
};
use crate::pipeline::links::{image_to_markdown, render_link};
use crate::pipeline::text::clean_text_value;
use ego_tree::NodeRef;
use scraper::{ElementRef, Node};
use tracing::{debug, trace};

/// Subtrees that never contribute to a data cell's value.
const PRUNED: &[&str] = &["style", "sup", "span"];

const TABLE_HEADER: &str = "| Attribute | Value |";
const TABLE_SEPARATOR: &str = "|-----------|--------|";

/// Converted infobox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoboxMarkdown {
    /// Optional lead image line, blank line, then the table.
    pub markdown: String,
    /// Label/value rows written (header rows not counted).
    pub rows: usize,
}

/// Convert an infobox table element to Markdown.
pub fn infobox_to_markdown(infobox: ElementRef<'_>) -> InfoboxMarkdown {
    let mut lines: Vec<String> = Vec::new();

    if let Some(img) = find_descendant(infobox, "td", Some("infobox-image"))
        .and_then(|cell| find_descendant(cell, "img", None))
    {
        let image = image_to_markdown(img);
        if !image.is_empty() {
            debug!("Infobox lead image: {}", image);
            lines.push(image);
            lines.push(String::new());
        }
    }

    lines.push(TABLE_HEADER.to_string());
    lines.push(TABLE_SEPARATOR.to_string());

    let mut rows = 0;
    for row in infobox
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|e| tag_name(*e) == "tr")
    {
        if is_title_or_image_row(row) {
            trace!("Infobox: skipping title/image row");
            continue;
        }

        let (Some(label), Some(data)) = (
            find_descendant(row, "th", Some("infobox-label")),
            find_descendant(row, "td", Some("infobox-data")),
        ) else {
            continue;
        };

        let label_text = stripped_text(*label, &[]).replace('\n', " ");
        let data_text = flatten_data_cell(data);
        if data_text.is_empty() {
            trace!("Infobox: row '{}' has no value", label_text);
            continue;
        }

        lines.push(format!("| {} | {} |", label_text, data_text.replace('|', "\\|")));
        rows += 1;
    }

    debug!("Infobox converted: {} rows", rows);
    InfoboxMarkdown {
        markdown: lines.join("\n"),
        rows,
    }
}

fn is_title_or_image_row(row: ElementRef<'_>) -> bool {
    find_descendant(row, "th", Some("infobox-above")).is_some()
        || (find_descendant(row, "td", Some("infobox-image")).is_some()
            && find_descendant(row, "th", None).is_none())
}

// ── Cell flattening ──────────────────────────────────────────────────────────

/// Flatten a data cell to a comma-separated value (unescaped).
pub fn flatten_data_cell(cell: ElementRef<'_>) -> String {
    let descendants = visible_descendants(cell, PRUNED);

    let has_list = descendants
        .iter()
        .any(|e| tag_name(*e) == "ul" || (tag_name(*e) == "div" && has_class(*e, "hlist")));
    if has_list {
        let items: Vec<ElementRef<'_>> = descendants
            .iter()
            .copied()
            .filter(|e| tag_name(*e) == "li")
            .collect();
        // Any list item makes the list the whole value, even if every item
        // is blank.
        if !items.is_empty() {
            return items
                .iter()
                .map(|li| clean_text_value(&full_text(**li, PRUNED)))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
        }
    }

    let mut parts = CellParts::default();
    for child in visible_children(*cell, PRUNED) {
        flatten_child(child, &mut parts);
    }
    parts.finish()
}

/// Links always come out as `[text](url)`, even with body links suppressed.
fn flatten_child(child: NodeRef<'_, Node>, parts: &mut CellParts) {
    match child.value() {
        Node::Text(t) if t.trim().is_empty() => return,
        Node::Text(_) | Node::Element(_) => {}
        _ => return,
    }

    if let Some(el) = ElementRef::wrap(child) {
        match tag_name(el) {
            "a" => {
                parts.flush();
                if !stripped_text(child, PRUNED).is_empty() {
                    parts.push(render_link(el, false, PRUNED));
                }
                return;
            }
            "br" => {
                parts.flush();
                return;
            }
            _ => {}
        }
    }

    if let Some(text) = single_string(child, PRUNED).map(str::trim) {
        if text == "," {
            parts.flush();
        } else if !text.is_empty() {
            parts.buffer.push(text.to_string());
        }
    }
}

#[derive(Default)]
struct CellParts {
    parts: Vec<String>,
    buffer: Vec<String>,
}

impl CellParts {
    fn push(&mut self, part: String) {
        self.parts.push(part);
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = clean_text_value(&self.buffer.concat());
        self.buffer.clear();
        if !text.is_empty() {
            self.parts.push(text);
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.parts
            .iter()
            .map(|p| p.trim_matches(|c: char| c == ' ' || c == ','))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
