//! Document assembly: linearized elements → final Markdown.
//!
//! The assembler is a small state machine over the [`walk_dom`] sequence.
//! It carries two pieces of state for the length of one document:
//!
//! * **section skip**: set by a boilerplate heading (`See also`,
//!   `References`, …) and cleared by the next heading of the same or a
//!   shallower level;
//! * **pending list**: rendered `- item` lines, emitted as one block when a
//!   heading, image or paragraph arrives, or at end of document.
//!
//! The infobox is taken out of the tree first (two-pass), so the walker
//! never sees its cells.
//!
//! [`walk_dom`]: crate::pipeline::walk::walk_dom

use crate::config::ConversionConfig;
use crate::output::{ConversionOutput, ConversionStats, WikiPage};
use crate::pipeline::dom::{heading_level, tag_name};
use crate::pipeline::frontmatter::front_matter_lines;
use crate::pipeline::infobox::{infobox_to_markdown, InfoboxMarkdown};
use crate::pipeline::inline::{node_text, paragraph_text};
use crate::pipeline::links::image_to_markdown;
use crate::pipeline::text::{collapse_whitespace, fix_sentence_boundaries, strip_reference_markers};
use crate::pipeline::walk::walk_document;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::time::Instant;
use tracing::{debug, info};

/// Lowercase heading texts that open a skipped section.
pub const FORBIDDEN_SECTIONS: &[&str] = &[
    "see also",
    "references",
    "external links",
    "contents",
    "notes",
    "bibliography",
    "citations",
];

static INFOBOX_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("table.infobox").unwrap());
static RE_BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Build the Markdown document for a page.
///
/// Layout: optional front matter, `# <title>`, optional infobox block, then
/// the article body. Never fails; malformed or empty markup simply yields a
/// shorter document.
pub fn make_markdown_from_page(
    page: &WikiPage,
    config: &ConversionConfig,
    generated_at: NaiveDateTime,
) -> ConversionOutput {
    let start = Instant::now();
    info!("Assembling '{}' ({} bytes of HTML)", page.title, page.html.len());

    let mut html = Html::parse_document(&page.html);
    let mut lines: Vec<String> = Vec::new();

    if config.enriched_frontmatter {
        lines.extend(front_matter_lines(page, generated_at));
    }
    lines.push(format!("# {}", page.title));
    lines.push(String::new());

    let mut stats = ConversionStats::default();
    if let Some(infobox) = extract_infobox(&mut html) {
        stats.infobox_rows = infobox.rows;
        lines.push(infobox.markdown);
        lines.push(String::new());
    }

    let mut assembler = Assembler::new(&page.title, lines, stats, config.suppress_links);
    let mut walker = walk_document(&html);
    for element in walker.by_ref() {
        assembler.process(element);
    }
    let (markdown, mut stats) = assembler.finish();
    stats.navigation_skipped = walker.navigation_skipped();

    stats.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Assembled '{}': {} headings, {} paragraphs, {} list items, {} images ({}ms)",
        page.title, stats.headings, stats.paragraphs, stats.list_items, stats.images, stats.duration_ms
    );

    ConversionOutput {
        title: page.title.clone(),
        markdown,
        stats,
    }
}

/// Convert the first infobox and detach it from the tree.
fn extract_infobox(html: &mut Html) -> Option<InfoboxMarkdown> {
    let (id, converted) = {
        let table = html.select(&INFOBOX_SELECTOR).next()?;
        debug!("Found infobox, converting to markdown");
        (table.id(), infobox_to_markdown(table))
    };
    if let Some(mut node) = html.tree.get_mut(id) {
        node.detach();
        debug!("Removed infobox from tree");
    }
    Some(converted)
}

/// Drop trailing blank lines, join, and squeeze blank-line runs to one.
pub fn finalize_lines(mut lines: Vec<String>) -> String {
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    RE_BLANK_RUNS
        .replace_all(&lines.join("\n"), "\n\n")
        .into_owned()
}

// ── State machine ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SectionSkip {
    active: bool,
    threshold: Option<u8>,
}

impl SectionSkip {
    fn enter(&mut self, level: u8) {
        self.active = true;
        self.threshold = Some(level);
    }

    /// Leave the skipped section if `level` closes it.
    fn leave_if_closed_by(&mut self, level: u8) -> bool {
        match self.threshold {
            Some(threshold) if self.active && level <= threshold => {
                self.active = false;
                self.threshold = None;
                true
            }
            _ => false,
        }
    }
}

struct Assembler<'t> {
    title: &'t str,
    lines: Vec<String>,
    pending_list: Vec<String>,
    skip: SectionSkip,
    stats: ConversionStats,
    suppress_links: bool,
}

impl<'t> Assembler<'t> {
    fn new(title: &'t str, lines: Vec<String>, stats: ConversionStats, suppress_links: bool) -> Self {
        Self {
            title,
            lines,
            pending_list: Vec::new(),
            skip: SectionSkip::default(),
            stats,
            suppress_links,
        }
    }

    fn process(&mut self, el: ElementRef<'_>) {
        self.stats.elements_visited += 1;
        let name = tag_name(el);
        let level = heading_level(name);

        if let Some(level) = level {
            if self.skip.leave_if_closed_by(level) {
                debug!("Exiting skipped section at h{}", level);
            }
        }
        if self.skip.active {
            return;
        }

        match (name, level) {
            (_, Some(level)) => self.heading(el, level),
            ("img", _) => self.image(el),
            ("li", _) => self.list_item(el),
            ("p", _) => self.paragraph(el),
            // ul/ol only group their items.
            _ => {}
        }
    }

    fn heading(&mut self, el: ElementRef<'_>, level: u8) {
        let text = node_text(el, self.suppress_links);
        let lowered = text.to_lowercase();
        if FORBIDDEN_SECTIONS.contains(&lowered.as_str()) {
            debug!("Entering skipped section '{}' (h{})", lowered, level);
            self.skip.enter(level);
            self.stats.sections_skipped += 1;
            return;
        }
        // The title line is already written.
        if level == 1 && text == self.title {
            debug!("Dropping body <h1> that repeats the title");
            return;
        }

        self.flush_list();
        self.lines.push(String::new());
        self.lines.push(format!("{} {}", "#".repeat(level as usize), text));
        self.lines.push(String::new());
        self.stats.headings += 1;
        debug!("Added heading: {} (level {})", text, level);
    }

    fn image(&mut self, el: ElementRef<'_>) {
        self.flush_list();
        let image = image_to_markdown(el);
        if image.is_empty() {
            return;
        }
        debug!("Added image: {}", image);
        self.lines.push(String::new());
        self.lines.push(image);
        self.lines.push(String::new());
        self.stats.images += 1;
    }

    fn list_item(&mut self, el: ElementRef<'_>) {
        let text = strip_reference_markers(&node_text(el, self.suppress_links));
        if text.is_empty() {
            return;
        }
        debug!("LIST ITEM: '- {}'", text);
        self.pending_list.push(format!("- {text}"));
        self.stats.list_items += 1;
    }

    fn paragraph(&mut self, el: ElementRef<'_>) {
        self.flush_list();
        let text = fix_sentence_boundaries(&collapse_whitespace(&paragraph_text(el, self.suppress_links)));
        if text.is_empty() {
            return;
        }
        debug!("Added paragraph: {}", text.chars().take(50).collect::<String>());
        self.lines.push(text);
        self.stats.paragraphs += 1;
    }

    fn flush_list(&mut self) {
        if self.pending_list.is_empty() {
            return;
        }
        self.lines.push(self.pending_list.join("\n"));
        self.lines.push(String::new());
        self.pending_list.clear();
    }

    fn finish(mut self) -> (String, ConversionStats) {
        self.flush_list();
        (finalize_lines(self.lines), self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    fn md(html: &str) -> String {
        md_with(html, ConversionConfig::default())
    }

    fn md_with(html: &str, config: ConversionConfig) -> String {
        make_markdown_from_page(&WikiPage::new("Test Article", html), &config, at()).markdown
    }

    #[test]
    fn forbidden_heading_skips_until_same_level() {
        let out = md(
            "<h2>History</h2><p>Kept.</p>\
             <h2>See also</h2><p>Dropped.</p><h3>Deeper</h3><p>Also dropped.</p>\
             <h2>Legacy</h2><p>Back.</p>",
        );
        assert!(out.contains("## History"));
        assert!(out.contains("## Legacy\n\nBack."));
        assert!(!out.contains("See also"));
        assert!(!out.contains("Dropped"));
        assert!(!out.contains("Deeper"));
    }

    #[test]
    fn body_h1_repeating_title_dropped() {
        let out = make_markdown_from_page(
            &WikiPage::new("Title", "<h1>Title</h1><p>Hello world.</p><h2>See Also</h2><p>skip me</p>"),
            &ConversionConfig::default(),
            at(),
        );
        assert_eq!(out.markdown, "# Title\n\nHello world.");
        assert_eq!(out.stats.headings, 0);

        let out = md("<h1>Other</h1><p>x</p>");
        assert_eq!(out, "# Test Article\n\n# Other\n\nx");
    }

    #[test]
    fn shallower_heading_closes_skip() {
        let out = md("<h3>Notes</h3><p>x</p><h2>Next</h2><p>y</p>");
        assert_eq!(out, "# Test Article\n\n## Next\n\ny");
    }

    #[test]
    fn forbidden_match_is_exact() {
        let out = md("<h2>See also and further reading</h2><p>Kept.</p>");
        assert!(out.contains("## See also and further reading"));
        assert!(out.contains("Kept."));
    }

    #[test]
    fn list_flushed_before_paragraph() {
        let out = md("<ul><li>One</li><li>Two[3]</li></ul><p>After.</p>");
        assert_eq!(out, "# Test Article\n\n- One\n- Two\n\nAfter.");
    }

    #[test]
    fn empty_list_items_dropped() {
        let out = md("<ul><li>[1]</li><li> </li><li>Real</li></ul>");
        assert_eq!(out, "# Test Article\n\n- Real");
    }

    #[test]
    fn navigation_elements_skipped() {
        let out = md(
            r#"<p role="navigation">Jump</p><ul><li class="toc">Toc entry</li></ul><p class="navigation-box">Box</p><p>Body.</p>"#,
        );
        assert_eq!(out, "# Test Article\n\nBody.");
    }

    #[test]
    fn paragraph_whitespace_and_sentences_fixed() {
        let out = md("<p>First   line.\n  <b>Second</b> line.<i>Third</i></p>");
        assert!(out.ends_with("First line. Second line. Third"));
    }

    #[test]
    fn suppressed_links_render_as_text() {
        let config = ConversionConfig::builder().suppress_links(true).build();
        let out = md_with(r#"<p>See <a href="/wiki/Crab">crabs</a>.</p>"#, config);
        assert!(out.ends_with("See crabs ."));
    }

    #[test]
    fn infobox_extracted_before_body() {
        let out = md(
            r#"<p>Lead.</p><table class="infobox"><tr><th class="infobox-label">Born</th><td class="infobox-data"><p>1900</p></td></tr></table>"#,
        );
        assert_eq!(
            out,
            "# Test Article\n\n| Attribute | Value |\n|-----------|--------|\n| Born | 1900 |\n\nLead."
        );
    }

    #[test]
    fn only_first_infobox_extracted() {
        let out = make_markdown_from_page(
            &WikiPage::new(
                "T",
                r#"<table class="infobox"><tr><th class="infobox-label">A</th><td class="infobox-data">1</td></tr></table>
                   <table class="infobox"><tr><th class="infobox-label">B</th><td class="infobox-data"><p>2</p></td></tr></table>"#,
            ),
            &ConversionConfig::default(),
            at(),
        );
        assert_eq!(out.stats.infobox_rows, 1);
        assert!(out.markdown.contains("| A | 1 |"));
        assert!(!out.markdown.contains("| B |"));
        assert!(out.markdown.ends_with("\n2"));
    }

    #[test]
    fn front_matter_precedes_title() {
        let config = ConversionConfig::builder().enriched_frontmatter(true).build();
        let out = md_with("<p>Body.</p>", config);
        assert!(out.starts_with("---\ntitle: \"Test Article\"\n"));
        assert!(out.contains("date_converted: \"2024-01-02 03:04:05\""));
        assert!(out.contains("---\n\n# Test Article\n\nBody."));
    }

    #[test]
    fn stats_counted() {
        let out = make_markdown_from_page(
            &WikiPage::new(
                "T",
                r#"<h2>A</h2><p>p</p><ul><li>x</li></ul><img src="/i.png"><h2>References</h2><p>r</p>"#,
            ),
            &ConversionConfig::default(),
            at(),
        );
        let s = out.stats;
        assert_eq!(s.headings, 1);
        assert_eq!(s.paragraphs, 1);
        assert_eq!(s.list_items, 1);
        assert_eq!(s.images, 1);
        assert_eq!(s.sections_skipped, 1);
    }

    #[test]
    fn finalize_collapses_and_trims() {
        let lines = ["a", "", "", "", "b", "", ""].map(String::from).to_vec();
        assert_eq!(finalize_lines(lines), "a\n\nb");
        assert_eq!(finalize_lines(Vec::new()), "");
    }
}
