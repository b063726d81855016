//! End-to-end integration tests for edgequake-wiki2md.
//!
//! These tests talk to the live English Wikipedia API. They are gated behind
//! the `E2E_ENABLED` environment variable so they do not run in CI unless
//! explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture
//!
//! To restrict to a specific test:
//!   E2E_ENABLED=1 cargo test --test e2e test_fetch_by_url -- --nocapture

use edgequake_wiki2md::{
    convert, convert_to_file, ConversionConfig, FetchConfig, Wiki2MdError, WikiClient,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test if E2E_ENABLED is not set.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

fn client() -> WikiClient {
    let config = FetchConfig::builder()
        .timeout_secs(60)
        .build()
        .expect("valid fetch config");
    WikiClient::new(config).expect("http client")
}

/// Assert the markdown passes basic quality checks.
fn assert_markdown_quality(md: &str, context: &str) {
    assert!(!md.trim().is_empty(), "[{context}] Markdown is empty");
    assert!(
        !md.contains("\n\n\n"),
        "[{context}] Output has more than one consecutive blank line"
    );
    assert!(!md.ends_with('\n'), "[{context}] Output has a trailing newline");

    // Reference markers and skipped sections must be gone.
    assert!(!md.contains("[1]"), "[{context}] Reference marker survived");
    assert!(
        !md.contains("## References"),
        "[{context}] References section survived"
    );
    assert!(
        !md.contains("## External links"),
        "[{context}] External links section survived"
    );
}

// ── Fetch + convert ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_convert_by_title() {
    e2e_skip_unless_ready!();
    let output = convert("Albert Einstein", &ConversionConfig::default(), &client())
        .await
        .expect("conversion should succeed");

    println!(
        "Einstein: {} chars, {} paragraphs, {} infobox rows in {}ms",
        output.markdown.len(),
        output.stats.paragraphs,
        output.stats.infobox_rows,
        output.stats.duration_ms
    );

    assert_eq!(output.title, "Albert Einstein");
    assert!(output.markdown.starts_with("# Albert Einstein\n\n"));
    assert!(output.markdown.contains("| Attribute | Value |"));
    assert!(output.stats.paragraphs > 10);
    assert!(output.stats.infobox_rows > 3);
    assert_markdown_quality(&output.markdown, "einstein");
}

#[tokio::test]
async fn test_fetch_by_url() {
    e2e_skip_unless_ready!();
    let page = client()
        .fetch("https://en.wikipedia.org/wiki/Rust_(programming_language)")
        .await
        .expect("fetch should succeed");

    assert_eq!(page.title, "Rust (programming language)");
    assert_eq!(
        page.canonical_url,
        "https://en.wikipedia.org/wiki/Rust_(programming_language)"
    );
    assert!(!page.html.is_empty());
}

#[tokio::test]
async fn test_redirect_is_followed() {
    e2e_skip_unless_ready!();
    let page = client().fetch("Einstein").await.expect("redirect should resolve");
    assert_eq!(page.title, "Albert Einstein");
}

#[tokio::test]
async fn test_obsidian_front_matter() {
    e2e_skip_unless_ready!();
    let config = ConversionConfig::builder()
        .enriched_frontmatter(true)
        .build();
    let output = convert("Albert Einstein", &config, &client())
        .await
        .expect("conversion should succeed");

    let md = &output.markdown;
    assert!(md.starts_with("---\ntitle: \"Albert Einstein\"\n"));
    assert!(md.contains("wikipedia_url: \"https://en.wikipedia.org/wiki/Albert_Einstein\""));
    assert!(md.contains("date_converted: \""));
    assert!(md.contains("\n---\n\n# Albert Einstein\n\n"));
}

#[tokio::test]
async fn test_no_links_mode() {
    e2e_skip_unless_ready!();
    let config = ConversionConfig::builder().suppress_links(true).build();
    let output = convert("Albert Einstein", &config, &client())
        .await
        .expect("conversion should succeed");

    // Body text carries no Wikipedia article links; only the infobox may.
    let body = output
        .markdown
        .split("|\n\n")
        .last()
        .unwrap_or(&output.markdown);
    assert!(
        !body.contains("](https://en.wikipedia.org/wiki/"),
        "article link rendered in no-links mode"
    );
}

#[tokio::test]
async fn test_convert_to_file() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let path = convert_to_file(
        "Ferris wheel",
        dir.path(),
        &ConversionConfig::default(),
        &client(),
    )
    .await
    .expect("conversion should succeed");

    assert_eq!(path, dir.path().join("Ferris wheel.md"));
    let md = std::fs::read_to_string(&path).unwrap();
    assert!(md.starts_with("# Ferris wheel\n\n"));
    assert_markdown_quality(&md, "ferris-wheel");
}

// ── Lookup misses ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_disambiguation_offers_options() {
    e2e_skip_unless_ready!();
    match client().fetch("Mercury").await {
        Err(Wiki2MdError::Ambiguous { query, options }) => {
            println!("Mercury options: {options:?}");
            assert_eq!(query, "Mercury");
            assert!(!options.is_empty());
            assert!(options.len() <= 10);
        }
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

#[tokio::test]
async fn test_nonsense_title_has_no_matches() {
    e2e_skip_unless_ready!();
    let err = client()
        .fetch("qzxwvjkq plorptastic frobnicationism")
        .await
        .unwrap_err();
    assert!(
        matches!(err, Wiki2MdError::NoMatches { .. }),
        "expected NoMatches, got {err:?}"
    );
}

#[tokio::test]
async fn test_missing_url_target_is_not_searched() {
    e2e_skip_unless_ready!();
    let err = client()
        .fetch("https://en.wikipedia.org/wiki/Qzxwvjkq_Plorptastic_Frobnicationism")
        .await
        .unwrap_err();
    assert!(
        matches!(err, Wiki2MdError::PageNotFound { .. }),
        "expected PageNotFound, got {err:?}"
    );
}

#[tokio::test]
async fn test_malformed_wikipedia_url_is_rejected_offline() {
    // Rejected before any request is made, so this one runs ungated.
    let err = client()
        .fetch("https://en.wikipedia.org/Rust")
        .await
        .unwrap_err();
    assert!(
        matches!(err, Wiki2MdError::InvalidUrl { .. }),
        "expected InvalidUrl, got {err:?}"
    );
}
