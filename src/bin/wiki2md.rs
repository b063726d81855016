//! CLI binary for edgequake-wiki2md.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` / `FetchConfig`, handles the interactive
//! disambiguation prompt, and writes the result.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use edgequake_wiki2md::{
    convert_html, write_markdown, ConversionConfig, FetchConfig, WikiClient, WikiPage, Wiki2MdError,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ── ANSI colour palette ──────────────────────────────────────────────────────

/// Colour decision, made once at startup and passed to everything that
/// prints.
#[derive(Debug, Clone, Copy)]
struct Palette {
    enabled: bool,
}

impl Palette {
    /// `NO_COLOR` wins, then `FORCE_COLOR=1`, then "is stderr a terminal".
    fn detect() -> Self {
        let enabled = if std::env::var_os("NO_COLOR").is_some() {
            false
        } else if std::env::var("FORCE_COLOR").is_ok_and(|v| v == "1") {
            true
        } else {
            io::stderr().is_terminal()
        };
        Self { enabled }
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    fn green(&self, s: &str) -> String {
        self.paint("32", s)
    }
    fn red(&self, s: &str) -> String {
        self.paint("31", s)
    }
    fn yellow(&self, s: &str) -> String {
        self.paint("33", s)
    }
    fn cyan(&self, s: &str) -> String {
        self.paint("36", s)
    }
    fn bold(&self, s: &str) -> String {
        self.paint("1", s)
    }
    fn dim(&self, s: &str) -> String {
        self.paint("2", s)
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert by title (writes "./Albert Einstein.md")
  wiki2md "Albert Einstein"

  # Convert from a URL into a notes folder
  wiki2md --url https://en.wikipedia.org/wiki/Rust_(programming_language) -o notes/

  # Obsidian front matter, no hyperlinks
  wiki2md -O -N "Alan Turing"

  # Print to stdout / dump JSON with stats
  wiki2md --stdout "Ferris"
  wiki2md --json "Ferris" > ferris.json

  # Debug the element walk
  wiki2md -v "Mercury"

DISAMBIGUATION:
  When a title names a disambiguation page, the top search results are listed
  and you are asked to pick one by number. Press Enter to cancel.

ENVIRONMENT VARIABLES:
  RUST_LOG            Overrides --loglevel / --verbose (tracing EnvFilter syntax)
  NO_COLOR            Disable coloured output
  FORCE_COLOR=1       Force coloured output even when not on a terminal
  WIKI2MD_OUTPUT_DIR  Default for --output-dir
  WIKI2MD_TIMEOUT     Default for --timeout
"#;

/// Convert Wikipedia articles to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "wiki2md",
    version,
    about = "Convert Wikipedia articles to Markdown",
    long_about = "Convert Wikipedia articles to clean Markdown. Provide either a TITLE to search \
for or use --url to point at an article directly. Navigation, references and boilerplate \
sections (See also, References, External links, …) are dropped; the infobox becomes a table.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP,
    group(ArgGroup::new("source").required(true).args(["title", "url"]))
)]
struct Cli {
    /// Article title to look up.
    title: Option<String>,

    /// Wikipedia URL to convert.
    #[arg(short, long)]
    url: Option<String>,

    /// Directory to save the Markdown file in.
    #[arg(short, long, env = "WIKI2MD_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Prepend Obsidian-style YAML front matter (title, url, date, tags).
    #[arg(short = 'O', long)]
    obsidian: bool,

    /// Render links as plain text.
    #[arg(short = 'N', long)]
    no_links: bool,

    /// Enable DEBUG-level logs (overrides --loglevel).
    #[arg(short, long)]
    verbose: bool,

    /// Log level: TRACE, DEBUG, INFO, WARN(ING), ERROR, CRITICAL.
    #[arg(short = 'L', long, default_value = "INFO")]
    loglevel: String,

    /// Print Markdown to stdout instead of writing a file.
    #[arg(long, conflicts_with = "json")]
    stdout: bool,

    /// Print the ConversionOutput (markdown + stats) as JSON to stdout.
    #[arg(long)]
    json: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,

    /// HTTP timeout in seconds for MediaWiki API calls.
    #[arg(long, env = "WIKI2MD_TIMEOUT", default_value_t = 30)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let palette = Palette::detect();

    match run(cli, palette).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", palette.red("Error:"), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, palette: Palette) -> Result<()> {
    // ── Logging setup ────────────────────────────────────────────────────
    let level = if cli.verbose {
        "debug"
    } else {
        parse_log_level(&cli.loglevel)?
    };
    let filter = if cli.quiet && !cli.verbose { "error" } else { level };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_ansi(palette.enabled)
        .with_target(false)
        .without_time()
        .init();
    if cli.verbose {
        debug!("Debug mode enabled");
    }

    // ── Build config ─────────────────────────────────────────────────────
    let fetch_config = FetchConfig::builder()
        .timeout_secs(cli.timeout)
        .build()
        .context("Invalid configuration")?;
    let client = WikiClient::new(fetch_config).context("Failed to create HTTP client")?;
    let config = ConversionConfig::builder()
        .enriched_frontmatter(cli.obsidian)
        .suppress_links(cli.no_links)
        .build();

    let query = cli
        .url
        .as_deref()
        .or(cli.title.as_deref())
        .context("Provide a TITLE or --url")?;

    // ── Fetch ────────────────────────────────────────────────────────────
    let page = fetch_with_prompt(&client, query, palette, cli.quiet).await?;

    // ── Convert + output ─────────────────────────────────────────────────
    let output = convert_html(&page, &config);

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.stdout {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.markdown.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.markdown.ends_with('\n') {
            handle
                .write_all(b"\n")
                .context("Failed to write to stdout")?;
        }
    } else {
        let path = write_markdown(&output, &cli.output_dir).context("Failed to save Markdown")?;
        if !cli.quiet {
            eprintln!(
                "{} Saved {} → {}",
                palette.green("✔"),
                palette.cyan(&format!("'{}'", output.title)),
                palette.bold(&path.display().to_string()),
            );
            eprintln!(
                "   {}",
                palette.dim(&format!(
                    "{} headings, {} paragraphs, {} list items, {} images, {} infobox rows  —  {}ms",
                    output.stats.headings,
                    output.stats.paragraphs,
                    output.stats.list_items,
                    output.stats.images,
                    output.stats.infobox_rows,
                    output.stats.duration_ms,
                )),
            );
        }
    }

    Ok(())
}

/// Fetch `query`; on a disambiguation page, ask the user to pick a result.
async fn fetch_with_prompt(
    client: &WikiClient,
    query: &str,
    palette: Palette,
    quiet: bool,
) -> Result<WikiPage> {
    let bar = spinner(quiet, &format!("Searching for '{query}'…"));
    let fetched = client.fetch(query).await;
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    match fetched {
        Ok(page) => Ok(page),
        Err(Wiki2MdError::Ambiguous { options, .. }) if !options.is_empty() => {
            eprintln!(
                "{} Multiple matches found. Please choose one of the following:",
                palette.yellow("?")
            );
            for (idx, option) in options.iter().enumerate() {
                eprintln!("{}. {}", idx + 1, option);
            }
            eprint!("Enter a number (or press Enter to cancel): ");
            io::stderr().flush().ok();

            let mut answer = String::new();
            io::stdin()
                .lock()
                .read_line(&mut answer)
                .context("Failed to read choice")?;
            let chosen = choose_option(&options, &answer)?;

            let bar = spinner(quiet, &format!("Fetching '{chosen}'…"));
            let page = client.fetch_page(&chosen).await;
            if let Some(bar) = &bar {
                bar.finish_and_clear();
            }
            let page = page.with_context(|| format!("Failed to fetch '{chosen}'"))?;
            info!("Found article: '{}'", page.title);
            Ok(page)
        }
        Err(e) => Err(e.into()),
    }
}

fn spinner(quiet: bool, message: &str) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    Some(bar)
}

/// Map a `--loglevel` name to a tracing filter directive.
fn parse_log_level(s: &str) -> Result<&'static str> {
    match s.trim().to_uppercase().as_str() {
        "TRACE" => Ok("trace"),
        "DEBUG" => Ok("debug"),
        "INFO" => Ok("info"),
        "WARN" | "WARNING" => Ok("warn"),
        "ERROR" | "CRITICAL" => Ok("error"),
        _ => anyhow::bail!("Invalid log level: {s}"),
    }
}

/// Resolve the user's answer to the disambiguation prompt.
fn choose_option(options: &[String], answer: &str) -> Result<String, Wiki2MdError> {
    let answer = answer.trim();
    if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()) {
        return Err(Wiki2MdError::InvalidChoice("No valid choice provided".into()));
    }
    answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=options.len()).contains(n))
        .map(|n| options[n - 1].clone())
        .ok_or_else(|| Wiki2MdError::InvalidChoice("Choice out of range".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn title_and_url_are_exclusive() {
        assert!(Cli::try_parse_from(["wiki2md", "Ferris"]).is_ok());
        assert!(Cli::try_parse_from(["wiki2md", "-u", "https://en.wikipedia.org/wiki/Ferris"]).is_ok());
        assert!(Cli::try_parse_from(["wiki2md", "Ferris", "-u", "https://en.wikipedia.org/wiki/Ferris"]).is_err());
        assert!(Cli::try_parse_from(["wiki2md", "-O"]).is_err());
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from(["wiki2md", "-O", "-N", "-v", "-L", "debug", "-o", "out", "T"]).unwrap();
        assert!(cli.obsidian && cli.no_links && cli.verbose);
        assert_eq!(cli.loglevel, "debug");
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.title.as_deref(), Some("T"));
    }

    #[test]
    fn log_levels() {
        assert_eq!(parse_log_level("INFO").unwrap(), "info");
        assert_eq!(parse_log_level("warning").unwrap(), "warn");
        assert_eq!(parse_log_level("CRITICAL").unwrap(), "error");
        assert_eq!(parse_log_level("trace").unwrap(), "trace");
        assert!(parse_log_level("LOUD").is_err());
    }

    #[test]
    fn choices() {
        let options = vec!["Mercury (planet)".to_string(), "Mercury (element)".to_string()];
        assert_eq!(choose_option(&options, "2\n").unwrap(), "Mercury (element)");

        let err = choose_option(&options, "\n").unwrap_err();
        assert_eq!(err.to_string(), "No valid choice provided");
        let err = choose_option(&options, "two").unwrap_err();
        assert_eq!(err.to_string(), "No valid choice provided");

        let err = choose_option(&options, "0").unwrap_err();
        assert_eq!(err.to_string(), "Choice out of range");
        let err = choose_option(&options, "3").unwrap_err();
        assert_eq!(err.to_string(), "Choice out of range");
    }

    #[test]
    fn palette_disabled_is_plain() {
        let p = Palette { enabled: false };
        assert_eq!(p.red("x"), "x");
        let p = Palette { enabled: true };
        assert_eq!(p.red("x"), "\x1b[31mx\x1b[0m");
    }
}
