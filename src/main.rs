use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use url::Url;

mod animator;
mod compare;
mod config;
mod models;
mod parsers;
mod prefs;
mod scrapers;
mod storage;
mod utils;

use crate::compare::html::render_html;
use crate::compare::render::{render_text, ResultsView};
use crate::compare::spinner::{terminal_columns, StageSpinner};
use crate::compare::{empty_watchlist_message, request_comparison, validate_username, CompareOutcome};
use crate::config::{Config, ScrapeConfig};
use crate::prefs::{PrefsStore, Theme};
use crate::scrapers::{scrape_catalog, Capture, HtmlReplayPage, ScrollOptions};
use crate::storage::{preview_table, read_json, sort_by_year_desc, write_json};

#[derive(Parser)]
#[command(
    name = "freewatch",
    about = "Find which films on your Letterboxd lists are free with ads on YouTube"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scroll a captured listing and export its free-with-ads movies as JSON
    Scrape {
        /// Listing capture: HTML file, http(s) URL, or - for stdin. Repeat for each scroll batch
        #[arg(short, long = "page", required = true)]
        pages: Vec<String>,
        /// Origin relative links are resolved against
        #[arg(long)]
        base_url: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pause after each scroll, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Scrolls without growth before stopping
        #[arg(long)]
        stagnant_limit: Option<u32>,
        /// Write the export newest first
        #[arg(long)]
        sort: bool,
    },
    /// Sort an existing export by year, newest first
    Sort {
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare a Letterboxd user's films against the free catalog
    Compare {
        #[arg(default_value = "")]
        username: String,
        /// Base URL of the comparison service
        #[arg(long)]
        endpoint: Option<String>,
        /// Also write an HTML report here
        #[arg(long)]
        html: Option<PathBuf>,
        /// Write the matches as plain-text lines here
        #[arg(long)]
        copy_out: Option<PathBuf>,
    },
    /// Show or change the report theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
    Set { theme: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("freewatch=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()?;

    match cli.command {
        Commands::Scrape {
            pages,
            base_url,
            output,
            delay_ms,
            stagnant_limit,
            sort,
        } => {
            let mut scrape = config.scrape.clone();
            if let Some(base_url) = base_url {
                scrape.base_url = base_url;
            }
            if let Some(output) = output {
                scrape.output = output;
            }
            if let Some(delay_ms) = delay_ms {
                scrape.settle_delay_ms = delay_ms;
            }
            if let Some(limit) = stagnant_limit {
                scrape.stagnant_limit = limit;
            }
            run_scrape(&config, &scrape, &pages, sort).await?;
        }
        Commands::Sort { input, output } => {
            let input = input.unwrap_or_else(|| config.scrape.output.clone());
            let output = output.unwrap_or_else(|| input.clone());
            run_sort(&input, &output)?;
        }
        Commands::Compare {
            username,
            endpoint,
            html,
            copy_out,
        } => {
            let endpoint = endpoint.unwrap_or_else(|| config.compare.endpoint.clone());
            return run_compare(&config, &username, &endpoint, html, copy_out).await;
        }
        Commands::Theme { action } => run_theme(&prefs_store(&config), action)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn capture_from_arg(arg: &str) -> Result<Capture> {
    if arg == "-" {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("Failed to read listing capture from stdin")?;
        return Ok(Capture::Inline(html));
    }
    Ok(Capture::from_arg(arg))
}

async fn run_scrape(
    config: &Config,
    scrape: &ScrapeConfig,
    pages: &[String],
    sort: bool,
) -> Result<()> {
    let base_url = Url::parse(&scrape.base_url)
        .with_context(|| format!("Invalid base URL {}", scrape.base_url))?;
    let captures = pages
        .iter()
        .map(|arg| capture_from_arg(arg))
        .collect::<Result<Vec<_>>>()?;

    // Initialize HTTP client with connection pooling
    let client = utils::http::create_client(config)?;
    let mut page = HtmlReplayPage::open(client, captures, base_url.clone(), config.fetch_retries).await?;

    let options = ScrollOptions {
        settle_delay: scrape.settle_delay(),
        stagnant_limit: scrape.stagnant_limit,
        base_url,
    };

    info!("--- Starting scrape at {} ---", Local::now().format("%Y-%m-%d %H:%M:%S"));
    let report = scrape_catalog(&mut page, &options).await;
    info!(
        "Found {} Free with Ads movies in {} scroll cycles",
        report.catalog.len(),
        report.cycles
    );
    if report.catalog.is_empty() {
        warn!("No listings matched; check the capture with inspect_capture");
    }

    let mut entries = report.catalog.into_entries();
    if sort {
        sort_by_year_desc(&mut entries);
    }

    print!("{}", preview_table(&entries));
    write_json(&scrape.output, &entries)
}

fn run_sort(input: &Path, output: &Path) -> Result<()> {
    let mut entries = read_json(input)?;
    sort_by_year_desc(&mut entries);
    write_json(output, &entries)?;

    info!("Sorted {} entries by year, newest first", entries.len());
    Ok(())
}

async fn run_compare(
    config: &Config,
    raw_username: &str,
    endpoint: &str,
    html: Option<PathBuf>,
    copy_out: Option<PathBuf>,
) -> Result<ExitCode> {
    let username = match validate_username(raw_username) {
        Ok(username) => username,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::from(e.exit_code()));
        }
    };

    let theme = prefs_store(config).load();
    let client = utils::http::create_compare_client(config)?;

    let spinner = StageSpinner::start(terminal_columns(config.compare.fallback_width))?;
    let result = request_comparison(&client, endpoint, &username, |stage| spinner.set_stage(stage)).await;
    spinner.finish();

    match result {
        Ok(CompareOutcome::EmptyWatchlist) => println!("{}", empty_watchlist_message()),
        Ok(CompareOutcome::Results(data)) => {
            let view = ResultsView::build(&data);
            print!("{}", render_text(&view));

            if let Some(path) = html {
                std::fs::write(&path, render_html(&view, theme))
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                info!("Wrote HTML report to {}", path.display());
            }

            if let Some(path) = copy_out {
                match view.copy_text() {
                    Some(text) => {
                        std::fs::write(&path, text + "\n")
                            .with_context(|| format!("Failed to write match list to {}", path.display()))?;
                        info!("Wrote match list to {}", path.display());
                    }
                    None => info!("No matches to copy"),
                }
            }
        }
        Err(e) => {
            error!("Comparison failed: {}", e);
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::from(e.exit_code()));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn prefs_store(config: &Config) -> PrefsStore {
    PrefsStore::new(
        config
            .prefs_path
            .clone()
            .unwrap_or_else(PrefsStore::default_path),
    )
}

fn run_theme(store: &PrefsStore, action: Option<ThemeAction>) -> Result<()> {
    let theme = match action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => store.load(),
        ThemeAction::Toggle => store.toggle()?,
        ThemeAction::Set { theme } => {
            let theme: Theme = theme.parse()?;
            store.save(theme)?;
            theme
        }
    };

    info!("Preferences at {}", store.path().display());
    println!("{} {}", theme, theme.toggle_glyph());
    Ok(())
}
