use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::models::CatalogEntry;
use crate::parsers::{canonicalize_watch_url, video_id, DEFAULT_BASE_URL};
use crate::storage::Catalog;

mod replay;

pub use replay::{Capture, HtmlReplayPage};

/// What the scroll loop needs from a rendered listing page.
#[async_trait]
pub trait ListingPage: Send {
    type Card: Send;

    /// Scroll to the end of the document so the next batch lazy-loads.
    async fn scroll_to_bottom(&mut self) -> Result<()>;
    /// Current document height; only compared against itself.
    fn page_height(&self) -> u64;
    /// Cards carrying a "free with ads" badge, in document order.
    fn find_candidate_cards(&self) -> Vec<Self::Card>;
    fn extract_link(&self, card: &Self::Card) -> Option<String>;
    fn extract_title(&self, card: &Self::Card) -> String;
    fn extract_year(&self, card: &Self::Card) -> Option<i32>;
}

#[derive(Debug, Clone)]
pub struct ScrollOptions {
    /// Pause after each scroll for lazy content to render
    pub settle_delay: Duration,
    /// Consecutive cycles without height growth before giving up
    pub stagnant_limit: u32,
    pub base_url: Url,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1200),
            stagnant_limit: 3,
            base_url: DEFAULT_BASE_URL.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ScrapeReport {
    pub catalog: Catalog,
    pub cycles: u32,
}

/// Scroll until the page height stops growing, collecting listings as they render.
pub async fn scrape_catalog<P: ListingPage>(page: &mut P, options: &ScrollOptions) -> ScrapeReport {
    let mut catalog = Catalog::new();
    let mut last_height = 0;
    let mut stagnant = 0;
    let mut cycles = 0;

    info!(
        "Scrolling listing (settle delay {:?}, stop after {} stagnant cycles)",
        options.settle_delay, options.stagnant_limit
    );

    while stagnant < options.stagnant_limit {
        if let Err(e) = page.scroll_to_bottom().await {
            warn!("Scroll failed, treating page as unchanged: {:#}", e);
        }
        tokio::time::sleep(options.settle_delay).await;
        cycles += 1;

        let added = collect_cards(page, &mut catalog, &options.base_url);

        let height = page.page_height();
        if height == last_height {
            stagnant += 1;
        } else {
            stagnant = 0;
            last_height = height;
        }

        debug!(
            "Cycle {}: height {}, {} new, {} total, stagnant {}/{}",
            cycles,
            height,
            added,
            catalog.len(),
            stagnant,
            options.stagnant_limit
        );
    }

    info!("Listing stopped growing after {} scroll cycles", cycles);
    ScrapeReport { catalog, cycles }
}

fn collect_cards<P: ListingPage>(page: &P, catalog: &mut Catalog, base_url: &Url) -> usize {
    let mut added = 0;

    for card in page.find_candidate_cards() {
        let Some(link) = page.extract_link(&card) else {
            continue;
        };

        let href = canonicalize_watch_url(&link, base_url);
        let id = video_id(&href);
        if catalog.has_seen(&id) {
            continue;
        }

        let entry = CatalogEntry {
            title: page.extract_title(&card),
            year: page.extract_year(&card),
            href,
        };
        debug!("New listing {}: {}", id, entry.label());
        if catalog.mark_seen(id, entry) {
            added += 1;
        }
    }

    added
}
