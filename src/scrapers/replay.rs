use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::info;
use url::Url;

use crate::parsers::{absolutize, extract_year, is_free_with_ads};
use crate::scrapers::ListingPage;
use crate::utils::http::fetch_with_retry;

const CARD_TAGS: [&str; 3] = [
    "ytd-grid-movie-renderer",
    "ytd-video-renderer",
    "ytd-rich-item-renderer",
];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid listing selector")
}

static BADGE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("ytd-badge-supported-renderer"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"a[href^="/watch"], a#thumbnail"#));
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    selector("a#video-title, yt-formatted-string#video-title, a#video-title-link, #video-title, #title a")
});
static METADATA_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("span.grid-movie-renderer-metadata"));

/// Where one captured batch of the listing comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    File(PathBuf),
    Url(String),
    Inline(String),
}

impl Capture {
    /// `http(s)://` arguments are fetched, anything else is read from disk
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Capture::Url(arg.to_string())
        } else {
            Capture::File(PathBuf::from(arg))
        }
    }

    fn describe(&self) -> String {
        match self {
            Capture::File(path) => path.display().to_string(),
            Capture::Url(url) => url.clone(),
            Capture::Inline(html) => format!("inline capture ({} bytes)", html.len()),
        }
    }
}

/// Outer HTML of one listing card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFragment {
    pub html: String,
}

/// Replays an infinite-scroll listing from captured HTML.
///
/// The first capture is rendered on open; every scroll appends the next one
/// until none are left, after which the page height stops changing.
pub struct HtmlReplayPage {
    client: Client,
    retries: u32,
    base_url: Url,
    pending: VecDeque<Capture>,
    rendered: Vec<String>,
}

impl HtmlReplayPage {
    pub async fn open(client: Client, captures: Vec<Capture>, base_url: Url, retries: u32) -> Result<Self> {
        let mut pending: VecDeque<Capture> = captures.into();
        let first = pending
            .pop_front()
            .context("At least one listing capture is required")?;

        let mut page = Self {
            client,
            retries,
            base_url,
            pending,
            rendered: Vec::new(),
        };
        let html = page.load(&first).await?;
        page.rendered.push(html);

        Ok(page)
    }

    async fn load(&self, capture: &Capture) -> Result<String> {
        info!("Rendering listing capture {}", capture.describe());

        match capture {
            Capture::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read capture {}", path.display())),
            Capture::Url(url) => {
                let response = fetch_with_retry(&self.client, url, self.retries).await?;
                Ok(response.text().await?)
            }
            Capture::Inline(html) => Ok(html.clone()),
        }
    }
}

/// Text and the attributes we read off the first element matching a selector
struct Picked {
    text: String,
    href: Option<String>,
    title: Option<String>,
    aria_label: Option<String>,
}

impl CardFragment {
    fn pick(&self, selector: &Selector) -> Option<Picked> {
        let fragment = Html::parse_fragment(&self.html);
        let element = fragment.select(selector).next()?;
        let attr = |name: &str| element.value().attr(name).map(str::to_string);

        Some(Picked {
            text: element.text().collect(),
            href: attr("href"),
            title: attr("title"),
            aria_label: attr("aria-label"),
        })
    }
}

fn enclosing_card<'a>(badge: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    badge
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| CARD_TAGS.contains(&el.value().name()))
}

#[async_trait]
impl ListingPage for HtmlReplayPage {
    type Card = CardFragment;

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        if let Some(next) = self.pending.pop_front() {
            let html = self.load(&next).await?;
            self.rendered.push(html);
        }
        Ok(())
    }

    fn page_height(&self) -> u64 {
        self.rendered.iter().map(|html| html.len() as u64).sum()
    }

    fn find_candidate_cards(&self) -> Vec<CardFragment> {
        let mut cards = Vec::new();

        for html in &self.rendered {
            let document = Html::parse_document(html);

            for badge in document.select(&BADGE_SELECTOR) {
                let text = badge.text().collect::<String>();
                if !is_free_with_ads(&text, badge.value().attr("aria-label")) {
                    continue;
                }

                if let Some(card) = enclosing_card(&badge) {
                    cards.push(CardFragment { html: card.html() });
                }
            }
        }

        cards
    }

    fn extract_link(&self, card: &CardFragment) -> Option<String> {
        card.pick(&LINK_SELECTOR)?
            .href
            .filter(|href| !href.is_empty())
            .map(|href| absolutize(&href, &self.base_url))
    }

    fn extract_title(&self, card: &CardFragment) -> String {
        let Some(picked) = card.pick(&TITLE_SELECTOR) else {
            return String::new();
        };

        [Some(picked.text.trim().to_string()), picked.title, picked.aria_label]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or_default()
    }

    fn extract_year(&self, card: &CardFragment) -> Option<i32> {
        let picked = card.pick(&METADATA_SELECTOR)?;
        extract_year(&picked.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, VideoId};
    use crate::parsers::DEFAULT_BASE_URL;
    use crate::scrapers::{scrape_catalog, ScrollOptions};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FIRST_BATCH: &str = r#"<html><body><div id="contents">
<ytd-grid-movie-renderer>
  <a id="thumbnail" href="/watch?v=abc&amp;pp=sAQA"><img src="poster.jpg"></a>
  <div id="details">
    <a id="video-title" href="/watch?v=abc&amp;pp=sAQA" title="Red Eye (2005)">  Red Eye </a>
    <span class="grid-movie-renderer-metadata">Thriller • 2005 • 1h 25m</span>
    <ytd-badge-supported-renderer><div class="badge"><span>Free with ads</span></div></ytd-badge-supported-renderer>
  </div>
</ytd-grid-movie-renderer>
<ytd-grid-movie-renderer>
  <a id="thumbnail" href="/watch?v=paid1"></a>
  <a id="video-title" href="/watch?v=paid1">Paid Movie</a>
  <span class="grid-movie-renderer-metadata">Drama • 2019</span>
  <ytd-badge-supported-renderer><span>Buy or rent</span></ytd-badge-supported-renderer>
</ytd-grid-movie-renderer>
<ytd-rich-item-renderer>
  <a id="thumbnail" href="/watch?v=xyz&amp;t=10s"></a>
  <yt-formatted-string id="video-title" aria-label="Heat">   </yt-formatted-string>
  <ytd-badge-supported-renderer aria-label="FREE WITH ADS"></ytd-badge-supported-renderer>
</ytd-rich-item-renderer>
<ytd-badge-supported-renderer><span>Free with ads</span></ytd-badge-supported-renderer>
</div></body></html>"#;

    const SECOND_BATCH: &str = r#"<html><body><div id="contents">
<ytd-grid-movie-renderer>
  <a id="thumbnail" href="/watch?v=abc&amp;list=WL"></a>
  <a id="video-title">Red Eye (Extended)</a>
  <span class="grid-movie-renderer-metadata">2006</span>
  <ytd-badge-supported-renderer>Free with ads</ytd-badge-supported-renderer>
</ytd-grid-movie-renderer>
<ytd-video-renderer>
  <a id="thumbnail" href="https://www.youtube.com/watch?v=new1&amp;feature=share"></a>
  <div id="title"><a>Ronin</a></div>
  <span class="grid-movie-renderer-metadata">Action · 1998 · 2h 2m</span>
  <ytd-badge-supported-renderer><p>free with ads</p></ytd-badge-supported-renderer>
</ytd-video-renderer>
</div></body></html>"#;

    async fn replay(captures: Vec<Capture>) -> HtmlReplayPage {
        HtmlReplayPage::open(Client::new(), captures, DEFAULT_BASE_URL.clone(), 1)
            .await
            .unwrap()
    }

    fn instant() -> ScrollOptions {
        ScrollOptions {
            settle_delay: Duration::ZERO,
            ..ScrollOptions::default()
        }
    }

    #[tokio::test]
    async fn finds_only_badged_cards_with_an_enclosing_card() {
        let page = replay(vec![Capture::Inline(FIRST_BATCH.to_string())]).await;

        let cards = page.find_candidate_cards();

        assert_eq!(cards.len(), 2);
        assert!(cards[0].html.starts_with("<ytd-grid-movie-renderer"));
        assert!(cards[1].html.starts_with("<ytd-rich-item-renderer"));
    }

    #[tokio::test]
    async fn extracts_link_title_and_year_from_a_card() {
        let page = replay(vec![Capture::Inline(FIRST_BATCH.to_string())]).await;
        let cards = page.find_candidate_cards();

        assert_eq!(
            page.extract_link(&cards[0]).as_deref(),
            Some("https://www.youtube.com/watch?v=abc&pp=sAQA")
        );
        assert_eq!(page.extract_title(&cards[0]), "Red Eye");
        assert_eq!(page.extract_year(&cards[0]), Some(2005));
    }

    #[tokio::test]
    async fn title_falls_back_to_aria_label_and_year_to_none() {
        let page = replay(vec![Capture::Inline(FIRST_BATCH.to_string())]).await;
        let cards = page.find_candidate_cards();

        assert_eq!(page.extract_title(&cards[1]), "Heat");
        assert_eq!(page.extract_year(&cards[1]), None);
    }

    #[tokio::test]
    async fn title_keeps_decoded_text_as_written() {
        let page = replay(vec![Capture::Inline(String::new())]).await;
        let card = CardFragment {
            html: r#"<ytd-video-renderer><a id="video-title">  Tom &amp;amp; Jerry:  The   Movie </a></ytd-video-renderer>"#.to_string(),
        };

        assert_eq!(page.extract_title(&card), "Tom &amp; Jerry:  The   Movie");
    }

    #[tokio::test]
    async fn missing_title_element_gives_empty_title() {
        let page = replay(vec![Capture::Inline(String::new())]).await;
        let card = CardFragment {
            html: r#"<ytd-video-renderer><a id="thumbnail" href="/watch?v=q"></a></ytd-video-renderer>"#.to_string(),
        };

        assert_eq!(page.extract_title(&card), "");
        assert_eq!(page.extract_year(&card), None);
        assert_eq!(
            page.extract_link(&card).as_deref(),
            Some("https://www.youtube.com/watch?v=q")
        );
    }

    #[tokio::test]
    async fn scroll_appends_the_next_capture() {
        let mut page = replay(vec![
            Capture::Inline(FIRST_BATCH.to_string()),
            Capture::Inline(SECOND_BATCH.to_string()),
        ])
        .await;
        let before = page.page_height();

        page.scroll_to_bottom().await.unwrap();
        let after = page.page_height();
        page.scroll_to_bottom().await.unwrap();

        assert_eq!(after, before + SECOND_BATCH.len() as u64);
        assert_eq!(page.page_height(), after);
        assert_eq!(page.find_candidate_cards().len(), 4);
    }

    #[tokio::test]
    async fn full_scrape_deduplicates_across_batches() {
        let mut page = replay(vec![
            Capture::Inline(FIRST_BATCH.to_string()),
            Capture::Inline(SECOND_BATCH.to_string()),
        ])
        .await;

        let report = scrape_catalog(&mut page, &instant()).await;

        // one growing scroll, then three without growth
        assert_eq!(report.cycles, 4);
        assert_eq!(report.catalog.len(), 3);
        assert_eq!(
            report.catalog.get(&VideoId("abc".to_string())),
            Some(&CatalogEntry {
                title: "Red Eye".to_string(),
                year: Some(2005),
                href: "https://www.youtube.com/watch?v=abc".to_string(),
            })
        );
        assert_eq!(
            report.catalog.get(&VideoId("new1".to_string())),
            Some(&CatalogEntry {
                title: "Ronin".to_string(),
                year: Some(1998),
                href: "https://www.youtube.com/watch?v=new1".to_string(),
            })
        );
        assert!(!report.catalog.has_seen(&VideoId("paid1".to_string())));
    }

    #[tokio::test]
    async fn reads_file_and_url_captures() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("batch-1.html");
        std::fs::write(&first, FIRST_BATCH).unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/batch-2.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SECOND_BATCH))
            .expect(1)
            .mount(&server)
            .await;

        let mut page = replay(vec![
            Capture::File(first),
            Capture::Url(format!("{}/batch-2.html", server.uri())),
        ])
        .await;
        let report = scrape_catalog(&mut page, &instant()).await;

        assert_eq!(report.catalog.len(), 3);
    }

    #[test]
    fn open_requires_a_capture() {
        let result = tokio_test::block_on(HtmlReplayPage::open(
            Client::new(),
            vec![],
            DEFAULT_BASE_URL.clone(),
            1,
        ));
        assert!(result.is_err());
    }

    #[test]
    fn capture_args_pick_a_source() {
        assert_eq!(
            Capture::from_arg("https://www.youtube.com/feed/storefront"),
            Capture::Url("https://www.youtube.com/feed/storefront".to_string())
        );
        assert_eq!(
            Capture::from_arg("captures/page-1.html"),
            Capture::File(PathBuf::from("captures/page-1.html"))
        );
    }
}
