use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::fs;

/// Selector hit counts for a saved (or live) listing page, for when the
/// platform renames its elements and the scraper comes back empty.
#[tokio::main]
async fn main() -> Result<()> {
    let source = std::env::args()
        .nth(1)
        .context("usage: inspect_capture <file.html|url>")?;

    let html = if source.starts_with("http://") || source.starts_with("https://") {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36")
            .build()?;

        println!("Fetching {}...", source);
        let html = client.get(&source).send().await?.text().await?;
        fs::write("listing_sample.html", &html)?;
        html
    } else {
        fs::read_to_string(&source).with_context(|| format!("Failed to read {}", source))?
    };

    let document = Html::parse_document(&html);

    let selectors = vec![
        "ytd-badge-supported-renderer",
        "ytd-grid-movie-renderer",
        "ytd-video-renderer",
        "ytd-rich-item-renderer",
        r#"a[href^="/watch"]"#,
        "a#thumbnail",
        "a#video-title",
        "yt-formatted-string#video-title",
        "#title a",
        "span.grid-movie-renderer-metadata",
    ];

    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            println!("Selector '{}' matched {} elements", selector_str, document.select(&selector).count());
        }
    }

    let badge_selector = Selector::parse("ytd-badge-supported-renderer").unwrap();
    let free = document
        .select(&badge_selector)
        .filter(|badge| {
            let label = format!(
                "{} {}",
                badge.text().collect::<String>(),
                badge.value().attr("aria-label").unwrap_or_default()
            );
            label.to_lowercase().contains("free with ads")
        })
        .count();
    println!("\n{} badges read \"free with ads\"", free);

    Ok(())
}
