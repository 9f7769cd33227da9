use anyhow::{Context, Result};
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::Config;

pub fn create_client(config: &Config) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .pool_max_idle_per_host(6)
        .build()?;

    Ok(client)
}

/// Client for `/compare`: no overall timeout, the backend may take a while
/// to pull a long watchlist.
pub fn create_compare_client(config: &Config) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(&config.user_agent)
        .build()?;

    Ok(client)
}

/// Longest pause between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(60);

pub async fn fetch_with_retry(client: &Client, url: &str, max_retries: u32) -> Result<Response> {
    fetch_with_backoff(client, url, max_retries, Duration::from_secs(2)).await
}

/// `base * 2^(attempt-1)`, capped at [`MAX_BACKOFF`]
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
        .min(MAX_BACKOFF)
}

/// GET with exponential backoff between tries; always makes at least one attempt
pub async fn fetch_with_backoff(
    client: &Client,
    url: &str,
    max_retries: u32,
    base: Duration,
) -> Result<Response> {
    let max_retries = max_retries.max(1);
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries {
        match client.get(url).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    return Ok(response);
                } else {
                    let status = response.status();
                    warn!("HTTP error {}: {}", status, url);
                    last_error = Some(anyhow::anyhow!("HTTP error: {}", status));
                }
            }
            Err(e) => {
                error!("Request failed for {}: {}", url, e);
                last_error = Some(e.into());
            }
        }

        attempts += 1;
        if attempts < max_retries {
            let delay = backoff_delay(base, attempts);
            warn!("Retrying in {:?}... (attempt {}/{})", delay, attempts + 1, max_retries);
            sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
        .context(format!("Failed to fetch {} after {} attempts", url, max_retries))
}
