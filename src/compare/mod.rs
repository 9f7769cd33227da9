pub mod html;
pub mod render;
pub mod spinner;
pub mod stage;

use reqwest::Client;
use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::models::{CompareRequest, CompareResponse, EMOJI_CROSS, EMOJI_MAILBOX, EMOJI_WARNING};
pub use stage::LoadingStage;

pub const LETTERBOXD_URL: &str = "https://letterboxd.com/";
pub const WATCHLIST_HELP_URL: &str =
    "https://mashable.com/article/how-to-add-a-movie-to-your-watchlist-on-letterboxd";

/// Everything that can go wrong between pressing "compare" and seeing results
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("no username given")]
    EmptyUsername,
    #[error("backend refused the comparison: {0}")]
    Backend(String),
    #[error("request to the comparison endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("comparison endpoint returned an unreadable body: {0}")]
    MalformedResponse(String),
    #[error("invalid comparison endpoint {0}")]
    Endpoint(String),
}

impl CompareError {
    /// Text shown to the user in place of results
    pub fn user_message(&self) -> String {
        match self {
            CompareError::EmptyUsername => format!(
                "{} Please enter your Letterboxd username before comparing. ({})",
                EMOJI_CROSS, LETTERBOXD_URL
            ),
            CompareError::Backend(message) => message.clone(),
            CompareError::Transport(_) | CompareError::MalformedResponse(_) => {
                format!("{} Network error. Please try again later.", EMOJI_WARNING)
            }
            CompareError::Endpoint(endpoint) => {
                format!("{} Invalid comparison endpoint: {}", EMOJI_CROSS, endpoint)
            }
        }
    }

    /// Process exit status: 2 for bad input, 1 for a failed comparison
    pub fn exit_code(&self) -> u8 {
        match self {
            CompareError::EmptyUsername | CompareError::Endpoint(_) => 2,
            CompareError::Backend(_)
            | CompareError::Transport(_)
            | CompareError::MalformedResponse(_) => 1,
        }
    }
}

pub fn unknown_error_message() -> String {
    format!("{} An unknown error occurred.", EMOJI_CROSS)
}

pub fn empty_watchlist_message() -> String {
    format!(
        "{} Your watchlist seems to be empty. Add movies to it instead? ({})",
        EMOJI_MAILBOX, WATCHLIST_HELP_URL
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareOutcome {
    EmptyWatchlist,
    Results(CompareResponse),
}

/// Trimmed username, or an error before any request is made
pub fn validate_username(raw: &str) -> Result<String, CompareError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(CompareError::EmptyUsername);
    }
    Ok(username.to_string())
}

pub fn compare_url(endpoint: &str) -> Result<Url, CompareError> {
    let invalid = || CompareError::Endpoint(endpoint.to_string());

    let mut base = Url::parse(endpoint).map_err(|_| invalid())?;
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join("compare").map_err(|_| invalid())
}

/// POST `{username}` to `<endpoint>/compare` and classify the reply.
///
/// `on_stage` is called as the request moves through its loading stages.
/// Nothing is retried.
pub async fn request_comparison(
    client: &Client,
    endpoint: &str,
    raw_username: &str,
    mut on_stage: impl FnMut(LoadingStage),
) -> Result<CompareOutcome, CompareError> {
    let username = validate_username(raw_username)?;
    let url = compare_url(endpoint)?;

    on_stage(LoadingStage::Fetching);
    info!("Requesting comparison for {} from {}", username, url);

    let response = client
        .post(url)
        .json(&CompareRequest { username })
        .send()
        .await?;

    on_stage(LoadingStage::GettingWatched);
    let status = response.status();

    on_stage(LoadingStage::Processing);
    let body = response.text().await?;
    let data: CompareResponse = serde_json::from_str(&body).map_err(|e| {
        error!("Unreadable comparison response ({}): {}", status, e);
        CompareError::MalformedResponse(e.to_string())
    })?;

    if data.empty_watchlist {
        info!("Watchlist is empty: {}", data.message.as_deref().unwrap_or_default());
        return Ok(CompareOutcome::EmptyWatchlist);
    }

    if !status.is_success() {
        error!("Comparison failed with status {}: {:?}", status, data.error);
        return Err(CompareError::Backend(
            data.error
                .filter(|message| !message.is_empty())
                .unwrap_or_else(unknown_error_message),
        ));
    }

    if data.watchlist.is_empty() && data.watched.is_empty() {
        info!("Backend found no candidates for {}", data.username.as_deref().unwrap_or("user"));
    }

    on_stage(LoadingStage::Comparing);
    on_stage(LoadingStage::Preparing);

    info!(
        "Comparison ready: {} watchlist matches, {} logged-film matches",
        data.watchlist.matches.len(),
        data.watched.matches.len()
    );
    Ok(CompareOutcome::Results(data))
}
