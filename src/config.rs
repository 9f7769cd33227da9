use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the optional settings file looked up in the working directory
pub const CONFIG_FILE: &str = "freewatch";
pub const ENV_PREFIX: &str = "FREEWATCH";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scrape: ScrapeConfig,
    pub compare: CompareConfig,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub fetch_retries: u32,
    /// Overrides the preferences file under the user config directory
    #[serde(default)]
    pub prefs_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub settle_delay_ms: u64,
    pub stagnant_limit: u32,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    pub endpoint: String,
    /// Columns to fall back on when the terminal size is unknown
    pub fallback_width: u16,
}

impl ScrapeConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Config {
    /// Defaults, then `freewatch.toml` if present, then `FREEWATCH__*` variables
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder()
            .set_default("scrape.base_url", "https://www.youtube.com")?
            .set_default("scrape.settle_delay_ms", 1200_i64)?
            .set_default("scrape.stagnant_limit", 3_i64)?
            .set_default("scrape.output", crate::storage::DEFAULT_EXPORT_PATH)?
            .set_default("compare.endpoint", "http://127.0.0.1:5000")?
            .set_default("compare.fallback_width", 80_i64)?
            .set_default("user_agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36")?
            .set_default("request_timeout_seconds", 25_i64)?
            .set_default("fetch_retries", 3_i64)?;

        builder = match file {
            Some(path) => builder.add_source(::config::File::from(path)),
            None => builder.add_source(::config::File::with_name(CONFIG_FILE).required(false)),
        };

        builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("Failed to assemble configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}
