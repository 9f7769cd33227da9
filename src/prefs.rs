use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Glyph on the toggle button: offers the opposite theme
    pub fn toggle_glyph(&self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }

    /// Class applied to the report's `<body>`
    pub fn body_class(&self) -> Option<&'static str> {
        match self {
            Theme::Dark => Some("dark-mode"),
            Theme::Light => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => anyhow::bail!("Unknown theme '{}', expected dark or light", other),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Prefs {
    #[serde(default)]
    theme: Option<Theme>,
}

/// Theme preference persisted as `{"theme": "dark"}`
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/freewatch/prefs.json`, or the working directory as a last resort
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("freewatch"))
            .unwrap_or_default()
            .join("prefs.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved theme, or the default when nothing usable is stored
    pub fn load(&self) -> Theme {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Theme::default(),
        };

        match serde_json::from_str::<Prefs>(&content) {
            Ok(prefs) => prefs.theme.unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring unreadable preferences at {}: {}", self.path.display(), e);
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string(&Prefs { theme: Some(theme) })?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to save preferences to {}", self.path.display()))?;

        info!("Theme set to {}", theme);
        Ok(())
    }

    /// Flip the stored theme and persist the result
    pub fn toggle(&self) -> Result<Theme> {
        let theme = self.load().toggled();
        self.save(theme)?;
        Ok(theme)
    }
}
