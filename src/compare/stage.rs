use std::fmt;

/// Loading indicator states shown while a comparison is in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadingStage {
    Fetching,
    GettingWatched,
    Processing,
    Comparing,
    Preparing,
    #[default]
    Loading,
}

impl LoadingStage {
    pub fn key(&self) -> &'static str {
        match self {
            LoadingStage::Fetching => "fetching",
            LoadingStage::GettingWatched => "gettingwatched",
            LoadingStage::Processing => "processing",
            LoadingStage::Comparing => "comparing",
            LoadingStage::Preparing => "preparing",
            LoadingStage::Loading => "loading",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LoadingStage::Fetching => "📥 Fetching your Letterboxd watchlist...",
            LoadingStage::GettingWatched => "🎞️ Getting the films you've logged...",
            LoadingStage::Processing => "🔍 Processing your watchlist titles...",
            LoadingStage::Comparing => "⚖️ Comparing your watchlist with YouTube free movies...",
            LoadingStage::Preparing => "📊 Preparing results for display...",
            LoadingStage::Loading => "⏳ Loading...",
        }
    }
}

impl fmt::Display for LoadingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
