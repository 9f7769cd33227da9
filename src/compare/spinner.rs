use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::animator::{Extent, MarqueeFrame, BORDER_TICK};
use crate::compare::LoadingStage;

/// Terminal cells taken by one bulb glyph
const BULB_CELL: Extent = Extent { width: 2, height: 1 };
const DONE_TICK: &str = "🎬";

/// Marquee rows for each tick, sized to `columns`, with room left for the message
pub fn marquee_ticks(columns: u16) -> Vec<String> {
    let viewport = Extent {
        width: u32::from(columns) / 2,
        height: BULB_CELL.height,
    };

    (0..2)
        .map(|tick| MarqueeFrame::measure(tick, viewport, BULB_CELL).top.concat())
        .chain(std::iter::once(DONE_TICK.to_string()))
        .collect()
}

/// Loading indicator that flips a marquee border every half second
pub struct StageSpinner {
    bar: ProgressBar,
}

impl StageSpinner {
    pub fn start(columns: u16) -> Result<Self> {
        let ticks = marquee_ticks(columns);
        let ticks: Vec<&str> = ticks.iter().map(String::as_str).collect();

        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner} {msg}")?.tick_strings(&ticks));
        bar.set_message(LoadingStage::default().message());
        bar.enable_steady_tick(BORDER_TICK);

        Ok(Self { bar })
    }

    pub fn set_stage(&self, stage: LoadingStage) {
        debug!("Loading stage: {}", stage.key());
        self.bar.set_message(stage.message());
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

/// Current terminal width, or `fallback` when it cannot be read
pub fn terminal_columns(fallback: u16) -> u16 {
    crossterm::terminal::size()
        .map(|(columns, _)| columns)
        .unwrap_or(fallback)
}
