pub mod links;
pub mod year;

pub use links::*;
pub use year::*;

/// Badge wording that marks a listing as free to watch
pub const FREE_WITH_ADS: &str = "free with ads";

/// Check a badge's visible text plus its aria-label for the "free with ads" wording
pub fn is_free_with_ads(text: &str, aria_label: Option<&str>) -> bool {
    let label = format!("{} {}", text, aria_label.unwrap_or_default()).to_lowercase();
    label.contains(FREE_WITH_ADS)
}
