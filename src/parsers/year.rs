use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)(19|20)[0-9]{2}(?-u:\b)")
        .expect("Invalid year regex")
});

/// First standalone 19xx/20xx token in the text, if any
pub fn extract_year(text: &str) -> Option<i32> {
    YEAR_REGEX
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}
