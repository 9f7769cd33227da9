use once_cell::sync::Lazy;
use url::Url;

use crate::models::VideoId;

/// Host every canonical watch link points at
pub const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

pub static DEFAULT_BASE_URL: Lazy<Url> =
    Lazy::new(|| Url::parse("https://www.youtube.com").expect("Invalid default base URL"));

fn query_v(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Reduce a watch link to `https://www.youtube.com/watch?v=<id>`.
///
/// Relative links are resolved against `base` first. Links without a usable
/// `v` parameter, and links that fail to parse, come back untouched.
pub fn canonicalize_watch_url(raw: &str, base: &Url) -> String {
    match base.join(raw).ok().as_ref().and_then(query_v) {
        Some(id) => format!("{}{}", WATCH_BASE, id),
        None => raw.to_string(),
    }
}

/// Resolve a possibly relative link against the page it was found on
pub fn absolutize(raw: &str, base: &Url) -> String {
    base.join(raw)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Identifier used to de-duplicate listings.
///
/// Watch links are keyed by their `v` parameter; anything else is keyed by the
/// link itself.
pub fn video_id(href: &str) -> VideoId {
    if href.contains("/watch") {
        if let Some(id) = Url::parse(href).ok().as_ref().and_then(query_v) {
            return VideoId(id);
        }
    }
    VideoId(href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_tracking_parameters() {
        let canonical = canonicalize_watch_url(
            "https://www.youtube.com/watch?v=abc123&list=PL1&t=42s&pp=ygU",
            &DEFAULT_BASE_URL,
        );
        assert_eq!(canonical, "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn resolves_relative_links_before_reducing() {
        let canonical = canonicalize_watch_url("/watch?v=def456&pp=sAQA", &DEFAULT_BASE_URL);
        assert_eq!(canonical, "https://www.youtube.com/watch?v=def456");
    }

    #[test]
    fn rewrites_other_hosts_to_canonical_host() {
        let canonical = canonicalize_watch_url("https://m.youtube.com/watch?v=zz9", &DEFAULT_BASE_URL);
        assert_eq!(canonical, "https://www.youtube.com/watch?v=zz9");
    }

    #[test]
    fn passes_through_links_without_v() {
        let raw = "https://www.youtube.com/feed/storefront?bp=EgCSAQ";
        assert_eq!(canonicalize_watch_url(raw, &DEFAULT_BASE_URL), raw);

        let empty_v = "https://www.youtube.com/watch?v=";
        assert_eq!(canonicalize_watch_url(empty_v, &DEFAULT_BASE_URL), empty_v);
    }

    #[test]
    fn unparseable_links_are_returned_unchanged() {
        let raw = "http://[::1";
        assert_eq!(canonicalize_watch_url(raw, &DEFAULT_BASE_URL), raw);
    }

    #[test]
    fn absolutize_resolves_against_page() {
        assert_eq!(
            absolutize("/watch?v=a1&pp=x", &DEFAULT_BASE_URL),
            "https://www.youtube.com/watch?v=a1&pp=x"
        );
        assert_eq!(absolutize("https://example.com/x", &DEFAULT_BASE_URL), "https://example.com/x");
    }

    #[test]
    fn video_id_prefers_v_parameter() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=abc123"),
            VideoId("abc123".to_string())
        );
        assert_eq!(
            video_id("https://www.youtube.com/movie/xyz"),
            VideoId("https://www.youtube.com/movie/xyz".to_string())
        );
        assert_eq!(
            video_id("https://www.youtube.com/watch"),
            VideoId("https://www.youtube.com/watch".to_string())
        );
    }
}
