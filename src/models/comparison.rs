use serde::{Deserialize, Serialize};

/// One pairing of a YouTube listing with a Letterboxd film, as returned by `/compare`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub yt_title: String,
    #[serde(default)]
    pub yt_year: Option<i32>,
    pub yt_href: String,
    #[serde(default)]
    pub lb_title: Option<String>,
    #[serde(default)]
    pub lb_year: Option<i32>,
    #[serde(default)]
    pub lb_url: Option<String>,
    /// Set on ambiguous matches.
    #[serde(default)]
    pub note: Option<String>,
    /// Set on near misses.
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub ambiguous_matches: Vec<MatchRecord>,
    #[serde(default)]
    pub near_misses: Vec<MatchRecord>,
}

impl ComparisonResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.ambiguous_matches.is_empty() && self.near_misses.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareRequest {
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareResponse {
    #[serde(default)]
    pub empty_watchlist: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub watchlist: ComparisonResult,
    #[serde(default)]
    pub watched: ComparisonResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_body_deserializes_without_results() {
        let body = r#"{"error": "⚠️ Username not found. Please enter a valid Letterboxd username."}"#;
        let response: CompareResponse = serde_json::from_str(body).unwrap();

        assert!(!response.empty_watchlist);
        assert_eq!(
            response.error.as_deref(),
            Some("⚠️ Username not found. Please enter a valid Letterboxd username.")
        );
        assert!(response.watchlist.is_empty());
        assert!(response.watched.is_empty());
    }

    #[test]
    fn match_records_accept_null_years() {
        let body = r#"{
            "username": "alice",
            "watchlist": {
                "matches": [],
                "ambiguous_matches": [],
                "near_misses": [{
                    "yt_title": "Heat",
                    "yt_year": null,
                    "yt_href": "https://www.youtube.com/watch?v=h",
                    "lb_title": "Heat",
                    "lb_year": 1995,
                    "lb_url": "https://letterboxd.com/film/heat-1995/",
                    "reason": "missing year"
                }]
            },
            "watched": {"matches": [], "ambiguous_matches": [], "near_misses": []}
        }"#;
        let response: CompareResponse = serde_json::from_str(body).unwrap();

        let miss = &response.watchlist.near_misses[0];
        assert_eq!(miss.yt_year, None);
        assert_eq!(miss.lb_year, Some(1995));
        assert_eq!(miss.reason.as_deref(), Some("missing year"));
        assert_eq!(response.username.as_deref(), Some("alice"));
    }
}
