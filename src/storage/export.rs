use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::models::CatalogEntry;

pub const DEFAULT_EXPORT_PATH: &str = "youtube_free_with_ads.json";

const TITLE_WIDTH: usize = 40;

/// Write entries as a pretty-printed JSON array
pub fn write_json(path: &Path, entries: &[CatalogEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    info!("Exported {} entries to {}", entries.len(), path.display());
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Vec<CatalogEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read export from {}", path.display()))?;
    let entries = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid catalog export", path.display()))?;
    Ok(entries)
}

/// Newest first; entries without a year go last, ties keep their order
pub fn sort_by_year_desc(entries: &mut [CatalogEntry]) {
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.year.unwrap_or(0)));
}

/// Fixed-width table for eyeballing an export in the terminal
pub fn preview_table(entries: &[CatalogEntry]) -> String {
    let mut out = format!("{:<5} {:<w$} {:<6} {}\n", "#", "title", "year", "href", w = TITLE_WIDTH);

    for (index, entry) in entries.iter().enumerate() {
        let title: String = if entry.title.chars().count() > TITLE_WIDTH {
            let mut cut: String = entry.title.chars().take(TITLE_WIDTH - 1).collect();
            cut.push('…');
            cut
        } else {
            entry.title.clone()
        };
        let year = entry.year.map(|y| y.to_string()).unwrap_or_default();

        out.push_str(&format!(
            "{:<5} {:<w$} {:<6} {}\n",
            index,
            title,
            year,
            entry.href,
            w = TITLE_WIDTH
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(title: &str, year: Option<i32>) -> CatalogEntry {
        CatalogEntry {
            title: title.to_string(),
            year,
            href: format!("https://www.youtube.com/watch?v={}", title.to_lowercase()),
        }
    }

    #[test]
    fn sort_puts_missing_years_last_and_is_stable() {
        let mut entries = vec![
            entry("Unknown", None),
            entry("Older", Some(1984)),
            entry("Newer", Some(2012)),
            entry("AlsoNewer", Some(2012)),
        ];

        sort_by_year_desc(&mut entries);

        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "AlsoNewer", "Older", "Unknown"]);
    }

    #[test]
    fn export_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_PATH);
        let entries = vec![entry("Heat", Some(1995)), entry("Ronin", None)];

        write_json(&path, &entries).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {"));
        assert!(raw.contains("\"year\": null"));
        assert_eq!(read_json(&path).unwrap(), entries);
    }

    #[test]
    fn reading_garbage_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn preview_truncates_long_titles() {
        let long = "A".repeat(60);
        let table = preview_table(&[entry(&long, Some(2001))]);
        let row = table.lines().nth(1).unwrap();

        assert!(row.starts_with("0 "));
        assert!(row.contains('…'));
        assert!(row.contains("2001"));
        assert!(!row.contains(&long));
    }
}
