use crate::models::{
    CompareResponse, ComparisonResult, MatchRecord, EMOJI_CHECK, EMOJI_MAILBOX, EMOJI_QUESTION,
    EMOJI_WARNING,
};

pub const STOREFRONT_URL: &str = "https://www.youtube.com/feed/storefront/";
pub const AMBIGUOUS_HINT: &str =
    "Example: Red Eye (2005) — horror on a train vs. Red Eye — thriller on a plane";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsectionKind {
    Matches,
    Ambiguous,
    NearMisses,
}

impl SubsectionKind {
    pub fn marker(&self) -> &'static str {
        match self {
            SubsectionKind::Matches => EMOJI_CHECK,
            SubsectionKind::Ambiguous => EMOJI_WARNING,
            SubsectionKind::NearMisses => EMOJI_QUESTION,
        }
    }

    /// Count-qualified header; singular only for exactly one
    pub fn header(&self, count: usize) -> String {
        let one = count == 1;
        match self {
            SubsectionKind::Matches => format!(
                "{} {} free on YouTube",
                count,
                if one { "match" } else { "matches" }
            ),
            SubsectionKind::Ambiguous => format!(
                "{} ambiguous {}",
                count,
                if one { "match" } else { "matches" }
            ),
            SubsectionKind::NearMisses => format!(
                "{} near {}",
                count,
                if one { "miss" } else { "misses" }
            ),
        }
    }
}

/// One rendered list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    /// `Title (Year)`
    pub label: String,
    pub youtube_href: String,
    pub letterboxd_url: Option<String>,
    /// Note or reason shown in brackets
    pub annotation: Option<String>,
}

impl EntryView {
    fn from_record(record: &MatchRecord, kind: SubsectionKind) -> Self {
        let label = match (record.yt_year, kind) {
            (Some(year), _) => format!("{} ({})", record.yt_title, year),
            (None, SubsectionKind::NearMisses) => format!("{} (?)", record.yt_title),
            (None, _) => record.yt_title.clone(),
        };
        let annotation = match kind {
            SubsectionKind::Matches => None,
            SubsectionKind::Ambiguous => record.note.clone(),
            SubsectionKind::NearMisses => record.reason.clone().or_else(|| letterboxd_label(record)),
        };

        Self {
            label,
            youtube_href: record.yt_href.clone(),
            letterboxd_url: record.lb_url.clone().filter(|url| !url.is_empty()),
            annotation,
        }
    }

    /// `Red Eye (2005) — YouTube | Letterboxd [note]`
    pub fn display_text(&self) -> String {
        let mut text = format!("{} — YouTube", self.label);
        if self.letterboxd_url.is_some() {
            text.push_str(" | Letterboxd");
        }
        if let Some(annotation) = &self.annotation {
            text.push_str(&format!(" [{}]", annotation));
        }
        text
    }

    /// Plain-text line for the copy action
    pub fn copy_line(&self) -> String {
        format!("{} — {}", self.label, self.youtube_href)
    }
}

/// What Letterboxd calls the film, for near misses the backend gave no reason for
fn letterboxd_label(record: &MatchRecord) -> Option<String> {
    let title = record.lb_title.as_deref()?;
    Some(match record.lb_year {
        Some(year) => format!("Letterboxd: {} ({})", title, year),
        None => format!("Letterboxd: {}", title),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsectionView {
    pub kind: SubsectionKind,
    pub header: String,
    pub hint: Option<&'static str>,
    pub entries: Vec<EntryView>,
    /// Present on match lists only
    pub copy_text: Option<String>,
}

impl SubsectionView {
    fn build(kind: SubsectionKind, records: &[MatchRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let entries: Vec<EntryView> = records
            .iter()
            .map(|record| EntryView::from_record(record, kind))
            .collect();
        let copy_text = (kind == SubsectionKind::Matches).then(|| {
            entries
                .iter()
                .map(EntryView::copy_line)
                .collect::<Vec<_>>()
                .join("\n")
        });

        Some(Self {
            kind,
            header: kind.header(records.len()),
            hint: (kind == SubsectionKind::Ambiguous).then_some(AMBIGUOUS_HINT),
            entries,
            copy_text,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub title: &'static str,
    pub subsections: Vec<SubsectionView>,
}

impl SectionView {
    fn build(title: &'static str, result: &ComparisonResult) -> Self {
        let subsections = [
            (SubsectionKind::Matches, &result.matches),
            (SubsectionKind::Ambiguous, &result.ambiguous_matches),
            (SubsectionKind::NearMisses, &result.near_misses),
        ]
        .into_iter()
        .filter_map(|(kind, records)| SubsectionView::build(kind, records))
        .collect();

        Self { title, subsections }
    }

    pub fn match_count(&self) -> usize {
        self.subsections
            .iter()
            .filter(|s| s.kind == SubsectionKind::Matches)
            .map(|s| s.entries.len())
            .sum()
    }
}

/// Everything the user sees after a successful comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub username: Option<String>,
    pub sections: Vec<SectionView>,
    pub no_matches: bool,
}

impl ResultsView {
    pub fn build(response: &CompareResponse) -> Self {
        let sections = vec![
            SectionView::build("From your watchlist", &response.watchlist),
            SectionView::build("From films you've logged", &response.watched),
        ];
        let no_matches = sections.iter().all(|s| s.match_count() == 0);

        Self {
            username: response.username.clone(),
            sections,
            no_matches,
        }
    }

    /// Every subsection header, in render order
    #[cfg(test)]
    pub fn headers(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.subsections.iter().map(|sub| sub.header.as_str()))
            .collect()
    }

    /// Copy text for all matches across both sections
    pub fn copy_text(&self) -> Option<String> {
        let blocks: Vec<&str> = self
            .sections
            .iter()
            .flat_map(|s| s.subsections.iter().filter_map(|sub| sub.copy_text.as_deref()))
            .collect();
        (!blocks.is_empty()).then(|| blocks.join("\n"))
    }
}

pub fn no_matches_message() -> String {
    format!(
        "{} No matches found! Check out the selection of free movies on YouTube ({}) or add more films on Letterboxd ({}).",
        EMOJI_MAILBOX,
        STOREFRONT_URL,
        super::LETTERBOXD_URL
    )
}

/// Terminal rendering of the results
pub fn render_text(view: &ResultsView) -> String {
    let mut out = String::new();

    if let Some(username) = &view.username {
        out.push_str(&format!("Results for {}\n\n", username));
    }

    if view.no_matches {
        out.push_str(&no_matches_message());
        out.push_str("\n\n");
    }

    for section in &view.sections {
        if section.subsections.is_empty() {
            continue;
        }
        out.push_str(&format!("== {} ==\n", section.title));

        for sub in &section.subsections {
            out.push_str(&format!("\n{} {}\n", sub.kind.marker(), sub.header));
            if let Some(hint) = sub.hint {
                out.push_str(&format!("  {}\n", hint));
            }
            for entry in &sub.entries {
                out.push_str(&format!("  • {}\n", entry.display_text()));
                out.push_str(&format!("      {}\n", entry.youtube_href));
                if let Some(url) = &entry.letterboxd_url {
                    out.push_str(&format!("      {}\n", url));
                }
            }
        }
        out.push('\n');
    }

    out
}
