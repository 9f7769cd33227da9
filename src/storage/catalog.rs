use std::collections::HashMap;

use crate::models::{CatalogEntry, VideoId};

/// De-duplicated set of scraped listings, keyed by video identifier.
///
/// The first entry recorded for an identifier is kept; later sightings are ignored.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    seen: HashMap<VideoId, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_seen(&self, id: &VideoId) -> bool {
        self.seen.contains_key(id)
    }

    /// Returns `true` when the identifier was new and the entry was stored.
    pub fn mark_seen(&mut self, id: VideoId, entry: CatalogEntry) -> bool {
        if self.seen.contains_key(&id) {
            return false;
        }
        self.seen.insert(id, entry);
        true
    }

    #[cfg(test)]
    pub fn get(&self, id: &VideoId) -> Option<&CatalogEntry> {
        self.seen.get(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Entries in no particular order
    #[cfg(test)]
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.seen.values()
    }

    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.seen.into_values().collect()
    }
}
