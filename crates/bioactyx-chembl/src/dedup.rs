//! Deduplication of search hits by ChEMBL ID.
//!
//! ChEMBL pages over a live result set, so the same molecule can appear on
//! more than one page. Only the first sighting is dispatched.

use std::collections::HashSet;

/// Tracks which ChEMBL IDs have already been dispatched in one run.
#[derive(Debug, Default)]
pub struct SeenIds {
    seen: HashSet<String>,
}

impl SeenIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `chembl_id` and returns `true` if this is its first sighting.
    pub fn first_sighting(&mut self, chembl_id: &str) -> bool {
        if self.seen.contains(chembl_id) {
            return false;
        }
        self.seen.insert(chembl_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
