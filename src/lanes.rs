// src/lanes.rs
use crate::errors::ValidationError;
use crate::feed::FeedId;

pub const DEFAULT_LANES: [&str; 2] = ["learnprogramming", "javascript"];

/// Ordered, duplicate-free list of feeds. Index 0 is displayed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneList {
    ids: Vec<FeedId>,
}

impl LaneList {
    /// Builds a list, dropping later case-insensitive duplicates.
    pub fn new(ids: Vec<FeedId>) -> Self {
        let mut unique: Vec<FeedId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self { ids: unique }
    }

    pub fn default_lanes() -> Self {
        let ids = DEFAULT_LANES
            .iter()
            .filter_map(|name| FeedId::parse(name).ok())
            .collect();
        Self::new(ids)
    }

    pub fn contains(&self, id: &FeedId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[FeedId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the list with `id` inserted at the front.
    pub fn prepend(&self, id: FeedId) -> Result<LaneList, ValidationError> {
        if self.contains(&id) {
            return Err(ValidationError::Duplicate(id.to_string()));
        }
        let mut ids = Vec::with_capacity(self.ids.len() + 1);
        ids.push(id);
        ids.extend(self.ids.iter().cloned());
        Ok(LaneList { ids })
    }

    /// Returns the list without the entry matching `id`.
    pub fn remove(&self, id: &FeedId) -> LaneList {
        let ids = self.ids.iter().filter(|existing| *existing != id).cloned().collect();
        LaneList { ids }
    }
}

impl Default for LaneList {
    fn default() -> Self {
        Self::default_lanes()
    }
}
