use std::collections::BTreeMap;

use crate::RecordId;

/// Manual per-record selections layered over the classifier's result.
///
/// Kept apart from the engine's selection so re-classifying never discards a
/// choice the user made by hand: an override wins when present, otherwise
/// the engine decides.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionOverrides {
    manual: BTreeMap<RecordId, bool>,
}

impl SelectionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, id: &str, engine_selected: bool) -> bool {
        self.manual.get(id).copied().unwrap_or(engine_selected)
    }

    pub fn is_overridden(&self, id: &str) -> bool {
        self.manual.contains_key(id)
    }

    pub fn set(&mut self, id: impl Into<RecordId>, selected: bool) {
        self.manual.insert(id.into(), selected);
    }

    /// Flip the effective selection of `id` and return the new value.
    pub fn toggle(&mut self, id: &str, engine_selected: bool) -> bool {
        let next = !self.resolve(id, engine_selected);
        self.set(id, next);
        next
    }

    pub fn clear(&mut self) {
        self.manual.clear();
    }

    pub fn len(&self) -> usize {
        self.manual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manual.is_empty()
    }
}
