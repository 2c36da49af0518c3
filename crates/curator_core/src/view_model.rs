use crate::{Mode, RecordId, RuleDraft, SearchStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub mode: Mode,
    pub query: String,
    pub status: SearchStatus,
    pub rules: Vec<RuleDraft>,
    pub rows: Vec<RecordRowView>,
    pub selected_count: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRowView {
    pub id: RecordId,
    pub title: Option<String>,
    pub url: Option<String>,
    pub published_date: Option<String>,
    pub word_count: usize,
    /// Effective selection, manual override included.
    pub selected: bool,
    pub overridden: bool,
}
