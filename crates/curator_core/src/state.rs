use chrono::{DateTime, Utc};
use curator_logging::{curator_info, curator_warn};

use crate::view_model::{AppViewModel, RecordRowView};
use crate::words::word_count;
use crate::{
    ClassificationEngine, Mode, RecordId, ResultRecord, RuleDraft, SearchRequest,
    SelectionOverrides,
};

pub type RequestId = u64;

/// Shortest query (in characters, after trimming) worth sending.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching { request_id: RequestId },
    Ready,
    Failed { message: String },
}

/// Advanced search knobs; `None` leaves the provider default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    pub num_results: Option<u32>,
    pub livecrawl: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    engine: ClassificationEngine,
    query: String,
    options: SearchOptions,
    status: SearchStatus,
    next_request_id: RequestId,
    records: Vec<ResultRecord>,
    drafts: Vec<RuleDraft>,
    overrides: SelectionOverrides,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> &ClassificationEngine {
        &self.engine
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn drafts(&self) -> &[RuleDraft] {
        &self.drafts
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.overrides.resolve(id, self.engine.is_selected(id))
    }

    /// Effective selection (overrides applied) in record order.
    pub fn effective_selection(&self) -> Vec<RecordId> {
        self.records
            .iter()
            .filter(|record| self.is_selected(&record.id))
            .map(|record| record.id.clone())
            .collect()
    }

    pub fn view(&self) -> AppViewModel {
        let rows: Vec<RecordRowView> = self
            .records
            .iter()
            .map(|record| RecordRowView {
                id: record.id.clone(),
                title: record.title.clone(),
                url: record.url.clone(),
                published_date: record.published_date.clone(),
                word_count: word_count(&record.text),
                selected: self.is_selected(&record.id),
                overridden: self.overrides.is_overridden(&record.id),
            })
            .collect();
        AppViewModel {
            mode: self.engine.mode(),
            query: self.query.clone(),
            status: self.status.clone(),
            rules: self.drafts.clone(),
            selected_count: rows.iter().filter(|row| row.selected).count(),
            rows,
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_query(&mut self, query: String) {
        if self.query != query {
            self.query = query;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_options(&mut self, options: SearchOptions) {
        if self.options != options {
            self.options = options;
            self.mark_dirty();
        }
    }

    /// Start a search for the current query, or record why it was refused.
    pub(crate) fn begin_search(&mut self) -> Option<(RequestId, SearchRequest)> {
        let query = self.query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.status = SearchStatus::Failed {
                message: format!("query must be at least {MIN_QUERY_CHARS} characters"),
            };
            self.mark_dirty();
            return None;
        }
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let request = SearchRequest {
            query: query.to_string(),
            num_results: self.options.num_results,
            livecrawl: self.options.livecrawl,
        };
        self.status = SearchStatus::Searching { request_id };
        self.mark_dirty();
        curator_info!("search {} started: {:?}", request_id, request.query);
        Some((request_id, request))
    }

    /// Apply a finished search. Results for anything but the latest request
    /// are dropped; returns whether they were applied.
    pub(crate) fn finish_search(
        &mut self,
        request_id: RequestId,
        result: Result<Vec<ResultRecord>, String>,
        now: DateTime<Utc>,
    ) -> bool {
        if self.status != (SearchStatus::Searching { request_id }) {
            curator_warn!("ignoring stale search result {}", request_id);
            return false;
        }
        self.overrides.clear();
        match result {
            Ok(records) => {
                curator_info!("search {} returned {} records", request_id, records.len());
                self.records = records;
                self.status = SearchStatus::Ready;
                if self.engine.mode() == Mode::Programmatic {
                    self.engine.evaluate_at(&self.records, now);
                }
            }
            Err(message) => {
                curator_warn!("search {} failed: {}", request_id, message);
                self.records.clear();
                self.status = SearchStatus::Failed { message };
            }
        }
        self.mark_dirty();
        true
    }

    pub(crate) fn select_mode(&mut self, mode: Mode) {
        if self.engine.mode() != mode {
            curator_info!("classification mode -> {}", mode);
            self.engine.set_mode(mode);
            self.mark_dirty();
        }
    }

    pub(crate) fn drafts_mut(&mut self) -> &mut Vec<RuleDraft> {
        &mut self.drafts
    }

    /// Heuristic mode adopts the edited drafts as its rule set; both modes
    /// then re-classify the current records.
    pub(crate) fn apply_rules(&mut self, now: DateTime<Utc>) {
        if self.engine.mode() == Mode::Heuristic {
            let rules = self.drafts.iter().map(RuleDraft::to_rule).collect();
            self.engine.set_rules(rules);
        }
        self.engine.evaluate_at(&self.records, now);
        self.mark_dirty();
    }

    pub(crate) fn toggle_selection(&mut self, id: &str) -> bool {
        if !self.records.iter().any(|record| record.id == id) {
            return false;
        }
        let engine_selected = self.engine.is_selected(id);
        self.overrides.toggle(id, engine_selected);
        self.mark_dirty();
        true
    }
}
