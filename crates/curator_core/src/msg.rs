use chrono::{DateTime, Utc};

use crate::{Mode, RequestId, ResultRecord, RuleDraft, SearchOptions};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the search query.
    QueryChanged(String),
    /// User changed the advanced search options.
    SearchOptionsChanged(SearchOptions),
    /// User submitted the current query.
    SearchSubmitted,
    /// Search collaborator finished; `now` anchors relative dates.
    SearchCompleted {
        request_id: RequestId,
        result: Result<Vec<ResultRecord>, String>,
        now: DateTime<Utc>,
    },
    /// User switched classification mode.
    ModeSelected(Mode),
    /// User added a blank rule.
    RuleAdded,
    RuleFieldChanged { index: usize, field: String },
    RuleOperatorChanged { index: usize, operator: String },
    RuleValueChanged { index: usize, value: String },
    RuleDeleted { index: usize },
    /// Restore rule drafts from configuration.
    RuleDraftsRestored(Vec<RuleDraft>),
    /// User asked to (re)classify the current results.
    ApplyClicked { now: DateTime<Utc> },
    /// User flipped the selection of one result by hand.
    SelectionToggled(String),
    /// User asked to generate an article from the selection.
    GenerateClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
