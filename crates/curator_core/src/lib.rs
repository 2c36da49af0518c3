//! Curator core: result classification and the pure presentation state machine.
mod classify;
mod dates;
mod effect;
mod msg;
mod record;
mod rule;
mod selection;
mod state;
mod update;
mod view_model;
mod words;

pub use classify::{
    rule_matches, ClassificationEngine, ClassificationState, Mode, PROGRAMMATIC_MAX_AGE_MONTHS,
    PROGRAMMATIC_MIN_WORDS,
};
pub use dates::{months_before, parse_published_date};
pub use effect::{Effect, SearchRequest};
pub use msg::Msg;
pub use record::{RecordId, ResultRecord};
pub use rule::{coerce_number, Operator, Rule, RuleDraft, RuleField};
pub use selection::SelectionOverrides;
pub use state::{AppState, RequestId, SearchOptions, SearchStatus, MIN_QUERY_CHARS};
pub use update::update;
pub use view_model::{AppViewModel, RecordRowView};
pub use words::word_count;
