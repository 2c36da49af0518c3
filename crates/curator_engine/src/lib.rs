//! Curator engine: search collaborator and background effect execution.
mod engine;
mod search;
mod types;

pub use engine::{EngineError, EngineHandle};
pub use search::{ExaSearcher, SearchSettings, Searcher, DEFAULT_ENDPOINT};
pub use types::{EngineEvent, FailureKind, RequestId, SearchError, SearchHit, SearchQuery};
