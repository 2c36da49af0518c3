use crate::{RecordId, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RunSearch { request_id: RequestId, request: SearchRequest },
    /// Hand the chosen records, in display order, to article generation.
    GenerateArticle { record_ids: Vec<RecordId> },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchRequest {
    pub query: String,
    pub num_results: Option<u32>,
    pub livecrawl: Option<bool>,
}
