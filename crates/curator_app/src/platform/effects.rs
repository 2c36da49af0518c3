use std::time::{Duration, Instant};

use chrono::Utc;
use curator_core::{Effect, Msg, RecordId, RequestId, ResultRecord, SearchRequest};
use curator_engine::{EngineEvent, EngineHandle, SearchHit, SearchQuery};
use curator_logging::{curator_info, curator_warn};

/// Where search effects are answered from.
pub enum SearchBackend {
    Live { engine: EngineHandle, timeout: Duration },
    /// Pre-loaded records returned for every search.
    Offline(Vec<ResultRecord>),
}

pub struct EffectRunner {
    backend: SearchBackend,
    generation_requests: Vec<Vec<RecordId>>,
}

impl EffectRunner {
    pub fn new(backend: SearchBackend) -> Self {
        Self {
            backend,
            generation_requests: Vec::new(),
        }
    }

    /// Execute effects, returning the messages they produce.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut msgs = Vec::new();
        for effect in effects {
            match effect {
                Effect::RunSearch {
                    request_id,
                    request,
                } => {
                    curator_info!("RunSearch request_id={} query={:?}", request_id, request.query);
                    let result = self.search(request_id, request);
                    msgs.push(Msg::SearchCompleted {
                        request_id,
                        result,
                        now: Utc::now(),
                    });
                }
                Effect::GenerateArticle { record_ids } => {
                    // Generation itself lives outside this tool; record the hand-off.
                    curator_info!("GenerateArticle from {} records", record_ids.len());
                    self.generation_requests.push(record_ids);
                }
            }
        }
        msgs
    }

    pub fn generation_requests(&self) -> &[Vec<RecordId>] {
        &self.generation_requests
    }

    fn search(
        &self,
        request_id: RequestId,
        request: SearchRequest,
    ) -> Result<Vec<ResultRecord>, String> {
        match &self.backend {
            SearchBackend::Offline(records) => Ok(records.clone()),
            SearchBackend::Live { engine, timeout } => {
                engine.search(request_id, map_request(request));
                wait_for_search(engine, request_id, *timeout)
            }
        }
    }
}

/// Block until `request_id` completes, discarding events for other requests.
fn wait_for_search(
    engine: &EngineHandle,
    request_id: RequestId,
    timeout: Duration,
) -> Result<Vec<ResultRecord>, String> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match engine.recv_timeout(remaining) {
            Some(EngineEvent::SearchCompleted {
                request_id: completed,
                result,
            }) if completed == request_id => {
                return result
                    .map(|hits| hits.into_iter().map(hit_to_record).collect())
                    .map_err(|err| err.to_string());
            }
            Some(EngineEvent::SearchCompleted {
                request_id: completed,
                ..
            }) => {
                curator_warn!(
                    "dropping result of search {} while waiting for {}",
                    completed,
                    request_id
                );
            }
            None => return Err(format!("search timed out after {}s", timeout.as_secs())),
        }
    }
}

fn map_request(request: SearchRequest) -> SearchQuery {
    SearchQuery {
        query: request.query,
        num_results: request.num_results,
        livecrawl: request.livecrawl,
    }
}

pub fn hit_to_record(hit: SearchHit) -> ResultRecord {
    ResultRecord {
        id: hit.id,
        title: hit.title,
        url: hit.url,
        published_date: hit.published_date,
        author: hit.author,
        text: hit.text.unwrap_or_default(),
        image: hit.image,
        favicon: hit.favicon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use curator_engine::{SearchError, Searcher};

    #[test]
    fn offline_backend_answers_searches_and_records_generation() {
        let records = vec![ResultRecord::new("a", "text")];
        let mut runner = EffectRunner::new(SearchBackend::Offline(records.clone()));

        let msgs = runner.run(vec![
            Effect::RunSearch {
                request_id: 3,
                request: SearchRequest {
                    query: "rust".into(),
                    ..SearchRequest::default()
                },
            },
            Effect::GenerateArticle {
                record_ids: vec!["a".into()],
            },
        ]);

        match msgs.as_slice() {
            [Msg::SearchCompleted {
                request_id: 3,
                result: Ok(found),
                ..
            }] => assert_eq!(found, &records),
            other => panic!("unexpected msgs {other:?}"),
        }
        assert_eq!(runner.generation_requests(), &[vec!["a".to_string()]]);
    }

    struct EchoSearcher;

    #[async_trait::async_trait]
    impl Searcher for EchoSearcher {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError> {
            if query.query == "fresh" {
                // Let the earlier search land first.
                std::thread::sleep(Duration::from_millis(100));
            }
            Ok(vec![SearchHit {
                id: query.query.clone(),
                ..SearchHit::default()
            }])
        }
    }

    #[test]
    fn live_backend_ignores_results_for_other_requests() {
        curator_logging::initialize_for_tests();
        let engine = EngineHandle::with_searcher(Arc::new(EchoSearcher)).unwrap();
        engine.search(1, SearchQuery::new("stale"));
        let mut runner = EffectRunner::new(SearchBackend::Live {
            engine,
            timeout: Duration::from_secs(5),
        });

        let msgs = runner.run(vec![Effect::RunSearch {
            request_id: 2,
            request: SearchRequest {
                query: "fresh".into(),
                ..SearchRequest::default()
            },
        }]);

        match msgs.as_slice() {
            [Msg::SearchCompleted {
                request_id: 2,
                result: Ok(found),
                ..
            }] => {
                let ids: Vec<&str> = found.iter().map(|record| record.id.as_str()).collect();
                assert_eq!(ids, ["fresh"]);
            }
            other => panic!("unexpected msgs {other:?}"),
        }
    }

    #[test]
    fn hits_map_onto_records() {
        let record = hit_to_record(SearchHit {
            id: "x".into(),
            title: Some("T".into()),
            ..SearchHit::default()
        });
        assert_eq!(record.id, "x");
        assert_eq!(record.title.as_deref(), Some("T"));
        assert_eq!(record.text, "");
    }
}
