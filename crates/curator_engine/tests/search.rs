use curator_engine::{ExaSearcher, FailureKind, SearchHit, SearchQuery, SearchSettings, Searcher};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> SearchSettings {
    SearchSettings {
        endpoint: server.uri(),
        api_key: Some("test-key".to_string()),
        ..SearchSettings::default()
    }
}

#[tokio::test]
async fn search_posts_query_and_decodes_results() {
    curator_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", "test-key"))
        .and(body_partial_json(json!({
            "query": "rust async",
            "type": "auto",
            "contents": { "text": true },
            "numResults": 3,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "requestId": "abc",
            "results": [
                {
                    "id": "https://example.com/a",
                    "title": "A",
                    "url": "https://example.com/a",
                    "publishedDate": "2026-09-01T00:00:00.000Z",
                    "author": null,
                    "text": "body a",
                    "score": 0.4
                },
                { "id": "https://example.com/b" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let searcher = ExaSearcher::new(settings_for(&server));
    let query = SearchQuery {
        num_results: Some(3),
        ..SearchQuery::new("rust async")
    };
    let hits = searcher.search(&query).await.expect("search ok");

    assert_eq!(
        hits,
        vec![
            SearchHit {
                id: "https://example.com/a".into(),
                title: Some("A".into()),
                url: Some("https://example.com/a".into()),
                published_date: Some("2026-09-01T00:00:00.000Z".into()),
                text: Some("body a".into()),
                ..SearchHit::default()
            },
            SearchHit {
                id: "https://example.com/b".into(),
                ..SearchHit::default()
            },
        ]
    );
}

#[tokio::test]
async fn livecrawl_flag_is_sent_when_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({ "livecrawl": "always" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let searcher = ExaSearcher::new(settings_for(&server));
    let query = SearchQuery {
        livecrawl: Some(true),
        ..SearchQuery::new("news")
    };
    assert!(searcher.search(&query).await.expect("search ok").is_empty());
}

#[tokio::test]
async fn search_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let searcher = ExaSearcher::new(settings_for(&server));
    let err = searcher
        .search(&SearchQuery::new("rust"))
        .await
        .expect_err("should fail");
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
}

#[tokio::test]
async fn search_fails_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&server)
        .await;

    let searcher = ExaSearcher::new(settings_for(&server));
    let err = searcher
        .search(&SearchQuery::new("rust"))
        .await
        .expect_err("should fail");
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn search_rejects_non_json_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let searcher = ExaSearcher::new(settings_for(&server));
    let err = searcher
        .search(&SearchQuery::new("rust"))
        .await
        .expect_err("should fail");
    assert!(matches!(
        err.kind,
        FailureKind::UnsupportedContentType { .. }
    ));
}

#[tokio::test]
async fn search_enforces_size_limit() {
    let server = MockServer::start().await;
    let body = json!({ "results": [{ "id": "x", "text": "a".repeat(4096) }] });
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let settings = SearchSettings {
        max_bytes: 1024,
        ..settings_for(&server)
    };
    let err = ExaSearcher::new(settings)
        .search(&SearchQuery::new("rust"))
        .await
        .expect_err("should fail");
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 1024, .. }));
}

#[tokio::test]
async fn search_without_api_key_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = SearchSettings {
        api_key: Some("   ".into()),
        ..settings_for(&server)
    };
    let err = ExaSearcher::new(settings)
        .search(&SearchQuery::new("rust"))
        .await
        .expect_err("should fail");
    assert_eq!(err.kind, FailureKind::MissingApiKey);
}

#[tokio::test]
async fn invalid_endpoint_is_reported() {
    let settings = SearchSettings {
        endpoint: "not a url".into(),
        api_key: Some("k".into()),
        ..SearchSettings::default()
    };
    let err = ExaSearcher::new(settings)
        .search(&SearchQuery::new("rust"))
        .await
        .expect_err("should fail");
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
