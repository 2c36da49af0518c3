use std::time::Duration;

use curator_logging::{curator_debug, curator_info};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::{FailureKind, SearchError, SearchHit, SearchQuery};

pub const DEFAULT_ENDPOINT: &str = "https://api.exa.ai";

#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Base URL; `/search` is appended.
    pub endpoint: String,
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError>;
}

/// Search-and-contents client for the Exa API.
#[derive(Debug, Clone)]
pub struct ExaSearcher {
    settings: SearchSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaRequest<'a> {
    query: &'a str,
    #[serde(rename = "type")]
    search_type: &'static str,
    contents: ExaContents,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    livecrawl: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct ExaContents {
    text: bool,
}

#[derive(Debug, Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

impl ExaSearcher {
    pub fn new(settings: SearchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, SearchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SearchError::new(FailureKind::Network, err.to_string()))
    }

    fn search_url(&self) -> Result<reqwest::Url, SearchError> {
        let base = self.settings.endpoint.trim_end_matches('/');
        reqwest::Url::parse(&format!("{base}/search"))
            .map_err(|err| SearchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn encode_request(query: &SearchQuery) -> Result<Vec<u8>, SearchError> {
        let request = ExaRequest {
            query: &query.query,
            search_type: "auto",
            contents: ExaContents { text: true },
            num_results: query.num_results,
            livecrawl: query
                .livecrawl
                .map(|enabled| if enabled { "always" } else { "never" }),
        };
        serde_json::to_vec(&request)
            .map_err(|err| SearchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Searcher for ExaSearcher {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SearchError::new(FailureKind::MissingApiKey, "no api key configured"))?;
        let url = self.search_url()?;
        let body = Self::encode_request(query)?;
        let client = self.build_client()?;

        curator_debug!("POST {} query={:?}", url, query.query);
        let response = client
            .post(url)
            .header("x-api-key", api_key)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(SearchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        if let Some(ct) = content_type.as_deref() {
            if !is_json_content_type(ct) {
                return Err(SearchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(SearchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded: ExaResponse = serde_json::from_slice(&bytes)
            .map_err(|err| SearchError::new(FailureKind::Decode, err.to_string()))?;
        curator_info!(
            "search {:?} returned {} results ({} bytes)",
            query.query,
            decoded.results.len(),
            bytes.len()
        );
        Ok(decoded.results)
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let ct = content_type.split(';').next().unwrap_or(content_type).trim();
    ct.eq_ignore_ascii_case("application/json")
}

fn map_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        return SearchError::new(FailureKind::Timeout, err.to_string());
    }
    SearchError::new(FailureKind::Network, err.to_string())
}
