use std::fs;
use std::path::Path;

use anyhow::Context;
use curator_core::ResultRecord;
use curator_engine::SearchHit;
use serde::Deserialize;

use super::effects::hit_to_record;

/// Either a bare array of results or a saved provider response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordsFile {
    Bare(Vec<SearchHit>),
    Response { results: Vec<SearchHit> },
}

pub fn load_records(path: &Path) -> anyhow::Result<Vec<ResultRecord>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read records {path:?}"))?;
    parse_records(&content).with_context(|| format!("failed to parse records {path:?}"))
}

fn parse_records(content: &str) -> anyhow::Result<Vec<ResultRecord>> {
    let hits = match serde_json::from_str(content)? {
        RecordsFile::Bare(hits) => hits,
        RecordsFile::Response { results } => results,
    };
    Ok(hits.into_iter().map(hit_to_record).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn accepts_bare_arrays_and_wrapped_responses() {
        let bare = parse_records(r#"[{"id": "a", "text": "hello"}]"#).unwrap();
        let wrapped =
            parse_records(r#"{"requestId": "r", "results": [{"id": "a", "text": "hello"}]}"#)
                .unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].text, "hello");
    }

    #[test]
    fn missing_text_becomes_empty() {
        let records = parse_records(r#"[{"id": "a", "publishedDate": "2026-01-01"}]"#).unwrap();
        assert_eq!(records[0].text, "");
        assert_eq!(records[0].published_date.as_deref(), Some("2026-01-01"));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let err = load_records(&temp.path().join("missing.json")).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
