use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use curator_core::{Mode, RuleDraft, SearchOptions};
use curator_engine::{SearchSettings, DEFAULT_ENDPOINT};
use curator_logging::{curator_info, curator_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize config: {0}")]
    Serialize(String),
    #[error("failed to write config {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CuratorConfig {
    pub mode: Mode,
    pub rules: Vec<RuleDraft>,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    /// Environment variable holding the provider API key.
    pub api_key_env: String,
    pub num_results: Option<u32>,
    pub livecrawl: Option<bool>,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: "EXA_API_KEY".to_string(),
            num_results: None,
            livecrawl: None,
            timeout_secs: 60,
        }
    }
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            num_results: self.num_results,
            livecrawl: self.livecrawl,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Engine settings, reading the API key from the configured variable.
    pub fn settings(&self) -> SearchSettings {
        let api_key = std::env::var(&self.api_key_env).ok();
        if api_key.is_none() {
            curator_warn!("{} is not set; searches will fail", self.api_key_env);
        }
        SearchSettings {
            endpoint: self.endpoint.clone(),
            api_key,
            request_timeout: self.timeout(),
            ..SearchSettings::default()
        }
    }
}

/// Load configuration; a missing file yields defaults.
pub fn load(path: &Path) -> Result<CuratorConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            curator_info!("No config at {:?}; using defaults", path);
            return Ok(CuratorConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: CuratorConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    curator_info!(
        "Loaded config from {:?}: mode={} rules={}",
        path,
        config.mode,
        config.rules.len()
    );
    Ok(config)
}

pub fn save(path: &Path, config: &CuratorConfig) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(config, pretty)
        .map_err(|err| ConfigError::Serialize(err.to_string()))?;
    fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    curator_info!("Saved config to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, CuratorConfig::default());
        assert_eq!(config.mode, Mode::Programmatic);
        assert_eq!(config.search.api_key_env, "EXA_API_KEY");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("curator.ron");
        fs::write(
            &path,
            r#"(
                mode: heuristic,
                rules: [
                    (field: "text", operator: "contains", value: "AI"),
                    (field: "wordCount", operator: ">="),
                ],
            )"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.mode, Mode::Heuristic);
        assert_eq!(
            config.rules,
            vec![
                RuleDraft::new("text", "contains", "AI"),
                RuleDraft::new("wordCount", ">=", ""),
            ]
        );
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("curator.ron");
        fs::write(&path, "(mode: sideways)").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn saved_config_loads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("curator.ron");
        let config = CuratorConfig {
            mode: Mode::Heuristic,
            rules: vec![RuleDraft::new("publishedDate", ">", "3")],
            search: SearchConfig {
                num_results: Some(20),
                ..SearchConfig::default()
            },
        };
        save(&path, &config).unwrap();
        assert_eq!(load(&path).unwrap(), config);
    }

    #[test]
    fn options_and_timeout_follow_search_section() {
        let search = SearchConfig {
            num_results: Some(4),
            livecrawl: Some(false),
            timeout_secs: 0,
            ..SearchConfig::default()
        };
        assert_eq!(
            search.options(),
            SearchOptions {
                num_results: Some(4),
                livecrawl: Some(false),
            }
        );
        assert_eq!(search.timeout(), Duration::from_secs(1));
    }
}
