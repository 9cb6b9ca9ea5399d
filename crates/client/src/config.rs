//! Client configuration from the environment.

use std::path::PathBuf;

use quizdesk_observability::LogFormat;

use crate::store::default_store_path;

pub const API_URL_VAR: &str = "QUIZDESK_API_URL";
pub const SITE_TITLE_VAR: &str = "QUIZDESK_SITE_TITLE";
pub const STORE_PATH_VAR: &str = "QUIZDESK_STORE_PATH";
pub const LOG_FORMAT_VAR: &str = "QUIZDESK_LOG_FORMAT";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_SITE_TITLE: &str = "Quizdesk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub site_title: String,
    pub store_path: PathBuf,
    pub log_format: LogFormat,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let store_path = match get(STORE_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_store_path()?,
        };

        Ok(Self {
            api_url: get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            site_title: get(SITE_TITLE_VAR).unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string()),
            store_path,
            log_format: get(LOG_FORMAT_VAR)
                .map(|raw| LogFormat::parse(&raw))
                .unwrap_or_default(),
        })
    }
}
