use serde::Serialize;
use std::time::Duration;
use tracing::warn;

// region:        --- Constants

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

// timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 10;

// 5 MiB is far above any search result page
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

// endregion:     --- Constants

// region:        --- Search engine

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SearchEngine {
    #[default]
    Google,
    Bing,
    DuckDuckGo,
}

impl SearchEngine {
    /// Unknown names fall back to Google.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "google" => Self::Google,
            "bing" => Self::Bing,
            "duckduckgo" => Self::DuckDuckGo,
            other => {
                warn!("Unknown search engine {:?}, using Google", other);
                Self::Google
            }
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Google => "https://www.google.com/search",
            Self::Bing => "https://www.bing.com/search",
            Self::DuckDuckGo => "https://duckduckgo.com/html",
        }
    }
}

// endregion:     --- Search engine

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// region:        --- Config

/// Run configuration, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub sites: Vec<String>,
    pub dork: String,
    pub pages: usize,
    pub threads: usize,
    pub user_agent: String,
    pub engine: SearchEngine,
    pub timeout: Duration,
    pub max_body_bytes: usize,
    pub output: OutputFormat,
}

impl Config {
    pub fn new(sites: &str, dork: &str, pages: usize, threads: usize) -> Self {
        Self {
            sites: Self::parse_sites(sites),
            dork: dork.to_string(),
            pages,
            threads,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            engine: SearchEngine::default(),
            timeout: Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS),
            max_body_bytes: MAX_BODY_BYTES,
            output: OutputFormat::default(),
        }
    }

    /// Split a comma separated list of domains, empty entries are dropped.
    pub fn parse_sites(raw: &str) -> Vec<String> {
        raw.trim()
            .split(',')
            .map(|site| site.trim())
            .filter(|site| !site.is_empty())
            .map(|site| site.to_string())
            .collect()
    }
}

// endregion:     --- Config
