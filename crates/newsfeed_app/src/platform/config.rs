use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use newsfeed_core::{EscalationPolicy, DEFAULT_PAGE_SIZE};
use newsfeed_engine::{ConnectivityProbe, SourceSettings};
use newsfeed_logging::news_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "newsfeed.ron";
pub const API_KEY_ENV: &str = "NEWSFEED_API_KEY";
const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse configuration {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error(
        "Please set your API key in newsfeed.ron or NEWSFEED_API_KEY. \
         You can get a free API key from gnews.io"
    )]
    MissingApiKey,
    #[error("page_size must be between 1 and 100, got {0}")]
    InvalidPageSize(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Escalation {
    #[default]
    Always,
    AfterConsecutive(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "gnews.io".to_string(),
            port: 443,
            interval_ms: 5_000,
            timeout_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub api_key: String,
    pub base_url: String,
    pub lang: String,
    pub country: String,
    pub page_size: u32,
    pub default_category: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
    pub escalation: Escalation,
    pub connectivity: ConnectivityConfig,
    pub log_level: String,
    pub log_to_file: bool,
}

impl Default for NewsConfig {
    fn default() -> Self {
        let source = SourceSettings::default();
        Self {
            api_key: PLACEHOLDER_API_KEY.to_string(),
            base_url: source.base_url,
            lang: source.lang,
            country: source.country,
            page_size: DEFAULT_PAGE_SIZE,
            default_category: "general".to_string(),
            connect_timeout_ms: duration_ms(source.connect_timeout),
            request_timeout_ms: duration_ms(source.request_timeout),
            max_bytes: source.max_bytes,
            escalation: Escalation::default(),
            connectivity: ConnectivityConfig::default(),
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

impl NewsConfig {
    /// Loads a RON configuration file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                news_info!("No configuration at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// A non-blank environment value replaces the configured key.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|key| !key.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(ConfigError::MissingApiKey);
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }

    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            lang: self.lang.clone(),
            country: self.country.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
        }
    }

    pub fn escalation_policy(&self) -> EscalationPolicy {
        match self.escalation {
            Escalation::Always => EscalationPolicy::Always,
            Escalation::AfterConsecutive(count) => EscalationPolicy::AfterConsecutive(count),
        }
    }

    pub fn probe(&self) -> Option<ConnectivityProbe> {
        let connectivity = &self.connectivity;
        connectivity.enabled.then(|| ConnectivityProbe {
            host: connectivity.host.clone(),
            port: connectivity.port,
            timeout: Duration::from_millis(connectivity.timeout_ms),
            interval: Duration::from_millis(connectivity.interval_ms),
        })
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
