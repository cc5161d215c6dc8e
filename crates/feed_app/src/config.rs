use std::fs;
use std::path::Path;
use std::time::Duration;

use feed_core::TriggerPolicy;
use feed_engine::{FetchSettings, DEFAULT_LISTING_URL};
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "feed.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolicySetting {
    #[default]
    Proximity,
    Manual,
}

impl From<PolicySetting> for TriggerPolicy {
    fn from(setting: PolicySetting) -> Self {
        match setting {
            PolicySetting::Proximity => TriggerPolicy::Proximity,
            PolicySetting::Manual => TriggerPolicy::Manual,
        }
    }
}

/// Session configuration. Every field may be omitted from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub policy: PolicySetting,
    pub tag_switch_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
    /// Fixes the avatar/tag draws, e.g. `seed: Some(42)`.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: DEFAULT_LISTING_URL.to_string(),
            policy: PolicySetting::default(),
            tag_switch_delay_ms: feed_core::TAG_SWITCH_DELAY.as_millis() as u64,
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            max_bytes: fetch.max_bytes,
            retry_attempts: fetch.retry_attempts,
            retry_backoff_ms: fetch.retry_backoff.as_millis() as u64,
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
            retry_attempts: self.retry_attempts,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            ..FetchSettings::default()
        }
    }

    pub fn trigger_policy(&self) -> TriggerPolicy {
        self.policy.into()
    }

    pub fn tag_switch_delay(&self) -> Duration {
        Duration::from_millis(self.tag_switch_delay_ms)
    }
}

pub fn parse_config(text: &str) -> Result<AppConfig, ConfigError> {
    Ok(ron::from_str(text)?)
}

/// Loads the config file. A missing file is not an error and yields `Ok(None)`.
pub fn load_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source: err,
            })
        }
    };
    parse_config(&content).map(Some)
}
