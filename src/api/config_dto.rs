use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::loader::parser::parse_json_file;

const DEFAULT_RUN_WORKFLOW_TIMEOUT_SECONDS: u64 = 20 * 60;
const DEFAULT_POLL_INTERVAL_MS: u64 = 750;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Connection and timing settings for talking to a RackHD server.
#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct CpiConfig {
    /// Base URL of the RackHD API, e.g. `http://10.0.0.2:8080`.
    pub api_url: String,

    #[serde(default = "default_run_workflow_timeout_seconds")]
    pub run_workflow_timeout_seconds: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_run_workflow_timeout_seconds() -> u64 {
    DEFAULT_RUN_WORKFLOW_TIMEOUT_SECONDS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

impl CpiConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        CpiConfig {
            api_url: api_url.into(),
            run_workflow_timeout_seconds: DEFAULT_RUN_WORKFLOW_TIMEOUT_SECONDS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }

    pub fn load(file_path: &str) -> Result<Self> {
        let config: CpiConfig = parse_json_file(file_path)?;
        config.validate()?;
        log::debug!("Loaded config from '{}' for api server {}", file_path, config.api_url);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(Error::InvalidConfig("api_url must not be empty".to_string()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!("api_url must start with http:// or https://, got {}", self.api_url)));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig("poll_interval_ms must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn run_workflow_timeout(&self) -> Duration {
        Duration::from_secs(self.run_workflow_timeout_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}
