/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed taskview configuration (service URL, timeouts, logging)
[POS]:    Configuration layer - store connection and runtime settings
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use taskview_adapter::ClientConfig;
use url::Url;

use crate::controller::ControllerOptions;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8080/TaskServices/api/services";

/// Top-level configuration for the task board
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskViewConfig {
    /// Base URL of the task store service
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeoutConfig {
    /// Whole-request timeout for the HTTP client
    #[serde(default = "default_request_secs")]
    pub request_secs: u64,
    #[serde(default = "default_connect_secs")]
    pub connect_secs: u64,
    /// Upper bound on a dispatched store operation
    #[serde(default = "default_operation_secs")]
    pub operation_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// TUI log file; defaults to the data dir when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for TaskViewConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            timeouts: TimeoutConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: default_request_secs(),
            connect_secs: default_connect_secs(),
            operation_secs: default_operation_secs(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

fn default_request_secs() -> u64 {
    30
}

fn default_connect_secs() -> u64 {
    10
}

fn default_operation_secs() -> u64 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TaskViewConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    /// `<config dir>/taskview/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskview").join("config.yaml"))
    }

    /// Log file used in TUI mode when none is configured.
    pub fn default_log_file() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("taskview")
            .join("taskview.log")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log.file.clone().unwrap_or_else(Self::default_log_file)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(self.service_url.trim())
            .with_context(|| format!("invalid service_url: {}", self.service_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("service_url must use http or https, got {}", url.scheme());
        }
        let timeouts = &self.timeouts;
        if timeouts.request_secs == 0 || timeouts.connect_secs == 0 || timeouts.operation_secs == 0
        {
            bail!("timeouts must be greater than zero");
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeouts.request_secs),
            connect_timeout: Duration::from_secs(self.timeouts.connect_secs),
        }
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            operation_timeout: Duration::from_secs(self.timeouts.operation_secs),
        }
    }
}
