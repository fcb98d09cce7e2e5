//! Fetcher configuration.
//!
//! The fetcher never looks settings up on its own; a [`FetcherConfig`] is
//! built by the caller (directly, or from a TOML file) and passed in at
//! construction.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DirectoryError, Result};

pub const DEFAULT_ENDPOINT_URL: &str = "https://onionoo.torproject.org/details";
pub const STATE_FILE_NAME: &str = "timestamp";

/// What to do with a relay whose platform cannot be normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPlatformPolicy {
    /// Fail the whole fetch.
    #[default]
    Abort,
    /// Drop the relay and log a warning.
    Skip,
}

impl std::fmt::Display for MalformedPlatformPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedPlatformPolicy::Abort => write!(f, "abort"),
            MalformedPlatformPolicy::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    /// Details document URL.
    pub endpoint_url: String,
    /// Where the last fetch time is kept between runs.
    pub state_file: PathBuf,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub on_malformed_platform: MalformedPlatformPolicy,
}

impl FetcherConfig {
    /// Create a config with sensible defaults.
    ///
    /// - state_file: `timestamp` next to the running executable
    /// - connect_timeout: 10 s
    /// - request_timeout: 60 s
    /// - on_malformed_platform: abort
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            state_file: default_state_file(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            on_malformed_platform: MalformedPlatformPolicy::Abort,
        }
    }

    /// Parse a TOML document. Keys that are absent keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(s).map_err(|e| DirectoryError::Config {
            detail: e.to_string(),
        })?;
        Ok(file.into_config())
    }

    /// Read and parse a TOML config file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| DirectoryError::Config {
            detail: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = path.into();
        self
    }

    pub fn with_policy(mut self, policy: MalformedPlatformPolicy) -> Self {
        self.on_malformed_platform = policy;
        self
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT_URL)
    }
}

/// `timestamp` in the directory of the running executable, or in the working
/// directory when that cannot be determined.
pub fn default_state_file() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join(STATE_FILE_NAME)
}

// On-disk shape; durations are whole seconds.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    endpoint_url: Option<String>,
    state_file: Option<PathBuf>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    on_malformed_platform: Option<MalformedPlatformPolicy>,
}

impl ConfigFile {
    fn into_config(self) -> FetcherConfig {
        let mut cfg = FetcherConfig::new(
            self.endpoint_url
                .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string()),
        );
        if let Some(path) = self.state_file {
            cfg.state_file = path;
        }
        if let Some(secs) = self.connect_timeout_secs {
            cfg.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.request_timeout_secs {
            cfg.request_timeout = Duration::from_secs(secs);
        }
        if let Some(policy) = self.on_malformed_platform {
            cfg.on_malformed_platform = policy;
        }
        cfg
    }
}
