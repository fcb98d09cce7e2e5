use std::path::PathBuf;

use clap::Parser;

use crate::config::{FetcherConfig, MalformedPlatformPolicy};
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(name = "relay-directory")]
#[command(version)]
#[command(about = "Fetch a relay details directory, normalize platforms and sort by bandwidth")]
pub struct Args {
    /// TOML config file (endpoint_url, state_file, timeouts, on_malformed_platform)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Directory endpoint URL, overrides the config file
    #[arg(long)]
    pub url: Option<String>,

    /// Last-fetch timestamp file, overrides the config file
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Drop relays with unparseable platform strings instead of failing
    #[arg(long)]
    pub skip_malformed: bool,

    /// Write the snapshot JSON here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Pretty-print the snapshot JSON
    #[arg(long)]
    pub pretty: bool,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    /// Resolve the effective config: file (or defaults), then flag overrides.
    pub fn fetcher_config(&self) -> Result<FetcherConfig> {
        let mut cfg = match &self.config {
            Some(path) => FetcherConfig::from_toml_file(path)?,
            None => FetcherConfig::default(),
        };
        if let Some(url) = &self.url {
            cfg.endpoint_url = url.clone();
        }
        if let Some(path) = &self.state_file {
            cfg.state_file = path.clone();
        }
        if self.skip_malformed {
            cfg.on_malformed_platform = MalformedPlatformPolicy::Skip;
        }
        Ok(cfg)
    }
}
