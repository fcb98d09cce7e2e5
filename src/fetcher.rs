//! The relay directory fetcher.
//!
//! One call to [`RelayDirectoryFetcher::fetch`] runs the whole pipeline:
//!
//! ```text
//! load timestamp → conditional GET → decode + repair → sort → trim platform
//!                → store new timestamp → snapshot
//! ```
//!
//! Any error aborts the run before the timestamp is stored, so the next run
//! sends the same `If-Modified-Since` value as this one did.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::FetcherConfig;
use crate::error::Result;
use crate::relay::DirectorySnapshot;
use crate::state::{http_date, FetchState};
use crate::transport::{HttpTransport, Transport};

pub struct RelayDirectoryFetcher<T = HttpTransport> {
    config: FetcherConfig,
    state: FetchState,
    transport: T,
}

impl RelayDirectoryFetcher<HttpTransport> {
    /// Fetcher using the blocking reqwest transport.
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> RelayDirectoryFetcher<T> {
    pub fn with_transport(config: FetcherConfig, transport: T) -> Self {
        let state = FetchState::new(config.state_file.clone());
        Self {
            config,
            state,
            transport,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Fetch, normalize and sort the directory, stamping the current UTC time.
    pub fn fetch(&self) -> Result<DirectorySnapshot> {
        self.fetch_at(Utc::now())
    }

    /// Same as [`fetch`](Self::fetch), recording `now` as the fetch time.
    ///
    /// The HTTP-date written to the state file is also returned on the
    /// snapshot as [`DirectorySnapshot::fetched_at`].
    pub fn fetch_at(&self, now: DateTime<Utc>) -> Result<DirectorySnapshot> {
        let url = self.config.endpoint_url.as_str();
        let policy = self.config.on_malformed_platform;

        let since = self.state.load()?;
        match &since {
            Some(ts) => debug!(%url, if_modified_since = %ts, %policy, "conditional directory request"),
            None => debug!(
                %url,
                state_file = %self.state.path().display(),
                %policy,
                "no prior fetch time, unconditional request"
            ),
        }

        let body = self.transport.get(url, since.as_deref())?;

        let mut snapshot = DirectorySnapshot::from_json(&body)?;
        snapshot.sort_by_bandwidth();
        snapshot.normalize_platforms(policy)?;

        let stamp = http_date(now);
        self.state.store(&stamp)?;
        info!(
            relays = snapshot.relays.len(),
            fetched_at = %stamp,
            "relay directory fetched"
        );

        snapshot.fetched_at = Some(stamp);
        Ok(snapshot)
    }
}
