//! # relay-directory
//!
//! Fetches an Onionoo-style relay details document, repairs missing
//! `observed_bandwidth` values, sorts relays by bandwidth (highest first)
//! and trims each `platform` to its base OS name. The time of the last
//! successful fetch is kept in a small side file and sent back as
//! `If-Modified-Since` on the next run.
//!
//! ```rust,ignore
//! let config = FetcherConfig::new("https://onionoo.torproject.org/details");
//! let snapshot = RelayDirectoryFetcher::new(config)?.fetch()?;
//! for relay in &snapshot.relays {
//!     println!("{} {}", relay.platform, relay.observed_bandwidth);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod platform;
pub mod relay;
pub mod state;
pub mod transport;

pub use config::{FetcherConfig, MalformedPlatformPolicy};
pub use error::{DirectoryError, Result};
pub use fetcher::RelayDirectoryFetcher;
pub use relay::{DirectorySnapshot, RelayRecord};
pub use state::FetchState;
pub use transport::{HttpTransport, Transport};
