//! HTTP transport seam.
//!
//! The fetcher talks to the directory endpoint only through [`Transport`],
//! so tests can substitute an in-process fake for the blocking reqwest
//! client used in production.

use reqwest::header::{HeaderValue, IF_MODIFIED_SINCE};
use reqwest::StatusCode;
use tracing::debug;

use crate::config::FetcherConfig;
use crate::error::{DirectoryError, Result};

/// Blocking GET with an optional `If-Modified-Since` header.
pub trait Transport {
    /// Return the body of a 2xx response.
    ///
    /// # Errors
    /// - [`DirectoryError::Transport`] when the request cannot be sent.
    /// - [`DirectoryError::NotModified`] on 304.
    /// - [`DirectoryError::Http`] on any other non-2xx status.
    fn get(&self, url: &str, if_modified_since: Option<&str>) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, if_modified_since: Option<&str>) -> Result<Vec<u8>> {
        (**self).get(url, if_modified_since)
    }
}

/// [`Transport`] backed by `reqwest::blocking::Client`.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a client with the timeouts from `config`.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DirectoryError::Transport {
                url: config.endpoint_url.clone(),
                detail: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, if_modified_since: Option<&str>) -> Result<Vec<u8>> {
        let mut request = self.client.get(url);
        if let Some(since) = if_modified_since {
            let value = HeaderValue::from_str(since).map_err(|e| DirectoryError::Transport {
                url: url.to_string(),
                detail: format!("invalid If-Modified-Since value {since:?}: {e}"),
            })?;
            request = request.header(IF_MODIFIED_SINCE, value);
        }

        let resp = request.send().map_err(|e| DirectoryError::Transport {
            url: url.to_string(),
            detail: e.to_string(),
        })?;

        let status = resp.status();
        debug!(%url, status = status.as_u16(), "directory response");
        check_status(status, url)?;

        let bytes = resp.bytes().map_err(|e| DirectoryError::Transport {
            url: url.to_string(),
            detail: format!("failed to read body: {e}"),
        })?;
        Ok(bytes.to_vec())
    }
}

fn check_status(status: StatusCode, url: &str) -> Result<()> {
    if status == StatusCode::NOT_MODIFIED {
        return Err(DirectoryError::NotModified {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(DirectoryError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(())
}
