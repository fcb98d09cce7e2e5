//! Last-fetch timestamp persisted between runs.
//!
//! A single slot: the file holds exactly one HTTP-date string, read whole on
//! load and overwritten whole on store. There is no locking; two runs sharing
//! a state file can race.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{DirectoryError, Result};

/// `Weekday, DD Mon YYYY HH:MM:SS GMT`, always in UTC.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a UTC instant as an HTTP-date.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP-date produced by [`http_date`].
pub fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone)]
pub struct FetchState {
    path: PathBuf,
}

impl FetchState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored timestamp, verbatim, or `None` on a first run.
    ///
    /// # Errors
    /// [`DirectoryError::StateIo`] for any failure other than the file not
    /// existing.
    pub fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DirectoryError::state_io(&self.path, e)),
        }
    }

    /// Overwrite the file with `timestamp`.
    pub fn store(&self, timestamp: &str) -> Result<()> {
        std::fs::write(&self.path, timestamp).map_err(|e| DirectoryError::state_io(&self.path, e))
    }
}
