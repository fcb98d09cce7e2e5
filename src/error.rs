//! Crate-level error type.
//!
//! Every failure aborts the whole fetch: no snapshot is produced and the
//! state file is left as it was. Each variant carries enough context to
//! diagnose the failure without inspecting the originating error.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The request could not be sent or the connection failed.
    #[error("Connection failed to {url}: {detail}")]
    Transport { url: String, detail: String },

    /// The endpoint replied with a non-2xx status other than 304.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// The endpoint answered a conditional request with 304.
    #[error("{url} reported the directory as not modified since the last fetch")]
    NotModified { url: String },

    /// The body was not the expected JSON shape.
    #[error("JSON decode error on field '{field}': {detail}")]
    Decode { field: String, detail: String },

    /// A relay's platform string has no `" on "` delimiter or no OS token.
    #[error("malformed platform string for relay #{index}: {platform:?}")]
    MalformedPlatform { index: usize, platform: String },

    /// Reading or writing the fetch state file failed.
    #[error("state file {}: {source}", .path.display())]
    StateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be read or parsed.
    #[error("invalid configuration: {detail}")]
    Config { detail: String },
}

pub type Result<T, E = DirectoryError> = std::result::Result<T, E>;

impl DirectoryError {
    pub(crate) fn decode(field: impl Into<String>, detail: impl ToString) -> Self {
        DirectoryError::Decode {
            field: field.into(),
            detail: detail.to_string(),
        }
    }

    pub(crate) fn state_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DirectoryError::StateIo {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http_includes_status_and_url() {
        let err = DirectoryError::Http {
            status: 503,
            url: "https://onionoo.example/details".to_string(),
        };
        let s = err.to_string();
        assert!(s.contains("503"), "expected status in display: {s}");
        assert!(s.contains("https://onionoo.example/details"), "expected url: {s}");
    }

    #[test]
    fn display_malformed_platform_quotes_raw_value() {
        let err = DirectoryError::MalformedPlatform {
            index: 3,
            platform: "Linux".to_string(),
        };
        let s = err.to_string();
        assert!(s.contains("#3"), "index in display: {s}");
        assert!(s.contains("\"Linux\""), "raw platform in display: {s}");
    }

    #[test]
    fn display_state_io_names_path() {
        let err = DirectoryError::state_io(
            "/var/lib/relays/timestamp",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let s = err.to_string();
        assert!(s.contains("/var/lib/relays/timestamp"), "path in display: {s}");
        assert!(s.contains("denied"), "source in display: {s}");
    }

    #[test]
    fn state_io_exposes_source() {
        use std::error::Error as _;
        let err = DirectoryError::state_io(
            "timestamp",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn decode_helper_stringifies_detail() {
        let err = DirectoryError::decode("relays", "missing field `relays`");
        match err {
            DirectoryError::Decode { field, detail } => {
                assert_eq!(field, "relays");
                assert_eq!(detail, "missing field `relays`");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
