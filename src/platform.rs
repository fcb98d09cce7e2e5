//! Platform string normalization.
//!
//! Relay descriptors report platforms as e.g. `"Tor 0.4.8.9 on Linux"` or
//! `"Tor 0.4.1.5 on GNU/Linux"`. Downstream grouping only cares about the base
//! operating system, so the version prefix and any `vendor/` qualifier are
//! dropped: both examples become `"Linux"`.

use crate::error::{DirectoryError, Result};

const DELIMITER: &str = " on ";

/// Extract the base OS token from a raw platform string.
///
/// Returns `None` when the string has no `" on "` delimiter or when nothing
/// usable follows it.
pub fn base_os(raw: &str) -> Option<&str> {
    let (_, rest) = raw.split_once(DELIMITER)?;
    let token = rest.split_whitespace().next()?;
    let os = token.rsplit('/').next().unwrap_or(token);
    if os.is_empty() {
        None
    } else {
        Some(os)
    }
}

/// Normalize the platform of the relay at `index`.
///
/// # Errors
/// [`DirectoryError::MalformedPlatform`] when [`base_os`] finds no OS token.
pub fn normalize_platform(index: usize, raw: &str) -> Result<String> {
    base_os(raw)
        .map(str::to_owned)
        .ok_or_else(|| DirectoryError::MalformedPlatform {
            index,
            platform: raw.to_owned(),
        })
}
