//! Relay directory data model and the decode → repair → sort → trim steps.
//!
//! Only `platform` and `observed_bandwidth` are interpreted. Every other
//! field, on the relays and at the top level of the document, is carried
//! through untouched so the downstream renderer sees the server's data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::MalformedPlatformPolicy;
use crate::error::{DirectoryError, Result};
use crate::platform::normalize_platform;

/// One relay entry of the details document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayRecord {
    /// Raw on ingest, the base OS token after [`DirectorySnapshot::normalize_platforms`].
    #[serde(default, deserialize_with = "string_or_empty")]
    pub platform: String,
    /// Missing or falsy values are repaired to 0 while decoding.
    #[serde(default, deserialize_with = "repair_bandwidth")]
    pub observed_bandwidth: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RelayRecord {
    /// Relay nickname if the server sent one; used for log context only.
    pub fn nickname(&self) -> Option<&str> {
        self.extra.get("nickname").and_then(Value::as_str)
    }
}

/// The full details document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub relays: Vec<RelayRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// HTTP-date of the fetch that produced this snapshot; set by the fetcher,
    /// never part of the JSON.
    #[serde(skip)]
    pub fetched_at: Option<String>,
}

impl DirectorySnapshot {
    /// Decode a response body, repairing `observed_bandwidth` on the way.
    ///
    /// # Errors
    /// [`DirectoryError::Decode`] when the body is not UTF-8 JSON, has no
    /// `relays` list, or holds a bandwidth that cannot be a non-negative
    /// integer.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(body).map_err(|e| DirectoryError::decode("body", e))?;
        serde_json::from_str(text).map_err(|e| {
            let bad_bandwidth = e.classify() == serde_json::error::Category::Data
                && e.to_string().starts_with(BANDWIDTH_ERROR);
            let field = if bad_bandwidth { "observed_bandwidth" } else { "relays" };
            DirectoryError::decode(field, e)
        })
    }

    /// Stable sort by `observed_bandwidth`, highest first.
    ///
    /// Relays with equal bandwidth keep their server order; later grouping
    /// by the renderer relies on this order being preserved.
    pub fn sort_by_bandwidth(&mut self) {
        self.relays
            .sort_by(|a, b| b.observed_bandwidth.cmp(&a.observed_bandwidth));
    }

    /// Replace every `platform` with its base OS token.
    ///
    /// Under [`MalformedPlatformPolicy::Abort`] the first malformed platform
    /// fails the call and leaves the snapshot unchanged. Under
    /// [`MalformedPlatformPolicy::Skip`] such relays are dropped.
    pub fn normalize_platforms(&mut self, policy: MalformedPlatformPolicy) -> Result<()> {
        let mut normalized = Vec::with_capacity(self.relays.len());
        for (index, relay) in self.relays.iter().enumerate() {
            match normalize_platform(index, &relay.platform) {
                Ok(os) => normalized.push(Some(os)),
                Err(e) if policy == MalformedPlatformPolicy::Skip => {
                    warn!(
                        error = %e,
                        nickname = relay.nickname().unwrap_or("<unnamed>"),
                        "skipping relay with malformed platform"
                    );
                    normalized.push(None);
                }
                Err(e) => return Err(e),
            }
        }

        let relays = std::mem::take(&mut self.relays);
        self.relays = relays
            .into_iter()
            .zip(normalized)
            .filter_map(|(mut relay, os)| {
                relay.platform = os?;
                Some(relay)
            })
            .collect();
        Ok(())
    }
}

// Leads every error raised by `repair_bandwidth`.
const BANDWIDTH_ERROR: &str = "unrepairable observed_bandwidth";

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn repair_bandwidth<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    bandwidth_from_value(&value).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "{BANDWIDTH_ERROR}: expected a non-negative integer, got {value}"
        ))
    })
}

/// Falsy JSON values become 0; anything else must be a non-negative integer.
fn bandwidth_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Null | Value::Bool(false) => Some(0),
        Value::String(s) if s.is_empty() => Some(0),
        Value::Array(a) if a.is_empty() => Some(0),
        Value::Object(o) if o.is_empty() => Some(0),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Some(v);
            }
            let f = n.as_f64()?;
            if f == 0.0 {
                Some(0)
            } else if f > 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
                Some(f as u64)
            } else {
                None
            }
        }
        _ => None,
    }
}
