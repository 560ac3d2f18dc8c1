//! Raw inventory export shape.
//!
//! These types mirror one element of the exported JSON array. They are
//! consumed once during load and never kept afterwards.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// A single asset entry embedded in a raw record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAsset {
    /// Content hash
    pub hash: String,

    /// Size in bytes, taken as-is; anything non-numeric counts as zero
    #[serde(default, deserialize_with = "lenient_bytes")]
    pub bytes: u64,
}

/// A single record of the export, before normalization
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub id: String,

    pub asset_uri: String,

    pub name: String,

    /// Kind tag; validated by the normalizer, not here
    pub record_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_name: String,

    /// Backslash-delimited inventory path
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,

    #[serde(default)]
    pub thumbnail_uri: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_public: bool,

    pub creation_time: String,

    #[serde(default)]
    pub last_modification_time: Option<String>,

    pub asset_manifest: Vec<RawAsset>,
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept any JSON number (or numeric string) as a byte count.
///
/// Fractions are truncated and negatives clamp to zero. Values that are not
/// numbers at all (null, garbage strings, objects) count as zero.
fn lenient_bytes<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Bytes {
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let value = match Bytes::deserialize(deserializer)? {
        Bytes::Unsigned(n) => n,
        Bytes::Signed(n) => n.max(0) as u64,
        Bytes::Float(f) => f.max(0.0) as u64,
        Bytes::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| f.max(0.0) as u64)
            .unwrap_or(0),
        Bytes::Other(_) => 0,
    };

    Ok(value)
}
