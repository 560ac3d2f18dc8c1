//! Content-addressed assets and the bundles they are grouped into.

use serde::{Deserialize, Serialize};

/// Record identifier as it appears in the export
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Synthetic bundle identifier, only stable within one load
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleId(u32);

impl BundleId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BundleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// A distinct asset, with every record that references it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAsset {
    /// Content hash (unique key)
    pub hash: String,

    /// Size in bytes (first occurrence wins)
    pub bytes: u64,

    /// Supplied by the platform rather than the user's own storage
    pub externally_provided: bool,

    /// Referencing records, ascending and unique once deduplication finishes
    pub record_ids: Vec<RecordId>,
}

impl ContentAsset {
    pub fn new(hash: impl Into<String>, bytes: u64, externally_provided: bool) -> Self {
        Self {
            hash: hash.into(),
            bytes,
            externally_provided,
            record_ids: Vec::new(),
        }
    }
}

/// A group of assets sharing the same referencing records and provenance.
///
/// Either referenced by two or more records, or by exactly one record while
/// externally provided. Single-record assets owned by the user are folded
/// into that record's internal assets instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBundle {
    pub id: BundleId,

    /// Sum of member sizes
    pub size: u64,

    /// Member assets, ordered by hash
    pub assets: Vec<ContentAsset>,

    /// Records referencing every member
    pub record_ids: Vec<RecordId>,

    pub externally_provided: bool,
}

impl AssetBundle {
    /// Whether the bundle is referenced by the given record
    pub fn is_referenced_by(&self, id: &RecordId) -> bool {
        self.record_ids.binary_search(id).is_ok()
    }
}

/// Sum the sizes of a list of assets
pub fn total_bytes<'a>(assets: impl IntoIterator<Item = &'a ContentAsset>) -> u64 {
    assets
        .into_iter()
        .map(|a| a.bytes)
        .fold(0, u64::saturating_add)
}
