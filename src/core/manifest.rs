//! The normalized manifest and the pipeline that builds it.
//!
//! ```text
//! raw text → parse → deduplicate → classify → normalize → ManifestModel
//! ```
//!
//! The pipeline is a pure batch function of its input: any failure aborts
//! the whole build and no partial model is ever produced.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::ProvidedAssets;
use crate::domain::{AssetBundle, BundleId, RawRecord, Record, RecordId};

use super::bundle::classify_assets;
use super::dedup::deduplicate_assets;
use super::normalize::normalize_record;

/// Errors that abort a manifest load
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The text is not a JSON array
    #[error("Invalid manifest JSON: {0}")]
    Parse(String),

    /// A record has the wrong shape, an unknown kind or a duplicate id
    #[error("Malformed record #{index} ({id}): {reason}")]
    MalformedRecord {
        index: usize,
        id: String,
        reason: String,
    },

    /// The manifest text could not be read
    #[error("Failed to read manifest: {0}")]
    Source(String),
}

impl LoadError {
    fn malformed(index: usize, id: Option<&str>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            index,
            id: id.unwrap_or("?").to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Normalized, deduplicated inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestModel {
    pub records: BTreeMap<RecordId, Record>,
    pub bundles: BTreeMap<BundleId, AssetBundle>,
}

impl ManifestModel {
    pub fn new(
        records: BTreeMap<RecordId, Record>,
        bundles: BTreeMap<BundleId, AssetBundle>,
    ) -> Self {
        Self { records, bundles }
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn bundle(&self, id: BundleId) -> Option<&AssetBundle> {
        self.bundles.get(&id)
    }

    pub fn contains_record(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse raw export text into raw records.
///
/// Malformed JSON is a [`LoadError::Parse`]; an element missing a required
/// field or repeating an earlier id is a [`LoadError::MalformedRecord`].
pub fn parse_raw_records(text: &str) -> Result<Vec<RawRecord>, LoadError> {
    let value: Value = serde_json::from_str(text)?;

    let Value::Array(items) = value else {
        return Err(LoadError::Parse("expected a JSON array of records".to_string()));
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut records = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let id = item.get("id").and_then(Value::as_str).map(str::to_string);

        let record: RawRecord = serde_json::from_value(item)
            .map_err(|e| LoadError::malformed(index, id.as_deref(), e.to_string()))?;

        if !seen.insert(record.id.clone()) {
            return Err(LoadError::malformed(index, Some(&record.id), "duplicate record id"));
        }

        records.push(record);
    }

    Ok(records)
}

/// Build the normalized model from raw records
pub fn build_manifest(
    raw: Vec<RawRecord>,
    provided: &ProvidedAssets,
) -> Result<ManifestModel, LoadError> {
    let index = deduplicate_assets(&raw, provided);
    let mut classification = classify_assets(index);

    let mut records = BTreeMap::new();

    for (index, raw_record) in raw.into_iter().enumerate() {
        let id = RecordId::new(raw_record.id.as_str());
        let internal = classification.internal.remove(&id).unwrap_or_default();
        let shared = classification.shared.remove(&id).unwrap_or_default();

        let record = normalize_record(raw_record, internal, shared)
            .map_err(|e| LoadError::malformed(index, Some(id.as_str()), e.to_string()))?;

        records.insert(id, record);
    }

    Ok(ManifestModel::new(records, classification.bundles))
}

/// Parse and normalize export text in one step
pub fn load_manifest(text: &str, provided: &ProvidedAssets) -> Result<ManifestModel, LoadError> {
    let raw = parse_raw_records(text)?;
    build_manifest(raw, provided)
}
