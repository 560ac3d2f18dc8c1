//! Asset deduplication.
//!
//! Builds a global index of distinct assets from the per-record manifests,
//! recording every record that references each asset.

use std::collections::BTreeMap;

use crate::catalog::ProvidedAssets;
use crate::domain::{ContentAsset, RawRecord, RecordId};

/// Distinct assets keyed by hash, in hash order
pub type AssetIndex = BTreeMap<String, ContentAsset>;

/// Index every asset referenced by the raw records.
///
/// The first occurrence of a hash fixes its size. After all records are
/// visited, each asset's referencing list is sorted and deduplicated, so a
/// record listing the same hash twice counts as one reference.
pub fn deduplicate_assets(records: &[RawRecord], provided: &ProvidedAssets) -> AssetIndex {
    let mut index = AssetIndex::new();

    for record in records {
        let record_id = RecordId::new(record.id.as_str());

        for raw in &record.asset_manifest {
            let asset = index.entry(raw.hash.clone()).or_insert_with(|| {
                ContentAsset::new(raw.hash.as_str(), raw.bytes, provided.contains(&raw.hash))
            });
            asset.record_ids.push(record_id.clone());
        }
    }

    for asset in index.values_mut() {
        asset.record_ids.sort();
        asset.record_ids.dedup();
    }

    index
}
