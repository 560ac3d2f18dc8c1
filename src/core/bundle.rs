//! Bundle classification.
//!
//! Partitions deduplicated assets into equivalence classes keyed by the
//! referencing record set plus the externally provided flag. A class owned
//! by a single record and not externally provided becomes that record's
//! internal assets; every other class becomes an [`AssetBundle`].

use std::collections::{BTreeMap, HashMap};

use crate::domain::{total_bytes, AssetBundle, BundleId, ContentAsset, RecordId};

use super::dedup::AssetIndex;

/// Grouping key: sorted referencing records, then the provided flag.
///
/// Ordering on the key fixes the order bundle ids are handed out in.
type GroupKey = (Vec<RecordId>, bool);

/// Result of classifying an asset index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Assets private to one record
    pub internal: HashMap<RecordId, Vec<ContentAsset>>,

    /// Shared bundles by id
    pub bundles: BTreeMap<BundleId, AssetBundle>,

    /// Bundle ids referencing each record, ascending
    pub shared: HashMap<RecordId, Vec<BundleId>>,
}

impl Classification {
    pub fn internal_assets(&self, id: &RecordId) -> &[ContentAsset] {
        self.internal.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn shared_bundles(&self, id: &RecordId) -> &[BundleId] {
        self.shared.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Group assets into internal lists and shared bundles.
///
/// Bundle ids start at zero for every call and follow the key order, so the
/// same index always yields the same ids.
pub fn classify_assets(index: AssetIndex) -> Classification {
    let mut groups: BTreeMap<GroupKey, Vec<ContentAsset>> = BTreeMap::new();

    for asset in index.into_values() {
        let key = (asset.record_ids.clone(), asset.externally_provided);
        groups.entry(key).or_default().push(asset);
    }

    let mut classification = Classification::default();
    let mut next_id = 0u32;

    for ((record_ids, externally_provided), assets) in groups {
        if record_ids.is_empty() {
            continue;
        }

        if record_ids.len() == 1 && !externally_provided {
            classification
                .internal
                .entry(record_ids[0].clone())
                .or_default()
                .extend(assets);
            continue;
        }

        let id = BundleId::new(next_id);
        next_id += 1;

        for record_id in &record_ids {
            classification
                .shared
                .entry(record_id.clone())
                .or_default()
                .push(id);
        }

        classification.bundles.insert(
            id,
            AssetBundle {
                id,
                size: total_bytes(&assets),
                assets,
                record_ids,
                externally_provided,
            },
        );
    }

    tracing::debug!(
        internal_records = classification.internal.len(),
        bundles = classification.bundles.len(),
        "Classified assets"
    );

    classification
}
