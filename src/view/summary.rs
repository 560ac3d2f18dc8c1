//! Size metrics over record subsets.
//!
//! The same computation backs the "all", "filtered" and "selected" rows.
//! Referenced figures are all-or-nothing per bundle: a bundle counts only
//! when every record referencing it is in the subset, so the result is the
//! size freed or gained by acting on exactly that subset.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::domain::{total_bytes, AssetBundle, BundleId, Record};

/// Metrics for one record subset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub record_count: usize,

    /// Internal assets across the subset
    pub direct_asset_count: usize,
    pub direct_asset_bytes: u64,

    /// Assets in bundles wholly owned by the subset
    pub referenced_asset_count: usize,
    pub referenced_asset_bytes: u64,
}

/// Compute metrics for a record subset.
///
/// Bundle ids missing from `bundles` are skipped.
pub fn summarize<'a, I>(
    records: I,
    bundles: &BTreeMap<BundleId, AssetBundle>,
    include_provided: bool,
) -> Summary
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut summary = Summary::default();
    let mut members = HashSet::new();
    let mut referenced = BTreeSet::new();

    for record in records {
        if !members.insert(&record.id) {
            continue;
        }
        summary.record_count += 1;
        summary.direct_asset_count += record.internal_assets.len();
        summary.direct_asset_bytes = summary
            .direct_asset_bytes
            .saturating_add(total_bytes(&record.internal_assets));
        referenced.extend(record.shared_asset_bundles.iter().copied());
    }

    for bundle in referenced.iter().filter_map(|id| bundles.get(id)) {
        let visible = !bundle.externally_provided || include_provided;
        if visible && bundle.record_ids.iter().all(|id| members.contains(id)) {
            summary.referenced_asset_count += bundle.assets.len();
            summary.referenced_asset_bytes =
                summary.referenced_asset_bytes.saturating_add(bundle.size);
        }
    }

    summary
}
