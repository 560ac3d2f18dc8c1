//! Filtered view over the normalized model.
//!
//! Records are kept by kind; bundles are kept when at least one kept record
//! still lists them after the externally provided visibility check.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::ManifestModel;
use crate::domain::{AssetBundle, BundleId, Record, RecordId, RecordType};

/// Visibility toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    pub show_objects: bool,
    pub show_worlds: bool,
    /// Audio messages
    pub show_audio: bool,
    /// User avatar textures
    pub show_textures: bool,
    /// Bundles supplied by the platform
    pub show_provided_assets: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            show_objects: true,
            show_worlds: true,
            show_audio: true,
            show_textures: true,
            show_provided_assets: false,
        }
    }
}

impl FilterOptions {
    /// Everything visible; filtering with this reproduces the input
    pub fn show_all() -> Self {
        Self {
            show_provided_assets: true,
            ..Self::default()
        }
    }

    pub fn shows(&self, record_type: RecordType) -> bool {
        match record_type {
            RecordType::Object => self.show_objects,
            RecordType::World => self.show_worlds,
            RecordType::Audio => self.show_audio,
            RecordType::Texture => self.show_textures,
        }
    }

    pub fn shows_bundle(&self, bundle: &AssetBundle) -> bool {
        !bundle.externally_provided || self.show_provided_assets
    }

    /// Apply a partial update, returning the new options
    pub fn with(mut self, update: FilterUpdate) -> Self {
        if let Some(v) = update.show_objects {
            self.show_objects = v;
        }
        if let Some(v) = update.show_worlds {
            self.show_worlds = v;
        }
        if let Some(v) = update.show_audio {
            self.show_audio = v;
        }
        if let Some(v) = update.show_textures {
            self.show_textures = v;
        }
        if let Some(v) = update.show_provided_assets {
            self.show_provided_assets = v;
        }
        self
    }
}

/// Partial change to [`FilterOptions`]; `None` leaves a toggle as is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterUpdate {
    pub show_objects: Option<bool>,
    pub show_worlds: Option<bool>,
    pub show_audio: Option<bool>,
    pub show_textures: Option<bool>,
    pub show_provided_assets: Option<bool>,
}

/// Prune records and bundles by the given filters.
///
/// Each kept record carries only the bundle ids that pass the visibility
/// check. A bundle appears in the output only if some kept record retains
/// it, so bundles orphaned by filtered-out records are dropped too.
pub fn filter_manifest(
    records: &BTreeMap<RecordId, Record>,
    bundles: &BTreeMap<BundleId, AssetBundle>,
    filters: &FilterOptions,
) -> ManifestModel {
    let mut kept_records = BTreeMap::new();
    let mut kept_bundles = BTreeSet::new();

    for (id, record) in records {
        if !filters.shows(record.record_type()) {
            continue;
        }

        let mut copy = record.clone();
        copy.shared_asset_bundles.retain(|bundle_id| {
            bundles
                .get(bundle_id)
                .is_some_and(|bundle| filters.shows_bundle(bundle))
        });
        kept_bundles.extend(copy.shared_asset_bundles.iter().copied());
        kept_records.insert(id.clone(), copy);
    }

    let bundles = kept_bundles
        .into_iter()
        .filter_map(|id| bundles.get(&id).map(|b| (id, b.clone())))
        .collect();

    ManifestModel::new(kept_records, bundles)
}

#[derive(Debug)]
struct CachedView {
    source: Arc<ManifestModel>,
    filters: FilterOptions,
    view: Arc<ManifestModel>,
}

/// Memoized [`filter_manifest`].
///
/// Returns the same `Arc` for as long as the source model (by identity) and
/// the filters are unchanged, so consumers can detect changes by pointer.
#[derive(Debug, Default)]
pub struct FilterView {
    cached: Option<CachedView>,
}

impl FilterView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&mut self, source: &Arc<ManifestModel>, filters: FilterOptions) -> Arc<ManifestModel> {
        if let Some(cached) = &self.cached {
            if Arc::ptr_eq(&cached.source, source) && cached.filters == filters {
                return Arc::clone(&cached.view);
            }
        }

        let view = Arc::new(filter_manifest(&source.records, &source.bundles, &filters));
        self.cached = Some(CachedView {
            source: Arc::clone(source),
            filters,
            view: Arc::clone(&view),
        });
        view
    }

    /// Drop the cached view and its reference to the source model
    pub fn clear(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentAsset, RecordKind};

    fn record(id: &str, kind: RecordKind, bundles: &[u32]) -> Record {
        Record {
            id: RecordId::from(id),
            asset_uri: String::new(),
            name: id.to_string(),
            owner_name: String::new(),
            is_public: false,
            creation_time: String::new(),
            last_modification_time: None,
            internal_assets: Vec::new(),
            internal_size: 0,
            shared_asset_bundles: bundles.iter().map(|b| BundleId::new(*b)).collect(),
            kind,
        }
    }

    fn bundle(id: u32, provided: bool, records: &[&str]) -> AssetBundle {
        AssetBundle {
            id: BundleId::new(id),
            size: 10,
            assets: vec![ContentAsset::new(format!("h{}", id), 10, provided)],
            record_ids: records.iter().map(|r| RecordId::from(*r)).collect(),
            externally_provided: provided,
        }
    }

    fn model() -> ManifestModel {
        let records = [
            record("R-1", RecordKind::Audio, &[0, 1]),
            record("R-2", RecordKind::World { world_name: "W".to_string() }, &[0]),
            record("R-3", RecordKind::Texture { thumbnail_uri: None }, &[2]),
        ];
        let bundles = [
            bundle(0, false, &["R-1", "R-2"]),
            bundle(1, true, &["R-1"]),
            bundle(2, false, &["R-3", "R-4"]),
        ];

        ManifestModel::new(
            records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            bundles.into_iter().map(|b| (b.id, b)).collect(),
        )
    }

    #[test]
    fn test_default_options() {
        let options = FilterOptions::default();
        assert!(RecordType::ALL.iter().all(|t| options.shows(*t)));
        assert!(!options.show_provided_assets);
    }

    #[test]
    fn test_show_all_reproduces_model() {
        let m = model();
        let view = filter_manifest(&m.records, &m.bundles, &FilterOptions::show_all());
        assert_eq!(view, m);
    }

    #[test]
    fn test_provided_bundles_hidden_by_default() {
        let m = model();
        let view = filter_manifest(&m.records, &m.bundles, &FilterOptions::default());

        assert_eq!(view.records.len(), 3);
        assert!(!view.bundles.contains_key(&BundleId::new(1)));
        assert_eq!(
            view.records[&RecordId::from("R-1")].shared_asset_bundles,
            vec![BundleId::new(0)]
        );
    }

    #[test]
    fn test_orphaned_bundles_dropped() {
        let m = model();
        let filters = FilterOptions {
            show_textures: false,
            ..FilterOptions::show_all()
        };
        let view = filter_manifest(&m.records, &m.bundles, &filters);

        assert!(!view.records.contains_key(&RecordId::from("R-3")));
        assert!(!view.bundles.contains_key(&BundleId::new(2)));
        assert!(view.bundles.contains_key(&BundleId::new(0)));
    }

    #[test]
    fn test_with_partial_update() {
        let options = FilterOptions::default().with(FilterUpdate {
            show_audio: Some(false),
            show_provided_assets: Some(true),
            ..Default::default()
        });

        assert!(!options.show_audio);
        assert!(options.show_provided_assets);
        assert!(options.show_objects);
    }

    #[test]
    fn test_filter_view_is_referentially_stable() {
        let source = Arc::new(model());
        let mut view = FilterView::new();

        let first = view.view(&source, FilterOptions::default());
        let second = view.view(&source, FilterOptions::default());
        assert!(Arc::ptr_eq(&first, &second));

        let changed = view.view(&source, FilterOptions::show_all());
        assert!(!Arc::ptr_eq(&first, &changed));

        let reloaded = Arc::new(model());
        let third = view.view(&reloaded, FilterOptions::show_all());
        assert!(!Arc::ptr_eq(&changed, &third));
        assert_eq!(*changed, *third);
    }
}
