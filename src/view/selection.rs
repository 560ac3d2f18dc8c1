//! Order-stable multi-selection of records.

use serde::Serialize;

use crate::core::ManifestModel;
use crate::domain::RecordId;

/// Sorted, duplicate-free list of selected record ids.
///
/// Every mutation is checked against a model; ids the model does not know
/// are ignored rather than reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: Vec<RecordId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present.
    ///
    /// Returns whether the selection changed.
    pub fn toggle(&mut self, id: &RecordId, model: &ManifestModel) -> bool {
        if !model.contains_record(id) {
            return false;
        }

        match self.ids.binary_search(id) {
            Ok(pos) => {
                self.ids.remove(pos);
            }
            Err(pos) => self.ids.insert(pos, id.clone()),
        }
        true
    }

    /// Replace the selection with the known ids among `ids`
    pub fn set_all<I>(&mut self, ids: I, model: &ManifestModel)
    where
        I: IntoIterator,
        I::Item: Into<RecordId>,
    {
        let mut ids: Vec<RecordId> = ids
            .into_iter()
            .map(Into::into)
            .filter(|id| model.contains_record(id))
            .collect();
        ids.sort();
        ids.dedup();
        self.ids = ids;
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProvidedAssets;
    use crate::core::load_manifest;

    fn model(ids: &[&str]) -> ManifestModel {
        let records: Vec<_> = ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "assetUri": "u",
                    "name": id,
                    "recordType": "audio",
                    "creationTime": "2024-01-01T00:00:00Z",
                    "assetManifest": []
                })
            })
            .collect();
        let text = serde_json::to_string(&records).unwrap();
        load_manifest(&text, &ProvidedAssets::empty()).unwrap()
    }

    fn ids(set: &SelectionSet) -> Vec<&str> {
        set.ids().iter().map(RecordId::as_str).collect()
    }

    #[test]
    fn test_toggle_inserts_sorted_and_removes() {
        let m = model(&["R-a", "R-b", "R-c"]);
        let mut set = SelectionSet::new();

        assert!(set.toggle(&RecordId::from("R-c"), &m));
        assert!(set.toggle(&RecordId::from("R-a"), &m));
        assert!(set.toggle(&RecordId::from("R-b"), &m));
        assert_eq!(ids(&set), vec!["R-a", "R-b", "R-c"]);

        assert!(set.toggle(&RecordId::from("R-b"), &m));
        assert_eq!(ids(&set), vec!["R-a", "R-c"]);
        assert!(!set.contains(&RecordId::from("R-b")));
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let m = model(&["R-a"]);
        let mut set = SelectionSet::new();

        assert!(!set.toggle(&RecordId::from("R-zzz"), &m));
        assert!(set.is_empty());
    }

    #[test]
    fn test_set_all_filters_sorts_and_dedups() {
        let m = model(&["R-a", "R-b", "R-c"]);
        let mut set = SelectionSet::new();

        set.set_all(["R-c", "R-a", "R-missing", "R-c"], &m);
        assert_eq!(ids(&set), vec!["R-a", "R-c"]);

        set.set_all(Vec::<RecordId>::new(), &m);
        assert!(set.is_empty());
    }

    #[test]
    fn test_invariant_after_mixed_operations() {
        let m = model(&["R-1", "R-2", "R-3", "R-4"]);
        let mut set = SelectionSet::new();

        set.set_all(["R-4", "R-2"], &m);
        for id in ["R-1", "R-2", "R-9", "R-3", "R-1", "R-4"] {
            set.toggle(&RecordId::from(id), &m);
        }

        assert!(set.ids().windows(2).all(|w| w[0] < w[1]));
        assert!(set.ids().iter().all(|id| m.contains_record(id)));
        assert_eq!(ids(&set), vec!["R-3"]);
    }
}
