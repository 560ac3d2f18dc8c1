//! Record normalization.
//!
//! Converts a raw record into the closed [`Record`] sum type, attaching the
//! internal assets and shared bundle ids computed by classification.

use crate::domain::{
    total_bytes, BundleId, ContentAsset, RawRecord, Record, RecordId, RecordKind, RecordType,
    UnknownRecordType,
};

/// Split a backslash-delimited inventory path into display segments.
///
/// The first segment names the root container and is dropped, as are empty
/// segments left by doubled or trailing separators.
pub fn split_object_path(path: &str) -> Vec<String> {
    path.split('\\')
        .skip(1)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join path segments and the record name into a `/`-separated full name
pub fn object_full_name(segments: &[String], name: &str) -> String {
    if segments.is_empty() {
        return name.to_string();
    }
    format!("{}/{}", segments.join("/"), name)
}

/// Build a normalized record.
///
/// Fails on an unrecognized kind tag; nothing else about the raw shape is
/// validated here.
pub fn normalize_record(
    raw: RawRecord,
    internal_assets: Vec<ContentAsset>,
    shared_asset_bundles: Vec<BundleId>,
) -> Result<Record, UnknownRecordType> {
    let record_type: RecordType = raw.record_type.parse()?;

    let kind = match record_type {
        RecordType::Object => {
            let path = split_object_path(&raw.path);
            RecordKind::Object {
                full_name: object_full_name(&path, &raw.name),
                path,
                thumbnail_uri: raw.thumbnail_uri,
            }
        }
        RecordType::World => RecordKind::World {
            world_name: raw.name.clone(),
        },
        RecordType::Audio => RecordKind::Audio,
        RecordType::Texture => RecordKind::Texture {
            thumbnail_uri: raw.thumbnail_uri,
        },
    };

    let internal_size = total_bytes(&internal_assets);

    Ok(Record {
        id: RecordId::new(raw.id),
        asset_uri: raw.asset_uri,
        name: raw.name,
        owner_name: raw.owner_name,
        is_public: raw.is_public,
        creation_time: raw.creation_time,
        last_modification_time: raw.last_modification_time,
        internal_assets,
        internal_size,
        shared_asset_bundles,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(record_type: &str, path: &str) -> RawRecord {
        RawRecord {
            id: "R-1".to_string(),
            asset_uri: "resrec:///U-test/R-1".to_string(),
            name: "Lamp".to_string(),
            record_type: record_type.to_string(),
            owner_name: "someone".to_string(),
            path: path.to_string(),
            thumbnail_uri: Some("resdb:///thumb".to_string()),
            is_public: false,
            creation_time: "2024-01-01T00:00:00Z".to_string(),
            last_modification_time: None,
            asset_manifest: Vec::new(),
        }
    }

    #[test]
    fn test_split_object_path_drops_root() {
        assert_eq!(
            split_object_path("Inventory\\Furniture\\Lights"),
            vec!["Furniture".to_string(), "Lights".to_string()]
        );
        assert!(split_object_path("Inventory").is_empty());
        assert!(split_object_path("").is_empty());
        assert_eq!(split_object_path("Inventory\\\\Props\\"), vec!["Props".to_string()]);
    }

    #[test]
    fn test_object_full_name() {
        let segments = split_object_path("Inventory\\Furniture\\Lights");
        assert_eq!(object_full_name(&segments, "Lamp"), "Furniture/Lights/Lamp");
        assert_eq!(object_full_name(&[], "Lamp"), "Lamp");
    }

    #[test]
    fn test_normalize_object() {
        let internal = vec![ContentAsset::new("a", 30, false), ContentAsset::new("b", 12, false)];
        let record = normalize_record(
            raw("object", "Inventory\\Furniture"),
            internal,
            vec![BundleId::new(3)],
        )
        .unwrap();

        assert_eq!(record.record_type(), RecordType::Object);
        assert_eq!(record.internal_size, 42);
        assert_eq!(record.shared_asset_bundles, vec![BundleId::new(3)]);
        match &record.kind {
            RecordKind::Object {
                full_name,
                path,
                thumbnail_uri,
            } => {
                assert_eq!(full_name, "Furniture/Lamp");
                assert_eq!(path, &vec!["Furniture".to_string()]);
                assert_eq!(thumbnail_uri.as_deref(), Some("resdb:///thumb"));
            }
            other => panic!("Expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_other_kinds() {
        let world = normalize_record(raw("world", ""), Vec::new(), Vec::new()).unwrap();
        assert_eq!(
            world.kind,
            RecordKind::World {
                world_name: "Lamp".to_string()
            }
        );

        let audio = normalize_record(raw("audio", ""), Vec::new(), Vec::new()).unwrap();
        assert_eq!(audio.kind, RecordKind::Audio);

        let texture = normalize_record(raw("texture", ""), Vec::new(), Vec::new()).unwrap();
        assert_eq!(texture.thumbnail_uri(), Some("resdb:///thumb"));
    }

    #[test]
    fn test_unknown_kind_fails() {
        let err = normalize_record(raw("widget", ""), Vec::new(), Vec::new()).unwrap_err();
        assert_eq!(err.0, "widget");
    }
}
