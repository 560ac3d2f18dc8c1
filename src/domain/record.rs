//! Normalized inventory records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::asset::{AssetBundle, BundleId, ContentAsset, RecordId};

/// Kind tag of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    /// Saved object, placed somewhere in the inventory tree
    Object,

    /// World
    World,

    /// Audio message
    Audio,

    /// User avatar texture
    Texture,
}

impl RecordType {
    pub const ALL: [RecordType; 4] = [
        RecordType::Object,
        RecordType::World,
        RecordType::Audio,
        RecordType::Texture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Object => "object",
            RecordType::World => "world",
            RecordType::Audio => "audio",
            RecordType::Texture => "texture",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown record type: {0:?}")]
pub struct UnknownRecordType(pub String);

impl std::str::FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "object" => Ok(RecordType::Object),
            "world" => Ok(RecordType::World),
            "audio" => Ok(RecordType::Audio),
            "texture" => Ok(RecordType::Texture),
            _ => Err(UnknownRecordType(s.to_string())),
        }
    }
}

/// Kind-specific record fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordKind {
    Object {
        /// Path segments joined with `/`, followed by the record name
        full_name: String,
        /// Inventory folders, root container excluded
        path: Vec<String>,
        thumbnail_uri: Option<String>,
    },
    World {
        world_name: String,
    },
    Audio,
    Texture {
        thumbnail_uri: Option<String>,
    },
}

/// A normalized record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    pub asset_uri: String,

    /// Name as exported, whatever the kind
    pub name: String,

    pub owner_name: String,

    pub is_public: bool,

    /// Creation timestamp, verbatim
    pub creation_time: String,

    pub last_modification_time: Option<String>,

    /// Assets only this record references, excluding externally provided ones
    pub internal_assets: Vec<ContentAsset>,

    /// Sum of `internal_assets` sizes
    pub internal_size: u64,

    /// Bundles whose `record_ids` contain this record
    pub shared_asset_bundles: Vec<BundleId>,

    #[serde(flatten)]
    pub kind: RecordKind,
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        match self.kind {
            RecordKind::Object { .. } => RecordType::Object,
            RecordKind::World { .. } => RecordType::World,
            RecordKind::Audio => RecordType::Audio,
            RecordKind::Texture { .. } => RecordType::Texture,
        }
    }

    /// Name shown to the user
    pub fn display_name(&self) -> &str {
        match &self.kind {
            RecordKind::Object { full_name, .. } => full_name,
            RecordKind::World { world_name } => world_name,
            RecordKind::Audio => "Audio Message",
            RecordKind::Texture { .. } => "User Avatar",
        }
    }

    pub fn thumbnail_uri(&self) -> Option<&str> {
        match &self.kind {
            RecordKind::Object { thumbnail_uri, .. } | RecordKind::Texture { thumbnail_uri } => {
                thumbnail_uri.as_deref()
            }
            _ => None,
        }
    }

    /// Creation time, if it parses as RFC 3339
    pub fn created(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.creation_time)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Total size of the bundles a record shares with others
pub fn referenced_size(record: &Record, bundles: &BTreeMap<BundleId, AssetBundle>) -> u64 {
    record
        .shared_asset_bundles
        .iter()
        .filter_map(|id| bundles.get(id))
        .map(|b| b.size)
        .fold(0, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: RecordKind) -> Record {
        Record {
            id: RecordId::from("R-1"),
            asset_uri: "resrec:///U-a/R-1".to_string(),
            name: "Lamp".to_string(),
            owner_name: "someone".to_string(),
            is_public: false,
            creation_time: "2024-05-06T07:08:09.123Z".to_string(),
            last_modification_time: None,
            internal_assets: Vec::new(),
            internal_size: 0,
            shared_asset_bundles: Vec::new(),
            kind,
        }
    }

    #[test]
    fn test_record_type_from_str() {
        assert_eq!("object".parse::<RecordType>().unwrap(), RecordType::Object);
        assert_eq!("texture".parse::<RecordType>().unwrap(), RecordType::Texture);
        assert!("widget".parse::<RecordType>().is_err());
        assert!("Object".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_display_name_per_kind() {
        let object = record(RecordKind::Object {
            full_name: "Furniture/Lamp".to_string(),
            path: vec!["Furniture".to_string()],
            thumbnail_uri: None,
        });
        assert_eq!(object.display_name(), "Furniture/Lamp");
        let world = record(RecordKind::World {
            world_name: "Home".to_string(),
        });
        assert_eq!(world.display_name(), "Home");
        assert_eq!(record(RecordKind::Audio).display_name(), "Audio Message");
        assert_eq!(
            record(RecordKind::Texture { thumbnail_uri: None }).display_name(),
            "User Avatar"
        );
    }

    #[test]
    fn test_created_parses_rfc3339() {
        let rec = record(RecordKind::Audio);
        let created = rec.created().unwrap();
        assert_eq!(created.to_rfc3339().get(..10), Some("2024-05-06"));

        let mut bad = record(RecordKind::Audio);
        bad.creation_time = "yesterday".to_string();
        assert!(bad.created().is_none());
    }

    #[test]
    fn test_record_serializes_kind_tag() {
        let rec = record(RecordKind::World { world_name: "Home".to_string() });
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "world");
        assert_eq!(json["world_name"], "Home");
        assert_eq!(json["name"], "Lamp");
    }

    #[test]
    fn test_referenced_size_skips_unknown_bundles() {
        let mut rec = record(RecordKind::Audio);
        rec.shared_asset_bundles = vec![BundleId::new(0), BundleId::new(9)];

        let mut bundles = BTreeMap::new();
        bundles.insert(
            BundleId::new(0),
            AssetBundle {
                id: BundleId::new(0),
                size: 300,
                assets: Vec::new(),
                record_ids: vec![RecordId::from("R-1")],
                externally_provided: true,
            },
        );

        assert_eq!(referenced_size(&rec, &bundles), 300);
    }
}
