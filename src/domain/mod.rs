//! Domain types for the inventory model.
//!
//! - Raw: the export shape as read from disk
//! - Asset: content-addressed assets and bundles
//! - Record: normalized records, one variant per kind

pub mod asset;
pub mod raw;
pub mod record;

// Re-export commonly used types
pub use asset::{total_bytes, AssetBundle, BundleId, ContentAsset, RecordId};
pub use raw::{RawAsset, RawRecord};
pub use record::{referenced_size, Record, RecordKind, RecordType, UnknownRecordType};
