//! The normalization engine.
//!
//! This module contains:
//! - Dedup: global index of distinct assets and their referencing records
//! - Bundle: equivalence-class grouping into internal assets and bundles
//! - Normalize: raw record to closed record variant
//! - Manifest: the normalized model and the load pipeline

pub mod bundle;
pub mod dedup;
pub mod manifest;
pub mod normalize;

// Re-export commonly used types
pub use bundle::{classify_assets, Classification};
pub use dedup::{deduplicate_assets, AssetIndex};
pub use manifest::{build_manifest, load_manifest, parse_raw_records, LoadError, ManifestModel};
pub use normalize::{normalize_record, object_full_name, split_object_path};
