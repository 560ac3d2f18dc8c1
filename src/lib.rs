//! invlens - inventory export normalization
//!
//! Turns a flat, denormalized inventory export (records that each carry a
//! redundant list of content-addressed assets) into a deduplicated model of
//! records and shared asset bundles, and maintains filtered views and a
//! multi-selection over it.
//!
//! # Architecture
//!
//! ```text
//! raw export → dedup → bundle classification → normalization → store
//!                                                                 ↓
//!                                          filter view / selection → summary
//! ```
//!
//! # Modules
//!
//! - `domain`: Data structures (RawRecord, Record, ContentAsset, AssetBundle)
//! - `core`: Normalization engine (dedup, bundle, normalize, manifest)
//! - `view`: Filter view, selection set, aggregation
//! - `store`: Session store and load lifecycle
//! - `catalog`: Externally provided asset hashes
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Overview of an export
//! invlens summary records.json --provided free-assets.json
//!
//! # Largest records, worlds hidden
//! invlens records records.json --hide-worlds --limit 20
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod store;
pub mod view;

// Re-export main types at crate root for convenience
pub use catalog::ProvidedAssets;
pub use core::{load_manifest, LoadError, ManifestModel};
pub use domain::{AssetBundle, BundleId, ContentAsset, Record, RecordId, RecordKind, RecordType};
pub use store::{LoadOutcome, ManifestStore, Scope, StoreState};
pub use view::{FilterOptions, FilterUpdate, SelectionSet, Summary};
