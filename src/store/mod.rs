//! Session state for a loaded inventory.
//!
//! The store owns the normalized model plus the filters and selection that
//! are derived from it. Raw text reaches the store through a
//! [`ManifestSource`], the only asynchronous step of a load.

pub mod manifest_store;
pub mod source;

pub use manifest_store::{LoadOutcome, LoadTicket, LoadedManifest, ManifestStore, Scope, StoreState};
pub use source::{FileSource, ManifestSource, TextSource};
