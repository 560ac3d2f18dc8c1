//! Derived views over a loaded manifest.
//!
//! - Filter: kind and provenance pruning, memoized by input identity
//! - Selection: sorted multi-selection of record ids
//! - Summary: count and size metrics over any record subset

pub mod filter;
pub mod selection;
pub mod summary;

pub use filter::{filter_manifest, FilterOptions, FilterUpdate, FilterView};
pub use selection::SelectionSet;
pub use summary::{summarize, Summary};
