//! Catalog of externally provided assets.
//!
//! The catalog is a flat JSON array of content hashes, produced offline by
//! probing the platform's asset service. Assets in it are supplied by the
//! platform and do not count against the user's own storage.

pub mod provided;

pub use provided::ProvidedAssets;
