//! Lookup table of externally provided asset hashes.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

/// Set of content hashes known to be supplied by the platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvidedAssets {
    hashes: HashSet<String>,
}

impl ProvidedAssets {
    /// Create an empty catalog (nothing is externally provided)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_hashes(hashes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            hashes: hashes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a JSON array of hashes
    pub fn from_json(text: &str) -> Result<Self> {
        let hashes: Vec<String> =
            serde_json::from_str(text).context("Failed to parse provided asset catalog JSON")?;
        Ok(Self::from_hashes(hashes))
    }

    /// Load the catalog from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read provided asset catalog: {}", path.display()))?;

        let catalog = Self::from_json(&content)
            .with_context(|| format!("Invalid provided asset catalog: {}", path.display()))?;

        tracing::debug!(path = %path.display(), hashes = catalog.len(), "Loaded provided asset catalog");
        Ok(catalog)
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
