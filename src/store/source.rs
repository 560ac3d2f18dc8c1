//! Sources of raw manifest text.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;

/// Something that can produce the raw export text
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Human-readable description for logs
    fn describe(&self) -> String;

    /// Read the full export text
    async fn read_text(&self) -> Result<String>;
}

/// Export file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ManifestSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_text(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read manifest file: {}", self.path.display()))
    }
}

/// Export text already in memory
#[derive(Debug, Clone)]
pub struct TextSource {
    label: String,
    text: String,
}

impl TextSource {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl ManifestSource for TextSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    async fn read_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}
