//! Configuration for invlens.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (INVLENS_PROVIDED_ASSETS)
//! 2. Config file (.invlens/config.yaml)
//! 3. Defaults (no provided asset catalog, all record kinds visible)
//!
//! Config file discovery:
//! - Searches current directory and parents for .invlens/config.yaml
//! - Falls back to ~/.invlens/config.yaml
//! - Paths in config file are relative to the directory holding .invlens/

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::view::FilterOptions;

/// Environment variable overriding the provided asset catalog path
pub const PROVIDED_ASSETS_ENV: &str = "INVLENS_PROVIDED_ASSETS";

const CONFIG_DIR: &str = ".invlens";
const CONFIG_FILE: &str = "config.yaml";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Filter defaults; missing toggles keep their built-in default
    #[serde(default)]
    pub view: Option<FilterOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// JSON array of externally provided hashes
    pub provided_assets: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    /// Provided asset catalog, if any
    pub provided_assets: Option<PathBuf>,
    /// Filters applied after every load or unload
    pub default_filters: FilterOptions,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let home_config = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Combine a parsed config file with an optional environment override
fn resolve(
    config_file: Option<(PathBuf, ConfigFile)>,
    env_provided: Option<String>,
) -> ResolvedConfig {
    let env_provided = env_provided.filter(|p| !p.is_empty()).map(PathBuf::from);

    let Some((config_path, config)) = config_file else {
        return ResolvedConfig {
            provided_assets: env_provided,
            ..ResolvedConfig::default()
        };
    };

    // Base directory is the parent of .invlens/ (grandparent of config.yaml)
    let base_dir = config_path
        .parent()
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."));

    let provided_assets = env_provided.or_else(|| {
        config
            .catalog
            .provided_assets
            .as_deref()
            .map(|p| resolve_path(base_dir, p))
    });

    ResolvedConfig {
        provided_assets,
        default_filters: config.view.unwrap_or_default(),
        config_file: Some(config_path),
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = match find_config_file() {
        Some(path) => {
            let config = load_config_file(&path)?;
            Some((path, config))
        }
        None => None,
    };

    Ok(resolve(config_file, std::env::var(PROVIDED_ASSETS_ENV).ok()))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration, bypassing the cache
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, body: &str) -> PathBuf {
        let dir = temp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, None);

        assert!(config.provided_assets.is_none());
        assert_eq!(config.default_filters, FilterOptions::default());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_env_without_file() {
        let config = resolve(None, Some("/data/free.json".to_string()));
        assert_eq!(config.provided_assets, Some(PathBuf::from("/data/free.json")));

        let empty = resolve(None, Some(String::new()));
        assert!(empty.provided_assets.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            r#"
version: "1.0"
catalog:
  provided_assets: data/free-assets.json
view:
  show_audio: false
  show_provided_assets: true
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(
            config.catalog.provided_assets,
            Some("data/free-assets.json".to_string())
        );

        let view = config.view.unwrap();
        assert!(!view.show_audio);
        assert!(view.show_provided_assets);
        assert!(view.show_objects);

        let resolved = resolve(Some((config_path, config)), None);
        assert_eq!(
            resolved.provided_assets,
            Some(temp.path().join("data/free-assets.json"))
        );
        assert!(!resolved.default_filters.show_audio);
    }

    #[test]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            r#"
version: "1.0"
catalog:
  provided_assets: free.json
"#,
        );
        let config = load_config_file(&config_path).unwrap();

        let resolved = resolve(Some((config_path, config)), Some("/override.json".to_string()));
        assert_eq!(resolved.provided_assets, Some(PathBuf::from("/override.json")));
        assert_eq!(resolved.default_filters, FilterOptions::default());
    }

    #[test]
    fn test_invalid_config_file() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(&temp, "catalog: [");
        assert!(load_config_file(&config_path).is_err());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./free.json"),
            PathBuf::from("/home/user/project/./free.json")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/free.json"),
            PathBuf::from("/absolute/free.json")
        );
    }
}
