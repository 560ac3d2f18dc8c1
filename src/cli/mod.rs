//! Command-line interface for invlens.
//!
//! Loads an inventory export and prints the overview, record and bundle
//! tables that a viewer would show.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::catalog::ProvidedAssets;
use crate::config;
use crate::domain::{referenced_size, RecordId};
use crate::store::{FileSource, ManifestStore, Scope};
use crate::view::FilterUpdate;

pub mod format;

use format::{format_bytes, format_date, truncate};

/// invlens - inventory export viewer
#[derive(Parser, Debug)]
#[command(name = "invlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show record counts and sizes for all, filtered and selected records
    Summary {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List filtered records
    Records {
        #[command(flatten)]
        input: InputArgs,

        /// Maximum number of records to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// List filtered asset bundles, largest first
    Bundles {
        #[command(flatten)]
        input: InputArgs,

        /// Maximum number of bundles to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Manifest input, filters and selection shared by every view command
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Inventory export (JSON array of records)
    pub file: PathBuf,

    /// Provided asset catalog (JSON array of hashes)
    #[arg(long)]
    pub provided: Option<PathBuf>,

    /// Hide object records
    #[arg(long)]
    pub hide_objects: bool,

    /// Hide world records
    #[arg(long)]
    pub hide_worlds: bool,

    /// Hide audio messages
    #[arg(long)]
    pub hide_audio: bool,

    /// Hide avatar textures
    #[arg(long)]
    pub hide_textures: bool,

    /// Include externally provided assets
    #[arg(long)]
    pub show_provided: bool,

    /// Record ids to select (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<String>,
}

impl InputArgs {
    fn filter_update(&self) -> FilterUpdate {
        let hide = |flag: bool| flag.then_some(false);
        FilterUpdate {
            show_objects: hide(self.hide_objects),
            show_worlds: hide(self.hide_worlds),
            show_audio: hide(self.hide_audio),
            show_textures: hide(self.hide_textures),
            show_provided_assets: self.show_provided.then_some(true),
        }
    }

    /// Distinct ids passed to `--select`
    fn requested_ids(&self) -> BTreeSet<RecordId> {
        self.select
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(RecordId::new)
            .collect()
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Summary { input } => show_summary(&input).await,
            Commands::Records { input, limit } => list_records(&input, limit).await,
            Commands::Bundles { input, limit } => list_bundles(&input, limit).await,
            Commands::Config => show_config(),
        }
    }
}

/// Build a store, load the export and apply command-line filters
async fn open_store(input: &InputArgs) -> Result<ManifestStore> {
    let config = config::config()?;

    let provided = match input.provided.as_ref().or(config.provided_assets.as_ref()) {
        Some(path) => ProvidedAssets::load(path).await?,
        None => ProvidedAssets::empty(),
    };

    let mut store =
        ManifestStore::new(Arc::new(provided)).with_default_filters(config.default_filters);

    store
        .load_from(&FileSource::new(&input.file))
        .await
        .with_context(|| format!("Failed to load {}", input.file.display()))?;

    store.update_filters(input.filter_update());
    let requested = input.requested_ids();
    store.set_selected(requested.iter().cloned());

    if store.selection().len() < requested.len() {
        tracing::warn!(
            requested = requested.len(),
            selected = store.selection().len(),
            "Some selected ids are not in the manifest"
        );
    }

    Ok(store)
}

async fn show_summary(input: &InputArgs) -> Result<()> {
    let mut store = open_store(input).await?;

    println!(
        "{:<10} {:>8} {:>8} {:>12} {:>8} {:>12}",
        "", "RECORDS", "DIRECT", "DIRECT SIZE", "SHARED", "SHARED SIZE"
    );
    println!("{}", "-".repeat(63));

    for (label, scope) in [
        ("Total", Scope::All),
        ("Filtered", Scope::Filtered),
        ("Selected", Scope::Selected),
    ] {
        let summary = store.summary(scope).unwrap_or_default();
        println!(
            "{:<10} {:>8} {:>8} {:>12} {:>8} {:>12}",
            label,
            summary.record_count,
            summary.direct_asset_count,
            format_bytes(summary.direct_asset_bytes),
            summary.referenced_asset_count,
            format_bytes(summary.referenced_asset_bytes),
        );
    }

    if let Some(loaded) = store.loaded() {
        eprintln!("\n[{} sha256:{}]", loaded.source, loaded.digest);
    }

    Ok(())
}

async fn list_records(input: &InputArgs, limit: usize) -> Result<()> {
    let mut store = open_store(input).await?;
    let view = store.filtered().context("No manifest loaded")?;

    if view.records.is_empty() {
        println!("No records match the current filters");
        return Ok(());
    }

    let mut rows: Vec<_> = view
        .records
        .values()
        .map(|r| (r, referenced_size(r, &view.bundles)))
        .collect();
    rows.sort_by(|(a, a_ref), (b, b_ref)| {
        b.internal_size
            .saturating_add(*b_ref)
            .cmp(&a.internal_size.saturating_add(*a_ref))
            .then_with(|| a.id.cmp(&b.id))
    });

    println!(
        "{:<3} {:<40} {:<8} {:<10} {:>12} {:>7} {:>12}",
        "SEL", "NAME", "TYPE", "CREATED", "INTERNAL", "BUNDLES", "REFERENCED"
    );
    println!("{}", "-".repeat(98));

    for (record, referenced) in rows.iter().take(limit) {
        let selected = if store.selection().contains(&record.id) { "*" } else { "" };
        println!(
            "{:<3} {:<40} {:<8} {:<10} {:>12} {:>7} {:>12}",
            selected,
            truncate(record.display_name(), 40),
            record.record_type().as_str(),
            format_date(record.created()),
            format_bytes(record.internal_size),
            record.shared_asset_bundles.len(),
            format_bytes(*referenced),
        );
    }

    if rows.len() > limit {
        println!("... and {} more", rows.len() - limit);
    }

    Ok(())
}

async fn list_bundles(input: &InputArgs, limit: usize) -> Result<()> {
    let mut store = open_store(input).await?;
    let view = store.filtered().context("No manifest loaded")?;

    if view.bundles.is_empty() {
        println!("No shared asset bundles match the current filters");
        return Ok(());
    }

    let mut bundles: Vec<_> = view.bundles.values().collect();
    bundles.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.id.cmp(&b.id)));

    println!(
        "{:<8} {:>12} {:>7} {:>8} {:<8}",
        "BUNDLE", "SIZE", "ASSETS", "RECORDS", "PROVIDED"
    );
    println!("{}", "-".repeat(47));

    for bundle in bundles.iter().take(limit) {
        println!(
            "{:<8} {:>12} {:>7} {:>8} {:<8}",
            bundle.id.to_string(),
            format_bytes(bundle.size),
            bundle.assets.len(),
            bundle.record_ids.len(),
            if bundle.externally_provided { "yes" } else { "no" },
        );
    }

    if bundles.len() > limit {
        println!("... and {} more", bundles.len() - limit);
    }

    Ok(())
}

fn show_config() -> Result<()> {
    let config = config::config()?;

    println!("Resolved configuration:");
    match &config.config_file {
        Some(path) => println!("  Config file: {}", path.display()),
        None => println!("  Config file: (none, using defaults)"),
    }
    match &config.provided_assets {
        Some(path) => println!("  Provided assets: {}", path.display()),
        None => println!("  Provided assets: (none)"),
    }

    let f = config.default_filters;
    println!("  Default filters:");
    println!("    objects: {}", f.show_objects);
    println!("    worlds: {}", f.show_worlds);
    println!("    audio: {}", f.show_audio);
    println!("    textures: {}", f.show_textures);
    println!("    provided assets: {}", f.show_provided_assets);

    Ok(())
}
