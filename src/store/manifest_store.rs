//! Session store owning the loaded manifest.
//!
//! State machine:
//!
//! ```text
//! Empty ──begin_load──▶ Loading ──complete_load──▶ Loaded | Error
//! Loaded | Error ──begin_load──▶ Loading
//! any ──unload──▶ Empty
//! ```
//!
//! A successful load replaces the whole model at once and resets filters
//! and selection. A failed load leaves no model behind, only the message.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::ProvidedAssets;
use crate::core::{load_manifest, LoadError, ManifestModel};
use crate::domain::{Record, RecordId};
use crate::view::{summarize, FilterOptions, FilterUpdate, FilterView, SelectionSet, Summary};

use super::source::ManifestSource;

/// Identifies one load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    id: Uuid,
}

impl LoadTicket {
    fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// A successfully loaded manifest with its provenance
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub model: Arc<ManifestModel>,

    /// SHA-256 of the raw text, hex encoded
    pub digest: String,

    /// Where the text came from
    pub source: String,

    pub loaded_at: DateTime<Utc>,
}

/// Current store state
#[derive(Debug, Clone)]
pub enum StoreState {
    Empty,
    Loading { ticket: LoadTicket, source: String },
    Loaded(Arc<LoadedManifest>),
    Error { message: String },
}

/// Result of handing a load result to the store
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(Arc<ManifestModel>),
    Failed(LoadError),
    /// The ticket no longer matches the pending load; the result was dropped
    Stale,
}

/// Which records a summary covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Filtered,
    Selected,
}

/// Session store for one user's inventory
#[derive(Debug)]
pub struct ManifestStore {
    state: StoreState,
    provided: Arc<ProvidedAssets>,
    default_filters: FilterOptions,
    filters: FilterOptions,
    selection: SelectionSet,
    filter_view: FilterView,
}

impl Default for ManifestStore {
    fn default() -> Self {
        Self::new(Arc::new(ProvidedAssets::empty()))
    }
}

impl ManifestStore {
    pub fn new(provided: Arc<ProvidedAssets>) -> Self {
        Self {
            state: StoreState::Empty,
            provided,
            default_filters: FilterOptions::default(),
            filters: FilterOptions::default(),
            selection: SelectionSet::new(),
            filter_view: FilterView::new(),
        }
    }

    /// Use these filters whenever the store resets
    pub fn with_default_filters(mut self, filters: FilterOptions) -> Self {
        self.default_filters = filters;
        self.filters = filters;
        self
    }

    /// Replace the provided asset catalog; applies from the next load
    pub fn set_provided_assets(&mut self, provided: Arc<ProvidedAssets>) {
        self.provided = provided;
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, StoreState::Loading { .. })
    }

    pub fn loaded(&self) -> Option<&LoadedManifest> {
        match &self.state {
            StoreState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    pub fn model(&self) -> Option<&Arc<ManifestModel>> {
        self.loaded().map(|l| &l.model)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            StoreState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Start a load, discarding whatever was loaded before
    pub fn begin_load(&mut self, source: impl Into<String>) -> LoadTicket {
        let ticket = LoadTicket::new();
        let source = source.into();
        info!(load_id = %ticket.id, source = %source, "Loading manifest");

        self.reset();
        self.state = StoreState::Loading { ticket, source };
        ticket
    }

    /// Hand the outcome of a read to the store.
    ///
    /// Results for anything but the pending ticket are dropped, which covers
    /// both a newer load having started and the store having been unloaded.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        text: Result<String, LoadError>,
    ) -> LoadOutcome {
        let source = match &self.state {
            StoreState::Loading { ticket: pending, source } if *pending == ticket => source.clone(),
            _ => {
                debug!(load_id = %ticket.id, "Discarding stale load result");
                return LoadOutcome::Stale;
            }
        };

        match self.finish(source, text) {
            Ok(model) => LoadOutcome::Loaded(model),
            Err(err) => LoadOutcome::Failed(err),
        }
    }

    /// Load export text already in memory
    pub fn load_text(&mut self, text: &str) -> Result<Arc<ManifestModel>, LoadError> {
        self.begin_load("<text>");
        self.finish("<text>".to_string(), Ok(text.to_string()))
    }

    /// Read from a source and load the result
    pub async fn load_from(
        &mut self,
        source: &dyn ManifestSource,
    ) -> Result<Arc<ManifestModel>, LoadError> {
        let description = source.describe();
        self.begin_load(description.as_str());

        let text = source
            .read_text()
            .await
            .map_err(|e| LoadError::Source(format!("{:#}", e)));

        self.finish(description, text)
    }

    /// Return to the empty state
    pub fn unload(&mut self) {
        info!("Unloading manifest");
        self.reset();
        self.state = StoreState::Empty;
    }

    fn reset(&mut self) {
        self.filters = self.default_filters;
        self.selection.clear();
        self.filter_view.clear();
    }

    fn finish(
        &mut self,
        source: String,
        text: Result<String, LoadError>,
    ) -> Result<Arc<ManifestModel>, LoadError> {
        let result = text.and_then(|text| {
            let model = load_manifest(&text, &self.provided)?;
            Ok((model, digest(&text)))
        });

        match result {
            Ok((model, digest)) => {
                let model = Arc::new(model);
                info!(
                    source = %source,
                    records = model.records.len(),
                    bundles = model.bundles.len(),
                    digest = %digest,
                    "Manifest loaded"
                );

                self.reset();
                self.state = StoreState::Loaded(Arc::new(LoadedManifest {
                    model: Arc::clone(&model),
                    digest,
                    source,
                    loaded_at: Utc::now(),
                }));
                Ok(model)
            }
            Err(err) => {
                warn!(source = %source, error = %err, "Manifest load failed");

                self.reset();
                self.state = StoreState::Error {
                    message: format!("Error loading manifest: {}", err),
                };
                Err(err)
            }
        }
    }

    pub fn filters(&self) -> FilterOptions {
        self.filters
    }

    /// Change some filter toggles; ignored while a load is pending
    pub fn update_filters(&mut self, update: FilterUpdate) -> FilterOptions {
        if self.is_loading() {
            debug!("Ignoring filter update while loading");
        } else {
            self.filters = self.filters.with(update);
        }
        self.filters
    }

    /// Filtered view of the loaded model, shared while inputs are unchanged
    pub fn filtered(&mut self) -> Option<Arc<ManifestModel>> {
        let model = match &self.state {
            StoreState::Loaded(loaded) => Arc::clone(&loaded.model),
            _ => return None,
        };
        Some(self.filter_view.view(&model, self.filters))
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Toggle one record; unknown ids and a missing model are ignored
    pub fn toggle_selected(&mut self, id: &RecordId) -> bool {
        match &self.state {
            StoreState::Loaded(loaded) => self.selection.toggle(id, &loaded.model),
            _ => false,
        }
    }

    /// Replace the selection; unknown ids are dropped
    pub fn set_selected<I>(&mut self, ids: I)
    where
        I: IntoIterator,
        I::Item: Into<RecordId>,
    {
        if let StoreState::Loaded(loaded) = &self.state {
            self.selection.set_all(ids, &loaded.model);
        }
    }

    /// Selected records in id order
    pub fn selected_records(&self) -> Vec<&Record> {
        let Some(model) = self.model() else {
            return Vec::new();
        };
        self.selection
            .ids()
            .iter()
            .filter_map(|id| model.record(id))
            .collect()
    }

    /// Metrics for one scope, honouring the provided asset toggle
    pub fn summary(&mut self, scope: Scope) -> Option<Summary> {
        let include_provided = self.filters.show_provided_assets;

        let summary = match scope {
            Scope::All => {
                let model = self.model()?;
                summarize(model.records.values(), &model.bundles, include_provided)
            }
            Scope::Filtered => {
                let view = self.filtered()?;
                let model = self.model()?;
                summarize(view.records.values(), &model.bundles, include_provided)
            }
            Scope::Selected => {
                let model = self.model()?;
                summarize(self.selected_records(), &model.bundles, include_provided)
            }
        };

        Some(summary)
    }
}

fn digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
