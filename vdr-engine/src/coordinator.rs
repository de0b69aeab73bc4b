//! Cascading Selection Coordinator
//!
//! Drives the make → model → trim selection flow used for manual vehicle entry.
//! It owns the ordering and precondition guarantees of the cascade plus the
//! per-session [`ResultCache`]; network retry lives in the catalog adapter.
//!
//! **Reset rules:**
//! - `set_maker` clears model and engine, and the presented model/trim lists
//! - `set_model` clears engine and the presented trim list
//! - `set_year` clears nothing; the next picker open queries with the new year
//!
//! **Concurrency:** one logical thread. All mutation goes through `&mut self`; there is
//! no in-flight deduplication and no cancellation. A caller that changed an ancestor
//! while a load was pending discards the stale result itself.

use crate::adapters::CatalogSource;
use crate::cache::{CacheKey, ResultCache};
use crate::collation;
use crate::error::{ResolveError, ResolveResult};
use crate::types::{PickerItems, PickerKind, SelectionState, TrimRow, VehicleDescriptor};
use std::sync::Arc;
use tracing::{debug, info, warn};

const SELECT_MAKE_FIRST: &str = "select make first";
const SELECT_MODEL_FIRST: &str = "select model first";

/// Cascading selection state machine
pub struct SelectionCoordinator {
    catalog: Arc<dyn CatalogSource>,
    cache: ResultCache,
    state: SelectionState,
    search: String,
    prefetch_makers: bool,
    /// Lists most recently presented per picker (unfiltered)
    makers: Option<Vec<String>>,
    models: Option<Vec<String>>,
    trims: Option<Vec<TrimRow>>,
}

impl SelectionCoordinator {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            catalog,
            cache: ResultCache::new(),
            state: SelectionState::default(),
            search: String::new(),
            prefetch_makers: true,
            makers: None,
            models: None,
            trims: None,
        }
    }

    /// Whether `set_maker` loads the maker list when it has not been loaded yet
    pub fn set_prefetch_makers(&mut self, enabled: bool) {
        self.prefetch_makers = enabled;
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Descriptor for the current selection (make/model/year/engine; rest unknown)
    pub fn descriptor(&self) -> VehicleDescriptor {
        self.state.to_descriptor()
    }

    /// Unfiltered list last presented for `kind`, if loaded and still valid
    pub fn current_options(&self, kind: PickerKind) -> Option<PickerItems> {
        match kind {
            PickerKind::Maker => self.makers.clone().map(PickerItems::Labels),
            PickerKind::Model => self.models.clone().map(PickerItems::Labels),
            PickerKind::Trim => self.trims.clone().map(PickerItems::Trims),
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Choose a maker; clears model, engine and the presented model/trim lists
    pub async fn set_maker(&mut self, maker: impl Into<String>) {
        self.state.maker = maker.into();
        self.state.model.clear();
        self.state.engine.clear();
        self.models = None;
        self.trims = None;

        debug!(maker = %self.state.maker, "Maker selected");

        if self.prefetch_makers && self.makers.is_none() {
            let makers = self.load_makers(false).await;
            self.makers = Some(makers);
        }
    }

    /// Choose a model; requires a maker. Clears engine and the presented trim list.
    pub fn set_model(&mut self, model: impl Into<String>) -> ResolveResult<()> {
        if !self.state.has_maker() {
            return Err(ResolveError::PreconditionFailed(SELECT_MAKE_FIRST.to_string()));
        }

        self.state.model = model.into();
        self.state.engine.clear();
        self.trims = None;

        debug!(maker = %self.state.maker, model = %self.state.model, "Model selected");
        Ok(())
    }

    /// Set or clear the year refinement; model and engine are kept
    pub fn set_year(&mut self, year: Option<u16>) {
        self.state.year = year;
        debug!(year = ?year, "Year selected");
    }

    /// Choose a trim; requires maker and model. Stores the trim label as the engine.
    pub fn set_trim(&mut self, row: &TrimRow) -> ResolveResult<()> {
        self.require_model()?;

        self.state.engine = row.label().to_string();

        debug!(engine = %self.state.engine, "Trim selected");
        Ok(())
    }

    /// Free-text filter applied to every presented list
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Forget all choices, presented lists and the search text; the cache is kept
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
        self.search.clear();
        self.makers = None;
        self.models = None;
        self.trims = None;
    }

    // ========================================================================
    // Pickers
    // ========================================================================

    /// Load (through the cache) and present the options for `kind`, filtered by search
    ///
    /// # Errors
    /// `PreconditionFailed` when an ancestor is missing; no network call is made.
    pub async fn open_picker(&mut self, kind: PickerKind) -> ResolveResult<PickerItems> {
        self.load_picker(kind, false).await
    }

    /// Same as [`open_picker`](Self::open_picker) but forces a refresh: the cache is
    /// bypassed, the backend is asked to bypass its cache, and the result overwrites
    /// the cached entry
    pub async fn refresh_picker(&mut self, kind: PickerKind) -> ResolveResult<PickerItems> {
        self.load_picker(kind, true).await
    }

    async fn load_picker(&mut self, kind: PickerKind, forced: bool) -> ResolveResult<PickerItems> {
        let items = match kind {
            PickerKind::Maker => {
                let makers = self.load_makers(forced).await;
                self.makers = Some(makers.clone());
                PickerItems::Labels(makers)
            }
            PickerKind::Model => {
                self.require_maker()?;
                let models = self.load_models(forced).await;
                self.models = Some(models.clone());
                PickerItems::Labels(models)
            }
            PickerKind::Trim => {
                self.require_model()?;
                let trims = self.load_trims(forced).await;
                self.trims = Some(trims.clone());
                PickerItems::Trims(trims)
            }
        };

        Ok(self.filter(items))
    }

    fn filter(&self, items: PickerItems) -> PickerItems {
        let query = self.search.as_str();
        match items {
            PickerItems::Labels(labels) => PickerItems::Labels(
                labels
                    .into_iter()
                    .filter(|label| collation::matches_search(label, query))
                    .collect(),
            ),
            PickerItems::Trims(rows) => PickerItems::Trims(
                rows.into_iter()
                    .filter(|row| collation::matches_search(row.label(), query))
                    .collect(),
            ),
        }
    }

    fn require_maker(&self) -> ResolveResult<()> {
        if self.state.has_maker() {
            Ok(())
        } else {
            Err(ResolveError::PreconditionFailed(SELECT_MAKE_FIRST.to_string()))
        }
    }

    fn require_model(&self) -> ResolveResult<()> {
        self.require_maker()?;
        if self.state.has_model() {
            Ok(())
        } else {
            Err(ResolveError::PreconditionFailed(SELECT_MODEL_FIRST.to_string()))
        }
    }

    // ========================================================================
    // Cache read-through
    // ========================================================================

    async fn load_makers(&mut self, forced: bool) -> Vec<String> {
        let key = CacheKey::makers();
        if !forced {
            if let Some(makers) = self.cache.get_labels(&key) {
                return makers;
            }
        }

        match self.catalog.list_makers(forced).await {
            Ok(makers) => {
                info!(count = makers.len(), forced, "Loaded makers");
                self.cache.put_labels(key, makers)
            }
            Err(e) => {
                warn!(error = %e, "Maker list unavailable, presenting empty list");
                Vec::new()
            }
        }
    }

    async fn load_models(&mut self, forced: bool) -> Vec<String> {
        let maker = self.state.maker.clone();
        let year = self.state.year;
        let key = CacheKey::models(&maker, year);
        if !forced {
            if let Some(models) = self.cache.get_labels(&key) {
                return models;
            }
        }

        match self.catalog.list_models(&maker, year, forced).await {
            Ok(models) => {
                info!(maker = %maker, year = ?year, count = models.len(), forced, "Loaded models");
                self.cache.put_labels(key, models)
            }
            Err(e) => {
                warn!(maker = %maker, error = %e, "Model list unavailable, presenting empty list");
                Vec::new()
            }
        }
    }

    async fn load_trims(&mut self, forced: bool) -> Vec<TrimRow> {
        let maker = self.state.maker.clone();
        let model = self.state.model.clone();
        let year = self.state.year;
        let key = CacheKey::trims(&maker, &model, year);
        if !forced {
            if let Some(trims) = self.cache.get_trims(&key) {
                return trims;
            }
        }

        match self.catalog.list_trims(&maker, &model, year, forced).await {
            Ok(trims) => {
                let trims = collation::dedupe_trims(trims);
                info!(
                    maker = %maker,
                    model = %model,
                    year = ?year,
                    count = trims.len(),
                    forced,
                    "Loaded trims"
                );
                self.cache.put_trims(key, trims.clone());
                trims
            }
            Err(e) => {
                warn!(
                    maker = %maker,
                    model = %model,
                    error = %e,
                    "Trim list unavailable, presenting empty list"
                );
                Vec::new()
            }
        }
    }
}
