//! Vehicle resolver facade
//!
//! Entry point for the external collaborators (VIN form, picker modal, advice screens).
//! Wires an [`EngineConfig`] into the three adapters and owns one
//! [`SelectionCoordinator`] for the manual entry flow.

use crate::adapters::{
    CatalogSource, HttpCatalog, HttpYearSource, RegistryVinDecoder, VinDecoder, YearSource,
};
use crate::config::EngineConfig;
use crate::coordinator::SelectionCoordinator;
use crate::error::{ResolveError, ResolveResult};
use crate::types::VehicleDescriptor;
use crate::vin::normalize_vin;
use std::sync::Arc;
use tracing::{debug, info};

pub struct VehicleResolver {
    vin_decoder: Arc<dyn VinDecoder>,
    years: Arc<dyn YearSource>,
    coordinator: SelectionCoordinator,
}

impl VehicleResolver {
    pub fn new(
        vin_decoder: Arc<dyn VinDecoder>,
        catalog: Arc<dyn CatalogSource>,
        years: Arc<dyn YearSource>,
    ) -> Self {
        Self {
            vin_decoder,
            years,
            coordinator: SelectionCoordinator::new(catalog),
        }
    }

    /// Build the HTTP adapters from `config`
    pub fn from_config(config: &EngineConfig) -> vdr_common::Result<Self> {
        debug!(
            registry = %config.registry_base_url,
            catalog = %config.catalog_base_url,
            years = %config.years_base_url,
            api_key = config.api_key.is_some(),
            "Building vehicle resolver"
        );

        Ok(Self::new(
            Arc::new(RegistryVinDecoder::new(config)?),
            Arc::new(HttpCatalog::new(config)?),
            Arc::new(HttpYearSource::new(config)?),
        ))
    }

    /// Validate and normalize `raw`, then decode it
    ///
    /// # Errors
    /// - `InvalidInput` for a malformed VIN (nothing is sent)
    /// - `NotFound` when the registry cannot identify the vehicle
    /// - `DecodeFailed` when the registry is unreachable or errors
    pub async fn decode_vin(&self, raw: &str) -> ResolveResult<VehicleDescriptor> {
        let vin = normalize_vin(raw)?;
        debug!(vin = %vin, source = self.vin_decoder.name(), "Decoding VIN");
        self.vin_decoder.decode_vin(&vin).await
    }

    /// Years offered for `maker`; empty for a blank maker or on upstream failure
    pub async fn list_years(&self, maker: &str) -> Vec<u16> {
        let maker = maker.trim();
        if maker.is_empty() {
            return Vec::new();
        }
        self.years.list_years(maker).await
    }

    pub fn coordinator(&self) -> &SelectionCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut SelectionCoordinator {
        &mut self.coordinator
    }

    /// Descriptor from the manual selection
    ///
    /// # Errors
    /// `InvalidInput` unless both make and model have been chosen.
    pub fn resolve_manual(&self) -> ResolveResult<VehicleDescriptor> {
        let state = self.coordinator.state();
        if !state.has_maker() || !state.has_model() {
            return Err(ResolveError::InvalidInput(
                "make and model are required for manual entry".to_string(),
            ));
        }

        let descriptor = self.coordinator.descriptor();
        info!(
            vehicle = %descriptor.display_name(),
            engine = %descriptor.engine,
            "Resolved vehicle from manual selection"
        );
        Ok(descriptor)
    }
}
