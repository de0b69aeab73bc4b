//! Upstream source adapters
//!
//! Three independent sources with different trust levels and failure modes sit behind
//! the traits below:
//! - [`VinDecoder`]: public VIN registry. Failures propagate (`NotFound` vs `DecodeFailed`).
//! - [`CatalogSource`]: application backend catalog (make → model → trim). Failures are
//!   reported as [`CatalogError`] and degraded to empty lists by the coordinator.
//! - [`YearSource`]: public year catalog. Failures degrade to an empty list in the adapter.
//!
//! The HTTP implementations take an explicit [`EngineConfig`](crate::config::EngineConfig).

pub mod catalog;
pub mod vin_decoder;
pub mod years;

pub use catalog::{with_refresh_retry, HttpCatalog, API_KEY_HEADER};
pub use vin_decoder::RegistryVinDecoder;
pub use years::HttpYearSource;

use crate::config::EngineConfig;
use crate::error::{ResolveError, ResolveResult};
use crate::types::{TrimRow, VehicleDescriptor};
use async_trait::async_trait;
use thiserror::Error;

/// Catalog adapter errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<CatalogError> for ResolveError {
    fn from(err: CatalogError) -> Self {
        ResolveError::CatalogUnavailable(err.to_string())
    }
}

/// VIN registry lookup
///
/// Input is an already-normalized VIN (see [`crate::vin::normalize_vin`]).
#[async_trait]
pub trait VinDecoder: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &'static str;

    /// Decode `vin` into a descriptor
    ///
    /// # Errors
    /// - `NotFound` when the registry answered without make, model or year
    /// - `DecodeFailed` on network failure, non-success status, or unreadable payload
    async fn decode_vin(&self, vin: &str) -> ResolveResult<VehicleDescriptor>;
}

/// Hierarchical make → model → trim catalog
///
/// `refresh = true` asks the backend to bypass its own cache. Returned lists are already
/// normalized: deduplicated and locale-sorted.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_makers(&self, refresh: bool) -> Result<Vec<String>, CatalogError>;

    async fn list_models(
        &self,
        maker: &str,
        year: Option<u16>,
        refresh: bool,
    ) -> Result<Vec<String>, CatalogError>;

    async fn list_trims(
        &self,
        maker: &str,
        model: &str,
        year: Option<u16>,
        refresh: bool,
    ) -> Result<Vec<TrimRow>, CatalogError>;
}

/// Model years offered for a make
#[async_trait]
pub trait YearSource: Send + Sync {
    /// Years for `maker`; empty on any failure
    async fn list_years(&self, maker: &str) -> Vec<u16>;
}

/// Shared HTTP client for one adapter
pub(crate) fn build_http_client(config: &EngineConfig) -> vdr_common::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| vdr_common::Error::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// `base` + `path` with exactly one slash between them
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
