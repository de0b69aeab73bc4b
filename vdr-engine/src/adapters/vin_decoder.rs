//! VIN Registry Adapter
//!
//! Decodes a VIN through the public registry's flattened endpoint.
//!
//! # API Reference
//! - Endpoint: `GET {registry-base}/DecodeVinValues/{vin}?format=json`
//! - Response: `{ "Results": [ { "Make": ..., "Model": ..., "ModelYear": ..., ... } ] }`
//! - Only `Results[0]` is read.

use super::{build_http_client, endpoint, VinDecoder};
use crate::config::EngineConfig;
use crate::error::{ResolveError, ResolveResult};
use crate::normalizer::{self, RegistryResponse};
use crate::types::VehicleDescriptor;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

/// VIN registry client
pub struct RegistryVinDecoder {
    http_client: Client,
    base_url: String,
}

impl RegistryVinDecoder {
    pub fn new(config: &EngineConfig) -> vdr_common::Result<Self> {
        Ok(Self {
            http_client: build_http_client(config)?,
            base_url: config.registry_base_url.clone(),
        })
    }

    async fn fetch_record(&self, vin: &str) -> ResolveResult<RegistryResponse> {
        let url = endpoint(&self.base_url, &format!("DecodeVinValues/{}", vin));

        debug!(vin = %vin, url = %url, "Querying VIN registry");

        let response = self
            .http_client
            .get(&url)
            .query(&[("format", "json")])
            .send()
            .await
            .map_err(|e| ResolveError::DecodeFailed(format!("Registry request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::DecodeFailed(format!(
                "Registry returned status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ResolveError::DecodeFailed(format!("Failed to parse registry response: {}", e)))
    }
}

#[async_trait]
impl VinDecoder for RegistryVinDecoder {
    fn name(&self) -> &'static str {
        "VinRegistry"
    }

    async fn decode_vin(&self, vin: &str) -> ResolveResult<VehicleDescriptor> {
        let payload = self.fetch_record(vin).await?;

        let descriptor = payload
            .results
            .first()
            .and_then(normalizer::descriptor_from_registry)
            .ok_or_else(|| ResolveError::NotFound(vin.to_string()))?;

        info!(
            vin = %vin,
            make = %descriptor.make,
            model = %descriptor.model,
            year = descriptor.year,
            unknown = ?descriptor.unknown_fields(),
            "Decoded VIN"
        );

        Ok(descriptor)
    }
}
