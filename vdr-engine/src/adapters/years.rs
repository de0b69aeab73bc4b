//! Year Range Adapter
//!
//! Pass-through to the public year catalog. Years are queried rarely relative to
//! make/model, so there is no retry and no cache; any failure yields an empty list.
//!
//! # API Reference
//! - Endpoint: `GET {years-base}/?cmd=getYears&make={maker}`
//! - Response: `{ "Years": [ { "year": "2021" }, ... ] }`

use super::{build_http_client, endpoint, CatalogError, YearSource};
use crate::config::EngineConfig;
use crate::normalizer::{self, YearsResponse};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// Year catalog client
pub struct HttpYearSource {
    http_client: Client,
    base_url: String,
}

impl HttpYearSource {
    pub fn new(config: &EngineConfig) -> vdr_common::Result<Self> {
        Ok(Self {
            http_client: build_http_client(config)?,
            base_url: config.years_base_url.clone(),
        })
    }

    async fn fetch_years(&self, maker: &str) -> Result<Vec<u16>, CatalogError> {
        let url = endpoint(&self.base_url, "");

        debug!(maker = %maker, url = %url, "Querying year catalog");

        let response = self
            .http_client
            .get(&url)
            .query(&[("cmd", "getYears"), ("make", maker)])
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("Year catalog request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Api(status.as_u16(), String::new()));
        }

        let payload: YearsResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("Failed to parse year catalog: {}", e)))?;

        Ok(normalizer::years_from_payload(&payload.years))
    }
}

#[async_trait]
impl YearSource for HttpYearSource {
    async fn list_years(&self, maker: &str) -> Vec<u16> {
        match self.fetch_years(maker).await {
            Ok(years) => {
                debug!(maker = %maker, count = years.len(), "Year catalog query complete");
                years
            }
            Err(e) => {
                warn!(maker = %maker, error = %e, "Year catalog unavailable, returning no years");
                Vec::new()
            }
        }
    }
}
