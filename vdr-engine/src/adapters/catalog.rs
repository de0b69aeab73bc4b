//! Hierarchical Catalog Adapter
//!
//! Reaches the make → model → trim catalog through the application backend, which
//! pre-aggregates and caches it server-side.
//!
//! # API Reference
//! - `GET {backend-base}/car-data/makers`
//! - `GET {backend-base}/car-data/models?maker=&year=`
//! - `GET {backend-base}/car-data/trims?maker=&model=&year=`
//! - Each accepts `refresh=true` to bypass the server cache.
//! - Response: `{ "data": [...] }`; optional `X-API-Key` request header.
//!
//! # Self-healing retry
//! The server cache is populated asynchronously, so a first query can race an empty
//! cache. A non-forced query that comes back empty (or fails) is repeated exactly once
//! with `refresh=true`. See [`with_refresh_retry`].

use super::{build_http_client, endpoint, CatalogError, CatalogSource};
use crate::config::EngineConfig;
use crate::normalizer::{self, CatalogResponse};
use crate::types::TrimRow;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

/// Header carrying the optional backend API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Run a catalog query with the bounded one-shot refresh policy
///
/// **Algorithm:**
/// 1. Call `fetch(forced)`
/// 2. If the query was already forced, return its outcome as-is
/// 3. If it returned a non-empty list, return it
/// 4. Otherwise (empty list or error) call `fetch(true)` once and return that outcome
///
/// At most two calls are made per logical query.
pub async fn with_refresh_retry<T, F, Fut>(
    query: &str,
    forced: bool,
    mut fetch: F,
) -> Result<Vec<T>, CatalogError>
where
    F: FnMut(bool) -> Fut,
    Fut: Future<Output = Result<Vec<T>, CatalogError>>,
{
    let first = fetch(forced).await;
    if forced {
        return first;
    }

    let retry = match &first {
        Ok(items) => items.is_empty(),
        Err(e) => {
            warn!(query, error = %e, "Catalog request failed, retrying once with refresh");
            true
        }
    };
    if !retry {
        return first;
    }

    debug!(query, "Retrying catalog query with refresh=true");
    let second = fetch(true).await;

    if let Ok(items) = &second {
        debug!(query, count = items.len(), "Catalog refresh retry complete");
    }
    second
}

/// Catalog backend client
pub struct HttpCatalog {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCatalog {
    pub fn new(config: &EngineConfig) -> vdr_common::Result<Self> {
        Ok(Self {
            http_client: build_http_client(config)?,
            base_url: config.catalog_base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch the raw `data` array of one catalog resource
    async fn fetch_data(
        &self,
        resource: &str,
        params: &[(&str, String)],
        refresh: bool,
    ) -> Result<Vec<Value>, CatalogError> {
        let url = endpoint(&self.base_url, &format!("car-data/{}", resource));

        let mut query: Vec<(&str, String)> = params.to_vec();
        if refresh {
            query.push(("refresh", "true".to_string()));
        }

        debug!(url = %url, params = ?query, "Querying catalog");

        let mut request = self.http_client.get(&url).query(&query);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("Catalog request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), body));
        }

        let payload: CatalogResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("Failed to parse catalog response: {}", e)))?;

        Ok(payload.data)
    }

    async fn fetch_labels(
        &self,
        resource: &str,
        params: &[(&str, String)],
        refresh: bool,
    ) -> Result<Vec<String>, CatalogError> {
        let data = self.fetch_data(resource, params, refresh).await?;
        Ok(normalizer::labels_from_catalog(&data))
    }

    async fn fetch_trims(
        &self,
        params: &[(&str, String)],
        refresh: bool,
    ) -> Result<Vec<TrimRow>, CatalogError> {
        let data = self.fetch_data("trims", params, refresh).await?;
        Ok(normalizer::trims_from_catalog(data))
    }
}

const NO_PARAMS: &[(&str, String)] = &[];

fn with_year(
    mut params: Vec<(&'static str, String)>,
    year: Option<u16>,
) -> Vec<(&'static str, String)> {
    if let Some(year) = year {
        params.push(("year", year.to_string()));
    }
    params
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn list_makers(&self, refresh: bool) -> Result<Vec<String>, CatalogError> {
        with_refresh_retry("makers", refresh, |forced| {
            self.fetch_labels("makers", NO_PARAMS, forced)
        })
        .await
    }

    async fn list_models(
        &self,
        maker: &str,
        year: Option<u16>,
        refresh: bool,
    ) -> Result<Vec<String>, CatalogError> {
        let params = with_year(vec![("maker", maker.to_string())], year);
        with_refresh_retry("models", refresh, |forced| {
            self.fetch_labels("models", &params, forced)
        })
        .await
    }

    async fn list_trims(
        &self,
        maker: &str,
        model: &str,
        year: Option<u16>,
        refresh: bool,
    ) -> Result<Vec<TrimRow>, CatalogError> {
        let params = with_year(
            vec![("maker", maker.to_string()), ("model", model.to_string())],
            year,
        );
        with_refresh_retry("trims", refresh, |forced| self.fetch_trims(&params, forced)).await
    }
}
