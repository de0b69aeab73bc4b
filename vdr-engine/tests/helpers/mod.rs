//! Test Helper Utilities
//!
//! Shared utilities for testing vdr-engine without network access:
//! - `spawn_upstream`: serves an axum router on an ephemeral loopback port
//! - `scripted`: a GET route replaying canned responses and recording every request
//! - `FakeCatalog`: in-process `CatalogSource` with queued outcomes and a call log

#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::extract::Query;
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use vdr_engine::adapters::{CatalogError, CatalogSource};
use vdr_engine::TrimRow;

// ============================================================================
// Fake upstream HTTP server
// ============================================================================

/// One request seen by a scripted route
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub api_key: Option<String>,
}

impl RecordedRequest {
    pub fn is_refresh(&self) -> bool {
        self.query.get("refresh").map(String::as_str) == Some("true")
    }
}

pub type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

/// GET route answering the n-th request with `responses[n]` (the last one repeats)
pub fn scripted(responses: Vec<(StatusCode, Value)>) -> (MethodRouter, RequestLog) {
    assert!(!responses.is_empty(), "scripted route needs at least one response");

    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let responses = Arc::new(responses);
    let handler_log = log.clone();

    let route = get(
        move |uri: Uri, headers: HeaderMap, Query(query): Query<HashMap<String, String>>| {
            let log = handler_log.clone();
            let responses = responses.clone();
            async move {
                let index = {
                    let mut log = log.lock().unwrap();
                    let index = log.len().min(responses.len() - 1);
                    log.push(RecordedRequest {
                        path: uri.path().to_string(),
                        query,
                        api_key: headers
                            .get("x-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                    });
                    index
                };
                let (status, body) = responses[index].clone();
                (status, Json(body))
            }
        },
    );

    (route, log)
}

/// Serve `router` on 127.0.0.1 and return its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn requests(log: &RequestLog) -> Vec<RecordedRequest> {
    log.lock().unwrap().clone()
}

// ============================================================================
// Fake catalog source
// ============================================================================

/// Call received by `FakeCatalog`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    Makers { refresh: bool },
    Models { maker: String, year: Option<u16>, refresh: bool },
    Trims { maker: String, model: String, year: Option<u16>, refresh: bool },
}

/// `CatalogSource` replaying queued outcomes; an exhausted queue answers `Ok(vec![])`
#[derive(Default)]
pub struct FakeCatalog {
    makers: Mutex<VecDeque<Result<Vec<String>, CatalogError>>>,
    models: Mutex<VecDeque<Result<Vec<String>, CatalogError>>>,
    trims: Mutex<VecDeque<Result<Vec<TrimRow>, CatalogError>>>,
    calls: Mutex<Vec<CatalogCall>>,
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_makers(&self, outcome: Result<Vec<&str>, CatalogError>) {
        self.makers.lock().unwrap().push_back(outcome.map(owned));
    }

    pub fn push_models(&self, outcome: Result<Vec<&str>, CatalogError>) {
        self.models.lock().unwrap().push_back(outcome.map(owned));
    }

    pub fn push_trims(&self, outcome: Result<Vec<TrimRow>, CatalogError>) {
        self.trims.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: CatalogCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn owned(labels: Vec<&str>) -> Vec<String> {
    labels.into_iter().map(str::to_string).collect()
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn list_makers(&self, refresh: bool) -> Result<Vec<String>, CatalogError> {
        self.record(CatalogCall::Makers { refresh });
        self.makers.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
    }

    async fn list_models(
        &self,
        maker: &str,
        year: Option<u16>,
        refresh: bool,
    ) -> Result<Vec<String>, CatalogError> {
        self.record(CatalogCall::Models {
            maker: maker.to_string(),
            year,
            refresh,
        });
        self.models.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
    }

    async fn list_trims(
        &self,
        maker: &str,
        model: &str,
        year: Option<u16>,
        refresh: bool,
    ) -> Result<Vec<TrimRow>, CatalogError> {
        self.record(CatalogCall::Trims {
            maker: maker.to_string(),
            model: model.to_string(),
            year,
            refresh,
        });
        self.trims.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
    }
}
