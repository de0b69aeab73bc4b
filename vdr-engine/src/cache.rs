//! Per-session result cache for catalog queries
//!
//! Keyed by (picker kind, maker, model?, year?). Entries are created on the first
//! successful response for a key, including an empty list after the refresh retry, and
//! are replaced only by a forced refresh. There is no time-based expiry.

use crate::types::{CatalogEntry, PickerKind, TrimRow};
use std::collections::HashMap;
use tracing::debug;

/// Composite cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: PickerKind,
    pub maker: Option<String>,
    pub model: Option<String>,
    pub year: Option<u16>,
}

impl CacheKey {
    pub fn makers() -> Self {
        Self {
            kind: PickerKind::Maker,
            maker: None,
            model: None,
            year: None,
        }
    }

    pub fn models(maker: &str, year: Option<u16>) -> Self {
        Self {
            kind: PickerKind::Model,
            maker: Some(maker.to_string()),
            model: None,
            year,
        }
    }

    pub fn trims(maker: &str, model: &str, year: Option<u16>) -> Self {
        Self {
            kind: PickerKind::Trim,
            maker: Some(maker.to_string()),
            model: Some(model.to_string()),
            year,
        }
    }
}

#[derive(Debug, Clone)]
enum Cached {
    Labels(CatalogEntry),
    Trims(Vec<TrimRow>),
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// In-memory, per-session cache
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<CacheKey, Cached>,
    hits: u64,
    misses: u64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached maker/model labels for `key`
    pub fn get_labels(&mut self, key: &CacheKey) -> Option<Vec<String>> {
        let found = match self.entries.get(key) {
            Some(Cached::Labels(entry)) => Some(entry.labels().to_vec()),
            _ => None,
        };
        self.record(key, found.is_some());
        found
    }

    /// Cached trim rows for `key`
    pub fn get_trims(&mut self, key: &CacheKey) -> Option<Vec<TrimRow>> {
        let found = match self.entries.get(key) {
            Some(Cached::Trims(rows)) => Some(rows.clone()),
            _ => None,
        };
        self.record(key, found.is_some());
        found
    }

    /// Store labels (normalized into a [`CatalogEntry`]) and return them in stored order
    pub fn put_labels(&mut self, key: CacheKey, labels: Vec<String>) -> Vec<String> {
        let entry = CatalogEntry::new(key.maker.clone(), key.model.clone(), key.year, labels);
        let stored = entry.labels().to_vec();
        self.entries.insert(key, Cached::Labels(entry));
        stored
    }

    pub fn put_trims(&mut self, key: CacheKey, rows: Vec<TrimRow>) {
        self.entries.insert(key, Cached::Trims(rows));
    }

    /// Drop one entry; returns whether it existed
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    fn record(&mut self, key: &CacheKey, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        debug!(
            kind = key.kind.as_str(),
            maker = ?key.maker,
            model = ?key.model,
            year = ?key.year,
            hit,
            hits = self.hits,
            misses = self.misses,
            "Result cache lookup"
        );
    }
}
