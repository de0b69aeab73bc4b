//! Locale-aware ordering and deduplication of catalog labels
//!
//! Ordering approximates a root-locale collation: labels are compared on a folded key
//! (NFD with combining marks dropped, then lowercased) so "Škoda" sorts next to
//! "Skoda" and "audi" next to "Audi". Ties on the folded key fall back to the raw string,
//! which keeps the order total and deterministic.
//!
//! Deduplication is always by exact (case-sensitive) string equality; the first
//! occurrence wins.

use crate::types::TrimRow;
use std::cmp::Ordering;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folded comparison key for a label
pub fn collation_key(label: &str) -> String {
    label
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-aware comparison of two labels
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Drop exact duplicates (first occurrence wins) and sort ascending
pub fn sort_unique(labels: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(labels.len());
    let mut unique: Vec<(String, String)> = labels
        .into_iter()
        .filter(|label| seen.insert(label.clone()))
        .map(|label| (collation_key(&label), label))
        .collect();

    unique.sort_by(|(ka, a), (kb, b)| ka.cmp(kb).then_with(|| a.cmp(b)));
    unique.into_iter().map(|(_, label)| label).collect()
}

/// Drop rows whose resolved label was already seen (first occurrence wins), then order
/// the survivors by label
pub fn dedupe_trims(rows: Vec<TrimRow>) -> Vec<TrimRow> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut unique: Vec<TrimRow> = rows
        .into_iter()
        .filter(|row| seen.insert(row.label().to_string()))
        .collect();

    // Stable: rows keep their relative order when labels compare equal
    unique.sort_by(|a, b| locale_cmp(a.label(), b.label()));
    unique
}

/// Case-insensitive substring match used by picker search
pub fn matches_search(label: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || label.to_lowercase().contains(&query.to_lowercase())
}
