//! Normalizer
//!
//! Maps the heterogeneous upstream payloads (registry flat records, catalog `data`
//! arrays of strings or objects, year lists of strings or numbers) into the canonical
//! types of [`crate::types`]. The envelope structs below are the only place raw upstream
//! shapes exist; adapters deserialize into them and immediately hand them here.

use crate::collation;
use crate::types::{TrimRow, VehicleDescriptor};
use serde::Deserialize;
use serde_json::{Map, Value};

// ============================================================================
// Upstream Envelopes
// ============================================================================

/// `DecodeVinValues` response: a flattened record per result
#[derive(Debug, Deserialize)]
pub(crate) struct RegistryResponse {
    #[serde(rename = "Results", default)]
    pub results: Vec<Map<String, Value>>,
}

/// Backend catalog response: `{ "data": [...] }`
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogResponse {
    #[serde(default)]
    pub data: Vec<Value>,
}

/// Year catalog response: `{ "Years": [{ "year": "2020" }, ...] }`
#[derive(Debug, Deserialize)]
pub(crate) struct YearsResponse {
    #[serde(rename = "Years", default)]
    pub years: Vec<Value>,
}

// ============================================================================
// VIN Registry
// ============================================================================

/// Build a descriptor from one registry record
///
/// Returns `None` when none of make, model or year could be extracted; a record holding
/// only secondary attributes does not identify a vehicle.
pub fn descriptor_from_registry(record: &Map<String, Value>) -> Option<VehicleDescriptor> {
    let descriptor = VehicleDescriptor {
        make: text(record, "Make"),
        model: text(record, "Model"),
        year: leading_int(&text(record, "ModelYear"))
            .and_then(|y| u16::try_from(y).ok())
            .unwrap_or(0),
        engine: first_non_empty(record, &["EngineModel", "EngineConfiguration"]),
        body_type: text(record, "BodyClass"),
        fuel_type: text(record, "FuelTypePrimary"),
        transmission: text(record, "TransmissionStyle"),
        drive_type: text(record, "DriveType"),
        cylinders: leading_int(&text(record, "EngineCylinders"))
            .and_then(|c| u32::try_from(c).ok())
            .unwrap_or(0),
        displacement: displacement(record),
    };

    descriptor.is_identified().then_some(descriptor)
}

fn displacement(record: &Map<String, Value>) -> String {
    let litres = text(record, "DisplacementL");
    if !litres.is_empty() {
        return format!("{}L", litres);
    }
    let cc = text(record, "DisplacementCC");
    if !cc.is_empty() {
        return format!("{}cc", cc);
    }
    String::new()
}

fn first_non_empty(record: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| text(record, key))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Field as trimmed text; absent, null and non-scalar values become empty
fn text(record: &Map<String, Value>, key: &str) -> String {
    record.get(key).map(value_text).unwrap_or_default()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Integer formed by the leading digits of `s` ("6" → 6, "6 cyl" → 6, "V6" → none)
fn leading_int(s: &str) -> Option<u64> {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

// ============================================================================
// Catalog
// ============================================================================

/// Object keys probed, in order, when a catalog item is an object rather than a string
const LABEL_KEYS: &[&str] = &["name", "label", "maker", "make", "model", "value"];

/// Maker/model labels: blank items dropped, exact duplicates removed, locale-sorted
pub fn labels_from_catalog(items: &[Value]) -> Vec<String> {
    let labels = items
        .iter()
        .map(|item| match item {
            Value::Object(obj) => LABEL_KEYS
                .iter()
                .map(|key| text(obj, key))
                .find(|label| !label.is_empty())
                .unwrap_or_default(),
            other => value_text(other),
        })
        .filter(|label| !label.is_empty())
        .collect();

    collation::sort_unique(labels)
}

/// Trim rows: label fields lifted out, everything else kept opaque, deduplicated by label
pub fn trims_from_catalog(items: Vec<Value>) -> Vec<TrimRow> {
    let rows = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(mut obj) => {
                let engine = obj.remove("engine").map(|v| value_text(&v));
                let trim_engine = obj.remove("trim_engine").map(|v| value_text(&v));
                Some(TrimRow {
                    engine,
                    trim_engine,
                    extra: obj,
                })
            }
            Value::Null => None,
            other => Some(TrimRow::with_engine(value_text(&other))),
        })
        .collect();

    collation::dedupe_trims(rows)
}

// ============================================================================
// Years
// ============================================================================

/// Years from `{ "year": "NNNN" }` entries (bare strings/numbers also accepted)
///
/// Entries that do not hold a four-digit year are skipped. Upstream order is kept.
pub fn years_from_payload(entries: &[Value]) -> Vec<u16> {
    entries
        .iter()
        .filter_map(|entry| {
            let raw = match entry {
                Value::Object(obj) => text(obj, "year"),
                other => value_text(other),
            };
            raw.parse::<u16>().ok()
        })
        .filter(|year| (1000..=9999).contains(year))
        .collect()
}
