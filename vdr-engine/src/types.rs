//! Core types for vdr-engine
//!
//! Canonical shapes that every adapter normalizes into. Raw upstream payloads never
//! leave the adapter/normalizer boundary; everything past it speaks these types.

use crate::collation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Vehicle Descriptor
// ============================================================================

/// Canonical vehicle description produced by VIN decoding or a completed manual selection
///
/// Unknown values use sentinels: empty string for text, 0 for `year` and `cylinders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDescriptor {
    pub make: String,
    pub model: String,
    /// Four-digit model year, 0 when unknown
    pub year: u16,
    /// Engine label (engine model code, else engine configuration)
    pub engine: String,
    pub body_type: String,
    pub fuel_type: String,
    pub transmission: String,
    pub drive_type: String,
    pub cylinders: u32,
    /// Displacement with unit suffix ("3.0L", "2998cc"), empty when unknown
    pub displacement: String,
}

impl VehicleDescriptor {
    /// True when at least one of make/model/year is known
    pub fn is_identified(&self) -> bool {
        !self.make.is_empty() || !self.model.is_empty() || self.year != 0
    }

    /// Names of every field still holding its "unknown" sentinel
    pub fn unknown_fields(&self) -> Vec<&'static str> {
        let text_fields = [
            ("make", &self.make),
            ("model", &self.model),
            ("engine", &self.engine),
            ("bodyType", &self.body_type),
            ("fuelType", &self.fuel_type),
            ("transmission", &self.transmission),
            ("driveType", &self.drive_type),
            ("displacement", &self.displacement),
        ];

        let mut unknown: Vec<&'static str> = text_fields
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();

        if self.year == 0 {
            unknown.push("year");
        }
        if self.cylinders == 0 {
            unknown.push("cylinders");
        }
        unknown
    }

    /// "YEAR MAKE MODEL" with unknown parts omitted
    pub fn display_name(&self) -> String {
        let year = (self.year != 0).then(|| self.year.to_string());
        [year.as_deref(), Some(self.make.as_str()), Some(self.model.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// One node of the make → model → trim hierarchy with its ordered-unique child labels
///
/// Labels are unique (case-sensitive) and kept in locale-aware ascending order; the
/// constructor enforces both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// `None` for the root node (the maker list)
    pub maker: Option<String>,
    pub model: Option<String>,
    pub year: Option<u16>,
    labels: Vec<String>,
}

impl CatalogEntry {
    pub fn new(
        maker: Option<String>,
        model: Option<String>,
        year: Option<u16>,
        labels: Vec<String>,
    ) -> Self {
        Self {
            maker,
            model,
            year,
            labels: collation::sort_unique(labels),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Raw catalog leaf: an engine/trim label plus opaque descriptive fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrimRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_engine: Option<String>,
    /// Remaining upstream fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrimRow {
    /// Row carrying only an `engine` label
    pub fn with_engine(engine: impl Into<String>) -> Self {
        Self {
            engine: Some(engine.into()),
            ..Self::default()
        }
    }

    /// Display label: `engine`, else `trim_engine`, else empty
    ///
    /// A value that is empty or only whitespace counts as absent, so a blank `engine`
    /// falls through to `trim_engine`.
    pub fn label(&self) -> &str {
        [self.engine.as_deref(), self.trim_engine.as_deref()]
            .into_iter()
            .flatten()
            .find(|label| !label.trim().is_empty())
            .unwrap_or("")
    }
}

// ============================================================================
// Cascading Selection
// ============================================================================

/// Option lists the cascading flow can present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerKind {
    Maker,
    Model,
    Trim,
}

impl PickerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickerKind::Maker => "maker",
            PickerKind::Model => "model",
            PickerKind::Trim => "trim",
        }
    }
}

/// Current choices of the cascading flow; empty string / `None` means "not chosen"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub maker: String,
    pub model: String,
    pub year: Option<u16>,
    pub engine: String,
}

impl SelectionState {
    pub fn has_maker(&self) -> bool {
        !self.maker.is_empty()
    }

    pub fn has_model(&self) -> bool {
        !self.model.is_empty()
    }

    /// Descriptor carrying the chosen make/model/year/engine; all other fields unknown
    pub fn to_descriptor(&self) -> VehicleDescriptor {
        VehicleDescriptor {
            make: self.maker.clone(),
            model: self.model.clone(),
            year: self.year.unwrap_or(0),
            engine: self.engine.clone(),
            ..VehicleDescriptor::default()
        }
    }
}

/// Items presented by a picker
#[derive(Debug, Clone, PartialEq)]
pub enum PickerItems {
    Labels(Vec<String>),
    Trims(Vec<TrimRow>),
}

impl PickerItems {
    /// Display labels in presentation order
    pub fn labels(&self) -> Vec<String> {
        match self {
            PickerItems::Labels(labels) => labels.clone(),
            PickerItems::Trims(rows) => rows.iter().map(|r| r.label().to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PickerItems::Labels(labels) => labels.len(),
            PickerItems::Trims(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_lists_sentinels() {
        let descriptor = VehicleDescriptor {
            make: "HONDA".into(),
            model: "ACCORD".into(),
            year: 2003,
            cylinders: 6,
            displacement: "3.0L".into(),
            ..VehicleDescriptor::default()
        };

        let unknown = descriptor.unknown_fields();
        assert_eq!(
            unknown,
            vec!["engine", "bodyType", "fuelType", "transmission", "driveType"]
        );
        assert!(descriptor.is_identified());
    }

    #[test]
    fn test_default_descriptor_is_unidentified() {
        let descriptor = VehicleDescriptor::default();
        assert!(!descriptor.is_identified());
        assert_eq!(descriptor.unknown_fields().len(), 10);
        assert_eq!(descriptor.display_name(), "");
    }

    #[test]
    fn test_display_name_skips_unknown_parts() {
        let descriptor = VehicleDescriptor {
            make: "Toyota".into(),
            model: "Camry".into(),
            ..VehicleDescriptor::default()
        };
        assert_eq!(descriptor.display_name(), "Toyota Camry");

        let descriptor = VehicleDescriptor {
            year: 2020,
            ..descriptor
        };
        assert_eq!(descriptor.display_name(), "2020 Toyota Camry");
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let value = serde_json::to_value(VehicleDescriptor::default()).unwrap();
        assert!(value.get("bodyType").is_some());
        assert!(value.get("driveType").is_some());
        assert_eq!(value["year"], json!(0));
    }

    #[test]
    fn test_trim_label_fallbacks() {
        assert_eq!(TrimRow::with_engine("2.0L").label(), "2.0L");

        let row = TrimRow {
            engine: Some("  ".into()),
            trim_engine: Some("1.5L Turbo".into()),
            ..TrimRow::default()
        };
        assert_eq!(row.label(), "1.5L Turbo");

        assert_eq!(TrimRow::default().label(), "");
    }

    #[test]
    fn test_trim_row_keeps_extra_fields() {
        let row: TrimRow = serde_json::from_value(json!({
            "engine": "3.5L V6",
            "trim": "XLE",
            "hp": 301
        }))
        .unwrap();

        assert_eq!(row.label(), "3.5L V6");
        assert_eq!(row.extra.get("trim"), Some(&json!("XLE")));
        assert_eq!(row.extra.get("hp"), Some(&json!(301)));
    }

    #[test]
    fn test_catalog_entry_orders_labels() {
        let entry = CatalogEntry::new(
            Some("Toyota".into()),
            None,
            Some(2020),
            vec!["Corolla".into(), "Camry".into(), "Corolla".into()],
        );
        assert_eq!(entry.labels(), &["Camry".to_string(), "Corolla".to_string()]);
    }

    #[test]
    fn test_selection_descriptor() {
        let state = SelectionState {
            maker: "Toyota".into(),
            model: "Camry".into(),
            year: Some(2020),
            engine: "2.5L".into(),
        };
        let descriptor = state.to_descriptor();
        assert_eq!(descriptor.make, "Toyota");
        assert_eq!(descriptor.year, 2020);
        assert_eq!(descriptor.engine, "2.5L");
        assert_eq!(descriptor.cylinders, 0);
    }
}
