//! # Workbook Data Structures
//!
//! The `Workbook` is the root container that gets persisted. Workbooks
//! serialize to `.pcw` files as human-readable JSON; the whole structure is
//! written on every save.
//!
//! ## Structure
//!
//! ```text
//! Workbook
//! ├── meta: WorkbookMetadata (version, owner, timestamps)
//! ├── settings: CalculatorSettings (densities, default unit)
//! ├── forms: HashMap<Uuid, FormRecord>
//! └── calculations: HashMap<Uuid, SavedCalculation>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use precast_core::calculations::{ShapeRequest, CylinderInput};
//! use precast_core::dimensions::Dimension;
//! use precast_core::workbook::Workbook;
//!
//! let mut workbook = Workbook::new("Yard Office");
//! let id = workbook.add_calculation("Round base", ShapeRequest::Cylinder(CylinderInput {
//!     diameter: Dimension::inches(48.0),
//!     height: Dimension::inches(8.0),
//!     quantity: 6,
//! }));
//!
//! let output = workbook.recalculate(&id).unwrap();
//! assert!(output.weight.pounds.0 > 0.0);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{calculate_with_density, CalculationOutput, ShapeRequest};
use crate::density::{Density, DensityTable};
use crate::errors::{CalcError, CalcResult};
use crate::records::FormRecord;
use crate::units::LengthUnit;

/// Current schema version for .pcw files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root workbook container.
///
/// Records are stored in flat UUID-keyed maps so ids stay stable when
/// records are renamed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    pub meta: WorkbookMetadata,

    #[serde(default)]
    pub settings: CalculatorSettings,

    #[serde(default)]
    pub forms: HashMap<Uuid, FormRecord>,

    #[serde(default)]
    pub calculations: HashMap<Uuid, SavedCalculation>,
}

impl Workbook {
    /// Create a new empty workbook.
    pub fn new(owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Workbook {
            meta: WorkbookMetadata {
                version: SCHEMA_VERSION.to_string(),
                owner: owner.into(),
                created: now,
                modified: now,
            },
            settings: CalculatorSettings::default(),
            forms: HashMap::new(),
            calculations: HashMap::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    // ------------------------------------------------------------------
    // Forms
    // ------------------------------------------------------------------

    /// Add a form record. Returns the UUID assigned to it.
    pub fn add_form(&mut self, form: FormRecord) -> CalcResult<Uuid> {
        form.validate()?;
        let id = Uuid::new_v4();
        self.forms.insert(id, form);
        self.touch();
        Ok(id)
    }

    /// Replace a form record wholesale, keeping its creation time.
    pub fn update_form(&mut self, id: &Uuid, mut form: FormRecord) -> CalcResult<()> {
        form.validate()?;
        let existing = self
            .forms
            .get_mut(id)
            .ok_or_else(|| CalcError::record_not_found("Form", id))?;
        form.created = existing.created;
        form.modified = Utc::now();
        *existing = form;
        self.touch();
        Ok(())
    }

    /// Remove a form record by UUID.
    pub fn remove_form(&mut self, id: &Uuid) -> Option<FormRecord> {
        let form = self.forms.remove(id);
        if form.is_some() {
            self.touch();
        }
        form
    }

    pub fn get_form(&self, id: &Uuid) -> Option<&FormRecord> {
        self.forms.get(id)
    }

    /// Mutable access to a form; marks the workbook modified.
    pub fn get_form_mut(&mut self, id: &Uuid) -> Option<&mut FormRecord> {
        if self.forms.contains_key(id) {
            self.touch();
            self.forms.get_mut(id)
        } else {
            None
        }
    }

    /// Forms sorted by name (case-insensitive), then creation time and id
    pub fn forms_by_name(&self) -> Vec<(&Uuid, &FormRecord)> {
        let mut forms: Vec<_> = self.forms.iter().collect();
        forms.sort_by_cached_key(|(id, form)| (form.name.to_lowercase(), form.created, **id));
        forms
    }

    // ------------------------------------------------------------------
    // Saved calculations
    // ------------------------------------------------------------------

    /// Save a calculation request under a label. Returns the UUID assigned to it.
    pub fn add_calculation(&mut self, label: impl Into<String>, request: ShapeRequest) -> Uuid {
        let id = Uuid::new_v4();
        self.calculations.insert(id, SavedCalculation::new(label, request));
        self.touch();
        id
    }

    /// Remove a saved calculation by UUID.
    pub fn remove_calculation(&mut self, id: &Uuid) -> Option<SavedCalculation> {
        let item = self.calculations.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_calculation(&self, id: &Uuid) -> Option<&SavedCalculation> {
        self.calculations.get(id)
    }

    /// Mutable access to a saved calculation; marks the workbook modified.
    pub fn get_calculation_mut(&mut self, id: &Uuid) -> Option<&mut SavedCalculation> {
        if self.calculations.contains_key(id) {
            self.touch();
            self.calculations.get_mut(id)
        } else {
            None
        }
    }

    /// Recompute one saved calculation with the workbook's settings.
    pub fn recalculate(&self, id: &Uuid) -> CalcResult<CalculationOutput> {
        let saved = self
            .calculations
            .get(id)
            .ok_or_else(|| CalcError::record_not_found("Saved calculation", id))?;
        saved.calculate(&self.settings.densities)
    }

    /// Recompute every saved calculation, sorted by label, then creation time and id.
    ///
    /// One invalid entry does not stop the others.
    pub fn recalculate_all(&self) -> Vec<(Uuid, &SavedCalculation, CalcResult<CalculationOutput>)> {
        let mut rows: Vec<_> = self
            .calculations
            .iter()
            .map(|(id, saved)| (*id, saved, saved.calculate(&self.settings.densities)))
            .collect();
        rows.sort_by(|a, b| {
            a.1.label
                .cmp(&b.1.label)
                .then(a.1.created.cmp(&b.1.created))
                .then(a.0.cmp(&b.0))
        });
        rows
    }

    pub fn item_count(&self) -> usize {
        self.forms.len() + self.calculations.len()
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Workbook::new("")
    }
}

/// Workbook metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Plant or person the workbook belongs to
    pub owner: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Calculator configuration shared by everything in a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculatorSettings {
    /// Density per shape category
    #[serde(default)]
    pub densities: DensityTable,

    /// Unit new calculator fields start in
    #[serde(default)]
    pub default_unit: LengthUnit,
}

/// A calculation request kept for later recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCalculation {
    /// User label (e.g., "MH-1 base", "Vault lid run")
    pub label: String,

    pub request: ShapeRequest,

    /// Replaces the workbook density for this item only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_override: Option<Density>,

    pub created: DateTime<Utc>,
}

impl SavedCalculation {
    pub fn new(label: impl Into<String>, request: ShapeRequest) -> Self {
        SavedCalculation {
            label: label.into(),
            request,
            density_override: None,
            created: Utc::now(),
        }
    }

    pub fn with_density(mut self, density: Density) -> Self {
        self.density_override = Some(density);
        self
    }

    /// Calculate using the override if set, otherwise the table entry for the shape.
    pub fn calculate(&self, densities: &DensityTable) -> CalcResult<CalculationOutput> {
        let density = self
            .density_override
            .unwrap_or_else(|| densities.for_shape(self.request.kind()));
        calculate_with_density(&self.request, density)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{PrismInput, TubeInput};
    use crate::density::ShapeKind;
    use crate::dimensions::Dimension;
    use crate::records::DocumentRef;
    use approx::assert_relative_eq;

    fn cube(quantity: u32) -> ShapeRequest {
        ShapeRequest::Prism(PrismInput {
            length: Dimension::feet(1.0),
            width: Dimension::feet(1.0),
            height: Dimension::feet(1.0),
            quantity,
        })
    }

    #[test]
    fn test_workbook_creation() {
        let workbook = Workbook::new("North Plant");
        assert_eq!(workbook.meta.owner, "North Plant");
        assert_eq!(workbook.meta.version, SCHEMA_VERSION);
        assert_eq!(workbook.item_count(), 0);
        assert_eq!(workbook.settings.densities, DensityTable::default());
    }

    #[test]
    fn test_form_crud() {
        let mut workbook = Workbook::new("Plant");
        let id = workbook.add_form(FormRecord::new("Vault 4x6", "")).unwrap();
        assert!(workbook.get_form(&id).is_some());

        let mut edited = FormRecord::new("Vault 4x6 (rev B)", "new lid");
        edited.attach_document(DocumentRef::link("Spec", "https://example.com/v46")).unwrap();
        let created = workbook.get_form(&id).unwrap().created;
        workbook.update_form(&id, edited).unwrap();

        let form = workbook.get_form(&id).unwrap();
        assert_eq!(form.name, "Vault 4x6 (rev B)");
        assert_eq!(form.created, created);
        assert_eq!(form.documents.len(), 1);

        assert!(workbook.remove_form(&id).is_some());
        assert!(workbook.remove_form(&id).is_none());
    }

    #[test]
    fn test_update_missing_form() {
        let mut workbook = Workbook::new("Plant");
        let err = workbook.update_form(&Uuid::new_v4(), FormRecord::new("X", "")).unwrap_err();
        assert_eq!(err.error_code(), "RECORD_NOT_FOUND");
    }

    #[test]
    fn test_invalid_form_not_added() {
        let mut workbook = Workbook::new("Plant");
        assert!(workbook.add_form(FormRecord::new("", "")).is_err());
        assert!(workbook.forms.is_empty());
    }

    #[test]
    fn test_forms_sorted_by_name() {
        let mut workbook = Workbook::new("Plant");
        workbook.add_form(FormRecord::new("catch basin", "")).unwrap();
        workbook.add_form(FormRecord::new("Box culvert", "")).unwrap();
        workbook.add_form(FormRecord::new("Manhole", "")).unwrap();
        let names: Vec<_> = workbook.forms_by_name().iter().map(|(_, f)| f.name.as_str()).collect();
        assert_eq!(names, vec!["Box culvert", "catch basin", "Manhole"]);
    }

    #[test]
    fn test_recalculate_uses_settings() {
        let mut workbook = Workbook::new("Plant");
        let id = workbook.add_calculation("Cube", cube(1));

        let default_output = workbook.recalculate(&id).unwrap();
        assert_relative_eq!(default_output.weight.pounds.0, 150.0, epsilon = 1e-9);

        workbook.settings.densities = workbook
            .settings
            .densities
            .with_shape(ShapeKind::Prism, Density::LbPerCubicFoot(140.0));
        assert_relative_eq!(workbook.recalculate(&id).unwrap().weight.pounds.0, 140.0);
    }

    #[test]
    fn test_density_override_wins() {
        let mut workbook = Workbook::new("Plant");
        let id = workbook.add_calculation("Cube", cube(2));
        workbook.get_calculation_mut(&id).unwrap().density_override = Some(Density::LbPerCubicFoot(100.0));
        assert_relative_eq!(workbook.recalculate(&id).unwrap().weight.pounds.0, 200.0);
    }

    #[test]
    fn test_recalculate_all_isolates_errors() {
        let mut workbook = Workbook::new("Plant");
        workbook.add_calculation("B cube", cube(1));
        workbook.add_calculation(
            "A bad tube",
            ShapeRequest::Tube(TubeInput {
                outer_diameter: Dimension::feet(1.0),
                inner_diameter: Dimension::feet(2.0),
                depth: Dimension::feet(1.0),
                quantity: 1,
            }),
        );

        let rows = workbook.recalculate_all();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1.label, "A bad tube");
        assert!(rows[0].2.is_err());
        assert!(rows[1].2.is_ok());
    }

    #[test]
    fn test_duplicate_labels_ordered_by_creation() {
        let mut workbook = Workbook::new("Plant");
        let later = workbook.add_calculation("Lid", cube(2));
        let earlier = workbook.add_calculation("Lid", cube(1));
        let base = Utc::now();
        workbook.get_calculation_mut(&later).unwrap().created = base + chrono::Duration::seconds(5);
        workbook.get_calculation_mut(&earlier).unwrap().created = base;

        for _ in 0..3 {
            let ids: Vec<_> = workbook.recalculate_all().iter().map(|row| row.0).collect();
            assert_eq!(ids, vec![earlier, later]);
        }
    }

    #[test]
    fn test_same_label_and_time_ordered_by_id() {
        let mut workbook = Workbook::new("Plant");
        let now = Utc::now();
        let mut ids = Vec::new();
        for _ in 0..4 {
            let id = workbook.add_calculation("Lid", cube(1));
            workbook.get_calculation_mut(&id).unwrap().created = now;
            ids.push(id);
        }
        ids.sort();
        let ordered: Vec<_> = workbook.recalculate_all().iter().map(|row| row.0).collect();
        assert_eq!(ordered, ids);
    }

    #[test]
    fn test_missing_calculation() {
        let workbook = Workbook::new("Plant");
        assert!(workbook.recalculate(&Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_workbook_serialization() {
        let mut workbook = Workbook::new("Serial Plant");
        workbook.add_form(FormRecord::new("Lid", "")).unwrap();
        workbook.add_calculation("Cube", cube(3));

        let json = serde_json::to_string_pretty(&workbook).unwrap();
        assert!(json.contains("Serial Plant"));
        assert!(json.contains("\"shape\": \"Prism\""));

        let roundtrip: Workbook = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.owner, "Serial Plant");
        assert_eq!(roundtrip.forms.len(), 1);
        assert_eq!(roundtrip.calculations, workbook.calculations);
    }

    #[test]
    fn test_settings_default_when_absent() {
        let workbook = Workbook::new("Plant");
        let mut json = serde_json::to_value(&workbook).unwrap();
        json.as_object_mut().unwrap().remove("settings");
        let roundtrip: Workbook = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip.settings, CalculatorSettings::default());
    }
}
