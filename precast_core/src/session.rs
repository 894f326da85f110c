//! # Calculator Session
//!
//! Holds the in-progress state of one calculator form: the raw text and unit
//! of every dimension field, the quantity, and the last computed result.
//!
//! ## States
//!
//! ```text
//! Empty ──edit──▶ Editing ──calculate()──▶ Computed
//!                   ▲                         │
//!                   └──────────edit───────────┘
//! ```
//!
//! - Every value, unit, quantity, formula or density edit clears the result.
//! - `calculate()` is the only way to reach `Computed`; nothing recomputes
//!   in the background.
//! - Invalid text leaves the result unset and returns the error.
//! - Switching shape starts over from `Empty`.
//!
//! ## Example
//!
//! ```rust
//! use precast_core::density::{DensityTable, ShapeKind};
//! use precast_core::session::{CalculatorSession, Field, SessionState};
//! use precast_core::units::LengthUnit;
//!
//! let mut session = CalculatorSession::new(ShapeKind::Cylinder, LengthUnit::Inches);
//! session.set_value(Field::Diameter, "24").unwrap();
//! session.set_value(Field::Height, "12").unwrap();
//! assert_eq!(session.state(), SessionState::Editing);
//!
//! let output = session.calculate(&DensityTable::default()).unwrap();
//! assert!((output.volume.cubic_feet.0 - std::f64::consts::PI).abs() < 1e-9);
//! assert_eq!(session.state(), SessionState::Computed);
//!
//! session.set_value(Field::Height, "abc").unwrap();
//! assert!(session.result().is_none());
//! assert!(session.calculate(&DensityTable::default()).is_err());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::{
    calculate_with_density, CalculationOutput, CylinderInput, PrismInput, ShapeRequest, TubeInput,
    WallAssemblyInput, WallFormula,
};
use crate::density::{Density, DensityTable, ShapeKind};
use crate::dimensions::Dimension;
use crate::errors::{CalcError, CalcResult};
use crate::units::LengthUnit;

/// Lifecycle state of a calculator form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Freshly opened, every field at its default
    Empty,
    /// At least one field changed since the last calculation
    Editing,
    /// A result is available for the current inputs
    Computed,
}

/// Dimension fields a calculator form may show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Length,
    Width,
    Height,
    Diameter,
    OuterDiameter,
    InnerDiameter,
    Depth,
    WallHeight1,
    WallHeight2,
    WallHeight3,
    BaseThickness,
    BaseExtension,
    WallThickness,
    LidThickness,
}

impl Field {
    /// Field name as used in error messages and JSON
    pub fn name(&self) -> &'static str {
        match self {
            Field::Length => "length",
            Field::Width => "width",
            Field::Height => "height",
            Field::Diameter => "diameter",
            Field::OuterDiameter => "outer_diameter",
            Field::InnerDiameter => "inner_diameter",
            Field::Depth => "depth",
            Field::WallHeight1 => "wall_height_1",
            Field::WallHeight2 => "wall_height_2",
            Field::WallHeight3 => "wall_height_3",
            Field::BaseThickness => "base_thickness",
            Field::BaseExtension => "base_extension",
            Field::WallThickness => "wall_thickness",
            Field::LidThickness => "lid_thickness",
        }
    }

    /// Fields shown for a shape, in form order
    pub fn for_shape(kind: ShapeKind) -> &'static [Field] {
        match kind {
            ShapeKind::Prism => &[Field::Length, Field::Width, Field::Height],
            ShapeKind::Cylinder => &[Field::Diameter, Field::Height],
            ShapeKind::Tube => &[Field::OuterDiameter, Field::InnerDiameter, Field::Depth],
            ShapeKind::WallAssembly => &[
                Field::Length,
                Field::Width,
                Field::WallHeight1,
                Field::WallHeight2,
                Field::WallHeight3,
                Field::BaseThickness,
                Field::BaseExtension,
                Field::WallThickness,
                Field::LidThickness,
            ],
        }
    }

    /// Optional fields may be left blank
    pub fn is_optional(&self) -> bool {
        matches!(self, Field::WallHeight2 | Field::WallHeight3)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Raw form entry for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub text: String,
    pub unit: LengthUnit,
}

/// State of a single calculator form.
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    kind: ShapeKind,
    state: SessionState,
    default_unit: LengthUnit,
    entries: HashMap<Field, FieldEntry>,
    quantity_text: String,
    formula: WallFormula,
    density_override: Option<Density>,
    result: Option<CalculationOutput>,
}

impl CalculatorSession {
    /// Open a calculator with every dimension at zero in `default_unit` and a quantity of 1.
    pub fn new(kind: ShapeKind, default_unit: LengthUnit) -> Self {
        let entries = Field::for_shape(kind)
            .iter()
            .map(|&field| {
                (
                    field,
                    FieldEntry {
                        text: "0".to_string(),
                        unit: default_unit,
                    },
                )
            })
            .collect();

        CalculatorSession {
            kind,
            state: SessionState::Empty,
            default_unit,
            entries,
            quantity_text: "1".to_string(),
            formula: WallFormula::default(),
            density_override: None,
            result: None,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Last computed result, if the inputs have not changed since
    pub fn result(&self) -> Option<&CalculationOutput> {
        self.result.as_ref()
    }

    /// Raw entry for a field shown by this shape
    pub fn entry(&self, field: Field) -> Option<&FieldEntry> {
        self.entries.get(&field)
    }

    pub fn quantity_text(&self) -> &str {
        &self.quantity_text
    }

    pub fn formula(&self) -> WallFormula {
        self.formula
    }

    pub fn density_override(&self) -> Option<Density> {
        self.density_override
    }

    /// Replace the text of a field
    pub fn set_value(&mut self, field: Field, text: impl Into<String>) -> CalcResult<()> {
        let entry = self.entry_mut(field)?;
        entry.text = text.into();
        self.mark_edited();
        Ok(())
    }

    /// Change the unit of a field, keeping its text
    pub fn set_unit(&mut self, field: Field, unit: LengthUnit) -> CalcResult<()> {
        let entry = self.entry_mut(field)?;
        entry.unit = unit;
        self.mark_edited();
        Ok(())
    }

    /// Replace value and unit together
    pub fn set_dimension(&mut self, field: Field, dimension: Dimension) -> CalcResult<()> {
        let entry = self.entry_mut(field)?;
        entry.text = dimension.value.to_string();
        entry.unit = dimension.unit;
        self.mark_edited();
        Ok(())
    }

    pub fn set_quantity(&mut self, text: impl Into<String>) {
        self.quantity_text = text.into();
        self.mark_edited();
    }

    /// Select the wall formula (wall assemblies only)
    pub fn set_formula(&mut self, formula: WallFormula) {
        self.formula = formula;
        self.mark_edited();
    }

    /// Use a specific density instead of the table entry for this shape
    pub fn set_density_override(&mut self, density: Option<Density>) {
        self.density_override = density;
        self.mark_edited();
    }

    /// Start over with another shape; all fields return to their defaults.
    pub fn switch_shape(&mut self, kind: ShapeKind) {
        debug!(from = %self.kind, to = %kind, "calculator shape switched");
        *self = CalculatorSession::new(kind, self.default_unit);
    }

    /// Build a typed request from the current text.
    pub fn request(&self) -> CalcResult<ShapeRequest> {
        let quantity = self.parse_quantity()?;
        let request = match self.kind {
            ShapeKind::Prism => ShapeRequest::Prism(PrismInput {
                length: self.dimension(Field::Length)?,
                width: self.dimension(Field::Width)?,
                height: self.dimension(Field::Height)?,
                quantity,
            }),
            ShapeKind::Cylinder => ShapeRequest::Cylinder(CylinderInput {
                diameter: self.dimension(Field::Diameter)?,
                height: self.dimension(Field::Height)?,
                quantity,
            }),
            ShapeKind::Tube => ShapeRequest::Tube(TubeInput {
                outer_diameter: self.dimension(Field::OuterDiameter)?,
                inner_diameter: self.dimension(Field::InnerDiameter)?,
                depth: self.dimension(Field::Depth)?,
                quantity,
            }),
            ShapeKind::WallAssembly => {
                let mut wall_heights = vec![self.dimension(Field::WallHeight1)?];
                for field in [Field::WallHeight2, Field::WallHeight3] {
                    if let Some(height) = self.optional_dimension(field)? {
                        wall_heights.push(height);
                    }
                }
                ShapeRequest::WallAssembly(WallAssemblyInput {
                    length: self.dimension(Field::Length)?,
                    width: self.dimension(Field::Width)?,
                    wall_heights,
                    base_thickness: self.dimension(Field::BaseThickness)?,
                    base_extension: self.dimension(Field::BaseExtension)?,
                    wall_thickness: self.dimension(Field::WallThickness)?,
                    lid_thickness: self.dimension(Field::LidThickness)?,
                    quantity,
                    formula: self.formula,
                })
            }
        };
        Ok(request)
    }

    /// Run the calculation for the current inputs.
    ///
    /// On success the session moves to `Computed`. On failure the result stays
    /// unset and the error is returned.
    pub fn calculate(&mut self, densities: &DensityTable) -> CalcResult<&CalculationOutput> {
        let density = self
            .density_override
            .unwrap_or_else(|| densities.for_shape(self.kind));

        let computed = self
            .request()
            .and_then(|request| calculate_with_density(&request, density));

        match computed {
            Ok(output) => {
                self.state = SessionState::Computed;
                Ok(&*self.result.insert(output))
            }
            Err(e) => {
                self.result = None;
                if self.state == SessionState::Computed {
                    self.state = SessionState::Editing;
                }
                debug!(shape = %self.kind, error = %e, "calculator input rejected");
                Err(e)
            }
        }
    }

    fn mark_edited(&mut self) {
        self.result = None;
        self.state = SessionState::Editing;
    }

    fn entry_mut(&mut self, field: Field) -> CalcResult<&mut FieldEntry> {
        let kind = self.kind;
        self.entries.get_mut(&field).ok_or_else(|| {
            CalcError::invalid_input(
                field.name(),
                kind.display_name(),
                format!("Field is not part of the {} calculator", kind),
            )
        })
    }

    fn dimension(&self, field: Field) -> CalcResult<Dimension> {
        let entry = self
            .entries
            .get(&field)
            .ok_or_else(|| CalcError::missing_field(field.name()))?;
        Dimension::parse_value(field.name(), &entry.text, entry.unit)
    }

    fn optional_dimension(&self, field: Field) -> CalcResult<Option<Dimension>> {
        match self.entries.get(&field) {
            Some(entry) if !entry.text.trim().is_empty() => self.dimension(field).map(Some),
            _ => Ok(None),
        }
    }

    fn parse_quantity(&self) -> CalcResult<u32> {
        let trimmed = self.quantity_text.trim();
        if trimmed.is_empty() {
            return Err(CalcError::missing_field("quantity"));
        }
        trimmed
            .parse()
            .map_err(|_| CalcError::invalid_input("quantity", trimmed, "Quantity must be a whole number"))
    }
}
