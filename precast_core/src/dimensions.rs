//! # Dimensions
//!
//! A [`Dimension`] is one linear measurement: a non-negative value paired with
//! the unit it was entered in. Calculators never mutate a dimension; a form
//! edit replaces the pair wholesale.
//!
//! ## Text Input
//!
//! Form fields arrive as text. [`Dimension::parse_value`] turns a field's text
//! plus its selected unit into a dimension, and [`Dimension::parse_with_default`]
//! accepts a unit suffix inline (`"12in"`, `"2.5 ft"`, `"30cm"`).
//!
//! ```rust
//! use precast_core::dimensions::Dimension;
//! use precast_core::units::LengthUnit;
//!
//! let d = Dimension::parse_with_default("18in", LengthUnit::Feet).unwrap();
//! assert_eq!(d.unit, LengthUnit::Inches);
//! assert_eq!(d.to_feet().0, 1.5);
//!
//! assert!(Dimension::parse_value("length", "twelve", LengthUnit::Feet).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{to_canonical, CanonicalUnit, Feet, LengthUnit, Meters};

/// One linear measurement with its own unit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimension {
    /// Magnitude in `unit`; must be finite and ≥ 0 to be used in a calculation
    pub value: f64,
    /// Unit the value is expressed in
    pub unit: LengthUnit,
}

impl Dimension {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Dimension { value, unit }
    }

    /// Zero in the given unit (the state of a freshly opened calculator)
    pub fn zero(unit: LengthUnit) -> Self {
        Dimension { value: 0.0, unit }
    }

    pub fn inches(value: f64) -> Self {
        Dimension::new(value, LengthUnit::Inches)
    }

    pub fn feet(value: f64) -> Self {
        Dimension::new(value, LengthUnit::Feet)
    }

    pub fn yards(value: f64) -> Self {
        Dimension::new(value, LengthUnit::Yards)
    }

    pub fn meters(value: f64) -> Self {
        Dimension::new(value, LengthUnit::Meters)
    }

    pub fn centimeters(value: f64) -> Self {
        Dimension::new(value, LengthUnit::Centimeters)
    }

    /// Value in feet, without validation
    pub fn to_feet(&self) -> Feet {
        Feet(to_canonical(self.value, self.unit, CanonicalUnit::Feet))
    }

    /// Value in meters, without validation
    pub fn to_meters(&self) -> Meters {
        Meters(to_canonical(self.value, self.unit, CanonicalUnit::Meters))
    }

    /// Same length expressed in another unit
    pub fn convert_to(&self, unit: LengthUnit) -> Dimension {
        Dimension::new(unit.from_feet(self.to_feet().0), unit)
    }

    /// Check the value is usable in a formula.
    ///
    /// `field` names the input in the returned error.
    pub fn validate(&self, field: &str) -> CalcResult<()> {
        if !self.value.is_finite() {
            return Err(CalcError::invalid_input(
                field,
                self.value.to_string(),
                "Value must be a finite number",
            ));
        }
        if self.value < 0.0 {
            return Err(CalcError::invalid_input(
                field,
                self.to_string(),
                "Dimension cannot be negative",
            ));
        }
        Ok(())
    }

    /// Validate, then convert to feet
    pub fn checked_feet(&self, field: &str) -> CalcResult<Feet> {
        self.validate(field)?;
        Ok(self.to_feet())
    }

    /// Parse the text of a form field whose unit is chosen separately.
    ///
    /// Blank text is a missing field; anything that is not a finite,
    /// non-negative number is invalid.
    pub fn parse_value(field: &str, text: &str, unit: LengthUnit) -> CalcResult<Dimension> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CalcError::missing_field(field));
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| CalcError::invalid_input(field, trimmed, "Not a number"))?;
        let dim = Dimension::new(value, unit);
        dim.validate(field)?;
        Ok(dim)
    }

    /// Parse a number with an optional unit suffix (`"12in"`, `"2 ft"`, `"1.5"`).
    ///
    /// A bare number takes `default_unit`.
    pub fn parse_with_default(text: &str, default_unit: LengthUnit) -> CalcResult<Dimension> {
        let (number, suffix) = split_numeric_prefix(text.trim());

        let unit = if suffix.trim().is_empty() {
            default_unit
        } else {
            LengthUnit::from_str_flexible(suffix)?
        };
        Dimension::parse_value("dimension", number, unit)
    }
}

/// Split `text` after its longest leading number (`"1.5e1ft"` → `("1.5e1", "ft")`).
///
/// Returns `("", text)` when no prefix is a number.
pub(crate) fn split_numeric_prefix(text: &str) -> (&str, &str) {
    let split_at = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .rev()
        .find(|&i| i > 0 && text[..i].trim().parse::<f64>().is_ok())
        .unwrap_or(0);
    text.split_at(split_at)
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

impl std::str::FromStr for Dimension {
    type Err = CalcError;

    /// Parse with feet as the unit for bare numbers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::parse_with_default(s, LengthUnit::Feet)
    }
}
