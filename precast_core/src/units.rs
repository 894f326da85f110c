//! # Unit Types
//!
//! Length units accepted by the calculators, the conversion table to the
//! canonical unit, and lightweight newtype wrappers for the volume and weight
//! figures a calculation reports.
//!
//! ## Canonical Unit
//!
//! Every calculator converts its inputs to **feet** before applying a formula.
//! Meters are available as an alternate canonical unit for callers that work
//! in metric, but the shape formulas never see anything other than feet.
//!
//! Conversion factors:
//!
//! | Unit | to feet | to meters |
//! |------|---------|-----------|
//! | inches | ÷ 12 | × 0.0254 |
//! | feet | × 1 | × 0.3048 |
//! | yards | × 3 | × 0.9144 |
//! | meters | ÷ 0.3048 | × 1 |
//! | centimeters | ÷ 30.48 | ÷ 100 |
//!
//! ## Example
//!
//! ```rust
//! use precast_core::units::{to_canonical, CanonicalUnit, CubicFeet, CubicYards, LengthUnit};
//!
//! let ft = to_canonical(18.0, LengthUnit::Inches, CanonicalUnit::Feet);
//! assert_eq!(ft, 1.5);
//!
//! let yd3: CubicYards = CubicFeet(27.0).into();
//! assert_eq!(yd3.0, 1.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

use crate::errors::{CalcError, CalcResult};

/// Cubic meters per cubic foot, as used for display and export figures
pub const CUBIC_METERS_PER_CUBIC_FOOT: f64 = 0.0283168;

/// Cubic feet per cubic yard
pub const CUBIC_FEET_PER_CUBIC_YARD: f64 = 27.0;

/// Kilograms per pound
pub const KILOGRAMS_PER_POUND: f64 = 0.453592;

/// Pounds per short ton
pub const POUNDS_PER_TON: f64 = 2000.0;

// ============================================================================
// Length Units
// ============================================================================

/// Linear length units a dimension may be entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[serde(rename = "in")]
    Inches,
    #[default]
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "yd")]
    Yards,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "cm")]
    Centimeters,
}

impl LengthUnit {
    /// All length units for UI selection
    pub const ALL: [LengthUnit; 5] = [
        LengthUnit::Inches,
        LengthUnit::Feet,
        LengthUnit::Yards,
        LengthUnit::Meters,
        LengthUnit::Centimeters,
    ];

    /// Short symbol (e.g., "in", "ft")
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Inches => "in",
            LengthUnit::Feet => "ft",
            LengthUnit::Yards => "yd",
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LengthUnit::Inches => "Inches",
            LengthUnit::Feet => "Feet",
            LengthUnit::Yards => "Yards",
            LengthUnit::Meters => "Meters",
            LengthUnit::Centimeters => "Centimeters",
        }
    }

    /// Parse from common string representations ("in", "inch", "\"", "FT", "metres", ...)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" | "inch" | "inches" | "\"" => Ok(LengthUnit::Inches),
            "ft" | "foot" | "feet" | "'" => Ok(LengthUnit::Feet),
            "yd" | "yard" | "yards" => Ok(LengthUnit::Yards),
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(LengthUnit::Meters),
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
                Ok(LengthUnit::Centimeters)
            }
            _ => Err(CalcError::invalid_input("unit", s, "Unknown length unit")),
        }
    }

    /// Convert a value in this unit to feet
    pub fn to_feet(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Inches => value / 12.0,
            LengthUnit::Feet => value,
            LengthUnit::Yards => value * 3.0,
            LengthUnit::Meters => value / 0.3048,
            LengthUnit::Centimeters => value / 30.48,
        }
    }

    /// Convert a value in this unit to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Inches => value * 0.0254,
            LengthUnit::Feet => value * 0.3048,
            LengthUnit::Yards => value * 0.9144,
            LengthUnit::Meters => value,
            LengthUnit::Centimeters => value / 100.0,
        }
    }

    /// Convert a value in feet back to this unit
    pub fn from_feet(&self, feet: f64) -> f64 {
        match self {
            LengthUnit::Inches => feet * 12.0,
            LengthUnit::Feet => feet,
            LengthUnit::Yards => feet / 3.0,
            LengthUnit::Meters => feet * 0.3048,
            LengthUnit::Centimeters => feet * 30.48,
        }
    }

    /// Convert a value in meters back to this unit
    pub fn from_meters(&self, meters: f64) -> f64 {
        match self {
            LengthUnit::Inches => meters / 0.0254,
            LengthUnit::Feet => meters / 0.3048,
            LengthUnit::Yards => meters / 0.9144,
            LengthUnit::Meters => meters,
            LengthUnit::Centimeters => meters * 100.0,
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LengthUnit::from_str_flexible(s)
    }
}

/// Unit a calculator normalizes its inputs to before applying a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CanonicalUnit {
    #[default]
    Feet,
    Meters,
}

/// Convert `value` expressed in `unit` to the canonical unit.
pub fn to_canonical(value: f64, unit: LengthUnit, canonical: CanonicalUnit) -> f64 {
    match canonical {
        CanonicalUnit::Feet => unit.to_feet(value),
        CanonicalUnit::Meters => unit.to_meters(value),
    }
}

/// Convert a canonical value back to `unit` (inverse of [`to_canonical`]).
pub fn from_canonical(value: f64, unit: LengthUnit, canonical: CanonicalUnit) -> f64 {
    match canonical {
        CanonicalUnit::Feet => unit.from_feet(value),
        CanonicalUnit::Meters => unit.from_meters(value),
    }
}

// ============================================================================
// Length
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 * 0.3048)
    }
}

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 / 0.3048)
    }
}

// ============================================================================
// Volume
// ============================================================================

/// Volume in cubic feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicFeet(pub f64);

/// Volume in cubic yards
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicYards(pub f64);

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

impl From<CubicFeet> for CubicYards {
    fn from(ft3: CubicFeet) -> Self {
        CubicYards(ft3.0 / CUBIC_FEET_PER_CUBIC_YARD)
    }
}

impl From<CubicYards> for CubicFeet {
    fn from(yd3: CubicYards) -> Self {
        CubicFeet(yd3.0 * CUBIC_FEET_PER_CUBIC_YARD)
    }
}

impl From<CubicFeet> for CubicMeters {
    fn from(ft3: CubicFeet) -> Self {
        CubicMeters(ft3.0 * CUBIC_METERS_PER_CUBIC_FOOT)
    }
}

// ============================================================================
// Weight
// ============================================================================

/// Weight in pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Weight in short tons (2000 lb)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tons(pub f64);

impl From<Pounds> for Kilograms {
    fn from(lb: Pounds) -> Self {
        Kilograms(lb.0 * KILOGRAMS_PER_POUND)
    }
}

impl From<Kilograms> for Pounds {
    fn from(kg: Kilograms) -> Self {
        Pounds(kg.0 / KILOGRAMS_PER_POUND)
    }
}

impl From<Pounds> for Tons {
    fn from(lb: Pounds) -> Self {
        Tons(lb.0 / POUNDS_PER_TON)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(Meters);
impl_arithmetic!(CubicFeet);
impl_arithmetic!(CubicYards);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(Pounds);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Tons);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inches_to_feet() {
        assert_eq!(LengthUnit::Inches.to_feet(12.0), 1.0);
        assert_eq!(LengthUnit::Inches.to_feet(30.0), 2.5);
    }

    #[test]
    fn test_factors_to_meters() {
        assert_relative_eq!(LengthUnit::Inches.to_meters(1.0), 0.0254);
        assert_relative_eq!(LengthUnit::Feet.to_meters(1.0), 0.3048);
        assert_relative_eq!(LengthUnit::Yards.to_meters(1.0), 0.9144);
        assert_relative_eq!(LengthUnit::Centimeters.to_meters(250.0), 2.5);
    }

    #[test]
    fn test_metric_to_feet() {
        assert_relative_eq!(LengthUnit::Yards.to_feet(2.0), 6.0);
        assert_relative_eq!(LengthUnit::Centimeters.to_feet(30.48), 1.0);
        assert_relative_eq!(LengthUnit::Meters.to_feet(0.3048), 1.0);
    }

    #[test]
    fn test_round_trip_every_unit() {
        let samples = [0.0, 0.125, 1.0, 7.5, 12.0, 1234.5678];
        for unit in LengthUnit::ALL {
            for canonical in [CanonicalUnit::Feet, CanonicalUnit::Meters] {
                for &value in &samples {
                    let there = to_canonical(value, unit, canonical);
                    let back = from_canonical(there, unit, canonical);
                    assert_relative_eq!(back, value, max_relative = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(LengthUnit::from_str_flexible("IN").unwrap(), LengthUnit::Inches);
        assert_eq!(LengthUnit::from_str_flexible(" feet ").unwrap(), LengthUnit::Feet);
        assert_eq!(LengthUnit::from_str_flexible("metres").unwrap(), LengthUnit::Meters);
        assert_eq!("cm".parse::<LengthUnit>().unwrap(), LengthUnit::Centimeters);
        assert!(LengthUnit::from_str_flexible("furlong").is_err());
    }

    #[test]
    fn test_volume_conversions() {
        let yd3: CubicYards = CubicFeet(1.0).into();
        assert_relative_eq!(yd3.0, 0.037037, epsilon = 1e-6);

        let m3: CubicMeters = CubicFeet(100.0).into();
        assert_relative_eq!(m3.0, 2.83168, epsilon = 1e-9);
    }

    #[test]
    fn test_weight_conversions() {
        let tons: Tons = Pounds(3000.0).into();
        assert_eq!(tons.0, 1.5);

        let kg: Kilograms = Pounds(100.0).into();
        assert_relative_eq!(kg.0, 45.3592, epsilon = 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = CubicFeet(10.0);
        let b = CubicFeet(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let unit = LengthUnit::Centimeters;
        assert_eq!(serde_json::to_string(&unit).unwrap(), "\"cm\"");

        let weight = Pounds(150.5);
        let json = serde_json::to_string(&weight).unwrap();
        assert_eq!(json, "150.5");
        let roundtrip: Pounds = serde_json::from_str(&json).unwrap();
        assert_eq!(weight, roundtrip);
    }
}
