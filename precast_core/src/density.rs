//! # Concrete Density
//!
//! Weight is derived from volume with a fixed density per shape category.
//! The density is configuration, not a literal buried in a formula: each
//! calculator reads it from a [`DensityTable`], and a caller may override it
//! for a single calculation.
//!
//! ## Default Constants
//!
//! | Shape | Default |
//! |-------|---------|
//! | Rectangular prism | 4050 lb/yd³ |
//! | Solid cylinder | 2400 kg/m³ |
//! | Annular tube | 150 lb/ft³ |
//! | Wall assembly | 4000 lb/yd³ |
//!
//! These figures differ by shape for historical reasons rather than because
//! the concrete differs; plants that cast one mix everywhere should set all
//! four to the same value.
//!
//! ```rust
//! use precast_core::density::{Density, DensityTable, ShapeKind};
//! use precast_core::units::CubicFeet;
//!
//! let table = DensityTable::default();
//! let lbs = table.for_shape(ShapeKind::Prism).weight_lbs(CubicFeet(27.0)).unwrap();
//! assert_eq!(lbs.0, 4050.0);
//!
//! let uniform = DensityTable::uniform(Density::LbPerCubicFoot(145.0));
//! assert_eq!(uniform.tube, Density::LbPerCubicFoot(145.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::dimensions::split_numeric_prefix;
use crate::errors::{CalcError, CalcResult};
use crate::units::{CubicFeet, CubicMeters, CubicYards, Kilograms, Pounds};

/// Default rectangular prism density (lb/yd³)
pub const PRISM_DENSITY_LB_PER_YD3: f64 = 4050.0;

/// Default solid cylinder density (kg/m³)
pub const CYLINDER_DENSITY_KG_PER_M3: f64 = 2400.0;

/// Default annular tube density (lb/ft³)
pub const TUBE_DENSITY_LB_PER_FT3: f64 = 150.0;

/// Default wall assembly density (lb/yd³)
pub const WALL_ASSEMBLY_DENSITY_LB_PER_YD3: f64 = 4000.0;

/// Shape categories the calculators cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Prism,
    Cylinder,
    Tube,
    WallAssembly,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Prism,
        ShapeKind::Cylinder,
        ShapeKind::Tube,
        ShapeKind::WallAssembly,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeKind::Prism => "Rectangular Prism",
            ShapeKind::Cylinder => "Round",
            ShapeKind::Tube => "Tube",
            ShapeKind::WallAssembly => "Wall Assembly",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Weight per unit volume, in the unit system it was specified in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value")]
pub enum Density {
    /// Pounds per cubic foot
    #[serde(rename = "lb/ft3")]
    LbPerCubicFoot(f64),
    /// Pounds per cubic yard
    #[serde(rename = "lb/yd3")]
    LbPerCubicYard(f64),
    /// Kilograms per cubic meter
    #[serde(rename = "kg/m3")]
    KgPerCubicMeter(f64),
}

impl Density {
    /// Raw numeric value in its own unit
    pub fn value(&self) -> f64 {
        match self {
            Density::LbPerCubicFoot(v) | Density::LbPerCubicYard(v) | Density::KgPerCubicMeter(v) => *v,
        }
    }

    /// Unit label (e.g., "lb/yd³")
    pub fn unit_label(&self) -> &'static str {
        match self {
            Density::LbPerCubicFoot(_) => "lb/ft³",
            Density::LbPerCubicYard(_) => "lb/yd³",
            Density::KgPerCubicMeter(_) => "kg/m³",
        }
    }

    /// Reject non-finite or non-positive densities
    pub fn validate(&self) -> CalcResult<()> {
        let v = self.value();
        if !v.is_finite() || v <= 0.0 {
            return Err(CalcError::invalid_input(
                "density",
                self.to_string(),
                "Density must be a positive number",
            ));
        }
        Ok(())
    }

    /// Weight in pounds of `volume` cubic feet of material.
    ///
    /// The volume is first expressed in the density's own volume unit, so a
    /// lb/yd³ density multiplies cubic yards and a kg/m³ density multiplies
    /// cubic meters. A weight too large to represent is an error.
    pub fn weight_lbs(&self, volume: CubicFeet) -> CalcResult<Pounds> {
        let pounds = match *self {
            Density::LbPerCubicFoot(d) => Pounds(volume.0 * d),
            Density::LbPerCubicYard(d) => {
                let yd3: CubicYards = volume.into();
                Pounds(yd3.0 * d)
            }
            Density::KgPerCubicMeter(d) => {
                let m3: CubicMeters = volume.into();
                Kilograms(m3.0 * d).into()
            }
        };
        if !pounds.0.is_finite() {
            return Err(CalcError::invalid_input(
                "weight",
                pounds.0.to_string(),
                "Result exceeds representable range",
            ));
        }
        Ok(pounds)
    }
}

impl std::fmt::Display for Density {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value(), self.unit_label())
    }
}

impl std::str::FromStr for Density {
    type Err = CalcError;

    /// Parse `"150 lb/ft3"`, `"4050lb/yd3"`, `"2400 kg/m3"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (number, unit) = split_numeric_prefix(trimmed);
        if unit.trim().is_empty() {
            return Err(CalcError::invalid_input(
                "density",
                trimmed,
                "Density needs a unit (lb/ft3, lb/yd3, kg/m3)",
            ));
        }
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| CalcError::invalid_input("density", trimmed, "Not a number"))?;

        let density = match unit.trim().to_lowercase().replace('³', "3").replace(' ', "").as_str() {
            "lb/ft3" | "pcf" => Density::LbPerCubicFoot(value),
            "lb/yd3" => Density::LbPerCubicYard(value),
            "kg/m3" => Density::KgPerCubicMeter(value),
            _ => return Err(CalcError::invalid_input("density", trimmed, "Unknown density unit")),
        };
        density.validate()?;
        Ok(density)
    }
}

/// One density per shape category.
///
/// Stored in workbook settings so a plant can tune its constants once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityTable {
    pub prism: Density,
    pub cylinder: Density,
    pub tube: Density,
    pub wall_assembly: Density,
}

impl Default for DensityTable {
    fn default() -> Self {
        DensityTable {
            prism: Density::LbPerCubicYard(PRISM_DENSITY_LB_PER_YD3),
            cylinder: Density::KgPerCubicMeter(CYLINDER_DENSITY_KG_PER_M3),
            tube: Density::LbPerCubicFoot(TUBE_DENSITY_LB_PER_FT3),
            wall_assembly: Density::LbPerCubicYard(WALL_ASSEMBLY_DENSITY_LB_PER_YD3),
        }
    }
}

impl DensityTable {
    /// Same density for every shape
    pub fn uniform(density: Density) -> Self {
        DensityTable {
            prism: density,
            cylinder: density,
            tube: density,
            wall_assembly: density,
        }
    }

    /// Density configured for a shape category
    pub fn for_shape(&self, kind: ShapeKind) -> Density {
        match kind {
            ShapeKind::Prism => self.prism,
            ShapeKind::Cylinder => self.cylinder,
            ShapeKind::Tube => self.tube,
            ShapeKind::WallAssembly => self.wall_assembly,
        }
    }

    /// Replace the density for one shape category
    pub fn with_shape(mut self, kind: ShapeKind, density: Density) -> Self {
        match kind {
            ShapeKind::Prism => self.prism = density,
            ShapeKind::Cylinder => self.cylinder = density,
            ShapeKind::Tube => self.tube = density,
            ShapeKind::WallAssembly => self.wall_assembly = density,
        }
        self
    }

    /// Validate every entry
    pub fn validate(&self) -> CalcResult<()> {
        for kind in ShapeKind::ALL {
            self.for_shape(kind).validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lb_per_yd3_uses_cubic_yards() {
        let lbs = Density::LbPerCubicYard(4050.0).weight_lbs(CubicFeet(1.0)).unwrap();
        assert_relative_eq!(lbs.0, 150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lb_per_ft3_uses_cubic_feet() {
        let lbs = Density::LbPerCubicFoot(150.0).weight_lbs(CubicFeet(2.0)).unwrap();
        assert_eq!(lbs.0, 300.0);
    }

    #[test]
    fn test_kg_per_m3_path() {
        // 1 ft³ = 0.0283168 m³ → 67.96 kg → 149.83 lb
        let lbs = Density::KgPerCubicMeter(2400.0).weight_lbs(CubicFeet(1.0)).unwrap();
        let kg: Kilograms = lbs.into();
        assert_relative_eq!(kg.0, 0.0283168 * 2400.0, epsilon = 1e-9);
        assert_relative_eq!(lbs.0, 149.83, epsilon = 0.01);
    }

    #[test]
    fn test_overflowing_weight_rejected() {
        let err = Density::LbPerCubicFoot(150.0).weight_lbs(CubicFeet(f64::MAX)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(Density::KgPerCubicMeter(2400.0).weight_lbs(CubicFeet(f64::MAX)).is_err());
        assert_eq!(Density::LbPerCubicFoot(150.0).weight_lbs(CubicFeet(0.0)).unwrap().0, 0.0);
    }

    #[test]
    fn test_defaults_per_shape() {
        let table = DensityTable::default();
        assert_eq!(table.for_shape(ShapeKind::Prism), Density::LbPerCubicYard(4050.0));
        assert_eq!(table.for_shape(ShapeKind::Cylinder), Density::KgPerCubicMeter(2400.0));
        assert_eq!(table.for_shape(ShapeKind::Tube), Density::LbPerCubicFoot(150.0));
        assert_eq!(table.for_shape(ShapeKind::WallAssembly), Density::LbPerCubicYard(4000.0));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_with_shape_override() {
        let table = DensityTable::default().with_shape(ShapeKind::Tube, Density::LbPerCubicFoot(145.0));
        assert_eq!(table.tube, Density::LbPerCubicFoot(145.0));
        assert_eq!(table.prism, DensityTable::default().prism);
    }

    #[test]
    fn test_invalid_density_rejected() {
        assert!(Density::LbPerCubicFoot(0.0).validate().is_err());
        assert!(Density::LbPerCubicYard(-10.0).validate().is_err());
        assert!(Density::KgPerCubicMeter(f64::NAN).validate().is_err());
        let table = DensityTable::default().with_shape(ShapeKind::Cylinder, Density::LbPerCubicFoot(0.0));
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_parse_density() {
        assert_eq!("150 lb/ft3".parse::<Density>().unwrap(), Density::LbPerCubicFoot(150.0));
        assert_eq!("4050lb/yd3".parse::<Density>().unwrap(), Density::LbPerCubicYard(4050.0));
        assert_eq!("2400 kg/m³".parse::<Density>().unwrap(), Density::KgPerCubicMeter(2400.0));
        assert_eq!("145 pcf".parse::<Density>().unwrap(), Density::LbPerCubicFoot(145.0));
        assert_eq!("2.4e3 kg/m3".parse::<Density>().unwrap(), Density::KgPerCubicMeter(2400.0));
        assert!("lb/ft3".parse::<Density>().is_err());
        assert!("150".parse::<Density>().is_err());
        assert!("150 lb/gal".parse::<Density>().is_err());
        assert!("0 lb/ft3".parse::<Density>().is_err());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Density::LbPerCubicYard(4000.0)).unwrap();
        assert_eq!(json, r#"{"unit":"lb/yd3","value":4000.0}"#);

        let table = DensityTable::default();
        let json = serde_json::to_string_pretty(&table).unwrap();
        let roundtrip: DensityTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, roundtrip);
    }
}
