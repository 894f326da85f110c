//! # Volume & Weight Calculations
//!
//! Every calculator follows the same pattern:
//!
//! - `*Input` - Dimensions (each with its own unit) plus a quantity (JSON-serializable)
//! - `volume()` - Validates the input and returns total volume in cubic feet
//! - `calculate(input, density) -> CalcResult<CalculationOutput>` - Pure calculation function
//!
//! [`ShapeRequest`] wraps the four inputs in a tagged union and [`calculate`]
//! dispatches on it, reading the density for the shape from a [`DensityTable`].
//!
//! ## Available Calculators
//!
//! - [`prism`] - Rectangular prism (slabs, blocks, pads)
//! - [`cylinder`] - Solid cylinder (round bases, caissons)
//! - [`tube`] - Annular tube (pipe sections, manhole rings)
//! - [`wall_assembly`] - Base slab + four walls + lid (vaults, boxes)
//!
//! ## Example
//!
//! ```rust
//! use precast_core::calculations::{calculate, ShapeRequest};
//! use precast_core::calculations::prism::PrismInput;
//! use precast_core::density::DensityTable;
//! use precast_core::dimensions::Dimension;
//!
//! let request = ShapeRequest::Prism(PrismInput {
//!     length: Dimension::inches(12.0),
//!     width: Dimension::inches(12.0),
//!     height: Dimension::inches(12.0),
//!     quantity: 1,
//! });
//!
//! let output = calculate(&request, &DensityTable::default()).unwrap();
//! assert!((output.volume.cubic_feet.0 - 1.0).abs() < 1e-12);
//! assert!((output.weight.pounds.0 - 150.0).abs() < 1e-9);
//! ```

pub mod cylinder;
pub mod prism;
pub mod tube;
pub mod wall_assembly;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::density::{Density, DensityTable, ShapeKind};
use crate::errors::{CalcError, CalcResult};
use crate::units::{CubicFeet, CubicMeters, CubicYards, Kilograms, Pounds, Tons};

// Re-export commonly used types
pub use cylinder::CylinderInput;
pub use prism::PrismInput;
pub use tube::TubeInput;
pub use wall_assembly::{WallAssemblyInput, WallBreakdown, WallFormula};

/// Enum wrapper for all calculator inputs.
///
/// Serializes with a `"shape"` discriminator:
///
/// ```json
/// { "shape": "Tube", "outer_diameter": { "value": 2.0, "unit": "ft" }, ... }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum ShapeRequest {
    Prism(PrismInput),
    Cylinder(CylinderInput),
    Tube(TubeInput),
    WallAssembly(WallAssemblyInput),
}

impl ShapeRequest {
    /// Shape category of this request
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeRequest::Prism(_) => ShapeKind::Prism,
            ShapeRequest::Cylinder(_) => ShapeKind::Cylinder,
            ShapeRequest::Tube(_) => ShapeKind::Tube,
            ShapeRequest::WallAssembly(_) => ShapeKind::WallAssembly,
        }
    }

    /// Number of identical pieces requested
    pub fn quantity(&self) -> u32 {
        match self {
            ShapeRequest::Prism(p) => p.quantity,
            ShapeRequest::Cylinder(c) => c.quantity,
            ShapeRequest::Tube(t) => t.quantity,
            ShapeRequest::WallAssembly(w) => w.quantity,
        }
    }
}

/// Volume in every unit the UI and exports display
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeFigures {
    pub cubic_feet: CubicFeet,
    pub cubic_yards: CubicYards,
    pub cubic_meters: CubicMeters,
}

impl From<CubicFeet> for VolumeFigures {
    fn from(cubic_feet: CubicFeet) -> Self {
        VolumeFigures {
            cubic_feet,
            cubic_yards: cubic_feet.into(),
            cubic_meters: cubic_feet.into(),
        }
    }
}

/// Weight in every unit the UI and exports display
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightFigures {
    pub pounds: Pounds,
    pub kilograms: Kilograms,
    /// Short tons (2000 lb)
    pub tons: Tons,
}

impl From<Pounds> for WeightFigures {
    fn from(pounds: Pounds) -> Self {
        WeightFigures {
            pounds,
            kilograms: pounds.into(),
            tons: pounds.into(),
        }
    }
}

/// Result of a volume/weight calculation.
///
/// Figures are totals for the whole quantity and are never rounded; round at
/// display time.
///
/// ## JSON Example
///
/// ```json
/// {
///   "shape": "Prism",
///   "quantity": 1,
///   "density": { "unit": "lb/yd3", "value": 4050.0 },
///   "volume": { "cubic_feet": 1.0, "cubic_yards": 0.037037, "cubic_meters": 0.0283168 },
///   "weight": { "pounds": 150.0, "kilograms": 68.0388, "tons": 0.075 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutput {
    pub shape: ShapeKind,
    pub quantity: u32,
    /// Density the weight was derived from
    pub density: Density,
    pub volume: VolumeFigures,
    pub weight: WeightFigures,
    /// Base/walls/lid split, wall assemblies only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<WallBreakdown>,
}

impl CalculationOutput {
    /// Build the output for a total volume
    pub fn from_volume(shape: ShapeKind, quantity: u32, volume: CubicFeet, density: Density) -> CalcResult<Self> {
        Ok(CalculationOutput {
            shape,
            quantity,
            density,
            volume: volume.into(),
            weight: density.weight_lbs(volume)?.into(),
            breakdown: None,
        })
    }

    /// Volume of a single piece
    pub fn volume_per_piece(&self) -> VolumeFigures {
        (self.volume.cubic_feet / f64::from(self.quantity.max(1))).into()
    }

    /// Weight of a single piece
    pub fn weight_per_piece(&self) -> WeightFigures {
        (self.weight.pounds / f64::from(self.quantity.max(1))).into()
    }
}

/// Multiply volume factors (feet and quantity) into cubic feet.
///
/// A zero factor yields exactly zero even when the others overflow, and a
/// product that is not finite is rejected under `field`.
pub(crate) fn volume_product(field: &str, factors: &[f64]) -> CalcResult<CubicFeet> {
    if factors.iter().any(|&f| f == 0.0) {
        return Ok(CubicFeet(0.0));
    }
    checked_volume(field, factors.iter().product())
}

/// Reject a volume that overflowed
pub(crate) fn checked_volume(field: &str, cubic_feet: f64) -> CalcResult<CubicFeet> {
    if !cubic_feet.is_finite() {
        return Err(CalcError::invalid_input(
            field,
            cubic_feet.to_string(),
            "Result exceeds representable range",
        ));
    }
    Ok(CubicFeet(cubic_feet))
}

/// Quantity must be a positive integer
pub(crate) fn validate_quantity(quantity: u32) -> CalcResult<()> {
    if quantity == 0 {
        return Err(CalcError::invalid_input(
            "quantity",
            quantity.to_string(),
            "Quantity must be at least 1",
        ));
    }
    Ok(())
}

/// Calculate any shape, using the density configured for its category.
///
/// This is the single dispatch point for the calculators.
///
/// # Returns
///
/// * `Ok(CalculationOutput)` - Volume and weight figures
/// * `Err(CalcError)` - A dimension, quantity, or density was invalid; no result is produced
pub fn calculate(request: &ShapeRequest, densities: &DensityTable) -> CalcResult<CalculationOutput> {
    calculate_with_density(request, densities.for_shape(request.kind()))
}

/// Calculate any shape with an explicit density.
pub fn calculate_with_density(request: &ShapeRequest, density: Density) -> CalcResult<CalculationOutput> {
    let result = match request {
        ShapeRequest::Prism(input) => prism::calculate(input, density),
        ShapeRequest::Cylinder(input) => cylinder::calculate(input, density),
        ShapeRequest::Tube(input) => tube::calculate(input, density),
        ShapeRequest::WallAssembly(input) => wall_assembly::calculate(input, density),
    };

    match &result {
        Ok(output) => debug!(
            shape = %output.shape,
            quantity = output.quantity,
            cubic_feet = output.volume.cubic_feet.0,
            pounds = output.weight.pounds.0,
            "calculation complete"
        ),
        Err(e) => warn!(shape = %request.kind(), error = %e, "calculation rejected"),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::Dimension;
    use approx::assert_relative_eq;

    fn sample_requests() -> Vec<ShapeRequest> {
        vec![
            ShapeRequest::Prism(PrismInput {
                length: Dimension::feet(8.0),
                width: Dimension::inches(30.0),
                height: Dimension::centimeters(20.0),
                quantity: 3,
            }),
            ShapeRequest::Cylinder(CylinderInput {
                diameter: Dimension::inches(48.0),
                height: Dimension::meters(1.2),
                quantity: 2,
            }),
            ShapeRequest::Tube(TubeInput {
                outer_diameter: Dimension::inches(60.0),
                inner_diameter: Dimension::inches(48.0),
                depth: Dimension::yards(1.0),
                quantity: 4,
            }),
            ShapeRequest::WallAssembly(WallAssemblyInput {
                length: Dimension::feet(6.0),
                width: Dimension::feet(4.0),
                wall_heights: vec![Dimension::feet(3.0), Dimension::inches(18.0)],
                base_thickness: Dimension::inches(8.0),
                base_extension: Dimension::inches(6.0),
                wall_thickness: Dimension::inches(6.0),
                lid_thickness: Dimension::inches(8.0),
                quantity: 1,
                formula: WallFormula::default(),
            }),
        ]
    }

    #[test]
    fn test_dispatch_uses_shape_density() {
        let densities = DensityTable::default();
        for request in sample_requests() {
            let output = calculate(&request, &densities).unwrap();
            assert_eq!(output.shape, request.kind());
            assert_eq!(output.density, densities.for_shape(request.kind()));
        }
    }

    #[test]
    fn test_non_negative_outputs() {
        for request in sample_requests() {
            let output = calculate(&request, &DensityTable::default()).unwrap();
            assert!(output.volume.cubic_feet.0 >= 0.0);
            assert!(output.volume.cubic_yards.0 >= 0.0);
            assert!(output.volume.cubic_meters.0 >= 0.0);
            assert!(output.weight.pounds.0 >= 0.0);
            assert!(output.weight.kilograms.0 >= 0.0);
            assert!(output.weight.tons.0 >= 0.0);
        }
    }

    #[test]
    fn test_derived_units() {
        for request in sample_requests() {
            let output = calculate(&request, &DensityTable::default()).unwrap();
            let ft3 = output.volume.cubic_feet.0;
            assert_relative_eq!(output.volume.cubic_yards.0, ft3 / 27.0);
            assert_relative_eq!(output.volume.cubic_meters.0, ft3 * 0.0283168);
            let lbs = output.weight.pounds.0;
            assert_relative_eq!(output.weight.kilograms.0, lbs * 0.453592);
            assert_eq!(output.weight.tons.0, lbs / 2000.0);
        }
    }

    #[test]
    fn test_per_piece_figures() {
        let request = &sample_requests()[0];
        let output = calculate(request, &DensityTable::default()).unwrap();
        let piece = output.volume_per_piece();
        assert_relative_eq!(piece.cubic_feet.0 * 3.0, output.volume.cubic_feet.0);
        assert_relative_eq!(output.weight_per_piece().pounds.0 * 3.0, output.weight.pounds.0);
    }

    #[test]
    fn test_invalid_density_rejected() {
        let request = &sample_requests()[1];
        let result = calculate_with_density(request, Density::KgPerCubicMeter(0.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_request_serialization() {
        for request in sample_requests() {
            let json = serde_json::to_string(&request).unwrap();
            assert!(json.contains("\"shape\""));
            let roundtrip: ShapeRequest = serde_json::from_str(&json).unwrap();
            assert_eq!(request, roundtrip);
        }
    }

    #[test]
    fn test_output_serialization_skips_empty_breakdown() {
        let output = calculate(&sample_requests()[0], &DensityTable::default()).unwrap();
        let json = serde_json::to_string(&output).unwrap();
        assert!(!json.contains("breakdown"));
        let roundtrip: CalculationOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.shape, output.shape);
        assert_eq!(roundtrip.density, output.density);
        assert_relative_eq!(roundtrip.weight.pounds.0, output.weight.pounds.0, max_relative = 1e-12);
    }

    #[test]
    fn test_volume_product_guards() {
        assert_eq!(volume_product("volume", &[1e200, 1e200, 0.0]).unwrap().0, 0.0);
        assert_eq!(volume_product("volume", &[f64::INFINITY, 0.0]).unwrap().0, 0.0);
        assert_relative_eq!(volume_product("volume", &[2.0, 3.0, 4.0]).unwrap().0, 24.0);
        let err = volume_product("volume", &[1e200, 1e200, 1e200]).unwrap_err();
        assert_eq!(err, CalcError::invalid_input("volume", "inf", "Result exceeds representable range"));
    }

    #[test]
    fn test_dispatch_never_emits_non_finite_figures() {
        let huge = Dimension::feet(1e200);
        let request = ShapeRequest::Prism(PrismInput { length: huge, width: huge, height: huge, quantity: 1 });
        assert!(calculate(&request, &DensityTable::default()).is_err());

        let flat = ShapeRequest::Prism(PrismInput {
            length: huge,
            width: huge,
            height: Dimension::feet(0.0),
            quantity: 1,
        });
        let output = calculate(&flat, &DensityTable::default()).unwrap();
        let json = serde_json::to_string(&output).unwrap();
        assert!(!json.contains("null"));
    }
}
