//! # Rectangular Prism
//!
//! Volume of a rectangular block: `V = L × W × H × qty`.
//!
//! Used for slabs, pads, blocks and anything else with three perpendicular
//! dimensions. The default density is 4050 lb/yd³.
//!
//! ## Example
//!
//! ```rust
//! use precast_core::calculations::prism::{calculate, PrismInput};
//! use precast_core::density::Density;
//! use precast_core::dimensions::Dimension;
//!
//! let input = PrismInput {
//!     length: Dimension::feet(10.0),
//!     width: Dimension::feet(4.0),
//!     height: Dimension::inches(6.0),
//!     quantity: 2,
//! };
//!
//! let output = calculate(&input, Density::LbPerCubicYard(4050.0)).unwrap();
//! assert_eq!(output.volume.cubic_feet.0, 40.0);
//! ```

use serde::{Deserialize, Serialize};

use super::{validate_quantity, volume_product, CalculationOutput};
use crate::density::{Density, ShapeKind};
use crate::dimensions::Dimension;
use crate::errors::CalcResult;
use crate::units::CubicFeet;

/// Input parameters for a rectangular prism.
///
/// ## JSON Example
///
/// ```json
/// {
///   "length": { "value": 12.0, "unit": "in" },
///   "width": { "value": 12.0, "unit": "in" },
///   "height": { "value": 1.0, "unit": "ft" },
///   "quantity": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrismInput {
    pub length: Dimension,
    pub width: Dimension,
    pub height: Dimension,
    /// Number of identical pieces
    pub quantity: u32,
}

impl PrismInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        self.length.validate("length")?;
        self.width.validate("width")?;
        self.height.validate("height")?;
        validate_quantity(self.quantity)
    }

    /// Total volume in cubic feet for the whole quantity
    pub fn volume(&self) -> CalcResult<CubicFeet> {
        self.validate()?;
        let l = self.length.to_feet().0;
        let w = self.width.to_feet().0;
        let h = self.height.to_feet().0;
        volume_product("volume", &[l, w, h, f64::from(self.quantity)])
    }
}

/// Calculate prism volume and weight.
pub fn calculate(input: &PrismInput, density: Density) -> CalcResult<CalculationOutput> {
    density.validate()?;
    let volume = input.volume()?;
    CalculationOutput::from_volume(ShapeKind::Prism, input.quantity, volume, density)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn one_cubic_foot() -> PrismInput {
        PrismInput {
            length: Dimension::inches(12.0),
            width: Dimension::inches(12.0),
            height: Dimension::inches(12.0),
            quantity: 1,
        }
    }

    #[test]
    fn test_one_cubic_foot() {
        let output = calculate(&one_cubic_foot(), Density::LbPerCubicYard(4050.0)).unwrap();
        assert_relative_eq!(output.volume.cubic_feet.0, 1.0);
        assert_relative_eq!(output.volume.cubic_yards.0, 0.037037, epsilon = 1e-6);
    }

    #[test]
    fn test_weight_from_cubic_yards() {
        let output = calculate(&one_cubic_foot(), Density::LbPerCubicYard(4050.0)).unwrap();
        // weight_lbs = yd³ × density
        assert_relative_eq!(output.weight.pounds.0, output.volume.cubic_yards.0 * 4050.0);
        assert_relative_eq!(output.weight.pounds.0, 150.0, epsilon = 1e-9);
        assert_eq!(output.weight.tons.0, output.weight.pounds.0 / 2000.0);
    }

    #[test]
    fn test_mixed_units() {
        // 1 yd × 30.48 cm × 6 in = 3 ft × 1 ft × 0.5 ft
        let input = PrismInput {
            length: Dimension::yards(1.0),
            width: Dimension::centimeters(30.48),
            height: Dimension::inches(6.0),
            quantity: 1,
        };
        assert_relative_eq!(input.volume().unwrap().0, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_quantity_scaling() {
        let single = calculate(&one_cubic_foot(), Density::LbPerCubicYard(4050.0)).unwrap();
        let mut doubled_input = one_cubic_foot();
        doubled_input.quantity = 2;
        let doubled = calculate(&doubled_input, Density::LbPerCubicYard(4050.0)).unwrap();

        assert_relative_eq!(doubled.volume.cubic_feet.0, 2.0 * single.volume.cubic_feet.0);
        assert_relative_eq!(doubled.weight.pounds.0, 2.0 * single.weight.pounds.0);
    }

    #[test]
    fn test_zero_dimension() {
        let mut input = one_cubic_foot();
        input.height = Dimension::inches(0.0);
        let output = calculate(&input, Density::LbPerCubicYard(4050.0)).unwrap();
        assert_eq!(output.volume.cubic_feet.0, 0.0);
        assert_eq!(output.weight.pounds.0, 0.0);
        assert!(!output.weight.tons.0.is_nan());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut input = one_cubic_foot();
        input.quantity = 0;
        let err = calculate(&input, Density::LbPerCubicYard(4050.0)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_negative_dimension_names_field() {
        let mut input = one_cubic_foot();
        input.width = Dimension::inches(-1.0);
        match input.validate() {
            Err(crate::errors::CalcError::InvalidInput { field, .. }) => assert_eq!(field, "width"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_beside_huge_dimensions_is_zero() {
        let input = PrismInput {
            length: Dimension::feet(1e200),
            width: Dimension::feet(1e200),
            height: Dimension::feet(0.0),
            quantity: 1,
        };
        let output = calculate(&input, Density::LbPerCubicYard(4050.0)).unwrap();
        assert_eq!(output.volume.cubic_feet.0, 0.0);
        assert_eq!(output.weight.pounds.0, 0.0);
    }

    #[test]
    fn test_overflowing_volume_rejected() {
        let input = PrismInput {
            length: Dimension::feet(1e200),
            width: Dimension::feet(1e200),
            height: Dimension::feet(1e200),
            quantity: 1,
        };
        match calculate(&input, Density::LbPerCubicYard(4050.0)) {
            Err(crate::errors::CalcError::InvalidInput { field, .. }) => assert_eq!(field, "volume"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }
}
