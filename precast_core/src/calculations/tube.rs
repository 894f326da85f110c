//! # Annular Tube
//!
//! Volume of a hollow cylinder (pipe section, manhole ring):
//!
//! `V = π × ((Do/2)² − (Di/2)²) × depth × qty`
//!
//! The inner diameter may equal the outer (zero wall, zero volume) but never
//! exceed it.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{validate_quantity, volume_product, CalculationOutput};
use crate::density::{Density, ShapeKind};
use crate::dimensions::Dimension;
use crate::errors::{CalcError, CalcResult};
use crate::units::CubicFeet;

/// Input parameters for an annular tube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubeInput {
    pub outer_diameter: Dimension,
    pub inner_diameter: Dimension,
    pub depth: Dimension,
    /// Number of identical pieces
    pub quantity: u32,
}

impl TubeInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        self.outer_diameter.validate("outer_diameter")?;
        self.inner_diameter.validate("inner_diameter")?;
        self.depth.validate("depth")?;
        validate_quantity(self.quantity)?;

        if self.inner_diameter.to_feet() > self.outer_diameter.to_feet() {
            return Err(CalcError::invalid_input(
                "inner_diameter",
                self.inner_diameter.to_string(),
                format!("Inner diameter exceeds outer diameter ({})", self.outer_diameter),
            ));
        }
        Ok(())
    }

    /// Wall thickness (half the difference of the diameters), in feet
    pub fn wall_thickness_ft(&self) -> f64 {
        (self.outer_diameter.to_feet().0 - self.inner_diameter.to_feet().0) / 2.0
    }

    /// Total volume in cubic feet for the whole quantity
    pub fn volume(&self) -> CalcResult<CubicFeet> {
        self.validate()?;
        let r_outer = self.outer_diameter.to_feet().0 / 2.0;
        let r_inner = self.inner_diameter.to_feet().0 / 2.0;
        let depth = self.depth.to_feet().0;
        let ring_area = PI * (r_outer.powi(2) - r_inner.powi(2));
        volume_product("volume", &[ring_area, depth, f64::from(self.quantity)])
    }
}

/// Calculate tube volume and weight.
pub fn calculate(input: &TubeInput, density: Density) -> CalcResult<CalculationOutput> {
    density.validate()?;
    let volume = input.volume()?;
    CalculationOutput::from_volume(ShapeKind::Tube, input.quantity, volume, density)
}
