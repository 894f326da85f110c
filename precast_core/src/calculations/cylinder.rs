//! # Solid Cylinder
//!
//! Volume of a round piece: `V = π × (D/2)² × H × qty`.
//!
//! The default density is 2400 kg/m³, so the weight goes through cubic meters.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{validate_quantity, volume_product, CalculationOutput};
use crate::density::{Density, ShapeKind};
use crate::dimensions::Dimension;
use crate::errors::CalcResult;
use crate::units::CubicFeet;

/// Input parameters for a solid cylinder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderInput {
    pub diameter: Dimension,
    pub height: Dimension,
    /// Number of identical pieces
    pub quantity: u32,
}

impl CylinderInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        self.diameter.validate("diameter")?;
        self.height.validate("height")?;
        validate_quantity(self.quantity)
    }

    /// Total volume in cubic feet for the whole quantity
    pub fn volume(&self) -> CalcResult<CubicFeet> {
        self.validate()?;
        let radius = self.diameter.to_feet().0 / 2.0;
        let h = self.height.to_feet().0;
        volume_product("volume", &[PI, radius.powi(2), h, f64::from(self.quantity)])
    }
}

/// Calculate cylinder volume and weight.
pub fn calculate(input: &CylinderInput, density: Density) -> CalcResult<CalculationOutput> {
    density.validate()?;
    let volume = input.volume()?;
    CalculationOutput::from_volume(ShapeKind::Cylinder, input.quantity, volume, density)
}
