//! # Composite Wall Assembly
//!
//! A precast box or vault modeled as three parts:
//!
//! - **Base slab**: footprint extended by `base_extension` on every side,
//!   `(L + 2·ext) × (W + 2·ext) × t_base`
//! - **Walls**: up to three wall-segment heights, summed, times wall thickness
//! - **Lid**: `L × W × t_lid`
//!
//! Every part is multiplied by the quantity.
//!
//! ## Wall Formula
//!
//! [`WallFormula::WidthOnly`] (the default) reproduces the plant's long-standing
//! worksheet: all four walls are sized by the *width*,
//! `4 × W × t_wall × (h1 + h2 + h3)`. For non-square boxes this differs from
//! the true perimeter, so [`WallFormula::Perimeter`] is offered as an explicit
//! opt-in, `2 × (L + W) × t_wall × (h1 + h2 + h3)`. The default is never
//! switched silently; saved workbooks keep whatever formula they were built with.
//!
//! ## Example
//!
//! ```rust
//! use precast_core::calculations::wall_assembly::{calculate, WallAssemblyInput, WallFormula};
//! use precast_core::density::Density;
//! use precast_core::dimensions::Dimension;
//!
//! let input = WallAssemblyInput {
//!     length: Dimension::feet(4.0),
//!     width: Dimension::feet(4.0),
//!     wall_heights: vec![Dimension::feet(3.0)],
//!     base_thickness: Dimension::feet(0.5),
//!     base_extension: Dimension::feet(0.0),
//!     wall_thickness: Dimension::feet(0.5),
//!     lid_thickness: Dimension::feet(0.5),
//!     quantity: 1,
//!     formula: WallFormula::WidthOnly,
//! };
//!
//! let output = calculate(&input, Density::LbPerCubicYard(4000.0)).unwrap();
//! // base 8 + walls 24 + lid 8
//! assert_eq!(output.volume.cubic_feet.0, 40.0);
//! ```

use serde::{Deserialize, Serialize};

use super::{checked_volume, validate_quantity, volume_product, CalculationOutput, VolumeFigures};
use crate::density::{Density, ShapeKind};
use crate::dimensions::Dimension;
use crate::errors::{CalcError, CalcResult};
use crate::units::CubicFeet;

/// Most wall-segment heights an assembly may carry
pub const MAX_WALL_SEGMENTS: usize = 3;

/// How the four walls are sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WallFormula {
    /// `4 × W` for all four walls
    #[default]
    WidthOnly,
    /// `2 × (L + W)`, the true perimeter of the footprint
    Perimeter,
}

impl WallFormula {
    /// Total wall run (horizontal length of all four walls) in feet
    pub fn wall_run_ft(&self, length_ft: f64, width_ft: f64) -> f64 {
        match self {
            WallFormula::WidthOnly => 4.0 * width_ft,
            WallFormula::Perimeter => 2.0 * (length_ft + width_ft),
        }
    }
}

/// Input parameters for a composite wall assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallAssemblyInput {
    pub length: Dimension,
    pub width: Dimension,
    /// One to three wall-segment heights, summed
    pub wall_heights: Vec<Dimension>,
    pub base_thickness: Dimension,
    /// Overhang of the base slab beyond the footprint, per side
    pub base_extension: Dimension,
    pub wall_thickness: Dimension,
    pub lid_thickness: Dimension,
    /// Number of identical assemblies
    pub quantity: u32,
    #[serde(default)]
    pub formula: WallFormula,
}

/// Volume of each part of a wall assembly (totals for the whole quantity)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WallBreakdown {
    pub base: VolumeFigures,
    pub walls: VolumeFigures,
    pub lid: VolumeFigures,
}

impl WallAssemblyInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        self.length.validate("length")?;
        self.width.validate("width")?;

        if self.wall_heights.is_empty() {
            return Err(CalcError::missing_field("wall_heights"));
        }
        if self.wall_heights.len() > MAX_WALL_SEGMENTS {
            return Err(CalcError::invalid_input(
                "wall_heights",
                self.wall_heights.len().to_string(),
                format!("At most {} wall-segment heights are supported", MAX_WALL_SEGMENTS),
            ));
        }
        for (i, height) in self.wall_heights.iter().enumerate() {
            height.validate(&format!("wall_height_{}", i + 1))?;
        }

        self.base_thickness.validate("base_thickness")?;
        self.base_extension.validate("base_extension")?;
        self.wall_thickness.validate("wall_thickness")?;
        self.lid_thickness.validate("lid_thickness")?;
        validate_quantity(self.quantity)
    }

    /// Sum of the wall-segment heights in feet
    pub fn total_wall_height_ft(&self) -> f64 {
        self.wall_heights.iter().map(|h| h.to_feet().0).sum()
    }

    /// Per-part volumes for the whole quantity, in cubic feet
    pub fn part_volumes(&self) -> CalcResult<(CubicFeet, CubicFeet, CubicFeet)> {
        self.validate()?;
        let qty = f64::from(self.quantity);
        let l = self.length.to_feet().0;
        let w = self.width.to_feet().0;
        let ext = self.base_extension.to_feet().0;

        let base = volume_product(
            "base",
            &[l + 2.0 * ext, w + 2.0 * ext, self.base_thickness.to_feet().0, qty],
        )?;
        let walls = volume_product(
            "walls",
            &[
                self.formula.wall_run_ft(l, w),
                self.wall_thickness.to_feet().0,
                self.total_wall_height_ft(),
                qty,
            ],
        )?;
        let lid = volume_product("lid", &[l, w, self.lid_thickness.to_feet().0, qty])?;

        checked_volume("volume", (base + walls + lid).0)?;
        Ok((base, walls, lid))
    }

    /// Total volume in cubic feet for the whole quantity
    pub fn volume(&self) -> CalcResult<CubicFeet> {
        let (base, walls, lid) = self.part_volumes()?;
        Ok(base + walls + lid)
    }
}

/// Calculate wall assembly volume, weight, and the base/walls/lid breakdown.
pub fn calculate(input: &WallAssemblyInput, density: Density) -> CalcResult<CalculationOutput> {
    density.validate()?;
    let (base, walls, lid) = input.part_volumes()?;

    let mut output =
        CalculationOutput::from_volume(ShapeKind::WallAssembly, input.quantity, base + walls + lid, density)?;
    output.breakdown = Some(WallBreakdown {
        base: base.into(),
        walls: walls.into(),
        lid: lid.into(),
    });
    Ok(output)
}
