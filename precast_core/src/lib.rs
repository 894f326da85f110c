//! # precast_core - Precast Concrete Calculation Engine
//!
//! `precast_core` computes volume and weight for precast concrete pieces:
//! rectangular prisms, solid cylinders, annular tubes, and base/wall/lid
//! assemblies. Every dimension carries its own unit; inputs are normalized to
//! feet, run through the shape formula, and reported in cubic feet, cubic
//! yards and cubic meters, with weight in pounds, kilograms and short tons.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Invalid input is a structured error, never `NaN`
//! - **Configurable density**: One density per shape, held in settings
//!
//! ## Quick Start
//!
//! ```rust
//! use precast_core::calculations::{calculate, ShapeRequest, TubeInput};
//! use precast_core::density::DensityTable;
//! use precast_core::dimensions::Dimension;
//!
//! let request = ShapeRequest::Tube(TubeInput {
//!     outer_diameter: Dimension::feet(2.0),
//!     inner_diameter: Dimension::feet(1.0),
//!     depth: Dimension::feet(1.0),
//!     quantity: 1,
//! });
//!
//! let output = calculate(&request, &DensityTable::default()).unwrap();
//! assert!((output.volume.cubic_feet.0 - 2.35619).abs() < 1e-5);
//!
//! let json = serde_json::to_string_pretty(&output).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Shape inputs, formulas and the dispatch function
//! - [`session`] - Per-form Empty/Editing/Computed state machine
//! - [`dimensions`] - Value + unit pairs and text parsing
//! - [`units`] - Length units, conversion table, volume/weight newtypes
//! - [`density`] - Density constants and per-shape configuration
//! - [`records`] - Form metadata and attached documents
//! - [`workbook`] - Persisted container: settings, forms, saved calculations
//! - [`file_io`] - Snapshot save/load
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod density;
pub mod dimensions;
pub mod errors;
pub mod file_io;
pub mod records;
pub mod session;
pub mod units;
pub mod workbook;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, CalculationOutput, ShapeRequest};
pub use density::{Density, DensityTable, ShapeKind};
pub use dimensions::Dimension;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_workbook, save_workbook};
pub use session::{CalculatorSession, SessionState};
pub use units::LengthUnit;
pub use workbook::{CalculatorSettings, Workbook};
