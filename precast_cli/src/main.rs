//! # Precast Calc CLI
//!
//! Command-line front end for the precast volume/weight calculators.
//!
//! ```text
//! precast prism --length 12in --width 12in --height 12in
//! precast tube --outer 60in --inner 48in --depth 4ft --qty 3 --json
//! precast wall --length 6ft --width 4ft --wall-height 3ft --wall-height 18in \
//!     --base-thickness 8in --base-extension 6in --wall-thickness 6in --lid-thickness 8in
//! precast cylinder --diameter 48in --height 8in --save yard.pcw --label "Round base"
//! precast show yard.pcw
//! ```
//!
//! Bare numbers use `--unit`, else the `--save` workbook's default unit, else
//! feet. Set `RUST_LOG=debug` for calculation tracing. Rejected input exits
//! with status 2.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use precast_core::calculations::{
    calculate_with_density, CalculationOutput, CylinderInput, PrismInput, ShapeRequest, TubeInput,
    WallAssemblyInput, WallFormula,
};
use precast_core::file_io::{load_or_create, load_workbook, save_workbook};
use precast_core::{CalcError, CalcResult, Density, Dimension, LengthUnit, Workbook};

/// Precast concrete volume and weight calculator
#[derive(Parser, Debug)]
#[command(name = "precast", version)]
#[command(about = "Precast concrete volume and weight calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rectangular prism (slab, pad, block)
    Prism {
        #[arg(short, long)]
        length: String,
        #[arg(short, long)]
        width: String,
        #[arg(long)]
        height: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Solid cylinder
    Cylinder {
        #[arg(short, long)]
        diameter: String,
        #[arg(long)]
        height: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Annular tube (pipe section, manhole ring)
    Tube {
        /// Outer diameter
        #[arg(long)]
        outer: String,
        /// Inner diameter
        #[arg(long)]
        inner: String,
        #[arg(long)]
        depth: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Base slab + four walls + lid
    Wall {
        #[arg(short, long)]
        length: String,
        #[arg(short, long)]
        width: String,
        /// Wall-segment height; repeat up to three times
        #[arg(long = "wall-height", required = true)]
        wall_heights: Vec<String>,
        #[arg(long)]
        base_thickness: String,
        /// Base overhang beyond the footprint, per side
        #[arg(long, default_value = "0")]
        base_extension: String,
        #[arg(long)]
        wall_thickness: String,
        #[arg(long)]
        lid_thickness: String,
        /// Size the walls by the footprint perimeter instead of 4 × width
        #[arg(long)]
        perimeter: bool,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// List the forms and saved calculations in a workbook
    Show {
        path: PathBuf,
        /// Print the workbook as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Number of identical pieces
    #[arg(short, long, default_value_t = 1)]
    qty: u32,

    /// Unit for numbers given without a suffix (in, ft, yd, m, cm).
    /// Defaults to the `--save` workbook's setting, else feet.
    #[arg(short, long)]
    unit: Option<String>,

    /// Density override, e.g. "150 lb/ft3", "4050 lb/yd3", "2400 kg/m3"
    #[arg(long)]
    density: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Workbook file to save the calculation into
    #[arg(long)]
    save: Option<PathBuf>,

    /// Label for the saved calculation
    #[arg(long, default_value = "Untitled")]
    label: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

/// 2 for rejected input values, 1 for everything else
fn exit_status(error: &CalcError) -> u8 {
    if error.is_input_error() {
        2
    } else {
        1
    }
}

fn run(command: Command) -> CalcResult<()> {
    match command {
        Command::Show { path, json } => show_workbook(&path, json),
        Command::Prism { length, width, height, common } => {
            let target = common.target_workbook()?;
            let unit = common.default_unit(target.as_ref())?;
            let request = ShapeRequest::Prism(PrismInput {
                length: parse_dimension("length", &length, unit)?,
                width: parse_dimension("width", &width, unit)?,
                height: parse_dimension("height", &height, unit)?,
                quantity: common.qty,
            });
            run_calculation(request, &common, target)
        }
        Command::Cylinder { diameter, height, common } => {
            let target = common.target_workbook()?;
            let unit = common.default_unit(target.as_ref())?;
            let request = ShapeRequest::Cylinder(CylinderInput {
                diameter: parse_dimension("diameter", &diameter, unit)?,
                height: parse_dimension("height", &height, unit)?,
                quantity: common.qty,
            });
            run_calculation(request, &common, target)
        }
        Command::Tube { outer, inner, depth, common } => {
            let target = common.target_workbook()?;
            let unit = common.default_unit(target.as_ref())?;
            let request = ShapeRequest::Tube(TubeInput {
                outer_diameter: parse_dimension("outer_diameter", &outer, unit)?,
                inner_diameter: parse_dimension("inner_diameter", &inner, unit)?,
                depth: parse_dimension("depth", &depth, unit)?,
                quantity: common.qty,
            });
            run_calculation(request, &common, target)
        }
        Command::Wall {
            length,
            width,
            wall_heights,
            base_thickness,
            base_extension,
            wall_thickness,
            lid_thickness,
            perimeter,
            common,
        } => {
            let target = common.target_workbook()?;
            let unit = common.default_unit(target.as_ref())?;
            let wall_heights = wall_heights
                .iter()
                .enumerate()
                .map(|(i, text)| parse_dimension(&format!("wall_height_{}", i + 1), text, unit))
                .collect::<CalcResult<Vec<_>>>()?;
            let request = ShapeRequest::WallAssembly(WallAssemblyInput {
                length: parse_dimension("length", &length, unit)?,
                width: parse_dimension("width", &width, unit)?,
                wall_heights,
                base_thickness: parse_dimension("base_thickness", &base_thickness, unit)?,
                base_extension: parse_dimension("base_extension", &base_extension, unit)?,
                wall_thickness: parse_dimension("wall_thickness", &wall_thickness, unit)?,
                lid_thickness: parse_dimension("lid_thickness", &lid_thickness, unit)?,
                quantity: common.qty,
                formula: if perimeter { WallFormula::Perimeter } else { WallFormula::WidthOnly },
            });
            run_calculation(request, &common, target)
        }
    }
}

impl CommonArgs {
    /// Workbook named by `--save`, loaded from disk or started fresh
    fn target_workbook(&self) -> CalcResult<Option<Workbook>> {
        self.save.as_deref().map(|path| load_or_create(path, "")).transpose()
    }

    /// `--unit` if given, else the workbook's default unit, else feet
    fn default_unit(&self, workbook: Option<&Workbook>) -> CalcResult<LengthUnit> {
        match &self.unit {
            Some(text) => LengthUnit::from_str_flexible(text),
            None => Ok(workbook.map(|w| w.settings.default_unit).unwrap_or_default()),
        }
    }

    fn density_override(&self) -> CalcResult<Option<Density>> {
        self.density.as_deref().map(str::parse).transpose()
    }
}

/// Parse a dimension, renaming the error field to the flag it came from
fn parse_dimension(field: &str, text: &str, default_unit: LengthUnit) -> CalcResult<Dimension> {
    Dimension::parse_with_default(text, default_unit).map_err(|e| match e {
        CalcError::InvalidInput { value, reason, .. } => CalcError::invalid_input(field, value, reason),
        CalcError::MissingField { .. } => CalcError::missing_field(field),
        other => other,
    })
}

fn run_calculation(request: ShapeRequest, common: &CommonArgs, mut workbook: Option<Workbook>) -> CalcResult<()> {
    let density_override = common.density_override()?;

    // Densities come from the target workbook's settings when saving into one
    let densities = workbook
        .as_ref()
        .map(|w| w.settings.densities)
        .unwrap_or_default();

    let density = density_override.unwrap_or_else(|| densities.for_shape(request.kind()));
    debug!(shape = %request.kind(), %density, "running calculation");
    let output = calculate_with_density(&request, density)?;

    if common.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_output(&request, &output);
    }

    if let (Some(path), Some(workbook)) = (&common.save, workbook.as_mut()) {
        let id = workbook.add_calculation(common.label.clone(), request);
        if let Some(saved) = workbook.get_calculation_mut(&id) {
            saved.density_override = density_override;
        }
        save_workbook(workbook, path)?;
        if !common.json {
            println!();
            println!("Saved \"{}\" to {}", common.label, path.display());
        }
    }
    Ok(())
}

fn print_output(request: &ShapeRequest, output: &CalculationOutput) {
    println!("═══════════════════════════════════════");
    println!("  {} x{}", output.shape.display_name().to_uppercase(), output.quantity);
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    for (name, dim) in request_dimensions(request) {
        println!("  {:<16} {}", name, dim);
    }
    println!();

    if let Some(breakdown) = &output.breakdown {
        println!("Breakdown:");
        println!("  Base:   {:>10.3} ft³", breakdown.base.cubic_feet.0);
        println!("  Walls:  {:>10.3} ft³", breakdown.walls.cubic_feet.0);
        println!("  Lid:    {:>10.3} ft³", breakdown.lid.cubic_feet.0);
        println!();
    }

    println!("Volume:");
    println!("  {:>12.3} ft³", output.volume.cubic_feet.0);
    println!("  {:>12.3} yd³", output.volume.cubic_yards.0);
    println!("  {:>12.3} m³", output.volume.cubic_meters.0);
    println!();
    println!("Weight (at {}):", output.density);
    println!("  {:>12.1} lb", output.weight.pounds.0);
    println!("  {:>12.1} kg", output.weight.kilograms.0);
    println!("  {:>12.3} tons", output.weight.tons.0);

    if output.quantity > 1 {
        let piece = output.weight_per_piece();
        println!();
        println!("Per piece: {:.3} ft³, {:.1} lb", output.volume_per_piece().cubic_feet.0, piece.pounds.0);
    }
}

fn named(pairs: &[(&str, Dimension)]) -> Vec<(String, Dimension)> {
    pairs.iter().map(|(n, d)| (n.to_string(), *d)).collect()
}

fn request_dimensions(request: &ShapeRequest) -> Vec<(String, Dimension)> {
    match request {
        ShapeRequest::Prism(p) => named(&[("Length", p.length), ("Width", p.width), ("Height", p.height)]),
        ShapeRequest::Cylinder(c) => named(&[("Diameter", c.diameter), ("Height", c.height)]),
        ShapeRequest::Tube(t) => named(&[
            ("Outer diameter", t.outer_diameter),
            ("Inner diameter", t.inner_diameter),
            ("Wall thickness", Dimension::feet(t.wall_thickness_ft()).convert_to(t.outer_diameter.unit)),
            ("Depth", t.depth),
        ]),
        ShapeRequest::WallAssembly(w) => {
            let mut rows = named(&[("Length", w.length), ("Width", w.width)]);
            for (i, h) in w.wall_heights.iter().enumerate() {
                rows.push((format!("Wall height {}", i + 1), *h));
            }
            rows.extend(named(&[
                ("Base thickness", w.base_thickness),
                ("Base extension", w.base_extension),
                ("Wall thickness", w.wall_thickness),
                ("Lid thickness", w.lid_thickness),
            ]));
            rows
        }
    }
}

fn show_workbook(path: &Path, json: bool) -> CalcResult<()> {
    let workbook: Workbook = load_workbook(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&workbook)?);
        return Ok(());
    }

    println!("Workbook: {} ({})", path.display(), workbook.meta.owner);
    println!("Modified: {}", workbook.meta.modified.format("%Y-%m-%d %H:%M UTC"));
    println!(
        "Items: {} (bare numbers in {})",
        workbook.item_count(),
        workbook.settings.default_unit
    );
    println!();

    println!("Forms ({}):", workbook.forms.len());
    for (_, form) in workbook.forms_by_name() {
        println!("  {} [{} documents]", form.name, form.documents.len());
        if !form.description.is_empty() {
            println!("      {}", form.description);
        }
    }
    println!();

    println!("Saved calculations ({}):", workbook.calculations.len());
    for (_, saved, result) in workbook.recalculate_all() {
        match result {
            Ok(output) => println!(
                "  {:<24} {:<18} x{:<4} {:>10.3} yd³ {:>10.1} lb",
                saved.label,
                output.shape.display_name(),
                output.quantity,
                output.volume.cubic_yards.0,
                output.weight.pounds.0
            ),
            Err(e) => println!("  {:<24} [invalid] {}", saved.label, e),
        }
    }
    Ok(())
}
