//! aerowing command-line interface.
//!
//! ```sh
//! aerowing geometry wing.yaml
//! aerowing polar s1223 --alpha -5 15 0.5 --reynolds 4e5
//! aerowing wing-polar wing.yaml --alpha 0 15 1 --velocity 18 --altitude 700 --temperature 25
//! aerowing lift-distribution wing.yaml --velocity 18 --bank 30 --viscous
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use aerowing::environment::air_density;
use aerowing::utils::GRAVITY;
use aerowing::{
    lift_coefficient_slope, AlphaSweep, AvlService, CoefficientsTable, DistributionCase,
    FlightCondition, GeometryInput, GeometryOptions, LiftDistributionTable, MassInput,
    StudyConfig, Wing, XfoilAnalysis, XfoilService,
};

/// Section polar sweep used to fit the viscous drag of lift distributions.
const DRAG_FIT_SWEEP: (f64, f64, f64) = (-5.0, 20.0, 0.5);

#[derive(Parser)]
#[command(name = "aerowing")]
#[command(about = "Wing geometry and XFOIL/AVL aerodynamic analysis")]
#[command(version)]
struct Cli {
    /// Study configuration (solver executables, airfoil directory).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AlphaArgs {
    /// Angle-of-attack range in degrees, end inclusive.
    #[arg(
        long,
        num_args = 3,
        value_names = ["START", "END", "STEP"],
        allow_negative_numbers = true,
        conflicts_with = "alphas"
    )]
    alpha: Option<Vec<f64>>,

    /// Explicit comma-separated angles of attack in degrees.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    alphas: Option<Vec<f64>>,
}

impl AlphaArgs {
    fn sweep(&self) -> anyhow::Result<AlphaSweep> {
        match (&self.alpha, &self.alphas) {
            (Some(range), _) => Ok(AlphaSweep::range(range[0], range[1], range[2])),
            (None, Some(list)) => Ok(AlphaSweep::List(list.clone())),
            (None, None) => bail!("either --alpha START END STEP or --alphas is required"),
        }
    }
}

#[derive(Args)]
struct ConditionArgs {
    /// Airspeed (m/s).
    #[arg(long, default_value_t = 12.0)]
    velocity: f64,
    /// Geometric altitude (m).
    #[arg(long, default_value_t = 0.0)]
    altitude: f64,
    /// Air temperature (°C).
    #[arg(long, default_value_t = 15.0, allow_negative_numbers = true)]
    temperature: f64,
}

impl ConditionArgs {
    fn condition(&self) -> FlightCondition {
        FlightCondition::new(self.velocity, self.altitude, self.temperature)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the derived geometry of a wing.
    Geometry {
        /// Wing description (YAML).
        wing: PathBuf,
    },
    /// Write the AVL geometry and mass files of a wing.
    AvlInput {
        wing: PathBuf,
        /// Output directory.
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Altitude (m) for the air density in the mass file.
        #[arg(long, default_value_t = 0.0)]
        altitude: f64,
        /// Default Mach number.
        #[arg(long, default_value_t = 0.0)]
        mach: f64,
    },
    /// 2D airfoil polar with XFOIL.
    Polar {
        /// Airfoil name, resolved to `<name>.dat` in the airfoil directory.
        airfoil: String,
        #[command(flatten)]
        alpha: AlphaArgs,
        /// Chord Reynolds number. Inviscid when omitted.
        #[arg(long)]
        reynolds: Option<f64>,
        /// Viscous iteration limit.
        #[arg(long)]
        iterations: Option<u32>,
        /// Write the table to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print the table as JSON.
        #[arg(long)]
        json: bool,
    },
    /// 3D wing polar: section polars with XFOIL, then an AVL sweep with their drag.
    WingPolar {
        wing: PathBuf,
        #[command(flatten)]
        alpha: AlphaArgs,
        #[command(flatten)]
        condition: ConditionArgs,
        /// Viscous iteration limit of the section polars.
        #[arg(long, default_value_t = 1000)]
        iterations: u32,
        /// Directory for CSV files of every table.
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Spanwise lift coefficient distribution with AVL.
    LiftDistribution {
        wing: PathBuf,
        /// Fixed angle of attack (deg). Trims for level flight when omitted.
        #[arg(long, allow_negative_numbers = true)]
        alpha: Option<f64>,
        /// Bank angle (deg) of the trimmed case.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        bank: f64,
        #[command(flatten)]
        condition: ConditionArgs,
        /// Add section drag from XFOIL polars.
        #[arg(long)]
        viscous: bool,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let study = match &cli.config {
        Some(path) => StudyConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StudyConfig::from_env()?,
    };

    match cli.command {
        Commands::Geometry { wing } => {
            let wing = load_wing(&wing)?;
            println!("Span:                   {:.4} m", wing.span());
            println!("Planform area:          {:.4} m²", wing.planform_area());
            println!("Swept planform area:    {:.4} m²", wing.swept_planform_area());
            println!("Mean aerodynamic chord: {:.4} m", wing.mean_aerodynamic_chord());
            println!("Aspect ratio:           {:.3}", wing.aspect_ratio());
            Ok(())
        }
        Commands::AvlInput {
            wing,
            out_dir,
            altitude,
            mach,
        } => {
            let wing = load_wing(&wing)?;
            let options = GeometryOptions {
                mach_number: mach,
                ..GeometryOptions::default()
            };
            let geometry = GeometryInput::from_wing(&wing, &options, &study.airfoils, None)?;
            geometry.validate()?;
            fs::create_dir_all(&out_dir)?;
            let geometry_path = out_dir.join("wing.avl");
            fs::write(&geometry_path, geometry.to_input_file())?;
            println!("Wrote {}", geometry_path.display());

            if wing.mass_properties.mass > 0.0 {
                let mass = MassInput::from_wing(&wing, GRAVITY, air_density(altitude)?)?;
                let mass_path = out_dir.join("wing.mass");
                fs::write(&mass_path, mass.to_input_file())?;
                println!("Wrote {}", mass_path.display());
            }
            Ok(())
        }
        Commands::Polar {
            airfoil,
            alpha,
            reynolds,
            iterations,
            csv,
            json,
        } => {
            let xfoil = XfoilService::new(study.xfoil.clone(), study.airfoils.clone());
            let analysis = XfoilAnalysis {
                alpha: alpha.sweep()?,
                reynolds,
                iterations,
            };
            let table = xfoil.get_coefficients(&airfoil.as_str().into(), &analysis)?;
            report_coefficients(&table, json)?;
            if let Some(path) = csv {
                table.write_csv(&path)?;
            }
            Ok(())
        }
        Commands::WingPolar {
            wing,
            alpha,
            condition,
            iterations,
            csv,
            json,
        } => {
            let wing = load_wing(&wing)?;
            let condition = condition.condition();
            let sweep = alpha.sweep()?;
            let polars = section_polars(&study, &wing, &condition, &sweep, iterations)?;

            let options = GeometryOptions {
                mach_number: condition.mach(),
                ..GeometryOptions::default()
            };
            let avl = AvlService::new(study.avl.clone(), study.airfoils.clone())
                .with_options(options)
                .with_environment(GRAVITY, condition.density()?);
            let table = avl.get_wing_coefficients(&wing, Some(&polars), &sweep)?;

            for polar in &polars {
                report_coefficients(polar, json)?;
            }
            report_coefficients(&table, json)?;
            match lift_coefficient_slope(&table) {
                Ok(slope) => println!("Lift-curve slope: {slope:.4} /rad"),
                Err(e) => println!("Lift-curve slope unavailable: {e}"),
            }

            if let Some(dir) = csv {
                for (index, polar) in polars.iter().enumerate() {
                    polar.write_csv(&dir.join(format!("section_{}.csv", index + 1)))?;
                }
                table.write_csv(&dir.join("wing.csv"))?;
            }
            Ok(())
        }
        Commands::LiftDistribution {
            wing,
            alpha,
            bank,
            condition,
            viscous,
            csv,
            json,
        } => {
            let wing = load_wing(&wing)?;
            let condition = condition.condition();
            let case = match alpha {
                Some(alpha) => DistributionCase::Alpha(alpha),
                None => DistributionCase::LevelTrim {
                    velocity: condition.velocity,
                    bank_angle: bank,
                },
            };
            let polars = if viscous {
                let (start, end, increment) = DRAG_FIT_SWEEP;
                let sweep = AlphaSweep::range(start, end, increment);
                Some(section_polars(&study, &wing, &condition, &sweep, 1000)?)
            } else {
                None
            };

            let avl = AvlService::new(study.avl.clone(), study.airfoils.clone())
                .with_options(GeometryOptions {
                    mach_number: condition.mach(),
                    ..GeometryOptions::default()
                })
                .with_environment(GRAVITY, condition.density()?);
            let table = avl.get_wing_lift_distribution(&wing, polars.as_deref(), &case)?;
            report_distribution(&table, json)?;
            if let Some(path) = csv {
                table.write_csv(&path)?;
            }
            Ok(())
        }
    }
}

fn load_wing(path: &Path) -> anyhow::Result<Wing> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let wing: Wing =
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    wing.validate()?;
    Ok(wing)
}

/// One viscous XFOIL polar per section, at the section's chord Reynolds number.
fn section_polars(
    study: &StudyConfig,
    wing: &Wing,
    condition: &FlightCondition,
    sweep: &AlphaSweep,
    iterations: u32,
) -> anyhow::Result<Vec<CoefficientsTable>> {
    let xfoil = XfoilService::new(study.xfoil.clone(), study.airfoils.clone());
    wing.sections
        .iter()
        .map(|section| -> anyhow::Result<CoefficientsTable> {
            let reynolds = condition.reynolds(section.chord)?;
            info!(airfoil = %section.airfoil.name, chord = section.chord, reynolds, "section polar");
            let analysis = XfoilAnalysis::viscous(sweep.clone(), reynolds).with_iterations(iterations);
            Ok(xfoil.get_coefficients(&section.airfoil, &analysis)?)
        })
        .collect()
}

fn report_coefficients(table: &CoefficientsTable, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
        return Ok(());
    }
    println!("{}", table.label);
    println!("{:>8} {:>9} {:>9} {:>9}", "alpha", "CL", "CD", "CM");
    for row in table.iter() {
        println!(
            "{:>8.3} {:>9.4} {:>9.5} {:>9.4}",
            row.alpha, row.lift_coefficient, row.drag_coefficient, row.moment_coefficient
        );
    }
    let unconverged = table.unconverged_alphas();
    if !unconverged.is_empty() {
        println!("Unconverged: {unconverged:?}");
    }
    println!();
    Ok(())
}

fn report_distribution(table: &LiftDistributionTable, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
        return Ok(());
    }
    println!("{}", table.label);
    println!("{:>9} {:>9}", "y", "cl");
    for row in &table.rows {
        println!("{:>9.4} {:>9.4}", row.spanwise_location, row.lift_coefficient);
    }
    Ok(())
}
