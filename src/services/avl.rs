use std::collections::HashMap;
use std::fmt::Write;
use std::fs;

use tracing::{info, warn};

use super::process::SolverRun;
use super::AlphaSweep;
use crate::config::SolverConfig;
use crate::environment::air_density;
use crate::geometry::{AirfoilLibrary, Wing};
use crate::models::avl::{GeometryInput, GeometryOptions, MassInput};
use crate::models::{CoefficientRow, CoefficientsTable, LiftDistributionRow, LiftDistributionTable};
use crate::utils::{format_number, AeroError, Result, GRAVITY};

const GEOMETRY_FILE: &str = "wing.avl";
const MASS_FILE: &str = "wing.mass";
const STRIP_FORCES_FILE: &str = "strip_forces.txt";

/// Flight condition a lift distribution is solved for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributionCase {
    /// Fixed angle of attack (deg).
    Alpha(f64),
    /// Level or banked flight trimmed for lift equal to weight (`C1` setup). Needs
    /// the wing's mass.
    LevelTrim { velocity: f64, bank_angle: f64 },
}

impl DistributionCase {
    fn label(&self) -> String {
        match *self {
            DistributionCase::Alpha(alpha) => {
                format!("AVL | Lift distribution | Alpha={}", format_number(alpha))
            }
            DistributionCase::LevelTrim {
                velocity,
                bank_angle,
            } => format!(
                "AVL | Lift distribution | V={} m/s | Bank={}°",
                format_number(velocity),
                format_number(bank_angle)
            ),
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            DistributionCase::Alpha(alpha) if !alpha.is_finite() => Err(
                AeroError::InvalidParameter(format!("angle of attack {alpha} is not finite")),
            ),
            DistributionCase::LevelTrim { velocity, .. } if !(velocity > 0.0) => {
                Err(AeroError::InvalidParameter(format!(
                    "trim velocity must be positive, got {velocity}"
                )))
            }
            DistributionCase::LevelTrim { bank_angle, .. } if !(bank_angle.abs() < 90.0) => {
                Err(AeroError::InvalidParameter(format!(
                    "bank angle must lie within ±90°, got {bank_angle}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// 3D wing analysis with AVL.
#[derive(Debug, Clone)]
pub struct AvlService {
    config: SolverConfig,
    airfoils: AirfoilLibrary,
    options: GeometryOptions,
    gravity: f64,
    air_density: f64,
}

impl AvlService {
    /// Sea-level standard conditions and default geometry options.
    pub fn new(config: SolverConfig, airfoils: AirfoilLibrary) -> Self {
        Self {
            config,
            airfoils,
            options: GeometryOptions::default(),
            gravity: GRAVITY,
            air_density: air_density(0.0).unwrap_or(1.225),
        }
    }

    pub fn with_options(mut self, options: GeometryOptions) -> Self {
        self.options = options;
        self
    }

    /// Gravity (m/s²) and air density (kg/m³) written to the mass file.
    pub fn with_environment(mut self, gravity: f64, air_density: f64) -> Self {
        self.gravity = gravity;
        self.air_density = air_density;
        self
    }

    /// Total wing coefficients over an angle-of-attack sweep.
    ///
    /// `section_polars` (one per wing section, in `wing.sections` order) add a
    /// viscous CDCL drag model to each section.
    pub fn get_wing_coefficients(
        &self,
        wing: &Wing,
        section_polars: Option<&[CoefficientsTable]>,
        alpha: &AlphaSweep,
    ) -> Result<CoefficientsTable> {
        let alphas = alpha.angles()?;
        let geometry = self.geometry(wing, section_polars)?;
        let mass = self.mass(wing)?;

        let run = SolverRun::prepare(&self.config)?;
        let outputs: Vec<String> = (0..alphas.len()).map(total_forces_file).collect();
        run.remove_stale(&outputs)?;
        run.write_file(GEOMETRY_FILE, &geometry.to_input_file())?;
        if let Some(mass) = &mass {
            run.write_file(MASS_FILE, &mass.to_input_file())?;
        }

        let script = sweep_script(GEOMETRY_FILE, mass.as_ref().map(|_| MASS_FILE), &alphas);
        info!(angles = alphas.len(), sections = wing.sections.len(), "running AVL sweep");
        run.execute(&script)?;

        let mut rows = Vec::with_capacity(alphas.len());
        let mut unconverged = Vec::new();
        for (alpha, name) in alphas.iter().zip(&outputs) {
            let path = run.path(name);
            if !path.is_file() {
                unconverged.push(*alpha);
                continue;
            }
            let text = fs::read_to_string(&path)?;
            rows.push(parse_total_forces(&text).map_err(|e| e.with_path(&path))?);
        }
        if rows.is_empty() {
            // Nothing written at all: report the first expected file.
            run.require_output(&outputs[0])?;
        }
        if !unconverged.is_empty() {
            warn!(?unconverged, "AVL produced no forces for some angles");
        }

        let label = format!("AVL | 3D | {}", geometry.header.title);
        Ok(CoefficientsTable::new(label, rows).with_requested_alphas(alphas))
    }

    /// Spanwise local lift coefficient for one flight condition.
    pub fn get_wing_lift_distribution(
        &self,
        wing: &Wing,
        section_polars: Option<&[CoefficientsTable]>,
        case: &DistributionCase,
    ) -> Result<LiftDistributionTable> {
        case.validate()?;
        let geometry = self.geometry(wing, section_polars)?;
        let mass = self.mass(wing)?;
        if matches!(case, DistributionCase::LevelTrim { .. }) && mass.is_none() {
            return Err(AeroError::InvalidParameter(
                "a trimmed lift distribution needs the wing mass".to_string(),
            ));
        }

        let run = SolverRun::prepare(&self.config)?;
        run.remove_stale(&[STRIP_FORCES_FILE])?;
        run.write_file(GEOMETRY_FILE, &geometry.to_input_file())?;
        if let Some(mass) = &mass {
            run.write_file(MASS_FILE, &mass.to_input_file())?;
        }

        let script = distribution_script(
            GEOMETRY_FILE,
            mass.as_ref().map(|_| MASS_FILE),
            case,
            STRIP_FORCES_FILE,
        );
        info!(?case, "running AVL strip forces");
        run.execute(&script)?;

        let path = run.require_output(STRIP_FORCES_FILE)?;
        let text = fs::read_to_string(&path)?;
        let rows = parse_strip_forces(&text).map_err(|e| e.with_path(&path))?;
        Ok(LiftDistributionTable::new(case.label(), rows))
    }

    fn geometry(
        &self,
        wing: &Wing,
        section_polars: Option<&[CoefficientsTable]>,
    ) -> Result<GeometryInput> {
        let geometry = GeometryInput::from_wing(wing, &self.options, &self.airfoils, section_polars)?;
        geometry.validate()?;
        Ok(geometry)
    }

    fn mass(&self, wing: &Wing) -> Result<Option<MassInput>> {
        if wing.mass_properties.mass > 0.0 {
            MassInput::from_wing(wing, self.gravity, self.air_density).map(Some)
        } else {
            Ok(None)
        }
    }
}

fn total_forces_file(index: usize) -> String {
    format!("ft_{index:03}.txt")
}

fn script_prelude(script: &mut String, geometry_file: &str, mass_file: Option<&str>) {
    let _ = writeln!(script, "LOAD {geometry_file}");
    if let Some(mass_file) = mass_file {
        let _ = writeln!(script, "MASS {mass_file}");
        let _ = writeln!(script, "MSET");
        let _ = writeln!(script, "0");
    }
    let _ = writeln!(script, "OPER");
}

/// One `FT` dump per angle, written to `ft_000.txt`, `ft_001.txt`, ...
pub(crate) fn sweep_script(geometry_file: &str, mass_file: Option<&str>, alphas: &[f64]) -> String {
    let mut script = String::new();
    // Writing into a String cannot fail.
    script_prelude(&mut script, geometry_file, mass_file);
    for (index, alpha) in alphas.iter().enumerate() {
        let _ = writeln!(script, "A A {}", format_number(*alpha));
        let _ = writeln!(script, "X");
        let _ = writeln!(script, "FT");
        let _ = writeln!(script, "{}", total_forces_file(index));
    }
    let _ = writeln!(script);
    let _ = writeln!(script, "QUIT");
    script
}

pub(crate) fn distribution_script(
    geometry_file: &str,
    mass_file: Option<&str>,
    case: &DistributionCase,
    output_file: &str,
) -> String {
    let mut script = String::new();
    script_prelude(&mut script, geometry_file, mass_file);
    match *case {
        DistributionCase::Alpha(alpha) => {
            let _ = writeln!(script, "A A {}", format_number(alpha));
        }
        DistributionCase::LevelTrim {
            velocity,
            bank_angle,
        } => {
            let _ = writeln!(script, "C1");
            let _ = writeln!(script, "B {}", format_number(bank_angle));
            let _ = writeln!(script, "V {}", format_number(velocity));
            let _ = writeln!(script);
        }
    }
    let _ = writeln!(script, "X");
    let _ = writeln!(script, "FS");
    let _ = writeln!(script, "{output_file}");
    let _ = writeln!(script);
    let _ = writeln!(script, "QUIT");
    script
}

/// Reads `Alpha`, `CLtot`, `CDtot` and `Cmtot` from a total-forces dump, which
/// prints every quantity as `name = value`.
pub(crate) fn parse_total_forces(text: &str) -> Result<CoefficientRow> {
    let mut values: HashMap<&str, f64> = HashMap::new();
    for (index, line) in text.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        for window in tokens.windows(3) {
            if let [key, "=", value] = window {
                if matches!(*key, "Alpha" | "CLtot" | "CDtot" | "Cmtot") {
                    let value = value.parse().map_err(|_| {
                        AeroError::parse(index + 1, format!("{key} value {value:?} is not a number"))
                    })?;
                    values.entry(*key).or_insert(value);
                }
            }
        }
    }
    let get = |key: &str| {
        values
            .get(key)
            .copied()
            .ok_or_else(|| AeroError::parse(0, format!("{key} not found")))
    };
    Ok(CoefficientRow::new(
        get("Alpha")?,
        get("CLtot")?,
        get("CDtot")?,
        get("Cmtot")?,
    ))
}

/// Reads `(Yle, cl)` of every strip of every surface in a strip-forces dump.
///
/// Columns are located through the table header rather than by position.
pub(crate) fn parse_strip_forces(text: &str) -> Result<Vec<LiftDistributionRow>> {
    let mut rows = Vec::new();
    let mut columns: Option<(usize, usize)> = None;
    for (index, line) in text.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            continue;
        };
        if *first == "j" && tokens.contains(&"Yle") {
            columns = Some(strip_columns(&tokens).ok_or_else(|| {
                AeroError::parse(index + 1, "strip table header without Yle and cl columns")
            })?);
            continue;
        }
        let Some((y_column, cl_column)) = columns else {
            continue;
        };
        if first.parse::<u32>().is_err() {
            // End of this surface's table
            columns = None;
            continue;
        }
        let field = |column: usize| -> Result<f64> {
            let token = tokens.get(column).ok_or_else(|| {
                AeroError::parse(index + 1, format!("strip row has no column {}", column + 1))
            })?;
            token
                .parse()
                .map_err(|_| AeroError::parse(index + 1, format!("{token:?} is not a number")))
        };
        rows.push(LiftDistributionRow {
            spanwise_location: field(y_column)?,
            lift_coefficient: field(cl_column)?,
        });
    }
    if rows.is_empty() {
        return Err(AeroError::parse(0, "no strip rows found"));
    }
    rows.sort_by(|a, b| a.spanwise_location.total_cmp(&b.spanwise_location));
    Ok(rows)
}

/// Indices of the `Yle` and `cl` data columns. AVL labels the `c·cl` column with two
/// words, so they are merged before counting.
fn strip_columns(header: &[&str]) -> Option<(usize, usize)> {
    let mut names: Vec<&str> = Vec::with_capacity(header.len());
    let mut tokens = header.iter().peekable();
    while let Some(&token) = tokens.next() {
        if token == "c" && tokens.peek().map(|t| **t) == Some("cl") {
            tokens.next();
            names.push("c_cl");
        } else {
            names.push(token);
        }
    }
    let y = names.iter().position(|n| *n == "Yle")?;
    let cl = names.iter().position(|n| *n == "cl")?;
    Some((y, cl))
}
