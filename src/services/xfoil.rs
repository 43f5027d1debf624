use std::fmt::Write;
use std::fs;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::process::SolverRun;
use super::AlphaSweep;
use crate::config::SolverConfig;
use crate::geometry::{Airfoil, AirfoilLibrary};
use crate::models::{CoefficientRow, CoefficientsTable};
use crate::utils::{format_number, AeroError, Result};

const POLAR_FILE: &str = "polar.txt";
/// Lines before the first data row of a saved polar.
const POLAR_HEADER_LINES: usize = 12;
/// Byte ranges of alpha, CL, CD, CDp and CM in a polar data row.
const POLAR_COLUMNS: [(usize, usize); 5] = [(2, 8), (10, 17), (19, 27), (29, 37), (39, 46)];

/// One 2D analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XfoilAnalysis {
    pub alpha: AlphaSweep,
    /// Chord Reynolds number. Inviscid when unset.
    #[serde(default)]
    pub reynolds: Option<f64>,
    /// Viscous iteration limit per angle.
    #[serde(default)]
    pub iterations: Option<u32>,
}

impl XfoilAnalysis {
    pub fn inviscid(alpha: AlphaSweep) -> Self {
        Self {
            alpha,
            reynolds: None,
            iterations: None,
        }
    }

    pub fn viscous(alpha: AlphaSweep, reynolds: f64) -> Self {
        Self {
            alpha,
            reynolds: Some(reynolds),
            iterations: None,
        }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(re) = self.reynolds {
            if !(re.is_finite() && re > 0.0) {
                return Err(AeroError::InvalidParameter(format!(
                    "Reynolds number must be positive, got {re}"
                )));
            }
        }
        if self.iterations == Some(0) {
            return Err(AeroError::InvalidParameter(
                "iteration limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// 2D airfoil polars from XFOIL.
#[derive(Debug, Clone)]
pub struct XfoilService {
    config: SolverConfig,
    airfoils: AirfoilLibrary,
}

impl XfoilService {
    pub fn new(config: SolverConfig, airfoils: AirfoilLibrary) -> Self {
        Self { config, airfoils }
    }

    /// Solves the airfoil at every requested angle.
    ///
    /// Angles XFOIL fails to converge are missing from the table; the requested list
    /// is kept in it so they can be identified.
    pub fn get_coefficients(
        &self,
        airfoil: &Airfoil,
        analysis: &XfoilAnalysis,
    ) -> Result<CoefficientsTable> {
        analysis.validate()?;
        let alphas = analysis.alpha.angles()?;
        let airfoil_path = self.airfoils.path(airfoil)?;
        if !airfoil_path.is_file() {
            return Err(AeroError::InvalidParameter(format!(
                "airfoil file {} does not exist",
                airfoil_path.display()
            )));
        }

        let run = SolverRun::prepare(&self.config)?;
        run.remove_stale(&[POLAR_FILE])?;
        let script = build_script(
            &airfoil_path.display().to_string(),
            analysis,
            &alphas,
            POLAR_FILE,
        );
        info!(airfoil = %airfoil.name, angles = alphas.len(), reynolds = ?analysis.reynolds, "running XFOIL");
        run.execute(&script)?;

        let path = run.require_output(POLAR_FILE)?;
        let text = fs::read_to_string(&path)?;
        let rows = parse_polar(&text).map_err(|e| e.with_path(&path))?;
        let table = CoefficientsTable::new(label(airfoil, analysis.reynolds), rows)
            .with_requested_alphas(alphas);

        let unconverged = table.unconverged_alphas();
        if !unconverged.is_empty() {
            warn!(airfoil = %airfoil.name, ?unconverged, "XFOIL did not converge at every angle");
        }
        Ok(table)
    }
}

fn label(airfoil: &Airfoil, reynolds: Option<f64>) -> String {
    let flow = match reynolds {
        Some(re) => format!("Re={}", scientific(re)),
        None => "Inviscid".to_string(),
    };
    format!("XFOIL | 2D | Airfoil {} | {}", airfoil.name, flow)
}

/// `4.000e+05` style: three decimals, signed two-digit exponent.
fn scientific(value: f64) -> String {
    let text = format!("{value:.3e}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text.clone();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return text.clone();
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

/// Command script for one polar accumulation.
pub(crate) fn build_script(
    airfoil_path: &str,
    analysis: &XfoilAnalysis,
    alphas: &[f64],
    output_file: &str,
) -> String {
    let mut script = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(script, "LOAD {airfoil_path}");
    let _ = writeln!(script, "PANE");
    let _ = writeln!(script, "OPER");
    if let Some(re) = analysis.reynolds {
        let _ = writeln!(script, "VISC {}", format_number(re));
        // Viscous iteration limit, meaningless for an inviscid run
        if let Some(iterations) = analysis.iterations {
            let _ = writeln!(script, "ITER {iterations}");
        }
    }
    let _ = writeln!(script, "PACC");
    let _ = writeln!(script, "{output_file}");
    let _ = writeln!(script);
    for alpha in alphas {
        let _ = writeln!(script, "ALFA {}", format_number(*alpha));
    }
    let _ = writeln!(script, "PACC");
    let _ = writeln!(script);
    let _ = writeln!(script, "QUIT");
    script
}

/// Parses a saved polar: a fixed header followed by fixed-width data rows.
pub(crate) fn parse_polar(text: &str) -> Result<Vec<CoefficientRow>> {
    let mut rows = Vec::new();
    for (index, line) in text.lines().enumerate().skip(POLAR_HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        let mut values = [0.0; 5];
        for (value, &(start, end)) in values.iter_mut().zip(POLAR_COLUMNS.iter()) {
            let field = line
                .get(start..end.min(line.len()))
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .ok_or_else(|| {
                    AeroError::parse(index + 1, format!("missing column {start}..{end}"))
                })?;
            *value = field.parse().map_err(|_| {
                AeroError::parse(index + 1, format!("{field:?} is not a number"))
            })?;
        }
        let [alpha, cl, cd, cdp, cm] = values;
        rows.push(CoefficientRow::new(alpha, cl, cd, cm).with_pressure_drag(cdp));
    }
    Ok(rows)
}
